//! The end-to-end selection run.

use mesh_cluster::{ClusterParams, cluster_by_distance};
use mesh_distance::{DistanceParams, PointMask, compute_distance_field_with_params, erode_mask};
use mesh_types::{IndexedMesh, MeshTopology};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use roi_types::{RoiStore, ScanId};
use tracing::{debug, info, warn};

use crate::{
    Candidate, OverlapFilter, PatchSelector, RandomPointSampler, RoiLimit, SelectionConfig,
    SelectionOutcome, SelectionResult,
};

/// Propose new ROIs on `subject` where it deviates from `reference`.
///
/// Steps, in order:
///
/// 1. validate `config`
/// 2. erode the point mask, if any
/// 3. compute the one-way distance field of `subject` against `reference`
/// 4. raise the distance floor to the configured percentile, if any
/// 5. cluster active points into connected patches
/// 6. rank surviving patches and place one candidate per patch
/// 7. append random surface points
/// 8. drop candidates overlapping each other or the stored ROIs of `scan`
///
/// The store is only read. Persist the accepted candidates with
/// [`SelectionOutcome::into_rois`] and [`RoiStore::insert_rois`].
///
/// # Errors
///
/// Fails on invalid configuration, a malformed mesh, a store lookup failure
/// or a degenerate overlap check. Nothing is accepted on failure.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use roi_select::{SelectionConfig, select_rois};
/// use roi_types::{MemoryRoiStore, RoiStore, ScanId};
///
/// let reference = IndexedMesh::planar_grid(10, 10, 1.0, [0.0, 0.0], 0.0);
/// let mut subject = reference.clone();
/// for v in &mut subject.vertices[..30] {
///     v.position.z = 3.0;
/// }
///
/// let scan = ScanId::new(1);
/// let mut store = MemoryRoiStore::new();
/// store.register_scan(scan);
///
/// let config = SelectionConfig::default().with_min_patch_size(5).with_seed(7);
/// let outcome = select_rois(&subject, &reference, scan, &store, &config).unwrap();
/// assert_eq!(outcome.len(), 1);
///
/// store.insert_rois(&outcome.into_rois(scan, None)).unwrap();
/// assert_eq!(store.count_rois(scan).unwrap(), 1);
/// ```
pub fn select_rois<S: RoiStore + ?Sized>(
    subject: &IndexedMesh,
    reference: &IndexedMesh,
    scan: ScanId,
    store: &S,
    config: &SelectionConfig,
) -> SelectionResult<SelectionOutcome> {
    let max_overlap = config.validate()?;

    info!(
        %scan,
        subject_vertices = subject.vertex_count(),
        subject_faces = subject.face_count(),
        reference_faces = reference.face_count(),
        "Starting ROI selection"
    );

    let mask = effective_mask(subject, config)?;
    let field = compute_distance_field_with_params(
        subject,
        reference,
        mask.as_ref(),
        &DistanceParams::default(),
    )?;

    let mut floor = config.min_distance;
    if let Some(p) = config.distance_percentile {
        if let Some(value) = field.percentile(p)? {
            debug!(percentile = p, value, "Distance percentile");
            floor = floor.max(value);
        }
    }

    let clusters = if field.is_empty() {
        warn!("Empty distance field, no patch candidates");
        Vec::new()
    } else if floor > config.max_distance {
        warn!(
            floor,
            max_distance = config.max_distance,
            "Distance floor exceeds max_distance, skipping clustering"
        );
        Vec::new()
    } else {
        let params = ClusterParams::new(floor, config.max_distance);
        cluster_by_distance(subject, field.distances(), &params)?.into_clusters()
    };

    let selector = PatchSelector::new(config.min_patch_size, config.min_patch_area, floor);
    let mut candidates = selector.candidates(subject, &field, &clusters, config.representative);
    let patch_candidates = candidates.len();

    let deficit = config.min_candidates.saturating_sub(patch_candidates);
    let random_count = config.random_sample_count + deficit;
    if random_count > 0 {
        let mut rng: Box<dyn RngCore> = if let Some(seed) = config.seed {
            Box::new(StdRng::seed_from_u64(seed))
        } else {
            Box::new(rand::thread_rng())
        };
        let sampler = RandomPointSampler::new(config.stratified);
        candidates.extend(
            sampler
                .sample(subject, random_count, mask.as_ref(), &mut *rng)
                .into_iter()
                .filter_map(|i| {
                    subject
                        .position(i as usize)
                        .map(|p| Candidate::random(p, i))
                }),
        );
    }
    let random_candidates = candidates.len() - patch_candidates;

    let limit = effective_limit(scan, store, config)?;
    let mut outcome = SelectionOutcome::empty(config.span, floor, limit);
    outcome.clusters_found = clusters.len();
    outcome.patch_candidates = patch_candidates;
    outcome.random_candidates = random_candidates;

    if candidates.is_empty() {
        info!(%scan, "No candidates, nothing selected");
        return Ok(outcome);
    }

    let filter = OverlapFilter::new(config.overlap_box_span(), max_overlap, limit);
    let filtered = filter.filter(&candidates, scan, store)?;
    outcome.accepted = filtered.accepted;
    outcome.rejected_by_batch = filtered.rejected_by_batch;
    outcome.rejected_by_existing = filtered.rejected_by_existing;

    info!(
        %scan,
        clusters = outcome.clusters_found,
        patch_candidates,
        random_candidates,
        accepted = outcome.len(),
        accepted_random = outcome.accepted_random(),
        "ROI selection complete"
    );
    Ok(outcome)
}

fn effective_mask(
    subject: &IndexedMesh,
    config: &SelectionConfig,
) -> SelectionResult<Option<PointMask>> {
    let Some(mask) = &config.point_mask else {
        return Ok(None);
    };
    if config.mask_erosion == 0 {
        return Ok(Some(mask.clone()));
    }
    let eroded = erode_mask(subject, mask, config.mask_erosion)?;
    debug!(
        before = mask.count_set(),
        after = eroded.count_set(),
        iterations = config.mask_erosion,
        "Point mask eroded"
    );
    Ok(Some(eroded))
}

fn effective_limit<S: RoiStore + ?Sized>(
    scan: ScanId,
    store: &S,
    config: &SelectionConfig,
) -> SelectionResult<RoiLimit> {
    let Some(max_scan) = config.max_scan_rois else {
        return Ok(config.max_new_rois);
    };
    let existing = store.count_rois(scan)?;
    let remaining = max_scan.saturating_sub(existing);
    debug!(existing, max_scan, remaining, "Scan ROI cap");
    Ok(config.max_new_rois.min(RoiLimit::AtMost(remaining)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectionError;
    use roi_types::{MemoryRoiStore, NewRoi};

    fn bumped(nx: usize, height: f64, rows: usize) -> (IndexedMesh, IndexedMesh) {
        let reference = IndexedMesh::planar_grid(nx, nx, 1.0, [0.0, 0.0], 0.0);
        let mut subject = reference.clone();
        for v in &mut subject.vertices[..rows * nx] {
            v.position.z = height;
        }
        (subject, reference)
    }

    fn store(scan: ScanId) -> MemoryRoiStore {
        let mut store = MemoryRoiStore::new();
        store.register_scan(scan);
        store
    }

    #[test]
    fn invalid_config_fails_before_geometry() {
        let (subject, reference) = bumped(5, 2.0, 2);
        let scan = ScanId::new(1);
        let err = select_rois(
            &subject,
            &reference,
            scan,
            &store(scan),
            &SelectionConfig::default().with_span(0.0),
        )
        .unwrap_err();
        assert_eq!(err.stage(), "configuration");
    }

    #[test]
    fn identical_meshes_select_nothing() {
        let (_, reference) = bumped(6, 0.0, 0);
        let scan = ScanId::new(1);
        let outcome = select_rois(
            &reference,
            &reference,
            scan,
            &store(scan),
            &SelectionConfig::default(),
        )
        .unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.clusters_found, 0);
    }

    #[test]
    fn scan_cap_counts_stored_rois() {
        let (subject, reference) = bumped(10, 3.0, 3);
        let scan = ScanId::new(1);
        let mut store = store(scan);
        store
            .insert_roi(NewRoi::new(scan, mesh_types::Point3::new(500.0, 0.0, 0.0), 20.0))
            .unwrap();

        let config = SelectionConfig::default()
            .with_min_patch_size(5)
            .with_max_scan_rois(1);
        let outcome = select_rois(&subject, &reference, scan, &store, &config).unwrap();
        assert_eq!(outcome.limit, RoiLimit::AtMost(0));
        assert!(outcome.is_empty());
        assert_eq!(outcome.patch_candidates, 1);
    }

    #[test]
    fn top_up_adds_random_candidates() {
        let (subject, reference) = bumped(8, 0.0, 0);
        let scan = ScanId::new(1);
        let config = SelectionConfig::default()
            .with_min_candidates(3)
            .with_random_sample_count(1)
            .with_max_overlap(crate::OverlapThreshold::Ratio(1.0))
            .with_seed(11);
        let outcome = select_rois(&subject, &reference, scan, &store(scan), &config).unwrap();
        assert_eq!(outcome.patch_candidates, 0);
        assert_eq!(outcome.random_candidates, 4);
        assert_eq!(outcome.accepted_random(), 4);
    }

    #[test]
    fn floor_above_max_distance_skips_clustering() {
        let (subject, reference) = bumped(8, 3.0, 3);
        let scan = ScanId::new(1);
        let config = SelectionConfig::default()
            .with_min_patch_size(1)
            .with_max_distance(2.0)
            .with_distance_percentile(100);
        let outcome = select_rois(&subject, &reference, scan, &store(scan), &config).unwrap();
        assert!((outcome.distance_floor - 3.0).abs() < 1e-12);
        assert_eq!(outcome.clusters_found, 0);
        assert!(outcome.is_empty());
    }

    #[test]
    fn mask_length_mismatch_is_a_distance_error() {
        let (subject, reference) = bumped(4, 2.0, 1);
        let scan = ScanId::new(1);
        let config = SelectionConfig::default().with_point_mask(PointMask::all(3), 0);
        let err = select_rois(&subject, &reference, scan, &store(scan), &config).unwrap_err();
        assert!(matches!(err, SelectionError::Distance(_)));
    }

    #[test]
    fn unknown_scan_fails_lookup() {
        let (subject, reference) = bumped(8, 3.0, 3);
        let config = SelectionConfig::default().with_min_patch_size(5);
        let err = select_rois(
            &subject,
            &reference,
            ScanId::new(99),
            &MemoryRoiStore::new(),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, SelectionError::Lookup(_)));
    }
}
