//! Random surface point sampling.

use mesh_distance::PointMask;
use mesh_types::{Aabb, IndexedMesh, MeshTopology};
use rand::Rng;
use rand::seq::{SliceRandom, index};
use tracing::debug;

/// Draws random subject points as extra ROI candidates.
///
/// Sampling is without repetition: asking for at least as many points as
/// are eligible returns every eligible point once, in random order.
///
/// With stratification the bounding box of the eligible points is split
/// into a regular grid of roughly `n` bins and points are drawn round-robin
/// from the non-empty bins, so sparse regions are represented alongside
/// dense ones.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use roi_select::RandomPointSampler;
///
/// let mesh = IndexedMesh::planar_grid(10, 10, 1.0, [0.0, 0.0], 0.0);
/// let sampler = RandomPointSampler::new(true);
///
/// let a = sampler.sample(&mesh, 5, None, &mut StdRng::seed_from_u64(3));
/// let b = sampler.sample(&mesh, 5, None, &mut StdRng::seed_from_u64(3));
/// assert_eq!(a.len(), 5);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomPointSampler {
    stratified: bool,
}

impl Default for RandomPointSampler {
    fn default() -> Self {
        Self { stratified: true }
    }
}

impl RandomPointSampler {
    /// Create a sampler.
    #[must_use]
    pub const fn new(stratified: bool) -> Self {
        Self { stratified }
    }

    /// Draw up to `n` distinct point indices of `mesh`.
    ///
    /// Only points set in `mask` are eligible when a mask is given. Returns
    /// `min(n, eligible)` indices.
    #[must_use]
    pub fn sample<R: Rng + ?Sized>(
        &self,
        mesh: &IndexedMesh,
        n: usize,
        mask: Option<&PointMask>,
        rng: &mut R,
    ) -> Vec<u32> {
        #[allow(clippy::cast_possible_truncation)]
        let eligible: Vec<u32> = (0..mesh.vertex_count())
            .filter(|&i| mask.is_none_or(|m| m.is_set(i)))
            .map(|i| i as u32)
            .collect();

        if n == 0 || eligible.is_empty() {
            return Vec::new();
        }

        let mut picked = if n >= eligible.len() {
            let mut all = eligible;
            all.shuffle(rng);
            all
        } else if self.stratified {
            stratified_sample(mesh, &eligible, n, rng)
        } else {
            index::sample(rng, eligible.len(), n)
                .into_iter()
                .map(|i| eligible[i])
                .collect()
        };
        picked.truncate(n);

        debug!(
            requested = n,
            drawn = picked.len(),
            stratified = self.stratified,
            "Random points sampled"
        );
        picked
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn stratified_sample<R: Rng + ?Sized>(
    mesh: &IndexedMesh,
    eligible: &[u32],
    n: usize,
    rng: &mut R,
) -> Vec<u32> {
    let bounds = Aabb::from_points(
        eligible
            .iter()
            .map(|&i| &mesh.vertices[i as usize].position),
    );
    let size = bounds.size();
    let k = ((n as f64).cbrt().ceil() as usize).max(1);

    let cell = |value: f64, min: f64, extent: f64| -> usize {
        if extent > 0.0 {
            (((value - min) / extent * k as f64) as usize).min(k - 1)
        } else {
            0
        }
    };

    let mut bins: Vec<Vec<u32>> = vec![Vec::new(); k * k * k];
    for &i in eligible {
        let p = mesh.vertices[i as usize].position;
        let cx = cell(p.x, bounds.min.x, size.x);
        let cy = cell(p.y, bounds.min.y, size.y);
        let cz = cell(p.z, bounds.min.z, size.z);
        bins[(cx * k + cy) * k + cz].push(i);
    }

    let mut bins: Vec<Vec<u32>> = bins.into_iter().filter(|b| !b.is_empty()).collect();
    for bin in &mut bins {
        bin.shuffle(rng);
    }
    bins.shuffle(rng);

    let mut picked = Vec::with_capacity(n);
    let mut round = 0;
    while picked.len() < n {
        let before = picked.len();
        for bin in &bins {
            if let Some(&i) = bin.get(round) {
                picked.push(i);
                if picked.len() == n {
                    break;
                }
            }
        }
        if picked.len() == before {
            break;
        }
        round += 1;
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::Vertex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_blobs() -> IndexedMesh {
        // Dense grid near the origin plus a handful of far points
        let mut mesh = IndexedMesh::planar_grid(20, 20, 0.1, [0.0, 0.0], 0.0);
        for i in 0..4 {
            mesh.vertices
                .push(Vertex::from_coords(100.0 + f64::from(i), 100.0, 100.0));
        }
        mesh
    }

    #[test]
    fn zero_requested_gives_nothing() {
        let mesh = two_blobs();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(RandomPointSampler::new(true).sample(&mesh, 0, None, &mut rng).is_empty());
    }

    #[test]
    fn more_than_available_returns_each_point_once() {
        let mesh = IndexedMesh::planar_grid(3, 3, 1.0, [0.0, 0.0], 0.0);
        let mut rng = StdRng::seed_from_u64(2);
        for stratified in [true, false] {
            let mut picked = RandomPointSampler::new(stratified).sample(&mesh, 50, None, &mut rng);
            assert_eq!(picked.len(), 9);
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 9);
        }
    }

    #[test]
    fn samples_are_distinct() {
        let mesh = two_blobs();
        let mut rng = StdRng::seed_from_u64(3);
        for stratified in [true, false] {
            let mut picked = RandomPointSampler::new(stratified).sample(&mesh, 40, None, &mut rng);
            assert_eq!(picked.len(), 40);
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 40);
        }
    }

    #[test]
    fn stratified_sampling_reaches_sparse_regions() {
        let mesh = two_blobs();
        let sampler = RandomPointSampler::new(true);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sampler.sample(&mesh, 8, None, &mut rng);
            assert_eq!(picked.len(), 8);
            assert!(picked.iter().any(|&i| i >= 400), "seed {seed}: {picked:?}");
        }
    }

    #[test]
    fn mask_restricts_eligible_points() {
        let mesh = IndexedMesh::planar_grid(4, 4, 1.0, [0.0, 0.0], 0.0);
        let mask = PointMask::from_vec((0..16).map(|i| i % 2 == 0).collect());
        let mut rng = StdRng::seed_from_u64(4);
        let picked = RandomPointSampler::default().sample(&mesh, 5, Some(&mask), &mut rng);
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|&i| i % 2 == 0));
    }

    #[test]
    fn same_seed_same_points() {
        let mesh = two_blobs();
        let sampler = RandomPointSampler::new(false);
        let a = sampler.sample(&mesh, 12, None, &mut StdRng::seed_from_u64(9));
        let b = sampler.sample(&mesh, 12, None, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
