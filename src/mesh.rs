use crate::terrain::Heightmap;
use glam::Vec3;
use rand::Rng;

/// World-space footprint of the terrain mesh.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// How the per-vertex normal accumulator is finished.
///
/// `Summed` reproduces the historical behavior of this demo: the unit vector
/// is added to the accumulated face-normal sum, so the result points the
/// right way but is not unit length. `Unit` replaces the sum with its unit
/// vector. Shaders that renormalize after interpolation render both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalMode {
    Summed,
    Unit,
}

/// Triangulated terrain: flat parallel arrays indexed by `i * (n + 1) + j`.
pub struct TerrainMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
}

impl TerrainMesh {
    /// Builds vertices, elevation-banded colors, triangle indices, and
    /// vertex normals from a heightmap.
    ///
    /// Colors draw three jitter values per vertex regardless of band so the
    /// random stream stays aligned with generation order; the white band
    /// discards its draws.
    pub fn build(map: &Heightmap, bounds: Bounds, mode: NormalMode, rng: &mut impl Rng) -> Self {
        let n = map.n();
        let side = n + 1;
        assert!(
            side * side <= u16::MAX as usize + 1,
            "resolution {n} overflows 16-bit indices"
        );

        let delta_x = (bounds.max_x - bounds.min_x) / n as f32;
        let delta_y = (bounds.max_y - bounds.min_y) / n as f32;

        let mut positions = Vec::with_capacity(side * side);
        let mut colors = Vec::with_capacity(side * side);

        for i in 0..side {
            for j in 0..side {
                let z = map.get(i, j);
                positions.push([
                    bounds.min_x + delta_x * j as f32,
                    bounds.min_y + delta_y * i as f32,
                    z,
                ]);

                let rand_r = (rng.random::<f32>() - 0.5) / 5.0;
                let rand_g = (rng.random::<f32>() - 0.5) / 5.0;
                let rand_b = (rng.random::<f32>() - 0.5) / 5.0;

                let color = if z < -0.15 {
                    [rand_r, rand_g, 1.0 + rand_b]
                } else if z < 0.1 {
                    [rand_r, 1.0 + rand_g, rand_b]
                } else if z < 0.2 {
                    [0.3 + rand_r, 0.3 + rand_g, 0.3 + rand_b]
                } else {
                    [0.7, 0.7, 0.7]
                };
                colors.push(color);
            }
        }

        let mut indices = Vec::with_capacity(6 * n * n);
        for i in 0..n {
            for j in 0..n {
                let vid = (i * side + j) as u16;
                let below = vid + side as u16;

                indices.push(vid);
                indices.push(vid + 1);
                indices.push(below);

                indices.push(vid + 1);
                indices.push(below + 1);
                indices.push(below);
            }
        }

        let normals = compute_normals(&positions, &indices, mode);

        Self {
            positions,
            colors,
            normals,
            indices,
        }
    }

    pub fn num_triangles(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }
}

/// Derives per-vertex normals from triangle topology.
///
/// Each face contributes its normalized cross-product normal equally to all
/// three corner accumulators. A zero-area face divides by zero and poisons
/// its corners with NaN; callers supply non-degenerate geometry.
pub fn compute_normals(positions: &[[f32; 3]], indices: &[u16], mode: NormalMode) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0] as usize;
        let i1 = tri[1] as usize;
        let i2 = tri[2] as usize;

        let v0 = Vec3::from(positions[i0]);
        let v1 = Vec3::from(positions[i1]);
        let v2 = Vec3::from(positions[i2]);

        let face = (v1 - v0).cross(v2 - v0);
        let face = face / face.length();

        acc[i0] += face;
        acc[i1] += face;
        acc[i2] += face;
    }

    acc.into_iter()
        .map(|v| {
            let out = match mode {
                NormalMode::Summed => v + v / v.length(),
                NormalMode::Unit => v / v.length(),
            };
            out.to_array()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const UNIT_BOUNDS: Bounds = Bounds {
        min_x: -1.0,
        max_x: 1.0,
        min_y: -1.0,
        max_y: 1.0,
    };

    fn flat_map(n: usize) -> Heightmap {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Heightmap::generate(n, 0.0, &mut rng)
    }

    #[test]
    fn test_mesh_counts_at_demo_resolution() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let map = Heightmap::generate(50, 0.5, &mut rng);
        let mesh = TerrainMesh::build(&map, UNIT_BOUNDS, NormalMode::Unit, &mut rng);

        assert_eq!(mesh.positions.len(), 2601);
        assert_eq!(mesh.colors.len(), 2601);
        assert_eq!(mesh.normals.len(), 2601);
        assert_eq!(mesh.indices.len(), 15000);
        assert_eq!(mesh.num_triangles(), 5000);

        assert!(mesh.indices.iter().all(|&i| (i as usize) < 2601));
    }

    #[test]
    fn test_flat_three_by_three_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let map = flat_map(2);
        let mesh = TerrainMesh::build(&map, UNIT_BOUNDS, NormalMode::Unit, &mut rng);

        assert_eq!(mesh.num_triangles(), 8);
        assert!(mesh.indices.iter().all(|&i| i < 9));
        assert!(mesh.positions.iter().all(|p| p[2] == 0.0));

        // Everything sits in the green band; jitter stays within +-0.1.
        for c in &mesh.colors {
            assert!(c[0].abs() <= 0.1);
            assert!((c[1] - 1.0).abs() <= 0.1);
            assert!(c[2].abs() <= 0.1);
        }

        // Corner positions interpolate the bounds exactly.
        assert_eq!(mesh.positions[0], [-1.0, -1.0, 0.0]);
        assert_eq!(mesh.positions[8], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_low_elevation_vertex_is_blue_banded() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut map = flat_map(2);
        map.set(1, 1, -0.5);
        let mesh = TerrainMesh::build(&map, UNIT_BOUNDS, NormalMode::Unit, &mut rng);

        let c = mesh.colors[4];
        assert!(c[0].abs() <= 0.1);
        assert!(c[1].abs() <= 0.1);
        assert!(c[2] >= 0.9 && c[2] <= 1.1);
    }

    #[test]
    fn test_quad_normals_point_up() {
        let positions = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let indices = [0u16, 1, 2, 1, 3, 2];

        let unit = compute_normals(&positions, &indices, NormalMode::Unit);
        for n in &unit {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }

        // Summed mode keeps the accumulator and adds its unit vector on top:
        // a corner touching one face ends at length 2, one touching two
        // faces at length 3.
        let summed = compute_normals(&positions, &indices, NormalMode::Summed);
        assert_eq!(summed[0], [0.0, 0.0, 2.0]);
        assert_eq!(summed[1], [0.0, 0.0, 3.0]);
        assert_eq!(summed[2], [0.0, 0.0, 3.0]);
        assert_eq!(summed[3], [0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_degenerate_triangle_propagates_nan() {
        let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let indices = [0u16, 1, 2];

        let normals = compute_normals(&positions, &indices, NormalMode::Unit);
        assert!(normals.iter().all(|n| n.iter().all(|c| c.is_nan())));
    }

    #[test]
    fn test_mesh_normals_are_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let map = Heightmap::generate(8, 0.5, &mut rng);
        let mesh = TerrainMesh::build(&map, UNIT_BOUNDS, NormalMode::Unit, &mut rng);

        for n in &mesh.normals {
            let len = Vec3::from(*n).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    #[should_panic]
    fn test_dense_grid_overflows_u16_indices() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let map = Heightmap::generate(256, 0.0, &mut rng);
        TerrainMesh::build(&map, UNIT_BOUNDS, NormalMode::Unit, &mut rng);
    }
}
