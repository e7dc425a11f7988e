use rand::Rng;

const DROPOFF: f32 = 2.0;

/// Square grid of elevations, side length `n + 1`.
///
/// Filled by recursive midpoint displacement and then pinned to zero along
/// all four borders, so adjacent tiles of the same terrain join seamlessly.
pub struct Heightmap {
    cells: Vec<f32>,
    n: usize,
}

impl Heightmap {
    /// Generates a fractal heightmap of resolution `n` (grid side `n + 1`).
    ///
    /// `roughness` is the half-width of the uniform random offset applied at
    /// the top subdivision level; it halves with each level of recursion.
    /// Random draws come from `rng` in a fixed order (center, then the four
    /// edge midpoints, then the quadrants), so a seeded generator reproduces
    /// the same grid every time.
    pub fn generate(n: usize, roughness: f32, rng: &mut impl Rng) -> Self {
        assert!(n > 0, "terrain resolution must be at least 1");

        let side = n + 1;
        let mut map = Self {
            cells: vec![0.0; side * side],
            n,
        };

        subdivide(&mut map, 0, n, 0, n, roughness, rng);

        // Pin the border so the terrain reads as an island and tiles cleanly.
        for i in 0..side {
            map.set(0, i, 0.0);
            map.set(i, 0, 0.0);
            map.set(n, i, 0.0);
            map.set(i, n, 0.0);
        }

        map
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn side(&self) -> usize {
        self.n + 1
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.cells[i * self.side() + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let side = self.side();
        self.cells[i * side + j] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }
}

/// Midpoint displacement over one sub-square.
///
/// Writes the center, then the four edge midpoints (south, east, north,
/// west), then recurses into the quadrants with a halved offset magnitude.
/// Edge midpoints average two corners, the fresh center, and a wrap-around
/// neighbor looked up modulo the full grid side; the wrap term only matters
/// on the outer boundary, which gets zeroed after generation anyway.
fn subdivide(
    map: &mut Heightmap,
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
    offset_mag: f32,
    rng: &mut impl Rng,
) {
    if max_x - min_x <= 1 || max_y - min_y <= 1 {
        return;
    }

    let mid_x = (min_x + max_x) / 2;
    let mid_y = (min_y + max_y) / 2;

    let side = map.side() as isize;
    let wrap = |v: isize| v.rem_euclid(side) as usize;

    let mut offset = offset_mag * (2.0 * rng.random::<f32>() - 1.0);
    let center = offset
        + (map.get(min_x, min_y)
            + map.get(min_x, max_y)
            + map.get(max_x, min_y)
            + map.get(max_x, max_y))
            / 4.0;
    map.set(mid_x, mid_y, center);

    offset = offset_mag * (2.0 * rng.random::<f32>() - 1.0);
    let south = offset
        + (map.get(min_x, min_y)
            + map.get(max_x, min_y)
            + map.get(mid_x, wrap(min_y as isize - mid_y as isize))
            + map.get(mid_x, mid_y))
            / 4.0;
    map.set(mid_x, min_y, south);

    offset = offset_mag * (2.0 * rng.random::<f32>() - 1.0);
    let east = offset
        + (map.get(mid_x, mid_y)
            + map.get(max_x, min_y)
            + map.get(max_x, max_y)
            + map.get((max_x + mid_x) % side as usize, mid_y))
            / 4.0;
    map.set(max_x, mid_y, east);

    offset = offset_mag * (2.0 * rng.random::<f32>() - 1.0);
    let north = offset
        + (map.get(mid_x, mid_y)
            + map.get(max_x, max_y)
            + map.get(min_x, max_y)
            + map.get(mid_x, (max_y + mid_y) % side as usize))
            / 4.0;
    map.set(mid_x, max_y, north);

    offset = offset_mag * (2.0 * rng.random::<f32>() - 1.0);
    let west = offset
        + (map.get(min_x, min_y)
            + map.get(mid_x, mid_y)
            + map.get(min_x, max_y)
            + map.get(wrap(min_x as isize - mid_x as isize), mid_y))
            / 4.0;
    map.set(min_x, mid_y, west);

    let next_mag = offset_mag / DROPOFF;
    subdivide(map, min_x, mid_x, min_y, mid_y, next_mag, rng);
    subdivide(map, min_x, mid_x, mid_y, max_y, next_mag, rng);
    subdivide(map, mid_x, max_x, min_y, mid_y, next_mag, rng);
    subdivide(map, mid_x, max_x, mid_y, max_y, next_mag, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_shape_and_zero_border() {
        for n in [2, 4, 16, 50] {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let map = Heightmap::generate(n, 0.5, &mut rng);

            assert_eq!(map.side(), n + 1);
            assert_eq!(map.as_slice().len(), (n + 1) * (n + 1));

            for i in 0..=n {
                assert_eq!(map.get(0, i), 0.0);
                assert_eq!(map.get(i, 0), 0.0);
                assert_eq!(map.get(n, i), 0.0);
                assert_eq!(map.get(i, n), 0.0);
            }
        }
    }

    #[test]
    fn test_non_power_of_two_resolution_terminates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let map = Heightmap::generate(3, 0.5, &mut rng);
        assert_eq!(map.as_slice().len(), 16);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        let first = Heightmap::generate(16, 0.5, &mut a);
        let second = Heightmap::generate(16, 0.5, &mut b);

        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn test_zero_roughness_is_flat() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let map = Heightmap::generate(2, 0.0, &mut rng);

        assert!(map.as_slice().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_interior_gets_displaced() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let map = Heightmap::generate(16, 0.5, &mut rng);

        let displaced = (1..16)
            .flat_map(|i| (1..16).map(move |j| (i, j)))
            .any(|(i, j)| map.get(i, j) != 0.0);
        assert!(displaced);
    }

    #[test]
    #[should_panic]
    fn test_zero_resolution_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Heightmap::generate(0, 0.5, &mut rng);
    }
}
