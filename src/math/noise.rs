use glam::Vec2;

/// Seeded 2D value noise with smoothstep interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueNoise {
    seed: u32,
}

impl ValueNoise {
    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Lattice value in `[0, 1]`
    fn lattice(&self, x: i32, y: i32) -> f32 {
        let mut h = self.seed
            ^ (x as u32).wrapping_mul(0x27d4_eb2d)
            ^ (y as u32).wrapping_mul(0x1656_67b1);
        h = (h ^ (h >> 15)).wrapping_mul(0x85eb_ca6b);
        h = (h ^ (h >> 13)).wrapping_mul(0xc2b2_ae35);
        h ^= h >> 16;
        (h & 0x00ff_ffff) as f32 / 0x00ff_ffff as f32
    }

    /// Noise value in `[0, 1]`, continuous in `point`
    pub fn sample(&self, point: Vec2) -> f32 {
        let cell = point.floor();
        let frac = point - cell;
        let (x, y) = (cell.x as i32, cell.y as i32);
        let u = frac * frac * (Vec2::splat(3.0) - 2.0 * frac);

        let a = self.lattice(x, y);
        let b = self.lattice(x + 1, y);
        let c = self.lattice(x, y + 1);
        let d = self.lattice(x + 1, y + 1);

        let bottom = a + (b - a) * u.x;
        let top = c + (d - c) * u.x;
        bottom + (top - bottom) * u.y
    }

    /// Fractal sum of `octaves` layers, normalized back to `[0, 1]`
    pub fn fbm(&self, point: Vec2, octaves: u32, lacunarity: f32, gain: f32) -> f32 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for octave in 0..octaves {
            let layer = ValueNoise::new(self.seed.wrapping_add(octave));
            sum += amplitude * layer.sample(point * frequency);
            norm += amplitude;
            amplitude *= gain;
            frequency *= lacunarity;
        }
        if norm > 0.0 {
            sum / norm
        } else {
            0.0
        }
    }
}

impl Default for ValueNoise {
    fn default() -> Self {
        Self::new(0x5eed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = Vec2> {
        (0..40).flat_map(|i| (0..40).map(move |j| Vec2::new(i as f32 * 0.37 - 7.0, j as f32 * 0.29 - 5.0)))
    }

    #[test]
    fn test_noise_is_deterministic() {
        let a = ValueNoise::new(7);
        let b = ValueNoise::new(7);
        for p in grid() {
            assert_eq!(a.sample(p), b.sample(p));
        }
    }

    #[test]
    fn test_noise_in_unit_range() {
        let noise = ValueNoise::default();
        for p in grid() {
            let v = noise.sample(p);
            assert!((0.0..=1.0).contains(&v), "{} at {:?}", v, p);
        }
    }

    #[test]
    fn test_noise_matches_lattice_at_integers() {
        let noise = ValueNoise::new(3);
        assert_eq!(noise.sample(Vec2::new(2.0, -4.0)), noise.lattice(2, -4));
    }

    #[test]
    fn test_noise_is_continuous() {
        let noise = ValueNoise::new(11);
        let p = Vec2::new(3.0, 1.5);
        let before = noise.sample(p - Vec2::new(1e-4, 0.0));
        let after = noise.sample(p + Vec2::new(1e-4, 0.0));
        assert!((before - after).abs() < 1e-2);
    }

    #[test]
    fn test_seeds_differ() {
        let a = ValueNoise::new(1);
        let b = ValueNoise::new(2);
        assert!(grid().any(|p| a.sample(p) != b.sample(p)));
    }

    #[test]
    fn test_fbm_in_unit_range() {
        let noise = ValueNoise::default();
        for p in grid() {
            let v = noise.fbm(p, 5, 2.0, 0.5);
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(noise.fbm(Vec2::ZERO, 0, 2.0, 0.5), 0.0);
    }
}
