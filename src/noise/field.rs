//! Deterministic gradient noise with memoised lattice gradients and samples.

use std::cell::RefCell;

use glam::DVec2;
use noise::NoiseFn;

use super::cache::{CacheStats, MemoCache};
use crate::params::NoiseConfig;

/// Nominal noise period; lattice coordinates are scaled by half of it
const NOISE_PERIOD: f64 = 8.0 * 32.0;
const LATTICE_SCALE: f64 = NOISE_PERIOD / 2.0;

/// Quintic easing with zero first and second derivative at 0 and 1
#[inline]
pub fn smootherstep(u: f64) -> f64 {
    6.0 * u.powi(5) - 15.0 * u.powi(4) + 10.0 * u.powi(3)
}

/// Linear blend, exact at both endpoints
#[inline]
pub fn interpolate(a: f64, b: f64, alpha: f64) -> f64 {
    a * (1.0 - alpha) + alpha * b
}

/// Snapshot of both memo tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiseStats {
    pub gradients: CacheStats,
    pub values: CacheStats,
}

/// Gradient ("Perlin-style") noise over the real plane
///
/// Gradients are a pure function of the lattice point, so the output is
/// reproducible across runs and independent of the cache policies. The caches
/// use interior mutability because sampling happens through `&self`
/// ([`NoiseFn::get`]); the field is meant to live on a single thread.
pub struct NoiseField {
    gradients: RefCell<MemoCache<(i64, i64), DVec2>>,
    values: RefCell<MemoCache<(u64, u64), f64>>,
}

impl NoiseField {
    pub fn new(config: &NoiseConfig) -> Self {
        Self {
            gradients: RefCell::new(MemoCache::new(config.gradient_cache)),
            values: RefCell::new(MemoCache::new(config.value_cache)),
        }
    }

    /// Unit gradient at lattice point `(ix, iy)`
    pub fn gradient_at(&self, ix: i64, iy: i64) -> DVec2 {
        self.gradients
            .borrow_mut()
            .get_or_insert_with((ix, iy), || hashed_gradient(ix, iy))
    }

    /// Noise value at `(x, y)`, roughly in [-1, 1]
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        // Keyed on exact bits: only identical coordinates hit
        self.values
            .borrow_mut()
            .get_or_insert_with((x.to_bits(), y.to_bits()), || self.sample(x, y))
    }

    pub fn stats(&self) -> NoiseStats {
        NoiseStats {
            gradients: self.gradients.borrow().stats(),
            values: self.values.borrow().stats(),
        }
    }

    fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        // Saturating cast; neighbours wrap so huge or infinite input never overflows
        let (ix, iy) = (x0 as i64, y0 as i64);
        let (ix1, iy1) = (ix.wrapping_add(1), iy.wrapping_add(1));

        // Offsets stay in f64 so non-finite input yields NaN
        let fx = x - x0;
        let fy = y - y0;
        let sx = smootherstep(fx);
        let sy = smootherstep(fy);

        let n0 = self.corner_dot(ix, iy, fx, fy);
        let n1 = self.corner_dot(ix1, iy, fx - 1.0, fy);
        let top = interpolate(n0, n1, sx);

        let n2 = self.corner_dot(ix, iy1, fx, fy - 1.0);
        let n3 = self.corner_dot(ix1, iy1, fx - 1.0, fy - 1.0);
        let bottom = interpolate(n2, n3, sx);

        interpolate(top, bottom, sy)
    }

    /// Dot product of the corner gradient with the offset `(dx, dy)` from that corner
    fn corner_dot(&self, ix: i64, iy: i64, dx: f64, dy: f64) -> f64 {
        DVec2::new(dx, dy).dot(self.gradient_at(ix, iy))
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(&NoiseConfig::default())
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.value_at(point[0], point[1])
    }
}

/// Trigonometric hash of a lattice point to an angle, as a unit vector
fn hashed_gradient(ix: i64, iy: i64) -> DVec2 {
    let a = ix as f64 * LATTICE_SCALE;
    let b = iy as f64 * LATTICE_SCALE;
    let angle = 2920.0
        * (a * 21942.0 + b * 171324.0 + 8912.0).sin()
        * (a * 23157.0 * b * 217832.0 + 9758.0).cos();
    let (sin, cos) = angle.sin_cos();
    DVec2::new(cos, sin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CachePolicy;
    use approx::assert_abs_diff_eq;

    fn uncached() -> NoiseField {
        NoiseField::new(&NoiseConfig {
            gradient_cache: CachePolicy::Disabled,
            value_cache: CachePolicy::Disabled,
            ..Default::default()
        })
    }

    #[test]
    fn test_gradients_are_unit_and_idempotent() {
        let field = NoiseField::default();
        for ix in -20..20 {
            for iy in -20..20 {
                let g = field.gradient_at(ix, iy);
                assert_abs_diff_eq!(g.length(), 1.0, epsilon = 1e-9);
                assert_eq!(field.gradient_at(ix, iy), g);
            }
        }
    }

    #[test]
    fn test_gradient_at_origin() {
        // a = b = 0: angle = 2920 * sin(8912) * cos(9758)
        let expected = 2920.0 * 8912.0_f64.sin() * 9758.0_f64.cos();
        let g = NoiseField::default().gradient_at(0, 0);
        assert_eq!(g, DVec2::new(expected.cos(), expected.sin()));
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let field = NoiseField::default();
        for ix in -5..5 {
            for iy in -5..5 {
                assert_eq!(field.value_at(ix as f64, iy as f64), 0.0);
            }
        }
    }

    #[test]
    fn test_continuous_across_cell_boundaries() {
        let field = NoiseField::default();
        let eps = 1e-7;
        for boundary in -3..4 {
            let x = boundary as f64;
            for y in [0.13, 0.5, 1.77, -2.4] {
                let left = field.value_at(x - eps, y);
                let right = field.value_at(x + eps, y);
                assert_abs_diff_eq!(left, right, epsilon = 1e-5);

                let below = field.value_at(y, x - eps);
                let above = field.value_at(y, x + eps);
                assert_abs_diff_eq!(below, above, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_continuous_within_cell() {
        let field = NoiseField::default();
        let step = 1e-4;
        let mut previous = field.value_at(0.0, 0.37);
        let mut x = step;
        while x <= 3.0 {
            let current = field.value_at(x, 0.37);
            assert!((current - previous).abs() < 1e-2, "jump at x = {}", x);
            previous = current;
            x += step;
        }
    }

    #[test]
    fn test_values_roughly_bounded() {
        let field = NoiseField::default();
        for i in 0..2000 {
            let x = i as f64 * 0.173 - 150.0;
            let y = i as f64 * 0.291 - 250.0;
            assert!(field.value_at(x, y).abs() <= 1.5);
        }
    }

    #[test]
    fn test_cache_policy_does_not_change_results() {
        let cached = NoiseField::new(&NoiseConfig {
            gradient_cache: CachePolicy::Unbounded,
            value_cache: CachePolicy::Unbounded,
            ..Default::default()
        });
        let plain = uncached();
        for i in 0..500 {
            let (x, y) = (i as f64 * 0.37 - 20.0, i as f64 * -0.11 + 3.0);
            assert_eq!(cached.value_at(x, y), plain.value_at(x, y));
            assert_eq!(cached.value_at(x, y), plain.value_at(x, y));
        }
        let stats = cached.stats();
        assert_eq!(stats.values.hits, 500);
        assert_eq!(stats.values.entries, 500);
        assert_eq!(plain.stats().values.entries, 0);
    }

    #[test]
    fn test_smootherstep_boundaries() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert_abs_diff_eq!(smootherstep(0.5), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(interpolate(-3.5, 8.25, 0.0), -3.5);
        assert_eq!(interpolate(-3.5, 8.25, 1.0), 8.25);
        assert_abs_diff_eq!(interpolate(2.0, 4.0, 0.25), 2.5);
    }

    #[test]
    fn test_extreme_coordinates_do_not_panic() {
        let field = NoiseField::default();
        assert!(field.value_at(f64::INFINITY, 0.5).is_nan());
        assert!(field.value_at(0.5, f64::NEG_INFINITY).is_nan());
        assert!(field.value_at(f64::NAN, 0.5).is_nan());
        assert!(field.value_at(1e19, 0.5).is_finite());
        assert!(field.value_at(-1e19, 1e19).is_finite());
    }

    #[test]
    fn test_noise_fn_matches_value_at() {
        let field = NoiseField::default();
        assert_eq!(field.get([1.25, -0.5]), field.value_at(1.25, -0.5));
    }
}
