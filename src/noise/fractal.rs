//! Multi-octave fractal sum over a 2D noise source.

use noise::NoiseFn;

use super::field::NoiseField;
use crate::params::NoiseConfig;

/// Frequency multiplier between octaves
const LACUNARITY: f64 = 2.0;
/// Amplitude multiplier between octaves
const GAIN: f64 = 0.5;

/// Sums octaves of `N`, each shifted diagonally by `t`
///
/// The sum is not normalised; with the default 5 octaves the amplitudes add
/// up to 1.9375 and the output is only ever used as a geometric offset.
pub struct FractalSampler<N = NoiseField> {
    source: N,
    octaves: u32,
}

impl FractalSampler<NoiseField> {
    /// Sampler over a fresh [`NoiseField`] built from `config`
    pub fn from_config(config: &NoiseConfig) -> Self {
        Self::new(NoiseField::new(config), config.octaves)
    }
}

impl<N: NoiseFn<f64, 2>> FractalSampler<N> {
    pub fn new(source: N, octaves: u32) -> Self {
        Self { source, octaves }
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn source(&self) -> &N {
        &self.source
    }

    /// Fractal value at `(x, y)` for time offset `t`
    pub fn fractal_at(&self, x: f64, y: f64, t: f64) -> f64 {
        let mut value = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            value += amplitude * self.source.get([x * frequency + t, y * frequency + t]);
            frequency *= LACUNARITY;
            amplitude *= GAIN;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Constant;
    use std::cell::RefCell;

    /// Records every point it is sampled at
    struct Probe {
        calls: RefCell<Vec<[f64; 2]>>,
    }

    impl NoiseFn<f64, 2> for Probe {
        fn get(&self, point: [f64; 2]) -> f64 {
            self.calls.borrow_mut().push(point);
            1.0
        }
    }

    #[test]
    fn test_zero_source_yields_zero() {
        for octaves in 0..=8 {
            let sampler = FractalSampler::new(Constant::new(0.0), octaves);
            for (x, y, t) in [(0.0, 0.0, 0.0), (3.7, -1.2, 12.5), (1e6, 2.0, -4.0)] {
                assert_eq!(sampler.fractal_at(x, y, t), 0.0);
            }
        }
    }

    #[test]
    fn test_amplitudes_halve() {
        // Unit source exposes the amplitude series: 1 + 1/2 + 1/4 + 1/8 + 1/16
        let sampler = FractalSampler::new(Constant::new(1.0), 5);
        assert_eq!(sampler.fractal_at(0.3, 0.4, 0.5), 1.9375);
    }

    #[test]
    fn test_frequencies_double_and_shift_by_time() {
        let probe = Probe {
            calls: RefCell::new(Vec::new()),
        };
        let sampler = FractalSampler::new(probe, 3);
        sampler.fractal_at(1.5, -0.25, 10.0);

        let calls = sampler.source().calls.borrow();
        assert_eq!(
            *calls,
            vec![[11.5, 9.75], [13.0, 9.5], [16.0, 9.0]]
        );
    }

    #[test]
    fn test_origin_is_zero_for_noise_field() {
        // Every octave samples the lattice point (0, 0)
        let sampler = FractalSampler::from_config(&NoiseConfig::default());
        assert_eq!(sampler.octaves(), 5);
        assert_eq!(sampler.fractal_at(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_huge_time_offset_does_not_panic() {
        let sampler = FractalSampler::from_config(&NoiseConfig::default());
        assert!(sampler.fractal_at(0.3, 0.4, 1e19).is_finite());
        assert!(sampler.fractal_at(0.3, 0.4, f64::INFINITY).is_nan());
    }

    #[test]
    fn test_deterministic_across_instances() {
        let a = FractalSampler::from_config(&NoiseConfig::default());
        let b = FractalSampler::from_config(&NoiseConfig::default());
        for i in 0..100 {
            let x = i as f64 * 0.0629;
            assert_eq!(a.fractal_at(x, 0.4, 2.5), b.fractal_at(x, 0.4, 2.5));
        }
    }
}
