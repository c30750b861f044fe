//! Byte spectrum analysis compatible with a browser `AnalyserNode`.
//!
//! Blackman-windowed FFT of the most recent `fft_size` samples, magnitudes
//! scaled by `1/N`, exponentially smoothed across calls, converted to dB and
//! mapped linearly from `[min_decibels, max_decibels]` onto `0..=255`.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::params::AnalyserConfig;

/// Frequency analyser producing one byte per bin
pub struct FrequencyAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f64>,
}

impl FrequencyAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(size);
        let window = (0..size).map(|i| blackman_window(i, size)).collect();
        Ok(Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; config.frequency_bin_count()],
            config,
        })
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Analyse the tail of `time_domain` and write byte magnitudes into `out`
    ///
    /// Shorter input is treated as preceded by silence. Bins beyond
    /// `out.len()` are still smoothed but not written.
    pub fn byte_frequency_data(&mut self, time_domain: &[f32], out: &mut [u8]) {
        let size = self.config.fft_size;
        let recent = &time_domain[time_domain.len().saturating_sub(size)..];
        let pad = size - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing_time_constant;
        let scale = 1.0 / size as f64;
        for (bin, value) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[bin].norm() as f64 * scale;
            let next = tau * *value + (1.0 - tau) * magnitude;
            *value = if next.is_finite() { next } else { 0.0 };
        }

        for (dst, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            *dst = self.to_byte(magnitude);
        }
    }

    fn to_byte(&self, magnitude: f64) -> u8 {
        let min = self.config.min_decibels;
        let max = self.config.max_decibels;
        // log10(0) = -inf, which clamps to 0 below
        let db = 20.0 * magnitude.log10();
        let scaled = (255.0 / (max - min) * (db - min)).floor();
        if scaled.is_nan() {
            0
        } else {
            scaled.clamp(0.0, 255.0) as u8
        }
    }
}

/// Blackman window (alpha = 0.16), periodic form over `size` samples
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let x = index as f64 / size as f64;
    (0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()) as f32
}
