//! Audio analysis configuration and constants.

use crate::error::ConfigError;

/// Spectrum analyser configuration
///
/// Mirrors the knobs of a browser `AnalyserNode` so byte spectra look the same
/// as they would on a web page fed the same audio.
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size in samples (power of 2, 32..=32768)
    /// Frequency bin count is half of this: 256 -> 128 bins
    pub fft_size: usize,

    /// Temporal smoothing between frames, 0 = none, 1 = frozen
    pub smoothing_time_constant: f64,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f64,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f64,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins in a snapshot
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(ConfigError::InvalidFftSize(self.fft_size));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing_time_constant));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(ConfigError::InvalidDecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Synth block size (samples per engine tick)
    pub const BLOCK_SIZE: usize = 128;

    /// Samples of mono history kept for analysis, enough for the largest FFT
    pub const HISTORY_LEN: usize = 32768;
}
