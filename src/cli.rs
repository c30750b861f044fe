//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::audio::SourceSpec;
use crate::error::ConfigError;
use crate::params::{AnalyserConfig, CachePolicy, NoiseConfig, RenderConfig, Rgba, ThreadStyle};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "nataraja")]
#[command(about = "Audio-reactive noise threads", long_about = None)]
pub struct Args {
    /// WAV file to play; a procedural synth plays when omitted
    #[arg(value_name = "WAV")]
    pub audio: Option<PathBuf>,

    /// Start immediately instead of waiting for a click, Space or Enter
    #[arg(long)]
    pub autostart: bool,

    /// Loop the WAV file
    #[arg(long = "loop")]
    pub looping: bool,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Fractal octaves per noise sample
    #[arg(long, default_value_t = 5)]
    pub octaves: u32,

    /// Lattice gradient cache: off, unbounded or lru:<entries>
    #[arg(long, value_name = "POLICY", default_value = "lru:4096")]
    pub gradient_cache: CachePolicy,

    /// Sampled value cache: off, unbounded or lru:<entries>
    #[arg(long, value_name = "POLICY", default_value = "lru:16384")]
    pub value_cache: CachePolicy,

    /// Comma-separated stroke colours (#rrggbb or #rrggbbaa)
    #[arg(long, value_delimiter = ',', value_name = "COLOURS")]
    pub palette: Vec<Rgba>,

    /// Analyser FFT size (power of 2); bins are half of this
    #[arg(long, value_name = "SAMPLES", default_value_t = 256)]
    pub fft_size: usize,

    /// Analyser smoothing between frames, 0..=1
    #[arg(long, default_value_t = 0.8)]
    pub smoothing: f64,
}

/// Validated configuration assembled from [`Args`]
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceSpec,
    pub autostart: bool,
    pub render: RenderConfig,
    pub style: ThreadStyle,
    pub noise: NoiseConfig,
    pub analyser: AnalyserConfig,
}

impl Args {
    /// Build and validate the typed configuration
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let source = match &self.audio {
            Some(path) => SourceSpec::Wav {
                path: path.clone(),
                looping: self.looping,
            },
            None => SourceSpec::Synth,
        };

        let render = RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..Default::default()
        };

        let mut style = ThreadStyle::default();
        if !self.palette.is_empty() {
            style.palette = self.palette.clone();
        }
        style.validate()?;

        let noise = NoiseConfig {
            octaves: self.octaves,
            gradient_cache: self.gradient_cache,
            value_cache: self.value_cache,
        };
        noise.validate()?;

        let analyser = AnalyserConfig {
            fft_size: self.fft_size,
            smoothing_time_constant: self.smoothing,
            ..Default::default()
        };
        analyser.validate()?;

        Ok(Settings {
            source,
            autostart: self.autostart,
            render,
            style,
            noise,
            analyser,
        })
    }
}
