//! Error types for each subsystem.

use thiserror::Error;

/// Invalid configuration or command-line values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("FFT size must be a power of two between 32 and 32768, got {0}")]
    InvalidFftSize(usize),

    #[error("smoothing time constant must be in [0, 1], got {0}")]
    InvalidSmoothing(f64),

    #[error("decibel range is empty: min {min} >= max {max}")]
    InvalidDecibelRange { min: f64, max: f64 },

    #[error("octave count must be at most {max}, got {got}")]
    TooManyOctaves { got: u32, max: u32 },

    #[error("invalid cache policy '{0}' (expected off, unbounded or lru:<entries>)")]
    InvalidCachePolicy(String),

    #[error("invalid colour '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColour(String),

    #[error("palette must contain at least one colour")]
    EmptyPalette,

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// Audio device, decoding and synthesis failures
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to query output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format {0:?} (only f32 output is supported)")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to decode WAV file: {0}")]
    Decode(#[from] hound::Error),

    #[error("WAV file contains no audio frames")]
    EmptyFile,

    #[error("Glicol engine init failed: {0}")]
    Synth(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// GPU setup failures
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
