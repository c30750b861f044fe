//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, radians, seconds, decibels)
//! - Documented ranges and meanings
//! - A `validate()` per config struct

mod audio;
mod noise;
mod render;

// Re-export all types
pub use audio::{audio_constants, AnalyserConfig};
pub use noise::{CachePolicy, NoiseConfig};
pub use render::{RenderConfig, Rgba, ThreadStyle};
