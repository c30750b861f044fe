//! Audio playback and spectrum analysis.
//!
//! Plays a decoded WAV file (or a Glicol composition) through cpal and turns
//! the samples it has just played into byte spectra for the animation.

mod analyser;
mod source;
mod synthesis;
mod system;

// Re-export public types
pub use analyser::{blackman_window, FrequencyAnalyser};
pub use source::{SampleSource, SourceSpec, WavSource};
pub use synthesis::{SynthSource, GLICOL_COMPOSITION};
pub use system::AudioSystem;
