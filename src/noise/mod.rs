//! Procedural noise for thread geometry.
//!
//! A deterministic gradient-noise field (no RNG, no seed: gradients come from a
//! fixed trigonometric hash of the lattice coordinates) and a fractal sampler
//! that sums octaves of any 2D [`noise::NoiseFn`].

mod cache;
mod field;
mod fractal;

pub use cache::{CacheStats, MemoCache};
pub use field::{interpolate, smootherstep, NoiseField, NoiseStats};
pub use fractal::FractalSampler;
