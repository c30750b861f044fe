//! Nataraja library - audio-reactive noise threads

pub mod animation;
pub mod audio;
pub mod canvas;
pub mod cli;
pub mod error;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod shapes;
