//! Audio sources: decoded WAV files and the procedural synth.

use std::path::{Path, PathBuf};

use super::synthesis::SynthSource;
use crate::error::AudioError;

/// Produces interleaved output frames on the audio thread
pub trait SampleSource: Send {
    /// Overwrite `out` with interleaved frames for `channels` output channels
    fn fill(&mut self, out: &mut [f32], channels: usize);

    /// Position of the next frame to be produced (seconds)
    fn position_secs(&self) -> f64;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Which source to play
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    /// Decode and play a WAV file
    Wav { path: PathBuf, looping: bool },
    /// Procedural Glicol composition
    Synth,
}

impl SourceSpec {
    /// Build the source for an output device running at `device_rate`
    pub fn open(&self, device_rate: u32) -> Result<Box<dyn SampleSource>, AudioError> {
        Ok(match self {
            SourceSpec::Wav { path, looping } => {
                Box::new(WavSource::open(path, device_rate, *looping)?)
            }
            SourceSpec::Synth => Box::new(SynthSource::new(device_rate)?),
        })
    }
}

/// Fully decoded WAV file, linearly resampled to the device rate on the fly
pub struct WavSource {
    samples: Vec<f32>,
    channels: usize,
    file_rate: u32,
    /// File frames advanced per output frame
    step: f64,
    /// Read head (file frames)
    position: f64,
    looping: bool,
}

impl WavSource {
    pub fn open(path: &Path, device_rate: u32, looping: bool) -> Result<Self, AudioError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };
        log::info!(
            "decoded {}: {} channels @ {} Hz, {:.1}s",
            path.display(),
            spec.channels,
            spec.sample_rate,
            samples.len() as f64 / spec.channels.max(1) as f64 / spec.sample_rate as f64
        );
        Self::from_samples(
            samples,
            spec.channels as usize,
            spec.sample_rate,
            device_rate,
            looping,
        )
    }

    /// Source over already-decoded interleaved samples
    pub fn from_samples(
        samples: Vec<f32>,
        channels: usize,
        file_rate: u32,
        device_rate: u32,
        looping: bool,
    ) -> Result<Self, AudioError> {
        if channels == 0 || samples.len() < channels {
            return Err(AudioError::EmptyFile);
        }
        Ok(Self {
            samples,
            channels,
            file_rate,
            step: file_rate as f64 / device_rate as f64,
            position: 0.0,
            looping,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.file_rate as f64
    }

    fn sample(&self, frame: usize, channel: usize) -> f32 {
        self.samples[frame * self.channels + channel.min(self.channels - 1)]
    }
}

impl SampleSource for WavSource {
    fn fill(&mut self, out: &mut [f32], channels: usize) {
        let frames = self.frame_count();
        for frame in out.chunks_mut(channels) {
            if self.position >= frames as f64 {
                if self.looping {
                    self.position %= frames as f64;
                } else {
                    frame.fill(0.0);
                    continue;
                }
            }

            let index = self.position.floor() as usize;
            let frac = (self.position - index as f64) as f32;
            let next = if index + 1 < frames {
                index + 1
            } else if self.looping {
                0
            } else {
                index
            };
            for (ch, sample) in frame.iter_mut().enumerate() {
                let a = self.sample(index, ch);
                let b = self.sample(next, ch);
                *sample = a + (b - a) * frac;
            }
            self.position += self.step;
        }
    }

    fn position_secs(&self) -> f64 {
        self.position.min(self.frame_count() as f64) / self.file_rate as f64
    }

    fn describe(&self) -> String {
        format!(
            "wav ({} channels @ {} Hz, {:.1}s{})",
            self.channels,
            self.file_rate,
            self.duration_secs(),
            if self.looping { ", looping" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_passthrough() {
        let mut source = WavSource::from_samples(vec![0.1, 0.2, 0.3, 0.4], 1, 100, 100, false).unwrap();
        let mut out = [0.0f32; 6];
        source.fill(&mut out, 1);
        assert_eq!(out, [0.1, 0.2, 0.3, 0.4, 0.0, 0.0]);
        // Clock stops at the end of the file
        assert_eq!(source.position_secs(), 0.04);
    }

    #[test]
    fn test_mono_fans_out_to_stereo() {
        let mut source = WavSource::from_samples(vec![0.5, -0.5], 1, 10, 10, false).unwrap();
        let mut out = [0.0f32; 4];
        source.fill(&mut out, 2);
        assert_eq!(out, [0.5, 0.5, -0.5, -0.5]);
    }

    #[test]
    fn test_upsampling_interpolates() {
        // File at half the device rate: every other output frame is a midpoint
        let mut source = WavSource::from_samples(vec![0.0, 1.0, 0.0], 1, 50, 100, false).unwrap();
        let mut out = [0.0f32; 4];
        source.fill(&mut out, 1);
        assert_eq!(out, [0.0, 0.5, 1.0, 0.5]);
        assert_eq!(source.position_secs(), 2.0 / 50.0);
    }

    #[test]
    fn test_looping_wraps() {
        let mut source = WavSource::from_samples(vec![0.25, 0.75], 1, 10, 10, true).unwrap();
        let mut out = [0.0f32; 5];
        source.fill(&mut out, 1);
        assert_eq!(out[0], 0.25);
        assert_eq!(out[2], 0.25);
        assert_eq!(out[4], 0.25);
    }

    #[test]
    fn test_stereo_to_stereo_keeps_channels() {
        let mut source = WavSource::from_samples(vec![0.1, 0.9, 0.2, 0.8], 2, 10, 10, false).unwrap();
        let mut out = [0.0f32; 4];
        source.fill(&mut out, 2);
        assert_eq!(out, [0.1, 0.9, 0.2, 0.8]);
        assert_eq!(source.frame_count(), 2);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        assert!(matches!(
            WavSource::from_samples(Vec::new(), 2, 44100, 48000, false),
            Err(AudioError::EmptyFile)
        ));
    }
}
