//! Audio system: output stream, playback clock and spectrum snapshots.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::analyser::FrequencyAnalyser;
use super::source::SourceSpec;
use crate::animation::AudioPipeline;
use crate::error::AudioError;
use crate::params::{audio_constants::HISTORY_LEN, AnalyserConfig};

/// Most recent mono samples written to the device
pub(crate) struct SampleHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append interleaved frames, averaged down to mono
    pub(crate) fn push_interleaved(&mut self, data: &[f32], channels: usize) {
        for frame in data.chunks(channels) {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples
                .push_back(frame.iter().sum::<f32>() / frame.len() as f32);
        }
    }

    /// Copy the newest `count` samples (or all, if fewer) into `out`
    pub(crate) fn copy_tail(&self, out: &mut Vec<f32>, count: usize) {
        out.clear();
        let skip = self.samples.len().saturating_sub(count);
        out.extend(self.samples.iter().skip(skip));
    }
}

/// Plays a [`SourceSpec`] on the default output device
///
/// The stream is built paused; nothing is heard and the clock stays at zero
/// until [`AudioPipeline::resume`] and [`AudioPipeline::play`] are called.
pub struct AudioSystem {
    stream: cpal::Stream,
    playing: Arc<AtomicBool>,
    /// Playback position as `f64` bits
    clock: Arc<AtomicU64>,
    history: Arc<Mutex<SampleHistory>>,
    analyser: FrequencyAnalyser,
    scratch: Vec<f32>,
}

impl AudioSystem {
    /// Open the default output device and prepare `source` for playback
    pub fn new(analyser_config: AnalyserConfig, source: &SourceSpec) -> Result<Self, AudioError> {
        let analyser = FrequencyAnalyser::new(analyser_config)?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::UnsupportedFormat(supported.sample_format()));
        }
        let channels = supported.channels() as usize;
        let sample_rate = supported.sample_rate().0;

        info!(
            "audio: {} @ {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate,
            channels
        );

        let mut source = source.open(sample_rate)?;
        info!("audio source: {}", source.describe());

        let playing = Arc::new(AtomicBool::new(false));
        let clock = Arc::new(AtomicU64::new(0f64.to_bits()));
        let history = Arc::new(Mutex::new(SampleHistory::new(HISTORY_LEN)));

        let playing_cb = Arc::clone(&playing);
        let clock_cb = Arc::clone(&clock);
        let history_cb = Arc::clone(&history);

        let stream_config: cpal::StreamConfig = supported.into();
        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if playing_cb.load(Ordering::Acquire) {
                    source.fill(data, channels);
                    clock_cb.store(source.position_secs().to_bits(), Ordering::Release);
                } else {
                    data.fill(0.0);
                }
                history_cb
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push_interleaved(data, channels);
            },
            |err| warn!("audio stream error: {}", err),
            None,
        )?;

        Ok(Self {
            stream,
            playing,
            clock,
            history,
            analyser,
            scratch: Vec::new(),
        })
    }

    /// Number of bins in each frequency snapshot
    pub fn frequency_bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }
}

impl AudioPipeline for AudioSystem {
    fn current_time(&self) -> f64 {
        f64::from_bits(self.clock.load(Ordering::Acquire))
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.stream.play()?;
        Ok(())
    }

    fn play(&mut self) {
        self.playing.store(true, Ordering::Release);
        info!("playback started");
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        let fft_size = self.analyser.config().fft_size;
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .copy_tail(&mut self.scratch, fft_size);
        self.analyser.byte_frequency_data(&self.scratch, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_downmixes_to_mono() {
        let mut history = SampleHistory::new(8);
        history.push_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, -0.5], 2);

        let mut out = Vec::new();
        history.copy_tail(&mut out, 8);
        assert_eq!(out, vec![0.5, 0.5, -0.75]);
    }

    #[test]
    fn test_history_keeps_newest() {
        let mut history = SampleHistory::new(4);
        history.push_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 1);

        let mut out = Vec::new();
        history.copy_tail(&mut out, 10);
        assert_eq!(out, vec![3.0, 4.0, 5.0, 6.0]);

        history.copy_tail(&mut out, 2);
        assert_eq!(out, vec![5.0, 6.0]);
    }
}
