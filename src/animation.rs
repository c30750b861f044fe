//! Frame driver: start-once state machine that traces and strokes every thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::DVec2;
use log::{debug, info, warn};

use crate::error::{AudioError, ConfigError};
use crate::noise::{FractalSampler, NoiseField};
use crate::params::{NoiseConfig, Rgba, ThreadStyle};
use crate::shapes::{CurveInput, ShapeDescriptor, Viewport, SHAPES};

/// Frames between cache statistics log lines
const STATS_INTERVAL_FRAMES: u64 = 600;

/// Something polylines can be stroked onto
pub trait DrawingSurface {
    /// Current size (pixels)
    fn dimensions(&self) -> (u32, u32);

    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Stroke an open polyline through `points`
    fn stroke_polyline(&mut self, points: &[DVec2], colour: Rgba, width: f32);
}

/// Playback transport and spectrum source
pub trait AudioPipeline {
    /// Playback position (seconds)
    fn current_time(&self) -> f64;

    /// Let the audio clock run
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Begin playback of the source
    fn play(&mut self);

    /// Fill `out` with byte magnitudes, one per frequency bin
    fn frequency_data(&mut self, out: &mut [u8]);
}

/// Byte magnitudes for one frame, one per frequency bin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySnapshot {
    bins: Vec<u8>,
}

impl FrequencySnapshot {
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bin `index` wrapped to the snapshot length; silence if there are no bins
    pub fn sample(&self, index: usize) -> u8 {
        if self.bins.is_empty() {
            0
        } else {
            self.bins[index % self.bins.len()]
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bins
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bins
    }
}

/// Handle that stops the recurring frame task
///
/// Clones share state. The host cancels on shutdown and checks
/// [`AnimationLoop::wants_frame`] before rescheduling.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Loop state; `Running` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// What a call to [`AnimationLoop::frame`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not started yet, nothing drawn
    Idle,
    /// Cancelled, nothing drawn
    Cancelled,
    /// Surface cleared and this many threads stroked
    Drawn { strokes: usize },
}

/// Drives the animation one frame at a time
pub struct AnimationLoop {
    state: LoopState,
    shapes: &'static [ShapeDescriptor],
    sampler: FractalSampler<NoiseField>,
    style: ThreadStyle,
    snapshot: FrequencySnapshot,
    points: Vec<DVec2>,
    cancel: CancelToken,
    frames: u64,
}

impl AnimationLoop {
    /// Validates `noise` and `style` first; an empty palette or a non-positive
    /// angle step cannot be traced
    pub fn new(
        noise: &NoiseConfig,
        style: ThreadStyle,
        bin_count: usize,
    ) -> Result<Self, ConfigError> {
        noise.validate()?;
        style.validate()?;
        Ok(Self {
            state: LoopState::Idle,
            shapes: &SHAPES,
            sampler: FractalSampler::from_config(noise),
            style,
            snapshot: FrequencySnapshot::new(bin_count),
            points: Vec::new(),
            cancel: CancelToken::new(),
            frames: 0,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Running and not cancelled: the host should schedule another frame
    pub fn wants_frame(&self) -> bool {
        self.state == LoopState::Running && !self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Handle the start signal
    ///
    /// Resumes the audio clock and starts playback the first time; returns
    /// `false` for every later signal. A resume failure is logged and not
    /// retried: the loop runs regardless and draws whatever the pipeline reports.
    pub fn start(&mut self, audio: &mut impl AudioPipeline) -> bool {
        if self.state == LoopState::Running {
            debug!("start signal ignored, animation already running");
            return false;
        }
        if let Err(e) = audio.resume() {
            warn!("audio resume failed, animating anyway: {}", e);
        }
        audio.play();
        self.state = LoopState::Running;
        info!("animation started with {} threads", self.shapes.len());
        true
    }

    /// Draw one frame onto `surface`
    pub fn frame(
        &mut self,
        surface: &mut impl DrawingSurface,
        audio: &mut impl AudioPipeline,
    ) -> FrameOutcome {
        if self.state == LoopState::Idle {
            return FrameOutcome::Idle;
        }
        if self.cancel.is_cancelled() {
            return FrameOutcome::Cancelled;
        }

        // Dimensions are read once; a resize mid-frame shows up next frame
        let (width, height) = surface.dimensions();
        let viewport = Viewport::new(width, height, self.style.radius_fraction);

        surface.clear();
        audio.frequency_data(self.snapshot.as_mut_slice());
        let time = audio.current_time();

        for (index, shape) in self.shapes.iter().enumerate() {
            let sample = self.snapshot.sample(index);
            let colour = self.style.colour(index);
            self.trace(shape, time, sample, &viewport);
            surface.stroke_polyline(&self.points, colour, self.style.stroke_width_px);
        }

        self.frames += 1;
        if self.frames % STATS_INTERVAL_FRAMES == 0 {
            let stats = self.sampler.source().stats();
            debug!(
                "frame {}: gradient cache {} entries ({:.1}% hits), value cache {} entries ({:.1}% hits)",
                self.frames,
                stats.gradients.entries,
                stats.gradients.hit_rate() * 100.0,
                stats.values.entries,
                stats.values.hit_rate() * 100.0,
            );
        }

        FrameOutcome::Drawn {
            strokes: self.shapes.len(),
        }
    }

    /// Evaluate `shape` along its angle range into the point buffer
    fn trace(&mut self, shape: &ShapeDescriptor, time: f64, sample: u8, viewport: &Viewport) {
        self.points.clear();
        // Accumulated rather than multiplied so the point count matches a
        // `for (t = 0; t <= 2π; t += step)` loop exactly
        let mut angle = 0.0;
        while angle <= self.style.angle_end_rad {
            let input = CurveInput {
                angle,
                time,
                sample,
            };
            self.points
                .push(shape.kind.evaluate(input, viewport, &self.sampler));
            angle += self.style.angle_step_rad;
        }
    }
}
