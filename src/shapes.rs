//! The five thread shapes and the viewport they are laid out in.
//!
//! Each shape maps `(angle, time, audio sample)` to a point around the
//! viewport centre. Shapes are plain functions selected by [`ShapeKind`];
//! some of them perturb their phase or radius with the fractal sampler.

use glam::DVec2;
use noise::NoiseFn;

use crate::noise::FractalSampler;

/// Drawing area dimensions and the layout derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width (pixels)
    pub width: f64,
    /// Height (pixels)
    pub height: f64,
    /// Max radius as a fraction of half the shorter side
    pub radius_fraction: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, radius_fraction: f64) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            radius_fraction,
        }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn max_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 * self.radius_fraction
    }
}

/// One sample of the curve's inputs
#[derive(Debug, Clone, Copy)]
pub struct CurveInput {
    /// Parameter along the curve (radians)
    pub angle: f64,
    /// Playback time (seconds)
    pub time: f64,
    /// Frequency-bin magnitude, 0..=255
    pub sample: u8,
}

/// Identifier of a thread shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Nataraja,
    Drum,
    Trident,
    ThirdEye,
    Om,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Nataraja,
        ShapeKind::Drum,
        ShapeKind::Trident,
        ShapeKind::ThirdEye,
        ShapeKind::Om,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Nataraja => "nataraja",
            ShapeKind::Drum => "drum",
            ShapeKind::Trident => "trident",
            ShapeKind::ThirdEye => "thirdEye",
            ShapeKind::Om => "om",
        }
    }

    /// Point on this shape's curve
    pub fn evaluate<N: NoiseFn<f64, 2>>(
        self,
        input: CurveInput,
        viewport: &Viewport,
        sampler: &FractalSampler<N>,
    ) -> DVec2 {
        let center = viewport.center();
        let max_radius = viewport.max_radius();
        match self {
            ShapeKind::Nataraja => nataraja(input, center, max_radius),
            // Drum and om share a curve; they differ only in frequency bin and colour
            ShapeKind::Drum | ShapeKind::Om => drum(input, center, max_radius, sampler),
            ShapeKind::Trident => trident(input, center, max_radius, sampler),
            ShapeKind::ThirdEye => third_eye(input, center, max_radius),
        }
    }
}

/// Immutable shape record; the table below lives for the whole process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeDescriptor {
    pub name: &'static str,
    pub kind: ShapeKind,
}

impl ShapeDescriptor {
    pub const fn new(name: &'static str, kind: ShapeKind) -> Self {
        Self { name, kind }
    }
}

/// Shapes in drawing order
pub const SHAPES: [ShapeDescriptor; 5] = [
    ShapeDescriptor::new("nataraja", ShapeKind::Nataraja),
    ShapeDescriptor::new("drum", ShapeKind::Drum),
    ShapeDescriptor::new("trident", ShapeKind::Trident),
    ShapeDescriptor::new("thirdEye", ShapeKind::ThirdEye),
    ShapeDescriptor::new("om", ShapeKind::Om),
];

fn polar(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    center + radius * DVec2::new(cos, sin)
}

/// Three-lobed rose whose axes breathe with time and level
fn nataraja(input: CurveInput, center: DVec2, max_radius: f64) -> DVec2 {
    let CurveInput { angle, time, sample } = input;
    let radius = max_radius * 0.35 * (1.0 + (3.0 * angle).cos());
    let phase = time + sample as f64 / 255.0;
    DVec2::new(
        center.x + radius * angle.cos() * phase.sin(),
        center.y + radius * angle.sin() * phase.cos(),
    )
}

/// Four-lobed rose with a fractal phase wobble
fn drum<N: NoiseFn<f64, 2>>(
    input: CurveInput,
    center: DVec2,
    max_radius: f64,
    sampler: &FractalSampler<N>,
) -> DVec2 {
    let CurveInput { angle, time, sample } = input;
    let radius = max_radius * 0.25 * (1.0 + (4.0 * angle).sin());
    let phase = sampler.fractal_at(angle, sample as f64 / 200.0, time);
    polar(center, radius, angle + phase)
}

/// Fractal radius and fractal phase
fn trident<N: NoiseFn<f64, 2>>(
    input: CurveInput,
    center: DVec2,
    max_radius: f64,
    sampler: &FractalSampler<N>,
) -> DVec2 {
    let CurveInput { angle, time, sample } = input;
    let radius = max_radius * 0.3 * (1.0 + sampler.fractal_at(angle, time, time));
    let phase = sampler.fractal_at(angle, sample as f64 / 100.0, time);
    polar(center, radius, angle + phase)
}

/// Three-lobed rose; x and y phases drift apart over time
fn third_eye(input: CurveInput, center: DVec2, max_radius: f64) -> DVec2 {
    let CurveInput { angle, time, .. } = input;
    let radius = max_radius * 0.2 * (1.0 + (3.0 * angle).sin());
    DVec2::new(
        center.x + radius * (angle + time.sin()).cos(),
        center.y + radius * (angle + time.cos()).sin(),
    )
}
