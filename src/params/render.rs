//! Window and thread-drawing configuration.

use std::f64::consts::TAU;
use std::str::FromStr;

use crate::error::ConfigError;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Normalised components for the GPU
    pub fn to_f32_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColour(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

/// How each thread is traced and stroked
#[derive(Debug, Clone)]
pub struct ThreadStyle {
    /// Stroke colours, assigned to shapes by index modulo length
    pub palette: Vec<Rgba>,

    /// Stroke width (pixels)
    pub stroke_width_px: f32,

    /// Angle increment between traced points (radians)
    /// 0.01 over [0, 2π] gives 629 points per thread
    pub angle_step_rad: f64,

    /// Upper end of the traced angle range (radians, inclusive)
    pub angle_end_rad: f64,

    /// Max radius as a fraction of half the shorter viewport side
    pub radius_fraction: f64,
}

impl Default for ThreadStyle {
    fn default() -> Self {
        Self {
            palette: vec![
                Rgba::rgb(0xff, 0x00, 0xff), // magenta
                Rgba::rgb(0x00, 0xff, 0xff), // cyan
                Rgba::rgb(0x00, 0xff, 0x00), // green
                Rgba::rgb(0xff, 0x00, 0x00), // red
                Rgba::rgb(0xff, 0xff, 0x00), // yellow
            ],
            stroke_width_px: 2.0,
            angle_step_rad: 0.01,
            angle_end_rad: TAU,
            radius_fraction: 0.9,
        }
    }
}

impl ThreadStyle {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let positive = [
            ("stroke width", self.stroke_width_px as f64),
            ("angle step", self.angle_step_rad),
            ("radius fraction", self.radius_fraction),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Colour for the shape at `index`
    pub fn colour(&self, index: usize) -> Rgba {
        self.palette[index % self.palette.len()]
    }
}

/// Window configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (pixels)
    pub window_width: u32,

    /// Initial window height (pixels)
    pub window_height: u32,

    /// Colour the surface is cleared to each frame
    pub background: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            background: Rgba::BLACK,
        }
    }
}
