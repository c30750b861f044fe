//! CPU-side drawing surface: strokes become triangles for the GPU.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::animation::DrawingSurface;
use crate::params::Rgba;

/// Segments shorter than this (pixels) have no direction and are skipped
const MIN_SEGMENT_PX: f64 = 1e-9;

/// Vertex data for stroke geometry (pixel position + colour)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct StrokeVertex {
    pub position: [f32; 2],
    pub colour: [f32; 4],
}

/// Triangle batch for one frame, in pixel coordinates (origin top-left)
pub struct Canvas {
    width: u32,
    height: u32,
    vertices: Vec<StrokeVertex>,
    strokes: usize,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            vertices: Vec::new(),
            strokes: 0,
        }
    }

    /// Called from the resize handler; the next frame picks it up
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn vertices(&self) -> &[StrokeVertex] {
        &self.vertices
    }

    /// Polylines stroked since the last clear
    pub fn stroke_count(&self) -> usize {
        self.strokes
    }
}

impl DrawingSurface for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.strokes = 0;
    }

    fn stroke_polyline(&mut self, points: &[DVec2], colour: Rgba, width: f32) {
        tessellate_polyline(points, colour, width, &mut self.vertices);
        self.strokes += 1;
    }
}

/// Append an open polyline of the given width as a triangle list
///
/// Each segment becomes a quad (two triangles). Segments touching a
/// non-finite point, or of zero length, are skipped.
pub fn tessellate_polyline(
    points: &[DVec2],
    colour: Rgba,
    width: f32,
    out: &mut Vec<StrokeVertex>,
) {
    let colour = colour.to_f32_array();
    let half_width = width as f64 / 2.0;

    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        if !(start.is_finite() && end.is_finite()) {
            continue;
        }
        let delta = end - start;
        let length = delta.length();
        if length < MIN_SEGMENT_PX {
            continue;
        }

        let normal = delta.perp() / length * half_width;
        let corners = [start + normal, start - normal, end + normal, end - normal];
        let vertex = |p: DVec2| StrokeVertex {
            position: [p.x as f32, p.y as f32],
            colour,
        };
        out.extend(
            [0usize, 1, 2, 2, 1, 3]
                .into_iter()
                .map(|i| vertex(corners[i])),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    #[test]
    fn test_six_vertices_per_segment() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
        ];
        let mut out = Vec::new();
        tessellate_polyline(&points, WHITE, 2.0, &mut out);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn test_quad_is_width_wide() {
        let points = [DVec2::new(0.0, 5.0), DVec2::new(10.0, 5.0)];
        let mut out = Vec::new();
        tessellate_polyline(&points, WHITE, 2.0, &mut out);

        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        let min = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_abs_diff_eq!(max - min, 2.0);
        assert_abs_diff_eq!(min, 4.0);
    }

    #[test]
    fn test_skips_degenerate_and_non_finite() {
        let points = [
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(f64::NAN, 3.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(5.0, 4.0),
        ];
        let mut out = Vec::new();
        tessellate_polyline(&points, WHITE, 2.0, &mut out);
        // Only (4,4) -> (5,4) survives
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_open_path_is_not_closed() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ];
        let mut out = Vec::new();
        tessellate_polyline(&points, WHITE, 2.0, &mut out);
        assert_eq!(out.len(), 18);
    }

    #[test]
    fn test_canvas_clear_resets_batch() {
        let mut canvas = Canvas::new(800, 600);
        let points = [DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0)];
        canvas.stroke_polyline(&points, WHITE, 2.0);
        canvas.stroke_polyline(&points, Rgba::rgb(255, 0, 0), 2.0);
        assert_eq!(canvas.stroke_count(), 2);
        assert_eq!(canvas.vertices().len(), 12);
        assert_eq!(canvas.vertices()[6].colour, [1.0, 0.0, 0.0, 1.0]);

        canvas.clear();
        assert_eq!(canvas.stroke_count(), 0);
        assert!(canvas.vertices().is_empty());
    }

    #[test]
    fn test_resize_updates_dimensions() {
        let mut canvas = Canvas::new(800, 600);
        canvas.resize(1024, 768);
        assert_eq!(canvas.dimensions(), (1024, 768));
    }
}
