//! An in-memory drawing surface that behaves like the browser canvas.

use crate::core::constants::{DEFAULT_CANVAS_SIZE, DEFAULT_STROKE_WIDTH};
use crate::core::errors::{DigitError, DigitResult};
use crate::utils::encode_png_data_url;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use std::path::Path;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A square RGBA surface: white background, black round brush.
///
/// Strokes are rasterised by stamping filled circles along each segment,
/// which gives the round caps and joins of a canvas `lineCap = "round"` pen.
#[derive(Debug, Clone)]
pub struct DrawingCanvas {
    image: RgbaImage,
    stroke_width: u32,
    last_point: Option<(f32, f32)>,
    has_drawn: bool,
}

impl DrawingCanvas {
    /// Creates a blank `size`×`size` surface.
    ///
    /// # Errors
    ///
    /// Returns [`DigitError::InvalidInput`] if `size` or `stroke_width` is zero.
    pub fn new(size: u32, stroke_width: u32) -> DigitResult<Self> {
        if size == 0 || stroke_width == 0 {
            return Err(DigitError::invalid_input(format!(
                "canvas size and stroke width must be positive, got {size} and {stroke_width}"
            )));
        }
        Ok(Self {
            image: RgbaImage::from_pixel(size, size, BACKGROUND),
            stroke_width,
            last_point: None,
            has_drawn: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Whether any ink has been laid down since the last clear.
    pub fn has_drawn(&self) -> bool {
        self.has_drawn
    }

    /// Starts a stroke with a single dot at `(x, y)`.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.stamp(x, y);
        self.last_point = Some((x, y));
    }

    /// Extends the current stroke to `(x, y)`, starting one if none is open.
    pub fn line_to(&mut self, x: f32, y: f32) {
        let Some((x0, y0)) = self.last_point else {
            self.begin_stroke(x, y);
            return;
        };
        self.last_point = Some((x, y));
        // Only the part of the segment that can leave ink is stamped.
        let Some(((ax, ay), (bx, by))) = self.clip_to_inked_area((x0, y0), (x, y)) else {
            return;
        };
        let distance = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        let spacing = (self.radius() as f64 / 2.0).max(1.0);
        let steps = (distance / spacing).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            self.stamp((ax + (bx - ax) * t) as f32, (ay + (by - ay) * t) as f32);
        }
    }

    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    /// Draws a whole polyline as one stroke.
    pub fn stroke(&mut self, points: &[(f32, f32)]) {
        let mut points = points.iter();
        if let Some(&(x, y)) = points.next() {
            self.begin_stroke(x, y);
            for &(x, y) in points {
                self.line_to(x, y);
            }
            self.end_stroke();
        }
    }

    /// Resets to a blank white surface.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = BACKGROUND;
        }
        self.last_point = None;
        self.has_drawn = false;
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Row-major RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_rgba_buffer(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }

    /// PNG data URL of the current surface.
    pub fn to_data_url(&self) -> DigitResult<String> {
        encode_png_data_url(&DynamicImage::ImageRgba8(self.image.clone()))
    }

    /// Writes the surface to `path`; the format follows the extension.
    pub fn save(&self, path: &Path) -> DigitResult<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn radius(&self) -> i32 {
        (self.stroke_width / 2).max(1) as i32
    }

    /// Clips a segment to the surface grown by the brush radius (Liang-Barsky).
    fn clip_to_inked_area(
        &self,
        from: (f32, f32),
        to: (f32, f32),
    ) -> Option<((f64, f64), (f64, f64))> {
        let radius = f64::from(self.radius());
        let (lo, hi_x, hi_y) = (
            -radius,
            f64::from(self.width()) - 1.0 + radius,
            f64::from(self.height()) - 1.0 + radius,
        );
        let (x0, y0) = (f64::from(from.0), f64::from(from.1));
        let (dx, dy) = (f64::from(to.0) - x0, f64::from(to.1) - y0);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, x0 - lo), (dx, hi_x - x0), (-dy, y0 - lo), (dy, hi_y - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((
            (x0 + dx * t0, y0 + dy * t0),
            (x0 + dx * t1, y0 + dy * t1),
        ))
    }

    fn stamp(&mut self, x: f32, y: f32) {
        let radius = self.radius();
        let reach = radius as f32;
        if x < -reach
            || y < -reach
            || x > self.width() as f32 - 1.0 + reach
            || y > self.height() as f32 - 1.0 + reach
        {
            return;
        }
        draw_filled_circle_mut(
            &mut self.image,
            (x.round() as i32, y.round() as i32),
            radius,
            INK,
        );
        self.has_drawn = true;
    }
}

impl Default for DrawingCanvas {
    fn default() -> Self {
        Self {
            image: RgbaImage::from_pixel(DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE, BACKGROUND),
            stroke_width: DEFAULT_STROKE_WIDTH,
            last_point: None,
            has_drawn: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::ImageDecoder;

    fn ink_pixels(canvas: &DrawingCanvas) -> usize {
        canvas.image().pixels().filter(|p| **p == INK).count()
    }

    #[test]
    fn test_default_is_blank_280() {
        let canvas = DrawingCanvas::default();
        assert_eq!((canvas.width(), canvas.height()), (280, 280));
        assert_eq!(canvas.stroke_width(), 20);
        assert!(!canvas.has_drawn());
        assert_eq!(ink_pixels(&canvas), 0);
        assert_eq!(canvas.pixels().len(), 280 * 280 * 4);
    }

    #[test]
    fn test_stroke_paints_round_line() {
        let mut canvas = DrawingCanvas::default();
        canvas.stroke(&[(140.0, 40.0), (140.0, 240.0)]);
        assert!(canvas.has_drawn());
        assert_eq!(canvas.image().get_pixel(140, 140), &INK);
        assert_eq!(canvas.image().get_pixel(149, 140), &INK);
        assert_eq!(canvas.image().get_pixel(160, 140), &BACKGROUND);
        // Round cap reaches past the end point.
        assert_eq!(canvas.image().get_pixel(140, 245), &INK);
    }

    #[test]
    fn test_line_to_without_begin_starts_stroke() {
        let mut canvas = DrawingCanvas::default();
        canvas.line_to(20.0, 20.0);
        assert!(canvas.has_drawn());
        assert_eq!(canvas.image().get_pixel(20, 20), &INK);
    }

    #[test]
    fn test_strokes_off_canvas_are_clipped() {
        let mut canvas = DrawingCanvas::default();
        canvas.stroke(&[(-50.0, -50.0), (5.0, 5.0)]);
        assert_eq!(canvas.image().get_pixel(0, 0), &INK);
    }

    #[test]
    fn test_huge_off_canvas_stroke_is_bounded() {
        let mut canvas = DrawingCanvas::default();
        let started = std::time::Instant::now();
        canvas.stroke(&[(0.0, 0.0), (3e38, 0.0)]);
        canvas.stroke(&[(-3e38, 140.0), (3e38, 140.0)]);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(canvas.image().get_pixel(279, 0), &INK);
        assert_eq!(canvas.image().get_pixel(0, 140), &INK);
        assert_eq!(canvas.image().get_pixel(279, 140), &INK);
    }

    #[test]
    fn test_stroke_entirely_off_canvas_leaves_no_ink() {
        let mut canvas = DrawingCanvas::default();
        canvas.stroke(&[(-1e30, -1e30), (-1e30, 1e30), (1e30, -5e3)]);
        assert!(!canvas.has_drawn());
        assert_eq!(ink_pixels(&canvas), 0);
    }

    #[test]
    fn test_clear_resets_surface() {
        let mut canvas = DrawingCanvas::default();
        canvas.stroke(&[(10.0, 10.0), (200.0, 200.0)]);
        canvas.clear();
        assert!(!canvas.has_drawn());
        assert_eq!(ink_pixels(&canvas), 0);
    }

    #[test]
    fn test_data_url_decodes_back_to_same_size() {
        let mut canvas = DrawingCanvas::new(64, 6).unwrap();
        canvas.stroke(&[(10.0, 10.0), (50.0, 50.0)]);
        let raw = ImageDecoder::new()
            .decode_data_url(&canvas.to_data_url().unwrap())
            .unwrap();
        assert_eq!(raw.dimensions(), (64, 64));
        assert_eq!(raw.channels(), 4);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(DrawingCanvas::new(0, 20).is_err());
        assert!(DrawingCanvas::new(280, 0).is_err());
    }
}
