//! Software drawing surface.
//!
//! Plays the role of a 2D canvas: a backing RGBA buffer with the handful of
//! drawing operations the editor needs. Rectangles use canvas pixel coverage:
//! a pixel belongs to a rectangle when its center lies inside it.

use std::ops::Range;

use crate::pixels::PixelBuffer;
use crate::selection::CropRect;

/// 2x2 linear part of an affine map from surface to image coordinates.
///
/// `image = linear * (surface - surface_center) + image_center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseMap {
    pub linear: [[f64; 2]; 2],
    pub surface_center: (f64, f64),
    pub image_center: (f64, f64),
}

impl InverseMap {
    #[inline]
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.surface_center.0;
        let dy = y - self.surface_center.1;
        (
            self.linear[0][0] * dx + self.linear[0][1] * dy + self.image_center.0,
            self.linear[1][0] * dx + self.linear[1][1] * dy + self.image_center.1,
        )
    }
}

/// Drawing target owned by the render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    buffer: PixelBuffer,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// Resize the backing store. Contents are discarded, as with a canvas.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.buffer = PixelBuffer::new(width, height);
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Copy of the whole backing store.
    pub fn snapshot(&self) -> PixelBuffer {
        self.buffer.clone()
    }

    /// Read back a rectangle; areas off the surface are transparent.
    pub fn get_image_data(&self, x: i64, y: i64, width: usize, height: usize) -> PixelBuffer {
        self.buffer.region(x, y, width, height)
    }

    /// Write pixels verbatim (no blending) with their top-left at `(x, y)`.
    pub fn put_image_data(&mut self, data: &PixelBuffer, x: i64, y: i64) {
        self.buffer.blit(data, x, y);
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.buffer = PixelBuffer::new(self.width(), self.height());
    }

    pub fn clear_rect(&mut self, rect: &CropRect) {
        for y in span(rect.y, rect.height, self.height()) {
            for x in span(rect.x, rect.width, self.width()) {
                self.buffer.set_pixel(x, y, [0, 0, 0, 0]);
            }
        }
    }

    /// Source-over fill with a translucent color.
    pub fn fill_rect(&mut self, rect: &CropRect, rgb: [u8; 3], alpha: f32) {
        let src_a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        for y in span(rect.y, rect.height, self.height()) {
            for x in span(rect.x, rect.width, self.width()) {
                let mut dst = self.buffer.pixel(x, y);
                blend_over(&mut dst, [rgb[0], rgb[1], rgb[2], src_a]);
                self.buffer.set_pixel(x, y, dst);
            }
        }
    }

    /// Copy `source` back into the pixels covered by `rect`.
    pub fn restore_rect(&mut self, source: &PixelBuffer, rect: &CropRect) {
        let w = self.width().min(source.width());
        let h = self.height().min(source.height());
        for y in span(rect.y, rect.height, h) {
            for x in span(rect.x, rect.width, w) {
                self.buffer.set_pixel(x, y, source.pixel(x, y));
            }
        }
    }

    /// Draw `image` through an inverse map, nearest-neighbor sampled.
    pub fn draw_image(&mut self, image: &PixelBuffer, map: &InverseMap) {
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let (sx, sy) = map.apply(x as f64 + 0.5, y as f64 + 0.5);
                if sx < 0.0 || sy < 0.0 || sx >= iw || sy >= ih {
                    continue;
                }
                let src = image.pixel(sx as usize, sy as usize);
                let mut dst = self.buffer.pixel(x, y);
                blend_over(&mut dst, src);
                self.buffer.set_pixel(x, y, dst);
            }
        }
    }

    /// Draw the `src_rect` part of `image` stretched over `dst_rect`.
    pub fn draw_image_region(&mut self, image: &PixelBuffer, src_rect: &CropRect, dst_rect: &CropRect) {
        if dst_rect.width <= 0.0 || dst_rect.height <= 0.0 {
            return;
        }
        let scale_x = src_rect.width / dst_rect.width;
        let scale_y = src_rect.height / dst_rect.height;
        for y in span(dst_rect.y, dst_rect.height, self.height()) {
            let sy = src_rect.y + (y as f64 + 0.5 - dst_rect.y) * scale_y;
            if sy < 0.0 || sy >= image.height() as f64 {
                continue;
            }
            for x in span(dst_rect.x, dst_rect.width, self.width()) {
                let sx = src_rect.x + (x as f64 + 0.5 - dst_rect.x) * scale_x;
                if sx < 0.0 || sx >= image.width() as f64 {
                    continue;
                }
                let src = image.pixel(sx as usize, sy as usize);
                let mut dst = self.buffer.pixel(x, y);
                blend_over(&mut dst, src);
                self.buffer.set_pixel(x, y, dst);
            }
        }
    }

    /// Stroke the outline of `rect` with an opaque dashed line centered on
    /// its edges. The dash runs clockwise from the top-left corner.
    pub fn stroke_dashed_rect(&mut self, rect: &CropRect, rgb: [u8; 3], line_width: usize, dash: &[usize]) {
        let color = [rgb[0], rgb[1], rgb[2], 255];
        let x0 = rect.x.round() as i64;
        let y0 = rect.y.round() as i64;
        let x1 = rect.right().round() as i64;
        let y1 = rect.bottom().round() as i64;
        let half = (line_width / 2) as i64;
        let band = -half..(line_width as i64 - half);

        let mut distance = 0usize;
        let mut plot = |surface: &mut Surface, x: i64, y: i64, horizontal: bool| {
            if dash_is_on(dash, distance) {
                for offset in band.clone() {
                    let (px, py) = if horizontal { (x, y + offset) } else { (x + offset, y) };
                    if surface.buffer.contains(px, py) {
                        surface.buffer.set_pixel(px as usize, py as usize, color);
                    }
                }
            }
            distance += 1;
        };

        for x in x0..x1 {
            plot(&mut *self, x, y0, true);
        }
        for y in y0..y1 {
            plot(&mut *self, x1, y, false);
        }
        for x in (x0 + 1..=x1).rev() {
            plot(&mut *self, x, y1, true);
        }
        for y in (y0 + 1..=y1).rev() {
            plot(&mut *self, x0, y, false);
        }
    }
}

/// Pixel indices whose centers fall in `[start, start + len)`, clipped to `0..limit`.
fn span(start: f64, len: f64, limit: usize) -> Range<usize> {
    if len <= 0.0 || !start.is_finite() || !len.is_finite() {
        return 0..0;
    }
    let first = (start - 0.5).ceil().max(0.0);
    let end = (start + len - 0.5).ceil().max(0.0);
    let first = (first as usize).min(limit);
    let end = (end as usize).min(limit);
    first..end.max(first)
}

/// Whether position `distance` along a path falls on a dash.
fn dash_is_on(dash: &[usize], distance: usize) -> bool {
    let period: usize = dash.iter().sum();
    if period == 0 {
        return true;
    }
    let mut pos = distance % period;
    for (i, &run) in dash.iter().enumerate() {
        if pos < run {
            return i % 2 == 0;
        }
        pos -= run;
    }
    true
}

/// Porter-Duff "over" for straight-alpha RGBA.
#[inline]
pub fn blend_over(dst: &mut [u8; 4], src: [u8; 4]) {
    let [src_r, src_g, src_b, src_a] = src;
    if src_a == 0 {
        return;
    }
    if src_a == 255 {
        *dst = src;
        return;
    }

    let src_af = src_a as f32 / 255.0;
    let dst_af = dst[3] as f32 / 255.0;
    let out_a = src_af + dst_af * (1.0 - src_af);

    if out_a > 0.0 {
        let mix = |s: u8, d: u8| {
            ((s as f32 * src_af + d as f32 * dst_af * (1.0 - src_af)) / out_a).round() as u8
        };
        dst[0] = mix(src_r, dst[0]);
        dst[1] = mix(src_g, dst[1]);
        dst[2] = mix(src_b, dst[2]);
        dst[3] = (out_a * 255.0).round() as u8;
    }
}
