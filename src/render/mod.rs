//! Render pipeline.
//!
//! Every frame is drawn from scratch: clear, draw the working image under the
//! current view transform, then (in crop mode) the dimmed overlay with the
//! dashed selection outline. The magnifier is drawn last when active.
//!
//! ## Passes
//!
//! | Pass | When |
//! |------|------|
//! | [`draw_base`] | always |
//! | [`draw_crop_overlay`] | crop mode active |
//! | [`magnifier::Magnifier::render`] | crop mode off and zoom above 1 |

pub mod magnifier;
pub mod surface;

use crate::config::OverlayStyle;
use crate::pixels::PixelBuffer;
use crate::selection::CropRect;

pub use magnifier::{Lens, Magnifier};
pub use surface::{InverseMap, Surface};

/// Rotation and magnifier zoom applied to the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    rotation_degrees: u16,
    zoom_scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            rotation_degrees: 0,
            zoom_scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// One of 0, 90, 180, 270.
    pub fn rotation_degrees(&self) -> u16 {
        self.rotation_degrees
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }

    pub fn rotate_clockwise(&mut self) {
        self.rotation_degrees = (self.rotation_degrees + 90) % 360;
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.rotation_degrees = (self.rotation_degrees + 270) % 360;
    }

    pub fn reset_rotation(&mut self) {
        self.rotation_degrees = 0;
    }

    /// Wheel up zooms in. Non-finite deltas are ignored.
    pub fn apply_wheel(&mut self, delta_y: f64, sensitivity: f64, min_zoom: f64, max_zoom: f64) {
        if !delta_y.is_finite() {
            return;
        }
        self.set_zoom(self.zoom_scale + delta_y * -sensitivity, min_zoom, max_zoom);
    }

    pub fn set_zoom(&mut self, zoom: f64, min_zoom: f64, max_zoom: f64) {
        if zoom.is_finite() {
            self.zoom_scale = zoom.clamp(min_zoom, max_zoom);
        }
    }

    /// (cos, sin) of the rotation, exact for quarter turns.
    fn rotation_cos_sin(&self) -> (f64, f64) {
        match self.rotation_degrees {
            0 => (1.0, 0.0),
            90 => (0.0, 1.0),
            180 => (-1.0, 0.0),
            270 => (0.0, -1.0),
            other => {
                let radians = (other as f64).to_radians();
                (radians.cos(), radians.sin())
            }
        }
    }

    /// Map from surface pixels back into `image` pixels: the image is scaled
    /// to fit, rotated about its center, and centered on the surface.
    pub fn inverse_map(&self, surface: &Surface, image: &PixelBuffer) -> InverseMap {
        let (sw, sh) = (surface.width() as f64, surface.height() as f64);
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        let scale = (sw / iw).min(sh / ih);
        let (cos, sin) = self.rotation_cos_sin();

        // Inverse of scale * R(theta) in y-down coordinates
        InverseMap {
            linear: [[cos / scale, sin / scale], [-sin / scale, cos / scale]],
            surface_center: (sw / 2.0, sh / 2.0),
            image_center: (iw / 2.0, ih / 2.0),
        }
    }
}

/// Clear the surface and draw the working image under `transform`.
pub fn draw_base(surface: &mut Surface, image: Option<&PixelBuffer>, transform: &ViewTransform) {
    surface.clear();
    let Some(image) = image else {
        return;
    };
    if image.is_empty() || surface.width() == 0 || surface.height() == 0 {
        return;
    }
    let map = transform.inverse_map(surface, image);
    surface.draw_image(image, &map);
}

/// Dim everything outside `rect` and outline it.
pub fn draw_crop_overlay(surface: &mut Surface, rect: &CropRect, style: &OverlayStyle) {
    let snapshot = surface.snapshot();
    let full = CropRect::full(surface.width(), surface.height());

    surface.fill_rect(&full, style.dim_color, style.dim_alpha);
    surface.clear_rect(rect);
    surface.restore_rect(&snapshot, rect);
    surface.stroke_dashed_rect(rect, style.outline_color, style.line_width, &style.dash);
}
