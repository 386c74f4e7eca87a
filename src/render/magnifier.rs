//! Zoom lens that follows the pointer outside crop mode.
//!
//! The lens shows a `size / zoom` square of the rendered surface centered on
//! the pointer, scaled up to `size x size` with nearest-neighbor sampling.
//! Two placements are supported: drawn inline on the main surface, clipped
//! to the lens square, or rendered into its own surface for the host to
//! position over the main one.

use tracing::trace;

use super::Surface;
use crate::config::{MagnifierConfig, MagnifierMode};
use crate::geometry::Point;
use crate::pixels::PixelBuffer;
use crate::selection::CropRect;

/// Lens rendered into its own surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Lens {
    pub surface: Surface,
    /// Top-left of the lens in main-surface coordinates
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnifier {
    config: MagnifierConfig,
}

impl Magnifier {
    pub fn new(config: MagnifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MagnifierConfig {
        &self.config
    }

    /// Square of the surface that gets magnified.
    pub fn source_window(&self, pointer: Point, zoom: f64) -> CropRect {
        let side = self.config.size / zoom;
        CropRect::new(pointer.x - side / 2.0, pointer.y - side / 2.0, side, side)
    }

    /// Where the lens sits on the main surface.
    pub fn lens_rect(&self, pointer: Point) -> CropRect {
        let size = self.config.size;
        CropRect::new(pointer.x - size / 2.0, pointer.y - size / 2.0, size, size)
    }

    /// Draw according to the configured mode.
    ///
    /// Inline mode draws onto `surface` and returns `None`. Overlay mode
    /// leaves `surface` alone and returns the lens, which is empty when
    /// `zoom <= 1`.
    pub fn render(&self, surface: &mut Surface, pointer: Point, zoom: f64) -> Option<Lens> {
        match self.config.mode {
            MagnifierMode::Inline => {
                self.draw_inline(surface, pointer, zoom);
                None
            }
            MagnifierMode::Overlay => Some(self.render_lens(surface.pixels(), pointer, zoom)),
        }
    }

    /// Draw the lens onto the surface it magnifies. Returns false when
    /// nothing was drawn.
    pub fn draw_inline(&self, surface: &mut Surface, pointer: Point, zoom: f64) -> bool {
        if zoom.is_nan() || zoom <= 1.0 {
            return false;
        }
        // Read from a copy; the lens overwrites part of what it samples
        let source = surface.snapshot();
        let src_rect = self.source_window(pointer, zoom);
        let dst_rect = self.lens_rect(pointer);
        trace!(x = pointer.x, y = pointer.y, zoom, "magnifier inline");
        surface.draw_image_region(&source, &src_rect, &dst_rect);
        true
    }

    /// Render the lens into a dedicated `size x size` surface.
    pub fn render_lens(&self, source: &PixelBuffer, pointer: Point, zoom: f64) -> Lens {
        let side = self.config.size.max(0.0).round() as usize;
        let mut lens = Surface::new(side, side);
        let placement = self.lens_rect(pointer);

        if zoom > 1.0 {
            let src_rect = self.source_window(pointer, zoom);
            let dst_rect = CropRect::new(0.0, 0.0, self.config.size, self.config.size);
            lens.draw_image_region(source, &src_rect, &dst_rect);
        }

        Lens {
            surface: lens,
            left: placement.x,
            top: placement.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(size: usize) -> PixelBuffer {
        let mut image = PixelBuffer::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                image.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        image
    }

    fn config(size: f64, mode: MagnifierMode) -> MagnifierConfig {
        MagnifierConfig {
            size,
            mode,
            ..MagnifierConfig::default()
        }
    }

    #[test]
    fn test_source_window_shrinks_with_zoom() {
        let magnifier = Magnifier::new(MagnifierConfig::default());
        let window = magnifier.source_window(Point::new(50.0, 60.0), 4.0);
        assert_eq!(window, CropRect::new(37.5, 47.5, 25.0, 25.0));
    }

    #[test]
    fn test_inline_noop_at_unit_zoom() {
        let magnifier = Magnifier::new(config(10.0, MagnifierMode::Inline));
        let mut surface = Surface::new(20, 20);
        surface.put_image_data(&checker(20), 0, 0);
        let before = surface.snapshot();

        assert!(!magnifier.draw_inline(&mut surface, Point::new(10.0, 10.0), 1.0));
        assert_eq!(surface.pixels(), &before);
    }

    #[test]
    fn test_inline_magnifies_around_pointer() {
        let magnifier = Magnifier::new(config(8.0, MagnifierMode::Inline));
        let mut surface = Surface::new(20, 20);
        surface.put_image_data(&checker(20), 0, 0);
        let before = surface.snapshot();

        assert!(magnifier.draw_inline(&mut surface, Point::new(10.0, 10.0), 2.0));

        // Lens covers 6..14 and shows source 8..12 doubled
        let p = surface.pixels();
        assert_eq!(p.pixel(6, 6), before.pixel(8, 8));
        assert_eq!(p.pixel(7, 6), before.pixel(8, 8));
        assert_eq!(p.pixel(8, 6), before.pixel(9, 8));
        // Outside the lens unchanged
        assert_eq!(p.pixel(2, 2), before.pixel(2, 2));
        assert_eq!(p.pixel(15, 15), before.pixel(15, 15));
    }

    #[test]
    fn test_overlay_leaves_main_surface() {
        let magnifier = Magnifier::new(config(4.0, MagnifierMode::Overlay));
        let mut surface = Surface::new(10, 10);
        surface.put_image_data(&checker(10), 0, 0);
        let before = surface.snapshot();

        let lens = magnifier
            .render(&mut surface, Point::new(5.0, 5.0), 2.0)
            .unwrap();

        assert_eq!(surface.pixels(), &before);
        assert_eq!((lens.left, lens.top), (3.0, 3.0));
        assert_eq!(lens.surface.width(), 4);
        // Lens (0,0) samples source (4,4)
        assert_eq!(lens.surface.pixels().pixel(0, 0), before.pixel(4, 4));
        assert_eq!(lens.surface.pixels().pixel(3, 3), before.pixel(5, 5));
    }

    #[test]
    fn test_overlay_lens_blank_at_unit_zoom() {
        let magnifier = Magnifier::new(config(4.0, MagnifierMode::Overlay));
        let lens = magnifier.render_lens(&checker(10), Point::new(5.0, 5.0), 1.0);
        assert_eq!(lens.surface.pixels(), &PixelBuffer::new(4, 4));
    }
}
