//! The editor instance.
//!
//! [`Editor`] owns every piece of per-widget state: the drawing surface, the
//! working image, the crop tool, the view transform, the snapshots used by
//! cancel and reset, and the background filter worker. The host forwards
//! pointer, wheel and upload events to it and reads the surface back after
//! each call. Every call leaves the surface fully redrawn.

use tracing::{debug, info, warn};

use crate::codec;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::filters::{FilterKind, FilterRequest, FilterResponse, FilterWorker};
use crate::geometry::{to_canvas_coordinates, CanvasBounds, Point};
use crate::pixels::PixelBuffer;
use crate::render::{self, Lens, Magnifier, Surface, ViewTransform};
use crate::selection::{CropRect, CropTool, CursorKind, InteractionState};

/// What became of a filter request or a collected worker response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The result replaced the working image
    Applied,
    /// Running on the background worker; collect it with
    /// [`Editor::poll_filter`] or [`Editor::wait_filter`]
    Pending,
    /// The image changed while the job ran, so the result was dropped
    Discarded,
}

pub struct Editor {
    config: EditorConfig,
    surface: Surface,
    /// Image drawn by the base pass. Replaced by loads, commits and filters.
    image: Option<PixelBuffer>,
    crop: CropTool,
    crop_mode: bool,
    transform: ViewTransform,
    magnifier: Magnifier,
    lens: Option<Lens>,
    /// Last hover position, for redrawing the lens on wheel input
    hover: Option<Point>,
    before_crop: Option<PixelBuffer>,
    original: Option<PixelBuffer>,
    /// Bumped whenever the working image is replaced
    generation: u64,
    worker: FilterWorker,
    /// Layout box reported by the host; 1:1 with the surface when unset
    bounds: Option<CanvasBounds>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let surface = Surface::new(config.surface_width, config.surface_height);
        let rect = CropRect::default_for(surface.width(), surface.height(), config.crop.default_size);
        Self {
            crop: CropTool::new(rect, config.crop),
            magnifier: Magnifier::new(config.magnifier),
            surface,
            image: None,
            crop_mode: false,
            transform: ViewTransform::default(),
            lens: None,
            hover: None,
            before_crop: None,
            original: None,
            generation: 0,
            worker: FilterWorker::new(),
            bounds: None,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn crop_rect(&self) -> CropRect {
        self.crop.rect()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.crop.state()
    }

    pub fn is_crop_mode(&self) -> bool {
        self.crop_mode
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Lens produced by the last pointer move in overlay mode.
    pub fn lens(&self) -> Option<&Lens> {
        self.lens.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A background filter is running; the host shows its busy indicator.
    pub fn is_busy(&self) -> bool {
        self.worker.is_busy()
    }

    pub fn set_canvas_bounds(&mut self, bounds: CanvasBounds) {
        self.bounds = Some(bounds);
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Load an uploaded `data:image/...;base64,` URI.
    ///
    /// Returns false, leaving every piece of state untouched, when the input
    /// is not a decodable image.
    pub fn load_image(&mut self, uri: &str) -> bool {
        match self.try_load_image(uri) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "rejected image upload");
                false
            }
        }
    }

    pub fn try_load_image(&mut self, uri: &str) -> Result<(), EditorError> {
        let pixels = codec::decode_data_uri(uri)?;
        self.load_pixels(pixels);
        Ok(())
    }

    /// Load already-decoded pixels as a fresh upload.
    pub fn load_pixels(&mut self, pixels: PixelBuffer) {
        info!(width = pixels.width(), height = pixels.height(), "image loaded");
        self.original = Some(pixels.clone());
        self.before_crop = None;
        self.crop_mode = false;
        self.lens = None;
        self.replace_image(pixels);
        self.resize_surface_to_image();
        self.crop.reset(CropRect::default_for(
            self.surface.width(),
            self.surface.height(),
            self.config.crop.default_size,
        ));
        self.render();
    }

    /// Size the surface to the working image, one surface pixel per image pixel.
    pub fn resize_surface_to_image(&mut self) {
        if let Some(image) = &self.image {
            self.surface.resize(image.width(), image.height());
            self.render();
        }
    }

    fn replace_image(&mut self, pixels: PixelBuffer) {
        self.image = Some(pixels);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Encode the rendered image (without overlay or lens) as a PNG data URI.
    pub fn export_result(&self) -> Result<String, EditorError> {
        let image = self.image.as_ref().ok_or(EditorError::NoImage)?;
        let mut scratch = Surface::new(self.surface.width(), self.surface.height());
        render::draw_base(&mut scratch, Some(image), &self.transform);
        let uri = codec::encode_png_data_uri(scratch.pixels())?;
        info!(bytes = uri.len(), "exported image");
        Ok(uri)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Redraw the base pass, plus the overlay while cropping.
    pub fn render(&mut self) {
        render::draw_base(&mut self.surface, self.image.as_ref(), &self.transform);
        if self.crop_mode {
            render::draw_crop_overlay(&mut self.surface, &self.crop.rect(), &self.config.overlay);
        }
    }

    fn refresh_magnifier(&mut self) {
        self.render();
        self.lens = None;
        if self.crop_mode || self.image.is_none() {
            return;
        }
        if let Some(pointer) = self.hover {
            self.lens = self
                .magnifier
                .render(&mut self.surface, pointer, self.transform.zoom_scale());
        }
    }

    pub fn rotate_clockwise(&mut self) {
        self.transform.rotate_clockwise();
        debug!(degrees = self.transform.rotation_degrees(), "rotated");
        self.render();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.transform.rotate_counter_clockwise();
        debug!(degrees = self.transform.rotation_degrees(), "rotated");
        self.render();
    }

    // ------------------------------------------------------------------
    // Crop
    // ------------------------------------------------------------------

    /// Enter or leave crop mode. Entering snapshots the rendered image.
    pub fn set_crop_mode(&mut self, enabled: bool) {
        if enabled == self.crop_mode {
            return;
        }
        self.lens = None;
        if enabled {
            self.render();
            self.before_crop = Some(self.surface.snapshot());
        } else {
            self.crop.end_interaction();
        }
        self.crop_mode = enabled;
        debug!(enabled, "crop mode");
        self.render();
    }

    /// Replace the working image with the pixels under the crop rectangle,
    /// inset so the outline is not captured, and leave crop mode.
    pub fn commit_crop(&mut self) -> Result<(), EditorError> {
        if self.image.is_none() {
            return Err(EditorError::NoImage);
        }
        let rect = self.crop.rect();
        let inset = self.config.crop.commit_inset;
        let x = (rect.x + inset).round() as i64;
        let y = (rect.y + inset).round() as i64;
        let width = (rect.width - 2.0 * inset).round().max(0.0) as usize;
        let height = (rect.height - 2.0 * inset).round().max(0.0) as usize;
        if width == 0 || height == 0 {
            return Err(EditorError::InvalidRequest(format!(
                "crop rectangle {}x{} leaves nothing inside the inset",
                rect.width, rect.height
            )));
        }

        let cropped = self.surface.get_image_data(x, y, width, height);
        info!(x, y, width, height, "crop committed");

        // The surface already shows the rotation; do not apply it twice
        self.transform.reset_rotation();
        self.replace_image(cropped);
        self.before_crop = None;
        self.crop_mode = false;
        self.crop.end_interaction();
        self.render();
        Ok(())
    }

    /// Restore the image as it was when crop mode was entered and leave crop
    /// mode. Does nothing outside crop mode.
    pub fn cancel_crop(&mut self) {
        if !self.crop_mode {
            return;
        }
        let Some(snapshot) = self.before_crop.take() else {
            return;
        };
        self.surface.put_image_data(&snapshot, 0, 0);
        self.crop_mode = false;
        self.crop.end_interaction();
        debug!("crop cancelled");
    }

    /// Go back to the uploaded image. Does nothing before the first upload.
    pub fn reset_image(&mut self) {
        let Some(original) = self.original.clone() else {
            return;
        };
        info!("resetting to uploaded image");
        self.crop_mode = false;
        self.lens = None;
        self.transform = ViewTransform::default();
        self.before_crop = None;
        self.replace_image(original);
        self.render();

        self.crop.reset(CropRect::full(self.surface.width(), self.surface.height()));
        if let Err(e) = self.commit_crop() {
            warn!(error = %e, "reset commit failed");
        }
        self.crop.reset(CropRect::default_for(
            self.surface.width(),
            self.surface.height(),
            self.config.crop.default_size,
        ));
        self.render();
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    fn to_buffer(&self, screen_x: f64, screen_y: f64) -> Point {
        let (width, height) = (self.surface.width(), self.surface.height());
        let bounds = self
            .bounds
            .unwrap_or_else(|| CanvasBounds::identity(width, height));
        to_canvas_coordinates(screen_x, screen_y, bounds, width, height)
    }

    pub fn pointer_down(&mut self, screen_x: f64, screen_y: f64) -> InteractionState {
        if !self.crop_mode {
            return self.crop.state();
        }
        let p = self.to_buffer(screen_x, screen_y);
        self.crop.pointer_down(p.x, p.y)
    }

    /// Returns true when the surface was redrawn.
    pub fn pointer_move(&mut self, screen_x: f64, screen_y: f64) -> bool {
        let p = self.to_buffer(screen_x, screen_y);
        if self.crop_mode {
            if self.crop.pointer_move(p.x, p.y) {
                self.render();
                return true;
            }
            return false;
        }

        self.hover = Some(p);
        if self.transform.zoom_scale() > 1.0 && self.image.is_some() {
            self.refresh_magnifier();
            return true;
        }
        false
    }

    pub fn pointer_up(&mut self) {
        self.crop.end_interaction();
    }

    /// Pointer left the surface: drop the lens.
    pub fn pointer_leave(&mut self) {
        self.hover = None;
        if self.lens.is_some() || self.transform.zoom_scale() > 1.0 {
            self.refresh_magnifier();
        }
    }

    /// Adjust the magnifier zoom from a wheel delta.
    pub fn wheel(&mut self, delta_y: f64) {
        if self.crop_mode {
            return;
        }
        let magnifier = self.config.magnifier;
        self.transform.apply_wheel(
            delta_y,
            magnifier.wheel_sensitivity,
            magnifier.min_zoom,
            magnifier.max_zoom,
        );
        self.refresh_magnifier();
    }

    pub fn cursor_at(&self, screen_x: f64, screen_y: f64) -> CursorKind {
        if !self.crop_mode {
            return CursorKind::Default;
        }
        let p = self.to_buffer(screen_x, screen_y);
        self.crop.cursor_for(p.x, p.y)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Run a filter against the rendered image.
    ///
    /// Threshold completes before returning. The convolution filters go to
    /// the background worker and report [`FilterOutcome::Pending`].
    pub fn apply_filter(&mut self, kind: FilterKind) -> Result<FilterOutcome, EditorError> {
        if self.worker.is_busy() {
            return Err(EditorError::FilterBusy);
        }
        let request = self.prepare_filter(kind)?;

        if !request.kind.runs_in_background() {
            let output = request.kind.apply(&request.source);
            self.adopt_filter_output(request.kind, output);
            return Ok(FilterOutcome::Applied);
        }

        self.worker.dispatch(request)?;
        Ok(FilterOutcome::Pending)
    }

    /// Snapshot the rendered image into a request without running it.
    ///
    /// For hosts that execute the kernel elsewhere (a browser Web Worker);
    /// hand the result back through [`Editor::complete_filter`].
    pub fn prepare_filter(&mut self, kind: FilterKind) -> Result<FilterRequest, EditorError> {
        if self.crop_mode {
            return Err(EditorError::CropModeActive);
        }
        if self.image.is_none() {
            return Err(EditorError::NoImage);
        }

        let kind = match kind {
            FilterKind::Sharpen { clamp } => FilterKind::Sharpen {
                clamp: clamp || self.config.sharpen_clamp,
            },
            other => other,
        };

        // Drop any lens before sampling
        self.lens = None;
        self.render();
        Ok(FilterRequest {
            generation: self.generation,
            kind,
            source: self.surface.snapshot(),
        })
    }

    /// Apply a finished job unless the image changed since it was prepared.
    pub fn complete_filter(&mut self, response: FilterResponse) -> FilterOutcome {
        self.finish_filter(response)
    }

    /// Collect a finished background filter without blocking.
    pub fn poll_filter(&mut self) -> Option<FilterOutcome> {
        let response = self.worker.try_recv()?;
        Some(self.finish_filter(response))
    }

    /// Block until the background filter finishes.
    pub fn wait_filter(&mut self) -> Option<FilterOutcome> {
        let response = self.worker.wait()?;
        Some(self.finish_filter(response))
    }

    fn finish_filter(&mut self, response: FilterResponse) -> FilterOutcome {
        if response.generation != self.generation {
            warn!(
                filter = response.kind.name(),
                job = response.generation,
                current = self.generation,
                "discarding stale filter result"
            );
            return FilterOutcome::Discarded;
        }
        self.adopt_filter_output(response.kind, response.output);
        FilterOutcome::Applied
    }

    fn adopt_filter_output(&mut self, kind: FilterKind, output: PixelBuffer) {
        info!(filter = kind.name(), "filter applied");
        // Output was sampled from the rotated surface
        self.transform.reset_rotation();
        self.before_crop = None;
        self.replace_image(output);
        self.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CropConfig, MagnifierMode};
    use crate::selection::Handle;

    fn uri(pixels: &PixelBuffer) -> String {
        codec::encode_png_data_uri(pixels).unwrap()
    }

    /// Pixel (x, y) = (x, y, 0, 255).
    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let mut pixels = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                pixels.set_pixel(x, y, [x as u8, y as u8, 0, 255]);
            }
        }
        pixels
    }

    fn editor_with(image: &PixelBuffer) -> Editor {
        let mut editor = Editor::default();
        assert!(editor.load_image(&uri(image)));
        editor
    }

    #[test]
    fn test_load_sizes_surface_and_draws() {
        let image = gradient(30, 20);
        let editor = editor_with(&image);

        assert_eq!(editor.surface().width(), 30);
        assert_eq!(editor.surface().height(), 20);
        assert_eq!(editor.surface().pixels(), &image);
        assert_eq!(editor.crop_rect(), CropRect::new(0.0, 0.0, 30.0, 20.0));
    }

    #[test]
    fn test_invalid_upload_leaves_state() {
        let mut editor = editor_with(&gradient(10, 10));
        let generation = editor.generation();
        let before = editor.surface().snapshot();

        assert!(!editor.load_image("data:text/plain;base64,aGk="));
        assert!(!editor.load_image("data:image/png;base64,aGVsbG8="));
        assert!(matches!(
            editor.try_load_image("hello"),
            Err(EditorError::InvalidImage(_))
        ));

        assert_eq!(editor.generation(), generation);
        assert_eq!(editor.surface().pixels(), &before);
        assert_eq!(editor.image(), Some(&gradient(10, 10)));
    }

    #[test]
    fn test_threshold_scenario() {
        let gray = PixelBuffer::filled(100, 100, [128, 128, 128, 255]);

        let mut editor = editor_with(&gray);
        let outcome = editor.apply_filter(FilterKind::Threshold { threshold: 100 }).unwrap();
        assert_eq!(outcome, FilterOutcome::Applied);
        assert_eq!(
            editor.image(),
            Some(&PixelBuffer::filled(100, 100, [255, 255, 255, 255]))
        );

        let mut editor = editor_with(&gray);
        editor.apply_filter(FilterKind::Threshold { threshold: 200 }).unwrap();
        assert_eq!(
            editor.image(),
            Some(&PixelBuffer::filled(100, 100, [0, 0, 0, 255]))
        );
    }

    #[test]
    fn test_top_left_resize_scenario() {
        let config = EditorConfig {
            crop: CropConfig {
                min_size: 0.0,
                ..CropConfig::default()
            },
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(config);
        assert!(editor.load_image(&uri(&gradient(4, 4))));
        editor.set_crop_mode(true);
        assert_eq!(editor.crop_rect(), CropRect::new(0.0, 0.0, 4.0, 4.0));

        assert_eq!(
            editor.pointer_down(0.0, 0.0),
            InteractionState::Resizing(Handle::TopLeft)
        );
        assert!(editor.pointer_move(1.0, 1.0));
        editor.pointer_up();

        assert_eq!(editor.crop_rect(), CropRect::new(1.0, 1.0, 3.0, 3.0));
        assert_eq!(editor.interaction_state(), InteractionState::Idle);
    }

    #[test]
    fn test_cancel_without_crop_mode_is_noop() {
        let mut editor = editor_with(&gradient(12, 12));
        let before = editor.surface().snapshot();

        editor.cancel_crop();

        assert_eq!(editor.surface().pixels(), &before);
        assert!(!editor.is_crop_mode());
    }

    #[test]
    fn test_cancel_restores_pre_crop_pixels() {
        let mut editor = editor_with(&gradient(40, 40));
        let before = editor.surface().snapshot();

        editor.set_crop_mode(true);
        assert_ne!(editor.surface().pixels(), &before);

        editor.cancel_crop();
        assert_eq!(editor.surface().pixels(), &before);
        assert!(!editor.is_crop_mode());
    }

    #[test]
    fn test_new_upload_resets_crop_rect() {
        let mut editor = editor_with(&gradient(300, 300));
        editor.set_crop_mode(true);
        editor.pointer_down(100.0, 100.0);
        editor.pointer_move(150.0, 130.0);
        editor.pointer_up();
        assert_eq!(editor.crop_rect(), CropRect::new(50.0, 30.0, 200.0, 200.0));

        assert!(editor.load_image(&uri(&gradient(250, 260))));
        assert_eq!(editor.crop_rect(), CropRect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(editor.interaction_state(), InteractionState::Idle);
        assert!(!editor.is_crop_mode());
    }

    #[test]
    fn test_commit_skips_outline() {
        let config = EditorConfig {
            crop: CropConfig {
                default_size: 20.0,
                ..CropConfig::default()
            },
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(config);
        assert!(editor.load_image(&uri(&gradient(60, 60))));
        editor.set_crop_mode(true);

        assert_eq!(editor.pointer_down(10.0, 10.0), InteractionState::Dragging);
        editor.pointer_move(20.0, 20.0);
        editor.pointer_up();
        assert_eq!(editor.crop_rect(), CropRect::new(10.0, 10.0, 20.0, 20.0));

        editor.commit_crop().unwrap();

        let image = editor.image().unwrap();
        assert_eq!((image.width(), image.height()), (16, 16));
        assert_eq!(image.pixel(0, 0), [12, 12, 0, 255]);
        assert_eq!(image.pixel(15, 15), [27, 27, 0, 255]);
        assert!(!editor.is_crop_mode());
    }

    #[test]
    fn test_reset_restores_upload() {
        let mut editor = editor_with(&gradient(30, 30));
        editor.rotate_clockwise();
        editor.set_crop_mode(true);
        editor.commit_crop().unwrap();
        editor.wheel(-300.0);

        editor.reset_image();

        let image = editor.image().unwrap();
        assert_eq!((image.width(), image.height()), (26, 26));
        assert_eq!(image.pixel(0, 0), [2, 2, 0, 255]);
        assert_eq!(editor.transform(), &ViewTransform::default());
        assert_eq!(editor.crop_rect(), CropRect::new(0.0, 0.0, 30.0, 30.0));
        assert!(!editor.is_crop_mode());
    }

    #[test]
    fn test_cancel_outside_crop_mode_keeps_current_view() {
        let mut editor = editor_with(&gradient(24, 16));
        editor.set_crop_mode(true);
        editor.cancel_crop();
        editor.rotate_clockwise();
        let rotated = editor.surface().snapshot();

        editor.cancel_crop();

        assert!(!editor.is_crop_mode());
        assert_eq!(editor.transform().rotation_degrees(), 90);
        assert_eq!(editor.surface().pixels(), &rotated);
    }

    #[test]
    fn test_reset_drops_filter_started_before_it() {
        // Too small for the reset commit to leave anything inside the inset
        let original = gradient(4, 4);
        let mut editor = editor_with(&original);
        editor.apply_filter(FilterKind::Sharpen { clamp: false }).unwrap();

        editor.reset_image();

        assert_eq!(editor.wait_filter(), Some(FilterOutcome::Discarded));
        assert_eq!(editor.image(), Some(&original));
    }

    #[test]
    fn test_reset_before_upload_is_noop() {
        let mut editor = Editor::default();
        editor.reset_image();
        assert!(editor.image().is_none());
        assert_eq!(editor.generation(), 0);
    }

    #[test]
    fn test_background_filter_applies() {
        let mut editor = editor_with(&PixelBuffer::filled(8, 8, [40, 40, 40, 255]));
        let generation = editor.generation();

        let outcome = editor.apply_filter(FilterKind::HighPass { amount: 1.0 }).unwrap();
        assert_eq!(outcome, FilterOutcome::Pending);
        assert!(editor.is_busy());
        assert!(matches!(
            editor.apply_filter(FilterKind::Sharpen { clamp: false }),
            Err(EditorError::FilterBusy)
        ));

        assert_eq!(editor.wait_filter(), Some(FilterOutcome::Applied));
        assert!(!editor.is_busy());
        assert_eq!(editor.generation(), generation + 1);
        // Flat image is a fixed point of the high-pass sharpen
        assert_eq!(
            editor.image(),
            Some(&PixelBuffer::filled(8, 8, [40, 40, 40, 255]))
        );
    }

    #[test]
    fn test_stale_filter_result_discarded() {
        let mut editor = editor_with(&PixelBuffer::filled(16, 16, [90, 90, 90, 255]));
        editor.apply_filter(FilterKind::Sharpen { clamp: false }).unwrap();

        let replacement = gradient(16, 16);
        assert!(editor.load_image(&uri(&replacement)));

        assert_eq!(editor.wait_filter(), Some(FilterOutcome::Discarded));
        assert_eq!(editor.image(), Some(&replacement));
        assert_eq!(editor.poll_filter(), None);
    }

    #[test]
    fn test_externally_run_filter() {
        let mut editor = editor_with(&PixelBuffer::filled(6, 6, [50, 50, 50, 255]));
        let request = editor.prepare_filter(FilterKind::Sharpen { clamp: true }).unwrap();
        assert_eq!(request.generation, editor.generation());

        let output = request.kind.apply(&request.source);
        let expected = output.clone();
        let outcome = editor.complete_filter(FilterResponse {
            generation: request.generation,
            kind: request.kind,
            output,
        });

        assert_eq!(outcome, FilterOutcome::Applied);
        assert_eq!(editor.image(), Some(&expected));
    }

    #[test]
    fn test_filters_refused_while_cropping() {
        let mut editor = editor_with(&gradient(20, 20));
        editor.set_crop_mode(true);
        assert!(matches!(
            editor.apply_filter(FilterKind::Threshold { threshold: 1 }),
            Err(EditorError::CropModeActive)
        ));

        let mut empty = Editor::default();
        assert!(matches!(
            empty.apply_filter(FilterKind::Threshold { threshold: 1 }),
            Err(EditorError::NoImage)
        ));
    }

    #[test]
    fn test_pointer_up_always_idle() {
        let mut editor = editor_with(&gradient(50, 50));
        editor.set_crop_mode(true);
        editor.pointer_down(25.0, 25.0);
        editor.pointer_up();
        editor.pointer_up();
        assert_eq!(editor.interaction_state(), InteractionState::Idle);

        // Outside the rectangle and its handles
        let mut editor = Editor::new(EditorConfig {
            crop: CropConfig {
                default_size: 20.0,
                ..CropConfig::default()
            },
            ..EditorConfig::default()
        });
        assert!(editor.load_image(&uri(&gradient(60, 60))));
        editor.set_crop_mode(true);
        assert_eq!(editor.pointer_down(45.0, 45.0), InteractionState::Idle);
        assert!(!editor.pointer_move(50.0, 50.0));
    }

    #[test]
    fn test_screen_coordinates_scaled_by_bounds() {
        let mut editor = editor_with(&gradient(100, 100));
        // Surface shown at half size, offset on the page
        editor.set_canvas_bounds(CanvasBounds::new(10.0, 10.0, 50.0, 50.0));
        editor.set_crop_mode(true);

        assert_eq!(editor.cursor_at(10.0, 10.0), CursorKind::NwseResize);
        assert_eq!(editor.cursor_at(35.0, 35.0), CursorKind::Move);
        assert_eq!(editor.cursor_at(60.0, 35.0), CursorKind::EwResize);
    }

    #[test]
    fn test_wheel_ignored_while_cropping() {
        let mut editor = editor_with(&gradient(40, 40));
        editor.set_crop_mode(true);
        let before = editor.surface().snapshot();

        editor.wheel(-300.0);

        assert_eq!(editor.transform().zoom_scale(), 1.0);
        assert_eq!(editor.surface().pixels(), &before);

        editor.set_crop_mode(false);
        editor.wheel(-100.0);
        assert!((editor.transform().zoom_scale() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_inline_magnifier_follows_pointer() {
        let mut editor = editor_with(&gradient(40, 40));
        let base = editor.surface().snapshot();

        // Zoom 1: nothing to draw
        assert!(!editor.pointer_move(20.0, 20.0));

        editor.wheel(-100.0);
        assert!((editor.transform().zoom_scale() - 2.0).abs() < 1e-9);
        assert!(editor.pointer_move(20.0, 20.0));
        assert_ne!(editor.surface().pixels(), &base);
        assert!(editor.lens().is_none());

        editor.pointer_leave();
        assert_eq!(editor.surface().pixels(), &base);
    }

    #[test]
    fn test_overlay_magnifier_returns_lens() {
        let mut config = EditorConfig::default();
        config.magnifier.mode = MagnifierMode::Overlay;
        let mut editor = Editor::new(config);
        assert!(editor.load_image(&uri(&gradient(200, 200))));
        let base = editor.surface().snapshot();

        editor.wheel(-200.0);
        editor.pointer_move(100.0, 80.0);

        let lens = editor.lens().unwrap();
        assert_eq!((lens.left, lens.top), (50.0, 30.0));
        assert_eq!(lens.surface.width(), 100);
        assert_eq!(editor.surface().pixels(), &base);
    }

    #[test]
    fn test_commit_after_rotation_keeps_orientation() {
        let mut editor = editor_with(&gradient(20, 20));
        editor.rotate_clockwise();
        editor.set_crop_mode(true);
        editor.commit_crop().unwrap();

        assert_eq!(editor.transform().rotation_degrees(), 0);
        // Top-left of the rotated view is the old bottom-left
        let image = editor.image().unwrap();
        assert_eq!(image.pixel(0, 0), [2, 17, 0, 255]);
    }

    #[test]
    fn test_export_png_data_uri() {
        let image = gradient(9, 7);
        let editor = editor_with(&image);
        let exported = editor.export_result().unwrap();
        assert!(exported.starts_with("data:image/png;base64,"));
        assert_eq!(codec::decode_data_uri(&exported).unwrap(), image);

        assert!(matches!(
            Editor::default().export_result(),
            Err(EditorError::NoImage)
        ));
    }
}
