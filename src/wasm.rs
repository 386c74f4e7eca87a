//! WebAssembly exports for the canvas editor.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Threads
//!
//! The page's main thread drives a [`WasmEditor`]. The convolution filters
//! are too slow for that thread, so the editor hands out the source pixels
//! (`begin_filter`), the host posts them to a Web Worker that calls one of
//! the flat `*_rgba_wasm` kernels, and the result comes back through
//! `finish_filter`. Threshold is cheap and runs in place.

use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::editor::{Editor, FilterOutcome};
use crate::error::EditorError;
use crate::filters::{sharpen, stylize, FilterKind, FilterResponse};
use crate::geometry::CanvasBounds;
use crate::pixels::PixelBuffer;

impl From<EditorError> for JsValue {
    fn from(value: EditorError) -> Self {
        JsValue::from_str(&value.to_string())
    }
}

// ============================================================================
// Filter Kernels (flat RGBA, for Web Workers)
// ============================================================================

/// Threshold an RGBA image by weighted brightness.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `threshold` - Brightness above which a pixel turns white
///
/// # Returns
/// Flat array of RGBA bytes, black and white, alpha preserved
#[wasm_bindgen]
pub fn threshold_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    threshold: u8,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec())?;
    let result = stylize::threshold_u8(input.view(), threshold);
    Ok(result.into_raw_vec_and_offset().0)
}

/// Apply the 3x3 sharpen kernel to an RGBA image.
///
/// `clamp` saturates at 0/255; otherwise out-of-range sums wrap.
#[wasm_bindgen]
pub fn sharpen_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    clamp: bool,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec())?;
    let result = sharpen::sharpen_u8(input.view(), clamp);
    Ok(result.into_raw_vec_and_offset().0)
}

/// High-pass sharpen an RGBA image. Alpha and the one-pixel border pass
/// through unchanged.
#[wasm_bindgen]
pub fn high_pass_sharpen_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    amount: f32,
) -> Result<Vec<u8>, JsValue> {
    let input = PixelBuffer::from_raw(width, height, data.to_vec())?;
    let result = sharpen::high_pass_sharpen_u8(input.view(), amount);
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// Editor
// ============================================================================

/// Filter prepared by `begin_filter` and not yet finished.
struct PendingFilter {
    generation: u64,
    kind: FilterKind,
    width: usize,
    height: usize,
}

/// Editor handle owned by the page.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
    pending: Option<PendingFilter>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor from an optional JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmEditor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json)?,
            None => EditorConfig::default(),
        };
        Ok(WasmEditor {
            editor: Editor::new(config),
            pending: None,
        })
    }

    #[wasm_bindgen(js_name = loadImage)]
    pub fn load_image(&mut self, uri: &str) -> bool {
        // A filter still out on the worker stays pending; its result is
        // dropped as stale when it comes back
        self.editor.load_image(uri)
    }

    pub fn width(&self) -> usize {
        self.editor.surface().width()
    }

    pub fn height(&self) -> usize {
        self.editor.surface().height()
    }

    /// Surface pixels as flat RGBA, ready for `putImageData`.
    pub fn pixels(&self) -> Vec<u8> {
        self.editor.surface().pixels().to_raw()
    }

    /// Report the canvas element's `getBoundingClientRect()`.
    #[wasm_bindgen(js_name = setCanvasBounds)]
    pub fn set_canvas_bounds(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.editor
            .set_canvas_bounds(CanvasBounds::new(left, top, width, height));
    }

    #[wasm_bindgen(js_name = setCropMode)]
    pub fn set_crop_mode(&mut self, enabled: bool) {
        self.editor.set_crop_mode(enabled);
    }

    #[wasm_bindgen(js_name = commitCrop)]
    pub fn commit_crop(&mut self) -> Result<(), JsValue> {
        self.editor.commit_crop()?;
        Ok(())
    }

    #[wasm_bindgen(js_name = cancelCrop)]
    pub fn cancel_crop(&mut self) {
        self.editor.cancel_crop();
    }

    #[wasm_bindgen(js_name = resetImage)]
    pub fn reset_image(&mut self) {
        self.editor.reset_image();
    }

    /// `data:image/png;base64,` URI of the edited image.
    #[wasm_bindgen(js_name = exportResult)]
    pub fn export_result(&self) -> Result<String, JsValue> {
        Ok(self.editor.export_result()?)
    }

    #[wasm_bindgen(js_name = rotateClockwise)]
    pub fn rotate_clockwise(&mut self) {
        self.editor.rotate_clockwise();
    }

    #[wasm_bindgen(js_name = rotateCounterClockwise)]
    pub fn rotate_counter_clockwise(&mut self) {
        self.editor.rotate_counter_clockwise();
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) {
        self.editor.pointer_down(client_x, client_y);
    }

    /// Returns true when the surface needs repainting.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        self.editor.pointer_move(client_x, client_y)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.editor.pointer_up();
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.editor.pointer_leave();
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.editor.wheel(delta_y);
    }

    /// CSS cursor keyword for the pointer position.
    #[wasm_bindgen(js_name = cursorAt)]
    pub fn cursor_at(&self, client_x: f64, client_y: f64) -> String {
        self.editor.cursor_at(client_x, client_y).as_css().to_string()
    }

    /// Overlay-mode lens pixels, empty when no lens is shown.
    #[wasm_bindgen(js_name = lensPixels)]
    pub fn lens_pixels(&self) -> Vec<u8> {
        self.editor
            .lens()
            .map(|lens| lens.surface.pixels().to_raw())
            .unwrap_or_default()
    }

    /// `[left, top, size]` of the lens, empty when no lens is shown.
    #[wasm_bindgen(js_name = lensPlacement)]
    pub fn lens_placement(&self) -> Vec<f64> {
        self.editor
            .lens()
            .map(|lens| vec![lens.left, lens.top, lens.surface.width() as f64])
            .unwrap_or_default()
    }

    /// Threshold in place.
    #[wasm_bindgen(js_name = applyThreshold)]
    pub fn apply_threshold(&mut self, threshold: u8) -> Result<(), JsValue> {
        if self.pending.is_some() {
            return Err(EditorError::FilterBusy.into());
        }
        self.editor
            .apply_filter(FilterKind::Threshold { threshold })?;
        Ok(())
    }

    /// Start a filter given as JSON, e.g. `{"kind": "high_pass", "amount": 1.5}`.
    ///
    /// Returns the source pixels for the Web Worker. The host shows its busy
    /// indicator until `finishFilter`.
    #[wasm_bindgen(js_name = beginFilter)]
    pub fn begin_filter(&mut self, request_json: &str) -> Result<Vec<u8>, JsValue> {
        if self.pending.is_some() {
            return Err(EditorError::FilterBusy.into());
        }
        let kind = FilterKind::from_json(request_json)?;
        let request = self.editor.prepare_filter(kind)?;
        self.pending = Some(PendingFilter {
            generation: request.generation,
            kind: request.kind,
            width: request.source.width(),
            height: request.source.height(),
        });
        Ok(request.source.into_raw())
    }

    /// Hand back the worker's output. Returns false when the image changed
    /// in the meantime and the result was dropped.
    #[wasm_bindgen(js_name = finishFilter)]
    pub fn finish_filter(&mut self, data: Vec<u8>) -> Result<bool, JsValue> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| EditorError::InvalidRequest("no filter in progress".into()))?;
        let output = PixelBuffer::from_raw(pending.width, pending.height, data)?;
        let outcome = self.editor.complete_filter(FilterResponse {
            generation: pending.generation,
            kind: pending.kind,
            output,
        });
        Ok(outcome == FilterOutcome::Applied)
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}
