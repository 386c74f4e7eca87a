//! Canvas Editor
//!
//! Core of an embeddable raster image editor: upload, rotate in quarter
//! turns, crop through an interactive rectangle, magnify under the pointer,
//! run pixel filters, export. Bindings for the browser (wasm-bindgen) and
//! Python (PyO3) are available behind features.
//!
//! ## Image Format
//! The editor works on RGBA u8 buffers, `(height, width, 4)`, row-major.
//! The filter kernels also accept grayscale `(h, w, 1)` and RGB `(h, w, 3)`
//! arrays, which the Python bindings pass through as-is.
//!
//! ## Layout
//! - [`editor::Editor`] owns all state and is the host-facing entry point
//! - [`selection`] crop rectangle and its pointer state machine
//! - [`render`] software surface, base/overlay passes, magnifier
//! - [`filters`] threshold, sharpen, high-pass sharpen and the background worker
//! - [`codec`] data-URI decode and PNG export

pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod pixels;
pub mod render;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use editor::{Editor, FilterOutcome};
pub use error::EditorError;
pub use filters::FilterKind;
pub use pixels::PixelBuffer;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::prelude::*;

    use crate::filters::sharpen as sharpen_mod;
    use crate::filters::stylize;

    // ========================================================================
    // Threshold
    // ========================================================================

    /// Black and white by weighted brightness (0.34 R + 0.5 G + 0.16 B).
    ///
    /// Alpha is preserved; grayscale input compares the single channel.
    #[pyfunction]
    pub fn threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold_val: u8,
    ) -> Bound<'py, PyArray3<u8>> {
        let result = stylize::threshold_u8(image.as_array(), threshold_val);
        result.into_pyarray(py)
    }

    // ========================================================================
    // Sharpen Filters
    // ========================================================================

    /// Fixed 3x3 sharpen. Without `clamp`, overflow wraps like the editor default.
    #[pyfunction]
    #[pyo3(signature = (image, clamp=false))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        clamp: bool,
    ) -> Bound<'py, PyArray3<u8>> {
        let result = sharpen_mod::sharpen_u8(image.as_array(), clamp);
        result.into_pyarray(py)
    }

    #[pyfunction]
    pub fn high_pass_sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f32,
    ) -> Bound<'py, PyArray3<u8>> {
        let result = sharpen_mod::high_pass_sharpen_u8(image.as_array(), amount);
        result.into_pyarray(py)
    }

    /// Canvas editor filter kernels
    #[pymodule]
    pub fn canvas_editor(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(threshold, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(high_pass_sharpen, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::canvas_editor;
