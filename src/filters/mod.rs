//! Pixel filters applied to the working image.
//!
//! ## Supported Formats
//!
//! Kernels take an `ArrayView3<u8>` of shape (H, W, C) and return a fresh
//! `Array3<u8>` of the same shape. The editor always feeds RGBA (C = 4);
//! the Python bindings also accept grayscale and RGB.
//!
//! ## Filters
//!
//! | Filter | Cost | Runs |
//! |--------|------|------|
//! | Threshold | O(pixels) | inline |
//! | Sharpen (3x3 convolution) | O(pixels x 9) | background worker |
//! | High-pass sharpen | O(pixels x 8) | background worker |

pub mod sharpen;
pub mod stylize;
pub mod worker;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::pixels::PixelBuffer;

pub use worker::{FilterRequest, FilterResponse, FilterWorker};

/// A filter together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    /// Black and white by weighted brightness
    Threshold { threshold: u8 },
    /// Fixed 3x3 sharpen kernel
    Sharpen {
        #[serde(default)]
        clamp: bool,
    },
    /// Original plus `amount` times its high-pass layer
    HighPass { amount: f32 },
}

impl FilterKind {
    /// Parse a request such as `{"kind": "high_pass", "amount": 1.5}`.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(|e| EditorError::InvalidRequest(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Threshold { .. } => "threshold",
            FilterKind::Sharpen { .. } => "sharpen",
            FilterKind::HighPass { .. } => "high_pass",
        }
    }

    /// Convolution filters are too slow for the interaction thread.
    pub fn runs_in_background(&self) -> bool {
        !matches!(self, FilterKind::Threshold { .. })
    }

    /// Run the filter synchronously on the calling thread.
    pub fn apply(&self, source: &PixelBuffer) -> PixelBuffer {
        let output = match *self {
            FilterKind::Threshold { threshold } => stylize::threshold_u8(source.view(), threshold),
            FilterKind::Sharpen { clamp } => sharpen::sharpen_u8(source.view(), clamp),
            FilterKind::HighPass { amount } => sharpen::high_pass_sharpen_u8(source.view(), amount),
        };
        PixelBuffer::from_array(output)
    }
}
