//! Editor configuration.
//!
//! Every field has a default matching the stock widget, so a host can pass a
//! partial JSON object (or nothing at all).

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Top-level editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Surface width before any image is loaded
    pub surface_width: usize,
    /// Surface height before any image is loaded
    pub surface_height: usize,
    pub crop: CropConfig,
    pub overlay: OverlayStyle,
    pub magnifier: MagnifierConfig,
    /// Clamp the 3x3 sharpen accumulation to 0-255 instead of wrapping
    pub sharpen_clamp: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            surface_width: 800,
            surface_height: 600,
            crop: CropConfig::default(),
            overlay: OverlayStyle::default(),
            magnifier: MagnifierConfig::default(),
            sharpen_clamp: false,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Crop rectangle behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Half-size of the square hit zone around each handle
    pub handle_margin: f64,
    /// Width and height must stay strictly above this while resizing
    pub min_size: f64,
    /// Side of the rectangle a fresh image starts with
    pub default_size: f64,
    /// Pixels trimmed from each side on commit so the outline is not captured
    pub commit_inset: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            handle_margin: 10.0,
            min_size: 10.0,
            default_size: 200.0,
            commit_inset: 2.0,
        }
    }
}

/// Look of the dimmed crop overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// RGB of the dimming fill
    pub dim_color: [u8; 3],
    /// Opacity of the dimming fill (0.0-1.0)
    pub dim_alpha: f32,
    /// RGB of the dashed outline
    pub outline_color: [u8; 3],
    pub line_width: usize,
    /// Alternating on/off run lengths of the outline, in pixels
    pub dash: Vec<usize>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            dim_color: [128, 128, 128],
            dim_alpha: 0.5,
            outline_color: [255, 0, 0],
            line_width: 2,
            dash: vec![6, 6],
        }
    }
}

/// Where the magnified excerpt is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MagnifierMode {
    /// Clipped region on the main surface
    #[default]
    Inline,
    /// Dedicated lens surface placed absolutely over the main one
    Overlay,
}

/// Zoom lens settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifierConfig {
    /// On-screen side of the lens
    pub size: f64,
    /// Zoom change per unit of wheel delta
    pub wheel_sensitivity: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub mode: MagnifierMode,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            wheel_sensitivity: 0.01,
            min_zoom: 1.0,
            max_zoom: 10.0,
            mode: MagnifierMode::Inline,
        }
    }
}
