//! Stylize filters: Threshold.
//!
//! ## Supported Formats
//!
//! Accepts images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - thresholds the single channel
//! - **RGB**: (height, width, 3) - thresholds weighted brightness
//! - **RGBA**: (height, width, 4) - thresholds weighted brightness, preserves alpha

use ndarray::{Array3, ArrayView3};

/// Brightness weights used for thresholding.
const BRIGHT_R: f32 = 0.34;
const BRIGHT_G: f32 = 0.5;
const BRIGHT_B: f32 = 0.16;

// ============================================================================
// Threshold
// ============================================================================

/// Apply binary threshold - u8 version.
///
/// Each pixel becomes white when its brightness
/// `0.34 R + 0.5 G + 0.16 B` is strictly above `threshold`, black otherwise.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `threshold` - Threshold value (0-255)
///
/// # Returns
/// Black and white image with same channel count, alpha unchanged
pub fn threshold_u8(input: ArrayView3<u8>, threshold: u8) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };
    let threshold = threshold as f32;

    for y in 0..height {
        for x in 0..width {
            let brightness = if channels < 3 {
                input[[y, x, 0]] as f32
            } else {
                BRIGHT_R * input[[y, x, 0]] as f32
                    + BRIGHT_G * input[[y, x, 1]] as f32
                    + BRIGHT_B * input[[y, x, 2]] as f32
            };

            let v = if brightness > threshold { 255 } else { 0 };

            for c in 0..color_channels {
                output[[y, x, c]] = v;
            }
            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }
    output
}
