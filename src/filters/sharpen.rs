//! Sharpen filters: 3x3 convolution sharpen and high-pass sharpen.
//!
//! Both are O(pixels x kernel) and are normally run through
//! [`FilterWorker`](super::worker::FilterWorker) rather than on the thread
//! driving pointer input.
//!
//! ## Supported Formats
//!
//! Accepts images with 1, 3, or 4 channels:
//! - **Convolution sharpen** treats every channel (alpha included) independently
//! - **High-pass sharpen** touches color channels only; alpha is copied through

use ndarray::{Array3, ArrayView3};

// ============================================================================
// Convolution Sharpen
// ============================================================================

/// Sharpening kernel:
///  0 -1  0
/// -1  5 -1
///  0 -1  0
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Apply the fixed 3x3 sharpen kernel - u8 version.
///
/// Kernel taps that fall outside the image are skipped, which is the same as
/// zero padding. Border pixels therefore brighten: an edge pixel of a flat
/// image ends up at `2v`, a corner at `3v`.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `clamp` - Clamp the accumulated value to 0-255. When false the value is
///   truncated to its low 8 bits, so overflow wraps around.
///
/// # Returns
/// Sharpened image with same dimensions
pub fn sharpen_u8(input: ArrayView3<u8>, clamp: bool) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0i32;
                for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                    let py = y as isize + ky as isize - 1;
                    if py < 0 || py >= height as isize {
                        continue;
                    }
                    for (kx, &weight) in row.iter().enumerate() {
                        let px = x as isize + kx as isize - 1;
                        if px < 0 || px >= width as isize {
                            continue;
                        }
                        acc += input[[py as usize, px as usize, c]] as i32 * weight;
                    }
                }

                output[[y, x, c]] = if clamp {
                    acc.clamp(0, 255) as u8
                } else {
                    acc as u8
                };
            }
        }
    }

    output
}

// ============================================================================
// High Pass Sharpen
// ============================================================================

/// Sharpen by adding back a scaled high-pass layer - u8 version.
///
/// For every interior pixel and color channel:
/// `high = orig - mean(8 neighbors)`, `out = clamp(orig + amount * high)`.
/// The one-pixel border has no high-pass contribution and keeps its value.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `amount` - Strength of the high-pass layer (0.0 = unchanged)
///
/// # Returns
/// Sharpened image with same channel count, alpha unchanged
pub fn high_pass_sharpen_u8(input: ArrayView3<u8>, amount: f32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = input.to_owned();

    let color_channels = if channels == 4 { 3 } else { channels };

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            for c in 0..color_channels {
                let orig = input[[y, x, c]] as f32;
                let sum = input[[y - 1, x - 1, c]] as f32
                    + input[[y - 1, x, c]] as f32
                    + input[[y - 1, x + 1, c]] as f32
                    + input[[y, x - 1, c]] as f32
                    + input[[y, x + 1, c]] as f32
                    + input[[y + 1, x - 1, c]] as f32
                    + input[[y + 1, x, c]] as f32
                    + input[[y + 1, x + 1, c]] as f32;
                let high_pass = orig - sum / 8.0;

                // Ties round to even, like a clamped byte store
                output[[y, x, c]] = (orig + amount * high_pass)
                    .round_ties_even()
                    .clamp(0.0, 255.0) as u8;
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(h: usize, w: usize, rgba: [u8; 4]) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((h, w, 4));
        for y in 0..h {
            for x in 0..w {
                for c in 0..4 {
                    img[[y, x, c]] = rgba[c];
                }
            }
        }
        img
    }

    // ========================================================================
    // Convolution Sharpen
    // ========================================================================

    #[test]
    fn test_sharpen_flat_interior_unchanged() {
        let img = uniform(5, 5, [40, 50, 60, 70]);
        let result = sharpen_u8(img.view(), false);

        // 5v - 4v = v
        assert_eq!(result[[2, 2, 0]], 40);
        assert_eq!(result[[2, 2, 1]], 50);
        assert_eq!(result[[2, 2, 2]], 60);
        assert_eq!(result[[2, 2, 3]], 70);
    }

    #[test]
    fn test_sharpen_border_skips_missing_taps() {
        let img = uniform(5, 5, [40, 50, 60, 70]);
        let result = sharpen_u8(img.view(), false);

        // Edge pixel has 3 neighbors: 5v - 3v = 2v
        assert_eq!(result[[0, 2, 0]], 80);
        // Corner pixel has 2 neighbors: 5v - 2v = 3v
        assert_eq!(result[[0, 0, 0]], 120);
        assert_eq!(result[[4, 4, 3]], 210);
    }

    #[test]
    fn test_sharpen_unclamped_wraps() {
        let img = uniform(3, 3, [128, 0, 0, 255]);
        let result = sharpen_u8(img.view(), false);

        // Edge: 256 wraps to 0; corner: 384 wraps to 128
        assert_eq!(result[[0, 1, 0]], 0);
        assert_eq!(result[[0, 0, 0]], 128);
        // Alpha edge: 510 wraps to 254
        assert_eq!(result[[0, 1, 3]], 254);
    }

    #[test]
    fn test_sharpen_clamped_saturates() {
        let img = uniform(3, 3, [128, 0, 0, 255]);
        let result = sharpen_u8(img.view(), true);

        assert_eq!(result[[0, 1, 0]], 255);
        assert_eq!(result[[0, 0, 0]], 255);
        assert_eq!(result[[1, 1, 0]], 128);
    }

    #[test]
    fn test_sharpen_negative_lobe() {
        // Dark pixel surrounded by bright ones
        let mut img = uniform(3, 3, [200, 200, 200, 255]);
        img[[1, 1, 0]] = 100;

        // 5*100 - 4*200 = -300
        assert_eq!(sharpen_u8(img.view(), true)[[1, 1, 0]], 0);
        assert_eq!(sharpen_u8(img.view(), false)[[1, 1, 0]], (-300i32) as u8);
    }

    // ========================================================================
    // High Pass Sharpen
    // ========================================================================

    #[test]
    fn test_high_pass_flat_unchanged() {
        let img = uniform(4, 4, [90, 120, 150, 255]);
        let result = high_pass_sharpen_u8(img.view(), 2.0);
        assert_eq!(result, img);
    }

    #[test]
    fn test_high_pass_boosts_peak() {
        let mut img = uniform(3, 3, [100, 100, 100, 255]);
        img[[1, 1, 0]] = 140;

        let result = high_pass_sharpen_u8(img.view(), 0.5);

        // high = 140 - 100 = 40, out = 140 + 20
        assert_eq!(result[[1, 1, 0]], 160);
        assert_eq!(result[[1, 1, 1]], 100);
    }

    #[test]
    fn test_high_pass_half_rounds_to_even() {
        let mut img = uniform(3, 3, [99, 99, 99, 255]);
        img[[1, 1, 0]] = 100;
        img[[1, 1, 1]] = 101;

        let result = high_pass_sharpen_u8(img.view(), 0.5);

        // 100 + 0.5 * 1 = 100.5 -> 100; 101 + 0.5 * 2 = 102 exactly
        assert_eq!(result[[1, 1, 0]], 100);
        assert_eq!(result[[1, 1, 1]], 102);
    }

    #[test]
    fn test_high_pass_clamps() {
        let mut img = uniform(3, 3, [100, 100, 100, 255]);
        img[[1, 1, 0]] = 200;
        img[[1, 1, 1]] = 0;

        let result = high_pass_sharpen_u8(img.view(), 1.0);

        assert_eq!(result[[1, 1, 0]], 255); // 200 + 100
        assert_eq!(result[[1, 1, 1]], 0); // 0 - 100
    }

    #[test]
    fn test_high_pass_border_passes_through() {
        let mut img = uniform(4, 4, [10, 10, 10, 255]);
        img[[0, 0, 0]] = 250;
        img[[3, 2, 1]] = 5;

        let result = high_pass_sharpen_u8(img.view(), 3.0);

        assert_eq!(result[[0, 0, 0]], 250);
        assert_eq!(result[[3, 2, 1]], 5);
    }

    #[test]
    fn test_high_pass_preserves_alpha() {
        let mut img = Array3::<u8>::zeros((5, 5, 4));
        for y in 0..5 {
            for x in 0..5 {
                img[[y, x, 0]] = (x * 50) as u8;
                img[[y, x, 1]] = (y * 40) as u8;
                img[[y, x, 2]] = 128;
                img[[y, x, 3]] = ((x + y) * 25) as u8;
            }
        }

        let result = high_pass_sharpen_u8(img.view(), 4.0);

        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(result[[y, x, 3]], img[[y, x, 3]]);
            }
        }
    }
}
