//! RGBA pixel buffer shared by the filters, the surface and the snapshots.
//!
//! Pixels are held as an `ndarray::Array3<u8>` of shape `(height, width, 4)`
//! in standard (row-major) layout, so the flat form is the familiar
//! `width * height * 4` RGBA byte sequence.

use ndarray::{Array3, ArrayView3};

use crate::error::EditorError;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Owned RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Array3<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: Array3::<u8>::zeros((height, width, CHANNELS)),
        }
    }

    /// Buffer where every pixel has the same RGBA value.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut pixels = Array3::<u8>::zeros((height, width, CHANNELS));
        for y in 0..height {
            for x in 0..width {
                for c in 0..CHANNELS {
                    pixels[[y, x, c]] = rgba[c];
                }
            }
        }
        Self { pixels }
    }

    /// Wrap flat RGBA bytes, checking the length against the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EditorError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(EditorError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        let pixels = Array3::from_shape_vec((height, width, CHANNELS), data).map_err(|_| {
            EditorError::BufferSize {
                expected,
                actual: expected,
            }
        })?;
        Ok(Self { pixels })
    }

    /// Adopt a filter result. Only the first four channels are meaningful.
    pub fn from_array(pixels: Array3<u8>) -> Self {
        debug_assert_eq!(pixels.dim().2, CHANNELS);
        let pixels = if pixels.is_standard_layout() {
            pixels
        } else {
            pixels.as_standard_layout().into_owned()
        };
        Self { pixels }
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.pixels
    }

    /// Copy out the flat RGBA bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }

    /// Consume into flat RGBA bytes without copying.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels.into_raw_vec_and_offset().0
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
            self.pixels[[y, x, 3]],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        for c in 0..CHANNELS {
            self.pixels[[y, x, c]] = rgba[c];
        }
    }

    /// Copy a rectangle out of the buffer. Parts outside the buffer come back
    /// transparent.
    pub fn region(&self, x: i64, y: i64, width: usize, height: usize) -> PixelBuffer {
        let mut out = PixelBuffer::new(width, height);
        for dy in 0..height {
            for dx in 0..width {
                let sx = x + dx as i64;
                let sy = y + dy as i64;
                if self.contains(sx, sy) {
                    out.set_pixel(dx, dy, self.pixel(sx as usize, sy as usize));
                }
            }
        }
        out
    }

    /// Overwrite pixels with `src` placed at `(x, y)`, clipped to this buffer.
    pub fn blit(&mut self, src: &PixelBuffer, x: i64, y: i64) {
        for sy in 0..src.height() {
            for sx in 0..src.width() {
                let dx = x + sx as i64;
                let dy = y + sy as i64;
                if self.contains(dx, dy) {
                    self.set_pixel(dx as usize, dy as usize, src.pixel(sx, sy));
                }
            }
        }
    }
}
