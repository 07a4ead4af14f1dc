//! # Monochrome Raster Pipeline
//!
//! This module turns decoded images into the packed 1-bit bitmaps carried by
//! the TSPL `BITMAP` directive.
//!
//! ## Module Structure
//!
//! - [`binarize`]: Alpha flattening, width normalization and thresholding
//! - [`pack`]: Boolean pixel rows to MSB-first bytes
//! - [`pbm`]: Codec-assisted packed raster (PBM "P4") encoder
//!
//! ## Bit Convention
//!
//! TSPL prints black where a bit is **0**:
//!
//! ```text
//! Byte value 0xFF = 11111111 = ░░░░░░░░  (all white, nothing printed)
//! Byte value 0x00 = 00000000 = ████████  (all black)
//! Byte value 0x0F = 00001111 = ████░░░░
//! ```
//!
//! This is the opposite of ESC/POS style raster commands, so a `true` pixel
//! in this crate always means **white**.

pub mod binarize;
pub mod pack;
pub mod pbm;

pub use binarize::{Binarizer, DecodeLimits, ImageSource, RasterPath};
pub use pack::{pack, pack_row};

/// A packed 1-bit bitmap ready for the `BITMAP` directive.
///
/// `width_bytes == ceil(width / 8)` and `data.len() == width_bytes * height`
/// hold for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    width_bytes: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap already-packed rows.
    ///
    /// Returns `None` when `data` does not hold exactly
    /// `ceil(width / 8) * height` bytes.
    pub fn from_packed(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let width_bytes = width.div_ceil(8);
        if data.len() != width_bytes as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            width_bytes,
            data,
        })
    }

    /// Pack a row-major boolean matrix (`true` = white).
    pub fn from_pixels(width: u32, height: u32, pixels: &[bool]) -> Self {
        Self {
            width,
            height,
            width_bytes: width.div_ceil(8),
            data: pack(pixels, width as usize, height as usize),
        }
    }

    /// An all-white bitmap. Padding bits in the last byte of each row stay 0.
    ///
    /// ```
    /// use tspl::raster::RasterImage;
    ///
    /// let blank = RasterImage::blank(12, 2);
    /// assert_eq!(blank.data(), &[0xFF, 0xF0, 0xFF, 0xF0]);
    /// ```
    pub fn blank(width: u32, height: u32) -> Self {
        let row = pack_row(&vec![true; width as usize]);
        let data = row.repeat(height as usize);
        Self {
            width,
            height,
            width_bytes: width.div_ceil(8),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per packed row.
    pub fn width_bytes(&self) -> u32 {
        self.width_bytes
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Whether the dot at (x, y) is white. Out-of-range coordinates read as white.
    pub fn is_white(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return true;
        }
        let byte = self.data[(y * self.width_bytes + x / 8) as usize];
        (byte >> (7 - (x % 8))) & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_packed_checks_length() {
        assert!(RasterImage::from_packed(8, 2, vec![0; 2]).is_some());
        assert!(RasterImage::from_packed(8, 2, vec![0; 3]).is_none());
        assert!(RasterImage::from_packed(9, 1, vec![0; 1]).is_none());
        assert!(RasterImage::from_packed(9, 1, vec![0; 2]).is_some());
    }

    #[test]
    fn test_width_bytes_rounds_up() {
        for width in 0..40u32 {
            let img = RasterImage::blank(width, 3);
            assert_eq!(img.width_bytes(), width.div_ceil(8));
            assert_eq!(img.data().len(), (img.width_bytes() * 3) as usize);
        }
    }

    #[test]
    fn test_blank_empty() {
        let img = RasterImage::blank(0, 0);
        assert_eq!(img.width_bytes(), 0);
        assert!(img.data().is_empty());
    }

    #[test]
    fn test_is_white() {
        let img = RasterImage::from_packed(8, 1, vec![0b1000_0001]).unwrap();
        assert!(img.is_white(0, 0));
        assert!(!img.is_white(1, 0));
        assert!(img.is_white(7, 0));
        assert!(img.is_white(8, 0));
    }
}
