//! # Bitmap Packing
//!
//! Packs boolean pixels into the byte rows consumed by the `BITMAP`
//! directive.
//!
//! ## Bit Packing
//!
//! - Bit 7 (MSB) = leftmost pixel
//! - Bit 0 (LSB) = rightmost pixel
//! - 1 = white (no dot), 0 = black (dot)
//!
//! If a row is not a multiple of 8 pixels wide, the last byte of that row is
//! padded with 0 bits on the right. Rows are concatenated with no extra
//! padding.
//!
//! ```
//! use tspl::raster::pack_row;
//!
//! let row = vec![true, false, true, false, true, false, true, true];
//! assert_eq!(pack_row(&row), vec![0b1010_1011]);
//!
//! // 3 pixels pad to 1 byte
//! assert_eq!(pack_row(&[true, true, false]), vec![0b1100_0000]);
//! ```

/// Pack a single row of pixels into bytes (`true` = bit set).
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

/// Pack a row-major pixel matrix of `width × height` into byte rows.
///
/// Output length is `ceil(width / 8) * height`. Missing pixels (a short
/// `pixels` slice) pack as 0.
pub fn pack(pixels: &[bool], width: usize, height: usize) -> Vec<u8> {
    let width_bytes = width.div_ceil(8);
    let mut data = Vec::with_capacity(width_bytes * height);

    if width == 0 {
        return data;
    }

    for y in 0..height {
        let start = (y * width).min(pixels.len());
        let end = (start + width).min(pixels.len());
        let mut row = pack_row(&pixels[start..end]);
        row.resize(width_bytes, 0);
        data.extend(row);
    }

    data
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_row_8_pixels() {
        assert_eq!(pack_row(&[true; 8]), vec![0xFF]);
        assert_eq!(pack_row(&[false; 8]), vec![0x00]);
        assert_eq!(
            pack_row(&[true, false, true, false, true, false, true, true]),
            vec![0b1010_1011]
        );
    }

    #[test]
    fn test_pack_row_padding() {
        assert_eq!(pack_row(&[true, true, false]), vec![0b1100_0000]);

        let nine_white = vec![true; 9];
        assert_eq!(pack_row(&nine_white), vec![0xFF, 0x80]);
    }

    #[test]
    fn test_pack_row_empty() {
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_pack_rows_have_no_shared_bytes() {
        // 3x2: each row starts on its own byte
        let pixels = [true, true, true, false, false, true];
        assert_eq!(pack(&pixels, 3, 2), vec![0b1110_0000, 0b0010_0000]);
    }

    #[test]
    fn test_pack_length() {
        for width in 1..20 {
            let pixels = vec![false; width * 5];
            assert_eq!(pack(&pixels, width, 5).len(), width.div_ceil(8) * 5);
        }
    }

    #[test]
    fn test_pack_zero_width() {
        assert!(pack(&[], 0, 10).is_empty());
    }
}
