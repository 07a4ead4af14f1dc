//! # Packed Raster Codec Path
//!
//! The `image` crate can write PBM "P4" files, which are already packed
//! 1 bit per pixel, MSB first, rows padded to a whole byte. Stripping the
//! header leaves exactly the byte layout the `BITMAP` directive wants.
//!
//! ## P4 Layout
//!
//! ```text
//! P4\n
//! # optional comment lines\n
//! <width> <height>\n
//! <ceil(width / 8) * height raw bytes>
//! ```
//!
//! ## Bit Meaning
//!
//! PBM stores **1 = black**; TSPL wants **1 = white**. The encoder negates the
//! bilevel plane before handing it to the codec (white pixels become sample
//! 0, which PBM writes as a 1 bit), so no byte-level inversion is needed
//! afterwards.

use std::sync::OnceLock;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use log::{debug, warn};
use rayon::prelude::*;

use super::RasterImage;
use super::binarize::{PackedRasterEncoder, ThresholdEncoder, is_white};
use crate::error::TsplError;

/// PBM binary magic followed by its line terminator.
pub const P4_MAGIC: &[u8] = b"P4\n";

/// Encoder backed by the codec's PBM writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PbmEncoder;

impl PbmEncoder {
    /// Encode to a complete P4 blob (header included).
    pub fn encode_blob(&self, image: &RgbImage) -> Result<Vec<u8>, TsplError> {
        let (width, height) = image.dimensions();

        // White -> 0, black -> 1
        let stride = width as usize * 3;
        let plane: Vec<u8> = if stride == 0 {
            Vec::new()
        } else {
            image
                .as_raw()
                .par_chunks(stride)
                .flat_map_iter(|row| {
                    row.chunks_exact(3)
                        .map(|px| u8::from(!is_white(&Rgb([px[0], px[1], px[2]]))))
                })
                .collect()
        };

        let mut blob = Vec::new();
        PnmEncoder::new(&mut blob)
            .with_subtype(PnmSubtype::Bitmap(SampleEncoding::Binary))
            .write_image(&plane, width, height, ExtendedColorType::L8)
            .map_err(encoder_error)?;
        Ok(blob)
    }
}

impl PackedRasterEncoder for PbmEncoder {
    fn name(&self) -> &'static str {
        "pbm"
    }

    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, TsplError> {
        let blob = self.encode_blob(image)?;
        let raster = parse_p4(&blob)?;

        if raster.width() != image.width() || raster.height() != image.height() {
            return Err(TsplError::MalformedPackedRaster(format!(
                "header says {}x{}, image is {}x{}",
                raster.width(),
                raster.height(),
                image.width(),
                image.height()
            )));
        }
        Ok(raster.into_data())
    }
}

/// The image already decoded, so a PBM writer failure is a codec-path
/// failure rather than an unsupported source.
fn encoder_error(err: image::ImageError) -> TsplError {
    TsplError::MalformedPackedRaster(format!("PBM encoder: {}", err))
}

/// Return the bytes following the P4 header.
///
/// Locates the `P4\n` magic, skips any `#` comment lines, skips the
/// dimensions line and returns everything after it.
pub fn strip_header(blob: &[u8]) -> Result<&[u8], TsplError> {
    let (_, _, data) = split_header(blob)?;
    Ok(data)
}

/// Parse a P4 blob into a [`RasterImage`], checking the byte count.
pub fn parse_p4(blob: &[u8]) -> Result<RasterImage, TsplError> {
    let (width, height, data) = split_header(blob)?;
    RasterImage::from_packed(width, height, data.to_vec()).ok_or_else(|| {
        TsplError::MalformedPackedRaster(format!(
            "expected {} bytes for {}x{}, found {}",
            width.div_ceil(8) as usize * height as usize,
            width,
            height,
            data.len()
        ))
    })
}

fn split_header(blob: &[u8]) -> Result<(u32, u32, &[u8]), TsplError> {
    let magic = blob
        .windows(P4_MAGIC.len())
        .position(|w| w == P4_MAGIC)
        .ok_or_else(|| TsplError::MalformedPackedRaster("missing P4 magic".into()))?;

    let mut cursor = magic + P4_MAGIC.len();
    while blob.get(cursor) == Some(&b'#') {
        cursor = next_line(blob, cursor)?;
    }

    let end = next_line(blob, cursor)?;
    let line = std::str::from_utf8(&blob[cursor..end - 1])
        .map_err(|_| TsplError::MalformedPackedRaster("dimensions are not text".into()))?;

    let mut dims = line.split_whitespace().map(str::parse::<u32>);
    let (Some(Ok(width)), Some(Ok(height)), None) = (dims.next(), dims.next(), dims.next())
    else {
        return Err(TsplError::MalformedPackedRaster(format!(
            "bad dimensions line {:?}",
            line
        )));
    };

    Ok((width, height, &blob[end..]))
}

/// Index just past the next `\n` at or after `from`.
fn next_line(blob: &[u8], from: usize) -> Result<usize, TsplError> {
    blob[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| from + i + 1)
        .ok_or_else(|| TsplError::MalformedPackedRaster("truncated header".into()))
}

/// Whether the codec path reproduces the threshold encoder bit for bit.
///
/// Runs once per process on a calibration image that mixes pure colors,
/// values on both sides of the threshold and a partial last byte.
pub fn codec_supported() -> bool {
    static SUPPORTED: OnceLock<bool> = OnceLock::new();
    *SUPPORTED.get_or_init(calibrate)
}

fn calibrate() -> bool {
    let calibration = RgbImage::from_fn(19, 3, |x, y| match (x + 2 * y) % 5 {
        0 => Rgb([0, 0, 0]),
        1 => Rgb([255, 255, 255]),
        2 => Rgb([128, 128, 128]),
        3 => Rgb([127, 127, 127]),
        _ => Rgb([255, 128, 0]),
    });

    let expected = match ThresholdEncoder.encode(&calibration) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    match PbmEncoder.encode(&calibration) {
        Ok(bytes) if bytes == expected => {
            debug!("packed raster codec passed calibration");
            true
        }
        Ok(_) => {
            warn!("packed raster codec disagrees with threshold encoder, disabling");
            false
        }
        Err(e) => {
            warn!("packed raster codec unavailable: {}", e);
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
