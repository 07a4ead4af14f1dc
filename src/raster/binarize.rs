//! # Image Binarization
//!
//! Converts a decoded image into a [`RasterImage`] whose rows are a whole
//! number of bytes wide.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────┐   ┌───────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ decode │ ─►│ flatten alpha │ ─►│ width → ×8,  │ ─►│ threshold +  │
//! │(limits)│   │ over white    │   │ resample     │   │ pack         │
//! └────────┘   └───────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ## Thresholding
//!
//! A pixel is white when the integer average of its channels reaches the
//! midpoint of the channel range:
//!
//! ```text
//! (R + G + B) / 3 >= 128   →  white (bit 1)
//! otherwise                →  black (bit 0)
//! ```
//!
//! There is no dithering and no adaptive threshold; labels are mostly
//! line art, barcodes and text.
//!
//! ## Two Encoders
//!
//! | Encoder | How | Availability |
//! |---------|-----|--------------|
//! | [`ThresholdEncoder`] | per-pixel threshold, rows in parallel, [`pack`] | always, default |
//! | [`PbmEncoder`] | codec writes a PBM P4 blob, header stripped | [`RasterPath::Codec`], calibrated once |
//!
//! Both produce identical bytes; the codec encoder is only used after
//! [`pbm::codec_supported`] has confirmed that on a calibration image.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, Limits, Rgb, RgbImage, Rgba, RgbaImage};
use log::{debug, warn};
use rayon::prelude::*;

use super::pbm::{self, PbmEncoder};
use super::{RasterImage, pack};
use crate::error::TsplError;

/// Midpoint of an 8-bit channel (50% of 255, rounded up for integer compare).
pub const HALF_INTENSITY: u16 = 128;

/// Default decoder allocation cap (512 MiB).
pub const DEFAULT_MAX_ALLOC: u64 = 512 * 1024 * 1024;

/// Whether an RGB pixel thresholds to white.
#[inline]
pub fn is_white(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    (r as u16 + g as u16 + b as u16) / 3 >= HALF_INTENSITY
}

/// Working width for a source width and an optional target width.
///
/// Always a multiple of 8, never rounded up.
///
/// ```
/// use tspl::raster::binarize::working_width;
///
/// assert_eq!(working_width(203, None), 200);
/// assert_eq!(working_width(203, Some(63)), 56);
/// assert_eq!(working_width(5, None), 0);
/// ```
#[inline]
pub fn working_width(source_width: u32, target_width: Option<u32>) -> u32 {
    target_width.unwrap_or(source_width) / 8 * 8
}

// ============================================================================
// ENCODERS
// ============================================================================

/// Turns a truecolor image into packed rows (`ceil(width / 8) * height` bytes,
/// bit 1 = white).
pub trait PackedRasterEncoder {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, TsplError>;
}

/// The always-available per-pixel encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEncoder;

impl PackedRasterEncoder for ThresholdEncoder {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, TsplError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }

        let stride = width as usize * 3;
        let rows: Vec<Vec<bool>> = image
            .as_raw()
            .par_chunks(stride)
            .map(|row| {
                row.chunks_exact(3)
                    .map(|px| is_white(&Rgb([px[0], px[1], px[2]])))
                    .collect()
            })
            .collect();

        Ok(pack(&rows.concat(), width as usize, height as usize))
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Which encoder the binarizer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterPath {
    /// The fastest available encoder (currently the threshold encoder).
    #[default]
    Auto,
    /// Always the per-pixel threshold encoder.
    Generic,
    /// The PBM codec encoder; falls back (with a warning) if unavailable.
    Codec,
}

/// Resource caps applied before decoding and during binarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum bytes the decoder may allocate.
    pub max_alloc: Option<u64>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Worker threads for binarization. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_alloc: Some(DEFAULT_MAX_ALLOC),
            max_width: None,
            max_height: None,
            threads: None,
        }
    }
}

impl DecodeLimits {
    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_alloc = self.max_alloc;
        limits.max_image_width = self.max_width;
        limits.max_image_height = self.max_height;
        limits
    }
}

/// Where the pixels come from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// A file on disk. A zero-byte file yields a blank bitmap.
    Path(&'a Path),
    /// Encoded image bytes (PNG, JPEG, ...). Empty input yields a blank bitmap.
    Bytes(&'a [u8]),
    /// An image that was already decoded.
    Decoded(&'a DynamicImage),
}

// ============================================================================
// BINARIZER
// ============================================================================

/// # Binarizer
///
/// ## Example
///
/// ```no_run
/// use std::path::Path;
/// use tspl::raster::{Binarizer, ImageSource};
///
/// let raster = Binarizer::new()
///     .target_width(384)
///     .binarize(ImageSource::Path(Path::new("logo.png")))?;
///
/// assert_eq!(raster.width(), 384);
/// # Ok::<(), tspl::TsplError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Binarizer {
    target_width: Option<u32>,
    target_height: Option<u32>,
    limits: DecodeLimits,
    path: RasterPath,
    filter: FilterType,
}

impl Default for Binarizer {
    fn default() -> Self {
        Self {
            target_width: None,
            target_height: None,
            limits: DecodeLimits::default(),
            path: RasterPath::Auto,
            filter: FilterType::Triangle,
        }
    }
}

impl Binarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale to this width, floored to a multiple of 8.
    pub fn target_width(self, width: u32) -> Self {
        Self {
            target_width: Some(width),
            ..self
        }
    }

    /// Scale to this height. Without it the source height is kept.
    pub fn target_height(self, height: u32) -> Self {
        Self {
            target_height: Some(height),
            ..self
        }
    }

    pub fn limits(self, limits: DecodeLimits) -> Self {
        Self { limits, ..self }
    }

    pub fn raster_path(self, path: RasterPath) -> Self {
        Self { path, ..self }
    }

    /// Resampling filter used when the working size differs from the source.
    pub fn filter(self, filter: FilterType) -> Self {
        Self { filter, ..self }
    }

    /// Decode (if needed) and binarize an image source.
    pub fn binarize(&self, source: ImageSource<'_>) -> Result<RasterImage, TsplError> {
        let decoded = match source {
            ImageSource::Path(path) => {
                let bytes = std::fs::read(path)?;
                debug!("read {} bytes from {}", bytes.len(), path.display());
                self.decode(&bytes)?
            }
            ImageSource::Bytes(bytes) => self.decode(bytes)?,
            ImageSource::Decoded(image) => return self.binarize_image(image),
        };

        match decoded {
            Some(image) => self.binarize_image(&image),
            None => Ok(self.blank()),
        }
    }

    /// Binarize an already decoded image.
    pub fn binarize_image(&self, image: &DynamicImage) -> Result<RasterImage, TsplError> {
        let (source_width, source_height) = image.dimensions();
        let width = working_width(source_width, self.target_width);
        let height = self.target_height.unwrap_or(source_height);

        debug!(
            "binarize {}x{} -> {}x{}",
            source_width, source_height, width, height
        );

        if width == 0 || height == 0 || source_width == 0 || source_height == 0 {
            return Ok(RasterImage::blank(width, height));
        }

        let flat = flatten_alpha(image);
        let scaled = if flat.dimensions() == (width, height) {
            flat
        } else {
            imageops::resize(&flat, width, height, self.filter)
        };

        let data = self.with_pool(|| self.encode(&scaled))??;

        RasterImage::from_packed(width, height, data).ok_or_else(|| {
            TsplError::MalformedPackedRaster(format!(
                "encoder output does not match {}x{}",
                width, height
            ))
        })
    }

    /// The bitmap produced for an empty source.
    fn blank(&self) -> RasterImage {
        let width = working_width(0, self.target_width);
        let height = self.target_height.unwrap_or(0);
        debug!("empty image source, using blank {}x{}", width, height);
        RasterImage::blank(width, height)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Option<DynamicImage>, TsplError> {
        if bytes.is_empty() {
            return Ok(None);
        }

        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        reader.limits(self.limits.to_image_limits());
        let image = reader.decode()?;

        debug!(
            "decoded {}x{} {:?}",
            image.width(),
            image.height(),
            image.color()
        );
        Ok(Some(image))
    }

    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, TsplError> {
        let encoder = self.encoder();
        debug!("encoding with {}", encoder.name());
        encoder.encode(image)
    }

    /// The encoder for the configured path.
    ///
    /// `Auto` and `Generic` use the parallel threshold encoder. `Codec`
    /// uses the PBM writer once the calibration check has passed.
    fn encoder(&self) -> &'static dyn PackedRasterEncoder {
        match self.path {
            RasterPath::Auto | RasterPath::Generic => &ThresholdEncoder,
            RasterPath::Codec if pbm::codec_supported() => &PbmEncoder,
            RasterPath::Codec => {
                warn!("packed raster codec unavailable, using threshold encoder");
                &ThresholdEncoder
            }
        }
    }

    fn with_pool<T, F>(&self, f: F) -> Result<T, TsplError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.limits.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| TsplError::ResourceLimit(e.to_string()))?;
                Ok(pool.install(f))
            }
            None => Ok(f()),
        }
    }
}

/// Binarize with default settings and optional target dimensions.
pub fn binarize(
    source: ImageSource<'_>,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<RasterImage, TsplError> {
    let mut binarizer = Binarizer::new();
    if let Some(width) = target_width {
        binarizer = binarizer.target_width(width);
    }
    if let Some(height) = target_height {
        binarizer = binarizer.target_height(height);
    }
    binarizer.binarize(source)
}

/// Composite the image over an opaque white canvas of the same size.
pub fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &image.to_rgba8(), 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

// ============================================================================
// TESTS
// ============================================================================
