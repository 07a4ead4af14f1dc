//! # Wire Format Tests
//!
//! End-to-end checks from image or text input to the exact bytes a
//! connector receives.

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use std::io::Cursor;

use tspl::{
    Binarizer, ImageSource, Job, LabelSetup, Printer, TsplError,
    protocol::{
        commands::BitmapMode,
        text::{Alignment, Text},
        units::Unit,
    },
    raster::RasterPath,
    transport::{Connector, FileConnector, MemoryConnector},
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Left half black, right half white.
fn half_black(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, _| {
        if x < width / 2 { Luma([0]) } else { Luma([255]) }
    }))
}

fn frame(action: &[u8]) -> Vec<u8> {
    let mut expected =
        b"SIZE 35,25\r\nGAP 5,0\r\nREFERENCE 0,0\r\nDIRECTION 1\r\nSHIFT 0\r\nCLS\r\n".to_vec();
    expected.extend_from_slice(action);
    expected.extend_from_slice(b"\r\nPRINT 1\r\nEOP\r\n");
    expected
}

// ============================================================================
// IMAGE JOBS
// ============================================================================

#[test]
fn black_square_default_job() {
    let black = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([0])));
    let raster = Binarizer::new()
        .binarize(ImageSource::Bytes(&png_bytes(&black)))
        .unwrap();

    let mut printer = Printer::new(MemoryConnector::new(), LabelSetup::default());
    printer.print_image(&raster, 0, 0).unwrap();
    let conn = printer.close().unwrap();

    let mut action = b"BITMAP 0,0,1,8,0,".to_vec();
    action.extend_from_slice(&[0x00; 8]);
    assert_eq!(conn.writes(), &[frame(&action)]);
}

#[test]
fn transparent_pixels_print_white() {
    let mut rgba = RgbaImage::from_pixel(16, 2, Rgba([0, 0, 0, 0]));
    rgba.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    let raster = Binarizer::new()
        .binarize(ImageSource::Decoded(&DynamicImage::ImageRgba8(rgba)))
        .unwrap();

    assert_eq!(raster.data(), &[0x7F, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn image_file_is_floored_to_byte_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("half.png");
    half_black(20, 3).save(&path).unwrap();

    let raster = Binarizer::new()
        .binarize(ImageSource::Path(&path))
        .unwrap();
    assert_eq!(raster.width(), 16);
    assert_eq!(raster.height(), 3);
    assert_eq!(raster.width_bytes(), 2);

    let job = Job::image(&LabelSetup::default(), &raster, 10, 20, BitmapMode::Or);
    let bytes = job.to_bytes();
    let header = b"BITMAP 10,20,2,3,1,";
    assert!(bytes.windows(header.len()).any(|w| w == header));
}

#[test]
fn generic_and_codec_paths_agree() {
    let image = half_black(37, 11);
    let generic = Binarizer::new()
        .raster_path(RasterPath::Generic)
        .binarize(ImageSource::Decoded(&image))
        .unwrap();
    let codec = Binarizer::new()
        .raster_path(RasterPath::Codec)
        .binarize(ImageSource::Decoded(&image))
        .unwrap();
    assert_eq!(generic, codec);
}

#[test]
fn empty_source_gives_blank_bitmap() {
    let raster = Binarizer::new()
        .target_width(20)
        .target_height(2)
        .binarize(ImageSource::Bytes(&[]))
        .unwrap();
    assert_eq!(raster.width(), 16);
    assert_eq!(raster.data(), &[0xFF; 4]);
}

#[test]
fn garbage_bytes_are_unsupported() {
    let err = Binarizer::new()
        .binarize(ImageSource::Bytes(b"definitely not an image"))
        .unwrap_err();
    assert!(matches!(err, TsplError::UnsupportedFormat(_)));
}

// ============================================================================
// TEXT AND SINGLE-DIRECTIVE JOBS
// ============================================================================

#[test]
fn text_job_bytes() {
    let text = Text::new(20, 30, "Hello, \"world\"")
        .font("4")
        .scale(2, 2)
        .align(Alignment::Center);
    let job = Job::text(&LabelSetup::default(), &text);

    assert_eq!(
        String::from_utf8(job.to_bytes()).unwrap(),
        String::from_utf8(frame(b"TEXT 20,30,\"4\",0,2,2,2,\"Hello, \\[\"]world\\[\"]\""))
            .unwrap()
    );
}

#[test]
fn beep_job_holds_only_beep() {
    let mut printer = Printer::new(MemoryConnector::new(), LabelSetup::default());
    printer.beep().unwrap();
    printer.home().unwrap();
    let conn = printer.close().unwrap();
    assert_eq!(conn.writes(), &[b"BEEP\r\n".to_vec(), b"HOME\r\n".to_vec()]);
}

// ============================================================================
// SETUP
// ============================================================================

#[test]
fn json_setup_with_default_unit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("label.json");
    std::fs::write(
        &path,
        r#"{
            "size": { "width": 50, "height": 30 },
            "gap": { "distance": 2, "offset": 0, "unit": "dot" },
            "shift": { "x": 4, "y": -2 },
            "print": { "sets": 2, "copies": 3 },
            "default_unit": "millimeter"
        }"#,
    )
    .unwrap();

    let setup = LabelSetup::load(&path).unwrap();
    let job = Job::text(&setup, &Text::new(0, 0, "x"));
    assert_eq!(
        String::from_utf8(job.to_bytes()).unwrap(),
        "SIZE 50 mm,30 mm\r\nGAP 2 dot,0 dot\r\nREFERENCE 0,0\r\nDIRECTION 1\r\nSHIFT 4,-2\r\nCLS\r\nTEXT 0,0,\"3\",0,1,1,\"x\"\r\nPRINT 2,3\r\nEOP\r\n"
    );
}

#[test]
fn size_without_height() {
    let setup = LabelSetup::default().with_size(4.0, None, None);
    let bytes = Job::text(&setup, &Text::new(0, 0, "x")).to_bytes();
    assert!(bytes.starts_with(b"SIZE 4\r\nGAP"));
}

// ============================================================================
// CONNECTORS
// ============================================================================

#[test]
fn file_connector_captures_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.prn");
    let setup = LabelSetup::default().with_default_unit(Some(Unit::Millimeter));

    let mut printer = Printer::new(FileConnector::create(&path).unwrap(), setup.clone());
    printer.print_text(&Text::new(1, 1, "A")).unwrap();
    printer.beep().unwrap();
    printer.close().unwrap();

    let mut expected = Job::text(&setup, &Text::new(1, 1, "A")).to_bytes();
    expected.extend_from_slice(b"BEEP\r\n");
    assert_eq!(std::fs::read(&path).unwrap(), expected);
}

#[test]
fn closed_session_rejects_writes() {
    let printer = Printer::new(MemoryConnector::new(), LabelSetup::default());
    let mut conn = printer.close().unwrap();
    assert!(matches!(
        conn.write(&Job::beep().to_bytes()),
        Err(TsplError::Transport(_))
    ));
}
