//! # TSPL Directive Builders
//!
//! One pure function per directive. Each returns exactly one line without
//! its terminator. Lines are bytes rather than `String` because `BITMAP`
//! carries raw raster data after its last comma.
//!
//! ## Keyword Table
//!
//! | Keyword | Fields | Purpose |
//! |---------|--------|---------|
//! | `SIZE` | width[,height] | Label size |
//! | `GAP` | distance,offset | Gap between labels |
//! | `REFERENCE` | x,y | Origin of the coordinate system |
//! | `DIRECTION` | n | Print direction (0 or 1) |
//! | `OFFSET` | distance | Extra feed after printing (peel/cut) |
//! | `SHIFT` | [x,]y | Fine position adjustment |
//! | `BITMAP` | x,y,width_bytes,height,mode,data | Raster image |
//! | `TEXT` | x,y,font,rotation,xm,ym[,align],content | Text |
//! | `PRINT` | sets[,copies] | Print the image buffer |
//! | `CLS` | | Clear the image buffer |
//! | `EOP` | | End of program |
//! | `HOME` | | Feed to the start of the next label |
//! | `BEEP` | | Sound the buzzer |
//!
//! ## Separators
//!
//! The keyword is followed by a single space, fields are joined with `,`
//! and never padded. Real firmware is strict about this.

use std::fmt::Display;

use log::warn;

use super::text::{Text, quote};
use super::units::{Unit, measure};

// ============================================================================
// WIRE CONSTANTS
// ============================================================================

/// Line terminator between directives
pub const CRLF: &[u8] = b"\r\n";

/// Field separator
pub const SEPARATOR: u8 = b',';

/// Separator between keyword and first field
pub const SPACE: u8 = b' ';

/// A raster byte with no dots set
const WHITE: u8 = 0xFF;

/// The closed set of directive keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Size,
    Gap,
    Reference,
    Direction,
    Offset,
    Shift,
    Bitmap,
    Text,
    Print,
    Cls,
    Eop,
    Home,
    Beep,
}

impl Keyword {
    /// Every keyword, in table order.
    pub const ALL: [Keyword; 13] = [
        Keyword::Size,
        Keyword::Gap,
        Keyword::Reference,
        Keyword::Direction,
        Keyword::Offset,
        Keyword::Shift,
        Keyword::Bitmap,
        Keyword::Text,
        Keyword::Print,
        Keyword::Cls,
        Keyword::Eop,
        Keyword::Home,
        Keyword::Beep,
    ];

    /// Spelling on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Size => "SIZE",
            Keyword::Gap => "GAP",
            Keyword::Reference => "REFERENCE",
            Keyword::Direction => "DIRECTION",
            Keyword::Offset => "OFFSET",
            Keyword::Shift => "SHIFT",
            Keyword::Bitmap => "BITMAP",
            Keyword::Text => "TEXT",
            Keyword::Print => "PRINT",
            Keyword::Cls => "CLS",
            Keyword::Eop => "EOP",
            Keyword::Home => "HOME",
            Keyword::Beep => "BEEP",
        }
    }
}

/// `BITMAP` drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapMode {
    /// Replace what is in the image buffer.
    #[default]
    Overwrite = 0,
    Or = 1,
    Xor = 2,
}

// ============================================================================
// LINE ASSEMBLY
// ============================================================================

/// Accumulates one directive line.
struct Line {
    buf: Vec<u8>,
    fields: usize,
}

impl Line {
    fn new(keyword: Keyword) -> Self {
        Self {
            buf: keyword.as_str().as_bytes().to_vec(),
            fields: 0,
        }
    }

    fn separator(&mut self) {
        self.buf
            .push(if self.fields == 0 { SPACE } else { SEPARATOR });
        self.fields += 1;
    }

    fn field(mut self, value: impl Display) -> Self {
        self.separator();
        self.buf.extend(value.to_string().into_bytes());
        self
    }

    fn raw(mut self, data: &[u8]) -> Self {
        self.separator();
        self.buf.extend_from_slice(data);
        self
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

// ============================================================================
// SETUP DIRECTIVES
// ============================================================================

/// # Label Size (SIZE m[,n])
///
/// Width and, optionally, height of the label stock. When the height is not
/// given the whole second clause is left out and the printer measures the
/// label itself.
///
/// ## Example
///
/// ```
/// use tspl::protocol::{commands, units::Unit};
///
/// assert_eq!(commands::size(35.0, None, Unit::Inch), b"SIZE 35");
/// assert_eq!(commands::size(35.0, Some(25.0), Unit::Inch), b"SIZE 35,25");
/// assert_eq!(commands::size(60.0, Some(40.0), Unit::Millimeter), b"SIZE 60 mm,40 mm");
/// ```
pub fn size(width: f32, height: Option<f32>, unit: Unit) -> Vec<u8> {
    let line = Line::new(Keyword::Size).field(measure(width, unit));
    match height {
        Some(height) => line.field(measure(height, unit)).finish(),
        None => line.finish(),
    }
}

/// # Gap Between Labels (GAP m,n)
///
/// - `distance`: gap height between two labels
/// - `offset`: offset of the gap (0 for ordinary die-cut stock)
///
/// Both fields carry the same unit.
pub fn gap(distance: f32, offset: f32, unit: Unit) -> Vec<u8> {
    Line::new(Keyword::Gap)
        .field(measure(distance, unit))
        .field(measure(offset, unit))
        .finish()
}

/// # Reference Point (REFERENCE x,y)
///
/// Moves the origin of the label coordinate system, in dots.
pub fn reference(x: u32, y: u32) -> Vec<u8> {
    Line::new(Keyword::Reference).field(x).field(y).finish()
}

/// # Print Direction (DIRECTION n)
///
/// `0` prints with the label top leaving the printer first, `1` rotates the
/// output by 180°.
pub fn direction(direction: u8) -> Vec<u8> {
    Line::new(Keyword::Direction).field(direction).finish()
}

/// # Stop Offset (OFFSET m)
///
/// Extra feed after each label, used with peelers and cutters.
pub fn offset(value: f32, unit: Unit) -> Vec<u8> {
    Line::new(Keyword::Offset).field(measure(value, unit)).finish()
}

/// # Position Shift (SHIFT [x,]y)
///
/// Fine vertical (and optionally horizontal) adjustment, in dots. The `x`
/// field is only written when set.
///
/// ```
/// use tspl::protocol::commands;
///
/// assert_eq!(commands::shift(None, 0), b"SHIFT 0");
/// assert_eq!(commands::shift(Some(-4), 12), b"SHIFT -4,12");
/// ```
pub fn shift(x: Option<i32>, y: i32) -> Vec<u8> {
    let line = Line::new(Keyword::Shift);
    match x {
        Some(x) => line.field(x).field(y).finish(),
        None => line.field(y).finish(),
    }
}

// ============================================================================
// CONTENT DIRECTIVES
// ============================================================================

/// # Raster Image (BITMAP x,y,width,height,mode,data)
///
/// ## Parameters
///
/// - `x`, `y`: upper left corner, in dots
/// - `width_bytes`: bytes per row (`ceil(width_dots / 8)`)
/// - `height`: rows
/// - `mode`: overwrite, OR or XOR
/// - `data`: `width_bytes * height` raw bytes, bit 0 = black
///
/// Data of the wrong length is truncated, or padded with white, to
/// `width_bytes * height` bytes so the line never swallows or leaks
/// following directives.
///
/// ## Example
///
/// ```
/// use tspl::protocol::commands::{self, BitmapMode};
///
/// let line = commands::bitmap(0, 0, 1, 2, BitmapMode::Overwrite, &[0x00, 0xFF]);
/// assert_eq!(line, b"BITMAP 0,0,1,2,0,\x00\xFF");
/// ```
pub fn bitmap(
    x: u32,
    y: u32,
    width_bytes: u32,
    height: u32,
    mode: BitmapMode,
    data: &[u8],
) -> Vec<u8> {
    let expected = width_bytes as usize * height as usize;

    let line = Line::new(Keyword::Bitmap)
        .field(x)
        .field(y)
        .field(width_bytes)
        .field(height)
        .field(mode as u8);

    // The printer reads exactly `expected` bytes; anything else would shift
    // the following directives into the raster.
    if data.len() == expected {
        line.raw(data).finish()
    } else {
        warn!(
            "bitmap data is {} bytes, expected {} ({} bytes x {} rows); fitting",
            data.len(),
            expected,
            width_bytes,
            height
        );
        let mut fitted = data[..data.len().min(expected)].to_vec();
        fitted.resize(expected, WHITE);
        line.raw(&fitted).finish()
    }
}

/// # Text (TEXT x,y,"font",rotation,xm,ym[,alignment],"content")
///
/// The alignment field is inserted right before the content, and only when
/// set.
///
/// ```
/// use tspl::protocol::{commands, text::{Alignment, Text}};
///
/// let text = Text::new(10, 10, "Hi");
/// assert_eq!(commands::text(&text), br#"TEXT 10,10,"3",0,1,1,"Hi""#);
///
/// let centered = text.align(Alignment::Center);
/// assert_eq!(commands::text(&centered), br#"TEXT 10,10,"3",0,1,1,2,"Hi""#);
/// ```
pub fn text(text: &Text) -> Vec<u8> {
    let line = Line::new(Keyword::Text)
        .field(text.x)
        .field(text.y)
        .field(quote(&text.font))
        .field(text.rotation.degrees())
        .field(text.x_mul)
        .field(text.y_mul);

    let line = match text.alignment {
        Some(alignment) => line.field(alignment as u8),
        None => line,
    };

    line.field(quote(&text.content)).finish()
}

// ============================================================================
// ACTION DIRECTIVES
// ============================================================================

/// # Print (PRINT m[,n])
///
/// - `sets`: number of label sets
/// - `copies`: copies of each label, written only when set
pub fn print(sets: u32, copies: Option<u32>) -> Vec<u8> {
    let line = Line::new(Keyword::Print).field(sets);
    match copies {
        Some(copies) => line.field(copies).finish(),
        None => line.finish(),
    }
}

/// Clear the image buffer (CLS).
#[inline]
pub fn cls() -> Vec<u8> {
    Line::new(Keyword::Cls).finish()
}

/// End of program (EOP).
#[inline]
pub fn eop() -> Vec<u8> {
    Line::new(Keyword::Eop).finish()
}

/// Feed to the next label origin (HOME).
#[inline]
pub fn home() -> Vec<u8> {
    Line::new(Keyword::Home).finish()
}

/// Sound the buzzer (BEEP).
#[inline]
pub fn beep() -> Vec<u8> {
    Line::new(Keyword::Beep).finish()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::text::{Alignment, Rotation};

    #[test]
    fn test_keyword_spelling() {
        let spelled: Vec<&str> = Keyword::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            spelled,
            vec![
                "SIZE",
                "GAP",
                "REFERENCE",
                "DIRECTION",
                "OFFSET",
                "SHIFT",
                "BITMAP",
                "TEXT",
                "PRINT",
                "CLS",
                "EOP",
                "HOME",
                "BEEP"
            ]
        );
    }

    #[test]
    fn test_size_without_height() {
        assert_eq!(size(35.0, None, Unit::Inch), b"SIZE 35");
        assert_eq!(size(35.0, None, Unit::Dot), b"SIZE 35 dot");
    }

    #[test]
    fn test_size_with_height() {
        assert_eq!(size(35.0, Some(25.0), Unit::Inch), b"SIZE 35,25");
        assert_eq!(size(4.0, Some(2.5), Unit::Inch), b"SIZE 4,2.5");
        assert_eq!(
            size(100.0, Some(60.0), Unit::Millimeter),
            b"SIZE 100 mm,60 mm"
        );
    }

    #[test]
    fn test_gap() {
        assert_eq!(gap(5.0, 0.0, Unit::Inch), b"GAP 5,0");
        assert_eq!(gap(2.0, 0.5, Unit::Millimeter), b"GAP 2 mm,0.5 mm");
    }

    #[test]
    fn test_reference_and_direction() {
        assert_eq!(reference(0, 0), b"REFERENCE 0,0");
        assert_eq!(reference(12, 300), b"REFERENCE 12,300");
        assert_eq!(direction(1), b"DIRECTION 1");
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(0.0, Unit::Inch), b"OFFSET 0");
        assert_eq!(offset(-1.5, Unit::Millimeter), b"OFFSET -1.5 mm");
    }

    #[test]
    fn test_shift() {
        assert_eq!(shift(None, 0), b"SHIFT 0");
        assert_eq!(shift(None, -20), b"SHIFT -20");
        assert_eq!(shift(Some(8), 3), b"SHIFT 8,3");
    }

    #[test]
    fn test_bitmap_header_and_data() {
        let data = [0x00u8; 8];
        let line = bitmap(0, 0, 1, 8, BitmapMode::Overwrite, &data);
        let header = b"BITMAP 0,0,1,8,0,";
        assert_eq!(&line[..header.len()], header);
        assert_eq!(&line[header.len()..], &data);
    }

    #[test]
    fn test_bitmap_data_may_contain_crlf() {
        let data = [b'\r', b'\n', b','];
        let line = bitmap(5, 6, 3, 1, BitmapMode::Xor, &data);
        assert_eq!(line, b"BITMAP 5,6,3,1,2,\r\n,");
    }

    #[test]
    fn test_bitmap_data_is_fitted_to_header() {
        let short = bitmap(0, 0, 2, 2, BitmapMode::Overwrite, &[0x00, 0x00, 0x00]);
        assert_eq!(short, b"BITMAP 0,0,2,2,0,\x00\x00\x00\xFF");

        let long = bitmap(0, 0, 1, 1, BitmapMode::Overwrite, &[0x0F, b'\r', b'\n']);
        assert_eq!(long, b"BITMAP 0,0,1,1,0,\x0F");
    }

    #[test]
    fn test_text_content_cannot_split_line() {
        let t = Text::new(0, 0, "A\r\nBEEP").font("3\n");
        let line = text(&t);
        assert!(!line.contains(&b'\r') && !line.contains(&b'\n'));
        assert_eq!(line, br#"TEXT 0,0,"3 ",0,1,1,"A  BEEP""#);
    }

    #[test]
    fn test_text_alignment_presence() {
        let plain = Text::new(100, 50, "Label")
            .font("4")
            .rotation(Rotation::Cw90)
            .scale(2, 3);
        assert_eq!(text(&plain), br#"TEXT 100,50,"4",90,2,3,"Label""#);

        let aligned = plain.clone().align(Alignment::Right);
        assert_eq!(text(&aligned), br#"TEXT 100,50,"4",90,2,3,3,"Label""#);
    }

    #[test]
    fn test_text_escapes_quotes() {
        let t = Text::new(0, 0, "6\" wide");
        assert_eq!(text(&t), br#"TEXT 0,0,"3",0,1,1,"6\["] wide""#);
    }

    #[test]
    fn test_print() {
        assert_eq!(print(1, None), b"PRINT 1");
        assert_eq!(print(3, Some(2)), b"PRINT 3,2");
    }

    #[test]
    fn test_single_keyword_directives() {
        assert_eq!(cls(), b"CLS");
        assert_eq!(eop(), b"EOP");
        assert_eq!(home(), b"HOME");
        assert_eq!(beep(), b"BEEP");
    }
}
