//! # Directives
//!
//! A [`Directive`] is one TSPL line in typed form. Optional fields are
//! `Option`s, so whether a clause appears on the wire is decided by the
//! `match` in [`Directive::render`] and nowhere else.

use crate::protocol::commands::{self, BitmapMode, Keyword};
use crate::protocol::text::Text;
use crate::protocol::units::{Unit, resolve};

/// One TSPL directive.
///
/// Unit-bearing variants keep their explicit unit (if any). The session
/// default is applied by [`Directive::render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    // ========== Setup ==========
    /// Label size. Height clause omitted when `height` is `None`.
    Size {
        width: f32,
        height: Option<f32>,
        unit: Option<Unit>,
    },

    /// Gap between labels and its offset.
    Gap {
        distance: f32,
        offset: f32,
        unit: Option<Unit>,
    },

    /// Origin of the label coordinate system, in dots.
    Reference { x: u32, y: u32 },

    /// Print direction (0 or 1).
    Direction(u8),

    /// Extra feed after printing.
    Offset { value: f32, unit: Option<Unit> },

    /// Position adjustment in dots. `x` written only when set.
    Shift { x: Option<i32>, y: i32 },

    // ========== Content ==========
    /// Packed raster image (bit 0 = black).
    ///
    /// `data` should hold `width_bytes * height` bytes; other lengths are
    /// truncated or padded with white when rendered. [`Job::image`](crate::job::Job::image)
    /// always builds it from a [`RasterImage`](crate::raster::RasterImage),
    /// which upholds this.
    Bitmap {
        x: u32,
        y: u32,
        width_bytes: u32,
        height: u32,
        mode: BitmapMode,
        data: Vec<u8>,
    },

    /// Text line.
    Text(Text),

    // ========== Actions ==========
    /// Print the image buffer. `copies` written only when set.
    Print { sets: u32, copies: Option<u32> },

    /// Clear the image buffer.
    Cls,

    /// End of program.
    Eop,

    /// Feed to the next label.
    Home,

    /// Sound the buzzer.
    Beep,
}

impl Directive {
    pub fn keyword(&self) -> Keyword {
        match self {
            Directive::Size { .. } => Keyword::Size,
            Directive::Gap { .. } => Keyword::Gap,
            Directive::Reference { .. } => Keyword::Reference,
            Directive::Direction(_) => Keyword::Direction,
            Directive::Offset { .. } => Keyword::Offset,
            Directive::Shift { .. } => Keyword::Shift,
            Directive::Bitmap { .. } => Keyword::Bitmap,
            Directive::Text(_) => Keyword::Text,
            Directive::Print { .. } => Keyword::Print,
            Directive::Cls => Keyword::Cls,
            Directive::Eop => Keyword::Eop,
            Directive::Home => Keyword::Home,
            Directive::Beep => Keyword::Beep,
        }
    }

    /// Render to one line (no terminator), resolving units against
    /// `default_unit`.
    pub fn render(&self, default_unit: Option<Unit>) -> Vec<u8> {
        match self {
            Directive::Size {
                width,
                height,
                unit,
            } => commands::size(*width, *height, resolve(*unit, default_unit)),
            Directive::Gap {
                distance,
                offset,
                unit,
            } => commands::gap(*distance, *offset, resolve(*unit, default_unit)),
            Directive::Reference { x, y } => commands::reference(*x, *y),
            Directive::Direction(direction) => commands::direction(*direction),
            Directive::Offset { value, unit } => {
                commands::offset(*value, resolve(*unit, default_unit))
            }
            Directive::Shift { x, y } => commands::shift(*x, *y),
            Directive::Bitmap {
                x,
                y,
                width_bytes,
                height,
                mode,
                data,
            } => commands::bitmap(*x, *y, *width_bytes, *height, *mode, data),
            Directive::Text(text) => commands::text(text),
            Directive::Print { sets, copies } => commands::print(*sets, *copies),
            Directive::Cls => commands::cls(),
            Directive::Eop => commands::eop(),
            Directive::Home => commands::home(),
            Directive::Beep => commands::beep(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_resolved_at_render_time() {
        let size = Directive::Size {
            width: 50.0,
            height: Some(30.0),
            unit: None,
        };
        assert_eq!(size.render(None), b"SIZE 50,30");
        assert_eq!(size.render(Some(Unit::Millimeter)), b"SIZE 50 mm,30 mm");
    }

    #[test]
    fn test_explicit_unit_beats_default() {
        let gap = Directive::Gap {
            distance: 16.0,
            offset: 0.0,
            unit: Some(Unit::Dot),
        };
        assert_eq!(gap.render(Some(Unit::Millimeter)), b"GAP 16 dot,0 dot");

        let offset = Directive::Offset {
            value: 1.0,
            unit: Some(Unit::Inch),
        };
        assert_eq!(offset.render(Some(Unit::Dot)), b"OFFSET 1");
    }

    #[test]
    fn test_unitless_directives_ignore_default() {
        let shift = Directive::Shift { x: None, y: 4 };
        assert_eq!(shift.render(Some(Unit::Millimeter)), b"SHIFT 4");
        assert_eq!(
            Directive::Reference { x: 1, y: 2 }.render(Some(Unit::Dot)),
            b"REFERENCE 1,2"
        );
    }

    #[test]
    fn test_mismatched_bitmap_renders_without_panic() {
        let bitmap = Directive::Bitmap {
            x: 0,
            y: 0,
            width_bytes: 1,
            height: 2,
            mode: BitmapMode::Overwrite,
            data: vec![0x00],
        };
        assert_eq!(bitmap.render(None), b"BITMAP 0,0,1,2,0,\x00\xFF");
    }

    #[test]
    fn test_keyword_matches_rendered_prefix() {
        let directives = [
            Directive::Size {
                width: 1.0,
                height: None,
                unit: None,
            },
            Directive::Direction(0),
            Directive::Print {
                sets: 1,
                copies: None,
            },
            Directive::Text(Text::new(0, 0, "x")),
            Directive::Home,
            Directive::Beep,
        ];
        for directive in &directives {
            let line = directive.render(None);
            assert!(line.starts_with(directive.keyword().as_str().as_bytes()));
        }
    }
}
