//! # TSPL Text Parameters
//!
//! Types for the `TEXT` directive:
//!
//! ```text
//! TEXT x,y,"font",rotation,x-multiplication,y-multiplication,[alignment,]"content"
//! ```
//!
//! ## Fonts
//!
//! | Font | Size (dots) | Notes |
//! |------|-------------|-------|
//! | `"1"` | 8 × 12 | alphanumeric |
//! | `"2"` | 12 × 20 | |
//! | `"3"` | 16 × 24 | default |
//! | `"4"` | 24 × 32 | |
//! | `"5"` | 32 × 48 | uppercase only |
//! | `"0"` / `"ROMAN.TTF"` | scalable | multiplication is point size |
//!
//! ## Alignment
//!
//! The alignment field is optional. Printers that do not know it reject the
//! whole line, so it is only written when set.

use serde::{Deserialize, Serialize};

/// Text rotation, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "90")]
    Cw90,
    #[serde(rename = "180")]
    Cw180,
    #[serde(rename = "270")]
    Cw270,
}

impl Rotation {
    /// Degrees as written on the wire.
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }
}

/// Horizontal alignment of a `TEXT` block relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Default = 0,
    Left = 1,
    Center = 2,
    Right = 3,
}

/// Parameters of one `TEXT` directive.
///
/// ```
/// use tspl::protocol::text::{Alignment, Text};
///
/// let text = Text::new(10, 20, "Hello").font("4").scale(2, 2).align(Alignment::Center);
/// assert_eq!(text.alignment, Some(Alignment::Center));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub x: u32,
    pub y: u32,
    pub font: String,
    #[serde(default)]
    pub rotation: Rotation,
    pub x_mul: u32,
    pub y_mul: u32,
    #[serde(default)]
    pub alignment: Option<Alignment>,
    pub content: String,
}

impl Text {
    /// Text in font `"3"`, unrotated, 1× scale, no alignment field.
    pub fn new(x: u32, y: u32, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            font: "3".to_string(),
            rotation: Rotation::None,
            x_mul: 1,
            y_mul: 1,
            alignment: None,
            content: content.into(),
        }
    }

    pub fn font(self, font: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            ..self
        }
    }

    pub fn rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    pub fn scale(self, x_mul: u32, y_mul: u32) -> Self {
        Self {
            x_mul,
            y_mul,
            ..self
        }
    }

    pub fn align(self, alignment: Alignment) -> Self {
        Self {
            alignment: Some(alignment),
            ..self
        }
    }
}

/// Quote a string field. Embedded `"` is written as `\["]`; CR and LF
/// become spaces so the field stays on its directive's line.
pub fn quote(s: &str) -> String {
    let escaped = s.replace('"', "\\[\"]").replace(['\r', '\n'], " ");
    format!("\"{}\"", escaped)
}
