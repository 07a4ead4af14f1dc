//! # Label Setup
//!
//! The per-session label geometry that every print job is framed with.
//!
//! ## Defaults
//!
//! | Field | Default | Wire |
//! |-------|---------|------|
//! | size | 35 × 25 | `SIZE 35,25` |
//! | gap | 5, 0 | `GAP 5,0` |
//! | reference | 0, 0 | `REFERENCE 0,0` |
//! | direction | 1 | `DIRECTION 1` |
//! | shift | y 0, x unset | `SHIFT 0` |
//! | offset | unset | (no `OFFSET` line) |
//! | print | 1 set | `PRINT 1` |
//! | default unit | unset | inches (no suffix) |
//!
//! ## Usage
//!
//! ```
//! use tspl::printer::LabelSetup;
//! use tspl::protocol::units::Unit;
//!
//! let setup = LabelSetup::default()
//!     .with_size(50.0, Some(30.0), None)
//!     .with_gap(2.0, 0.0, None)
//!     .with_default_unit(Some(Unit::Millimeter));
//!
//! assert_eq!(setup.size.width, 50.0);
//! ```
//!
//! ## JSON
//!
//! Every field is optional in JSON; missing fields take their defaults.
//!
//! ```json
//! {
//!   "size": { "width": 50, "height": 30 },
//!   "gap": { "distance": 2, "offset": 0 },
//!   "default_unit": "millimeter"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TsplError;
use crate::protocol::units::Unit;

// ============================================================================
// SETUP PARTS
// ============================================================================

/// Label width and optional height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// Gap (or black mark) distance between labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub distance: f32,
    pub offset: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// Origin of the label coordinate system, in dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reference {
    pub x: u32,
    pub y: u32,
}

/// Fine position adjustment in dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Shift {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: i32,
}

/// Extra feed after printing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub value: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// `PRINT` quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintQuantity {
    pub sets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copies: Option<u32>,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 35.0,
            height: Some(25.0),
            unit: None,
        }
    }
}

impl Default for Gap {
    fn default() -> Self {
        Self {
            distance: 5.0,
            offset: 0.0,
            unit: None,
        }
    }
}

impl Default for PrintQuantity {
    fn default() -> Self {
        Self {
            sets: 1,
            copies: None,
        }
    }
}

// ============================================================================
// LABEL SETUP
// ============================================================================

/// Label geometry and print settings for one session.
///
/// Values are passed through to the printer as given; nothing is
/// range-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSetup {
    pub size: Size,
    pub gap: Gap,
    pub reference: Reference,
    pub direction: u8,
    pub shift: Shift,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    pub print: PrintQuantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_unit: Option<Unit>,
}

impl Default for LabelSetup {
    fn default() -> Self {
        Self {
            size: Size::default(),
            gap: Gap::default(),
            reference: Reference::default(),
            direction: 1,
            shift: Shift::default(),
            offset: None,
            print: PrintQuantity::default(),
            default_unit: None,
        }
    }
}

impl LabelSetup {
    pub fn with_size(self, width: f32, height: Option<f32>, unit: Option<Unit>) -> Self {
        Self {
            size: Size {
                width,
                height,
                unit,
            },
            ..self
        }
    }

    pub fn with_gap(self, distance: f32, offset: f32, unit: Option<Unit>) -> Self {
        Self {
            gap: Gap {
                distance,
                offset,
                unit,
            },
            ..self
        }
    }

    pub fn with_reference(self, x: u32, y: u32) -> Self {
        Self {
            reference: Reference { x, y },
            ..self
        }
    }

    pub fn with_direction(self, direction: u8) -> Self {
        Self { direction, ..self }
    }

    pub fn with_shift(self, x: Option<i32>, y: i32) -> Self {
        Self {
            shift: Shift { x, y },
            ..self
        }
    }

    pub fn with_offset(self, value: f32, unit: Option<Unit>) -> Self {
        Self {
            offset: Some(Offset { value, unit }),
            ..self
        }
    }

    /// Label sets per job, and copies of each label when `copies` is set.
    pub fn with_copies(self, sets: u32, copies: Option<u32>) -> Self {
        Self {
            print: PrintQuantity { sets, copies },
            ..self
        }
    }

    /// Unit applied to measurements that carry no unit of their own.
    pub fn with_default_unit(self, default_unit: Option<Unit>) -> Self {
        Self {
            default_unit,
            ..self
        }
    }

    /// Parse a setup from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TsplError> {
        serde_json::from_str(json).map_err(|e| TsplError::Setup(e.to_string()))
    }

    /// Load a setup from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TsplError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| TsplError::Setup(format!("{}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> Result<String, TsplError> {
        serde_json::to_string_pretty(self).map_err(|e| TsplError::Setup(e.to_string()))
    }

    /// Label width in dots at `resolution`. Useful as a binarizer target
    /// width.
    pub fn width_dots(&self, resolution: Resolution) -> u32 {
        let unit = crate::protocol::units::resolve(self.size.unit, self.default_unit);
        match unit {
            Unit::Dot => self.size.width.max(0.0).round() as u32,
            Unit::Millimeter => resolution.mm_to_dots(self.size.width),
            Unit::Inch => resolution.mm_to_dots(self.size.width * 25.4),
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Print head resolution.
///
/// ```text
/// dots_per_mm = dpi / 25.4
///
///   203 dpi ≈ 8 dots/mm
///   300 dpi ≈ 12 dots/mm
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "203")]
    Dpi203,
    #[serde(rename = "300")]
    Dpi300,
}

impl Resolution {
    pub const fn dpi(self) -> u16 {
        match self {
            Resolution::Dpi203 => 203,
            Resolution::Dpi300 => 300,
        }
    }

    #[inline]
    pub fn dots_per_mm(self) -> f32 {
        self.dpi() as f32 / 25.4
    }

    #[inline]
    pub fn mm_to_dots(self, mm: f32) -> u32 {
        (mm * self.dots_per_mm()).max(0.0).round() as u32
    }
}
