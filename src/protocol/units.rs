//! # Measurement Units
//!
//! TSPL measurements default to inches. Millimeters and dots are selected by
//! a suffix after the number:
//!
//! | Unit | Suffix | Example |
//! |------|--------|---------|
//! | Inch | *(none)* | `SIZE 4,2.5` |
//! | Millimeter | ` mm` | `SIZE 100 mm,60 mm` |
//! | Dot | ` dot` | `SIZE 800 dot,480 dot` |
//!
//! ## Resolution Order
//!
//! For every unit-bearing field, the unit actually rendered is:
//!
//! 1. the unit given with that field, else
//! 2. the session default unit, else
//! 3. inches (empty suffix).
//!
//! Resolution happens when a directive is rendered, not when it is
//! configured.

use serde::{Deserialize, Serialize};

/// A TSPL measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Inch,
    Millimeter,
    Dot,
}

impl Unit {
    /// Text appended to a number in this unit.
    pub const fn suffix(self) -> &'static str {
        match self {
            Unit::Inch => "",
            Unit::Millimeter => " mm",
            Unit::Dot => " dot",
        }
    }
}

/// Pick the unit for a field: explicit, then session default, then inches.
///
/// ```
/// use tspl::protocol::units::{resolve, Unit};
///
/// assert_eq!(resolve(Some(Unit::Dot), Some(Unit::Millimeter)), Unit::Dot);
/// assert_eq!(resolve(None, Some(Unit::Millimeter)), Unit::Millimeter);
/// assert_eq!(resolve(None, None), Unit::Inch);
/// ```
#[inline]
pub fn resolve(explicit: Option<Unit>, session_default: Option<Unit>) -> Unit {
    explicit.or(session_default).unwrap_or_default()
}

/// Format a measurement with its unit suffix.
///
/// Whole numbers print without a fractional part (`35`, not `35.0`).
pub fn measure(value: f32, unit: Unit) -> String {
    format!("{}{}", value, unit.suffix())
}
