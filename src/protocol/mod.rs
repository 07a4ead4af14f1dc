//! # TSPL Protocol Implementation
//!
//! This module provides line builders for TSPL, the text command language
//! spoken by most thermal label printers (TSC, Xprinter, Gprinter, ...).
//!
//! ## Module Structure
//!
//! - [`commands`]: Keyword table and one builder per directive
//! - [`units`]: Measurement units and their fallback rules
//! - [`text`]: Parameters of the `TEXT` directive
//!
//! ## Line Grammar
//!
//! Every directive is one line:
//!
//! ```text
//! KEYWORD<space><field>,<field>,...<CR><LF>
//! ```
//!
//! Keyword-only directives (`CLS`, `EOP`, `HOME`, `BEEP`) have no space and
//! no fields. The builders here never append the line terminator; that is
//! the job of [`crate::job::Job::to_bytes`].
//!
//! ## Usage Example
//!
//! ```
//! use tspl::protocol::{commands, units::Unit};
//!
//! assert_eq!(commands::size(50.0, Some(30.0), Unit::Millimeter), b"SIZE 50 mm,30 mm");
//! assert_eq!(commands::gap(2.0, 0.0, Unit::Inch), b"GAP 2,0");
//! assert_eq!(commands::cls(), b"CLS");
//! ```

pub mod commands;
pub mod text;
pub mod units;
