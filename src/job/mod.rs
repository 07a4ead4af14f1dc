//! # Print Jobs
//!
//! A [`Job`] is the ordered list of directives sent for one print action.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────┐     ┌───────────┐
//! │ LabelSetup  │ ──► │       Job        │ ──► │  to_bytes()  │ ──► │ Connector │
//! │ + content   │     │ (Vec<Directive>) │     │ CRLF framing │     │  write()  │
//! └─────────────┘     └──────────────────┘     └──────────────┘     └───────────┘
//! ```
//!
//! ## Canonical Order
//!
//! Every print job uses the same template:
//!
//! ```text
//! SIZE, GAP, REFERENCE, DIRECTION, SHIFT, CLS, <BITMAP | TEXT>, PRINT, EOP
//! ```
//!
//! Some firmware keeps state between directives, so this order is fixed.
//!
//! ## Example
//!
//! ```
//! use tspl::job::Job;
//! use tspl::printer::LabelSetup;
//! use tspl::protocol::text::Text;
//!
//! let job = Job::text(&LabelSetup::default(), &Text::new(10, 10, "Hello"));
//!
//! // Inspect the job
//! println!("{:#?}", job);
//!
//! let bytes = job.to_bytes();
//! assert!(bytes.starts_with(b"SIZE 35,25\r\nGAP 5,0\r\n"));
//! assert!(bytes.ends_with(b"PRINT 1\r\nEOP\r\n"));
//! ```

mod directive;
mod sequence;

pub use directive::Directive;

use crate::protocol::commands::{CRLF, Keyword};
use crate::protocol::units::Unit;

/// An ordered directive sequence plus the session default unit used to
/// render it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Job {
    directives: Vec<Directive>,
    default_unit: Option<Unit>,
}

impl Job {
    /// Create an empty job with no default unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty job whose unit-bearing directives fall back to
    /// `default_unit`.
    pub fn with_default_unit(default_unit: Option<Unit>) -> Self {
        Self {
            directives: Vec::new(),
            default_unit,
        }
    }

    /// Change the fallback unit. Affects every directive rendered afterwards.
    pub fn set_default_unit(&mut self, default_unit: Option<Unit>) {
        self.default_unit = default_unit;
    }

    pub fn default_unit(&self) -> Option<Unit> {
        self.default_unit
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn extend(&mut self, directives: impl IntoIterator<Item = Directive>) {
        self.directives.extend(directives);
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    /// Keywords in job order.
    pub fn keywords(&self) -> Vec<Keyword> {
        self.directives.iter().map(Directive::keyword).collect()
    }

    /// Serialize: one line per directive, each terminated by CRLF.
    ///
    /// Equivalent to joining the lines with CRLF and appending one trailing
    /// CRLF. An empty job serializes to nothing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for directive in &self.directives {
            out.extend(directive.render(self.default_unit));
            out.extend_from_slice(CRLF);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Job {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_job() {
        let job = Job::new();
        assert!(job.is_empty());
        assert!(job.to_bytes().is_empty());
    }

    #[test]
    fn test_crlf_framing() {
        let mut job = Job::new();
        job.push(Directive::Cls);
        job.push(Directive::Print {
            sets: 1,
            copies: None,
        });
        job.push(Directive::Eop);
        assert_eq!(job.to_bytes(), b"CLS\r\nPRINT 1\r\nEOP\r\n");
    }

    #[test]
    fn test_default_unit_change_applies_to_pending_directives() {
        let mut job = Job::new();
        job.push(Directive::Size {
            width: 40.0,
            height: None,
            unit: None,
        });
        assert_eq!(job.to_bytes(), b"SIZE 40\r\n");

        job.set_default_unit(Some(Unit::Millimeter));
        assert_eq!(job.to_bytes(), b"SIZE 40 mm\r\n");
    }

    #[test]
    fn test_keywords() {
        let mut job = Job::new();
        job.extend([Directive::Home, Directive::Beep]);
        assert_eq!(job.keywords(), vec![Keyword::Home, Keyword::Beep]);
        assert_eq!(job.len(), 2);
        assert_eq!(job.iter().count(), 2);
    }
}
