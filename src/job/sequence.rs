//! Canonical job templates.

use super::{Directive, Job};
use crate::printer::LabelSetup;
use crate::protocol::commands::BitmapMode;
use crate::protocol::text::Text;
use crate::raster::RasterImage;

impl Job {
    /// Print a raster image at `(x, y)` in dots.
    ///
    /// ```text
    /// SIZE, GAP, REFERENCE, DIRECTION, SHIFT, CLS, BITMAP, PRINT, EOP
    /// ```
    pub fn image(setup: &LabelSetup, image: &RasterImage, x: u32, y: u32, mode: BitmapMode) -> Self {
        let bitmap = Directive::Bitmap {
            x,
            y,
            width_bytes: image.width_bytes(),
            height: image.height(),
            mode,
            data: image.data().to_vec(),
        };
        Self::framed(setup, bitmap)
    }

    /// Print one line of text.
    ///
    /// ```text
    /// SIZE, GAP, REFERENCE, DIRECTION, SHIFT, CLS, TEXT, PRINT, EOP
    /// ```
    pub fn text(setup: &LabelSetup, text: &Text) -> Self {
        Self::framed(setup, Directive::Text(text.clone()))
    }

    /// Sound the buzzer. Nothing else is sent.
    pub fn beep() -> Self {
        Self::single(Directive::Beep)
    }

    /// Feed to the start of the next label.
    pub fn home() -> Self {
        Self::single(Directive::Home)
    }

    /// Apply the setup's post-print offset (0 when unset).
    pub fn offset(setup: &LabelSetup) -> Self {
        let (value, unit) = match setup.offset {
            Some(offset) => (offset.value, offset.unit),
            None => (0.0, None),
        };
        let mut job = Self::with_default_unit(setup.default_unit);
        job.push(Directive::Offset { value, unit });
        job
    }

    fn single(directive: Directive) -> Self {
        let mut job = Self::new();
        job.push(directive);
        job
    }

    fn framed(setup: &LabelSetup, action: Directive) -> Self {
        let mut job = Self::with_default_unit(setup.default_unit);
        job.extend([
            Directive::Size {
                width: setup.size.width,
                height: setup.size.height,
                unit: setup.size.unit,
            },
            Directive::Gap {
                distance: setup.gap.distance,
                offset: setup.gap.offset,
                unit: setup.gap.unit,
            },
            Directive::Reference {
                x: setup.reference.x,
                y: setup.reference.y,
            },
            Directive::Direction(setup.direction),
            Directive::Shift {
                x: setup.shift.x,
                y: setup.shift.y,
            },
            Directive::Cls,
            action,
            Directive::Print {
                sets: setup.print.sets,
                copies: setup.print.copies,
            },
            Directive::Eop,
        ]);
        job
    }
}
