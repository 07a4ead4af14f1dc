//! # Printer Session
//!
//! A [`Printer`] pairs one [`LabelSetup`] with one [`Connector`]. Each print
//! action builds a [`Job`], serializes it and hands it to the connector in a
//! single write.
//!
//! ## Example
//!
//! ```
//! use tspl::printer::{LabelSetup, Printer};
//! use tspl::protocol::text::Text;
//! use tspl::transport::MemoryConnector;
//!
//! let mut printer = Printer::new(MemoryConnector::new(), LabelSetup::default());
//! printer.print_text(&Text::new(10, 10, "Hello"))?;
//! printer.beep()?;
//!
//! let conn = printer.close()?;
//! assert_eq!(conn.writes().len(), 2);
//! assert_eq!(conn.writes()[1], b"BEEP\r\n");
//! # Ok::<(), tspl::TsplError>(())
//! ```
//!
//! ## Modules
//!
//! - [`config`]: label geometry and print settings

pub mod config;

pub use config::{LabelSetup, Resolution};

use log::{debug, info};

use crate::error::TsplError;
use crate::job::Job;
use crate::protocol::commands::BitmapMode;
use crate::protocol::text::Text;
use crate::raster::RasterImage;
use crate::transport::Connector;

/// A print session over one connector.
///
/// The setup is owned by the session; jobs are always framed with the setup
/// current at the time of the call.
pub struct Printer<C: Connector> {
    connector: C,
    setup: LabelSetup,
}

impl<C: Connector> Printer<C> {
    pub fn new(connector: C, setup: LabelSetup) -> Self {
        Self { connector, setup }
    }

    pub fn setup(&self) -> &LabelSetup {
        &self.setup
    }

    /// Replace the setup for subsequent jobs.
    pub fn set_setup(&mut self, setup: LabelSetup) {
        self.setup = setup;
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Print a raster image at `(x, y)` dots, overwriting the buffer.
    pub fn print_image(&mut self, image: &RasterImage, x: u32, y: u32) -> Result<(), TsplError> {
        self.print_image_with_mode(image, x, y, BitmapMode::Overwrite)
    }

    pub fn print_image_with_mode(
        &mut self,
        image: &RasterImage,
        x: u32,
        y: u32,
        mode: BitmapMode,
    ) -> Result<(), TsplError> {
        debug!(
            "image job: {}x{} at ({}, {})",
            image.width(),
            image.height(),
            x,
            y
        );
        self.send(&Job::image(&self.setup, image, x, y, mode))
    }

    pub fn print_text(&mut self, text: &Text) -> Result<(), TsplError> {
        debug!("text job: {:?}", text.content);
        self.send(&Job::text(&self.setup, text))
    }

    pub fn beep(&mut self) -> Result<(), TsplError> {
        self.send(&Job::beep())
    }

    /// Feed to the start of the next label.
    pub fn home(&mut self) -> Result<(), TsplError> {
        self.send(&Job::home())
    }

    /// Send the setup's `OFFSET` on its own.
    pub fn apply_offset(&mut self) -> Result<(), TsplError> {
        self.send(&Job::offset(&self.setup))
    }

    /// Serialize `job` and write it in one call.
    pub fn send(&mut self, job: &Job) -> Result<(), TsplError> {
        let bytes = job.to_bytes();
        info!("sending job: {} directives, {} bytes", job.len(), bytes.len());
        self.connector.write(&bytes)
    }

    /// Finalize the connector and hand it back.
    pub fn close(mut self) -> Result<C, TsplError> {
        self.connector.finalize()?;
        Ok(self.connector)
    }
}
