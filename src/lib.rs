//! # tspl - Label Printer Library
//!
//! tspl drives thermal label printers that speak TSPL. It provides:
//!
//! - **Raster pipeline**: image decoding, alpha flattening and 1-bit packing
//! - **Protocol implementation**: one builder per TSPL directive
//! - **Jobs**: the fixed directive order every print action uses
//! - **Transport**: memory, file/device and TCP connectors
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use tspl::{
//!     printer::{LabelSetup, Printer},
//!     protocol::units::Unit,
//!     raster::{Binarizer, ImageSource},
//!     transport::NetworkConnector,
//! };
//!
//! // 50 × 30 mm labels with a 2 mm gap
//! let setup = LabelSetup::default()
//!     .with_size(50.0, Some(30.0), None)
//!     .with_gap(2.0, 0.0, None)
//!     .with_default_unit(Some(Unit::Millimeter));
//!
//! // Convert an image to a 1-bit bitmap 400 dots wide
//! let image = Binarizer::new()
//!     .target_width(400)
//!     .binarize(ImageSource::Path(Path::new("logo.png")))?;
//!
//! // Send it
//! let mut printer = Printer::new(NetworkConnector::connect("192.168.1.50")?, setup);
//! printer.print_image(&image, 0, 0)?;
//! printer.close()?;
//!
//! # Ok::<(), tspl::TsplError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`raster`] | Binarizer and bitmap packer |
//! | [`protocol`] | TSPL directive builders and units |
//! | [`job`] | Directive sequencing and serialization |
//! | [`printer`] | Label setup and print session |
//! | [`transport`] | Connectors |
//! | [`error`] | Error types |

pub mod error;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod raster;
pub mod transport;

// Re-exports for convenience
pub use error::TsplError;
pub use job::{Directive, Job};
pub use printer::{LabelSetup, Printer};
pub use raster::{Binarizer, ImageSource, RasterImage};
pub use transport::Connector;
