//! # Printer Transport Layer
//!
//! Backends that carry serialized jobs to a printer.
//!
//! ## Contract
//!
//! A [`Connector`] receives exactly one [`write`](Connector::write) per job
//! and one [`finalize`](Connector::finalize) when the session ends. Writes
//! after `finalize` fail.
//!
//! ## Available Transports
//!
//! | Transport | Target | Notes |
//! |-----------|--------|-------|
//! | [`MemoryConnector`] | `Vec` of writes | tests, dry runs |
//! | [`FileConnector`] | device node or file | `/dev/usb/lp0`, chunked writes |
//! | [`NetworkConnector`] | TCP | raw port 9100 |

pub mod file;
pub mod memory;
pub mod network;

pub use file::FileConnector;
pub use memory::MemoryConnector;
pub use network::NetworkConnector;

use crate::error::TsplError;

/// Sink for serialized print jobs.
pub trait Connector {
    /// Send one complete job.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TsplError>;

    /// Flush and release the connection.
    fn finalize(&mut self) -> Result<(), TsplError>;
}

impl<C: Connector + ?Sized> Connector for Box<C> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TsplError> {
        (**self).write(bytes)
    }

    fn finalize(&mut self) -> Result<(), TsplError> {
        (**self).finalize()
    }
}

impl<C: Connector + ?Sized> Connector for &mut C {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TsplError> {
        (**self).write(bytes)
    }

    fn finalize(&mut self) -> Result<(), TsplError> {
        (**self).finalize()
    }
}

fn closed(name: &str) -> TsplError {
    TsplError::Transport(format!("{} connector already finalized", name))
}
