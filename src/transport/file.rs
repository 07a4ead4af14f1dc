//! # File and Device Transport
//!
//! Writes jobs to a path: a USB printer node such as `/dev/usb/lp0`, a
//! serial device, or a plain file for capture.
//!
//! ## Chunked Writes
//!
//! Large jobs (big bitmaps) are written in chunks. A delay between chunks
//! can be set for slow serial links; it is off by default. Each job is
//! flushed before `write` returns.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use super::{Connector, closed};
use crate::error::TsplError;

/// Default USB printer device path
pub const DEFAULT_DEVICE: &str = "/dev/usb/lp0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks. USB lp nodes and files apply backpressure
/// through blocking writes, so no delay by default.
const CHUNK_DELAY: Duration = Duration::ZERO;

/// # File Connector
///
/// ```no_run
/// use tspl::transport::{Connector, FileConnector};
/// use tspl::Job;
///
/// let mut conn = FileConnector::open("/dev/usb/lp0")?;
/// conn.write(&Job::beep().to_bytes())?;
/// conn.finalize()?;
/// # Ok::<(), tspl::TsplError>(())
/// ```
pub struct FileConnector {
    path: PathBuf,
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl FileConnector {
    /// Open an existing device node or file for writing.
    ///
    /// Device nodes must already exist; use [`create`](Self::create) for
    /// capture files.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TsplError> {
        let path = path.as_ref();
        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            TsplError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self::from_file(path, file))
    }

    /// Create (or truncate) a plain file that receives every job.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, TsplError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            TsplError::Transport(format!("Failed to create {}: {}", path.display(), e))
        })?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: &Path, file: File) -> Self {
        info!("opened {}", path.display());
        Self {
            path: path.to_path_buf(),
            file: Some(file),
            chunk_size: CHUNK_SIZE,
            chunk_delay: CHUNK_DELAY,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks, for serial adapters with small
    /// buffers. Default is none.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }
}

impl Connector for FileConnector {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TsplError> {
        let file = self.file.as_mut().ok_or_else(|| closed("file"))?;

        if bytes.len() <= self.chunk_size {
            file.write_all(bytes)?;
        } else {
            let chunks = bytes.len().div_ceil(self.chunk_size);
            debug!("writing {} bytes in {} chunks", bytes.len(), chunks);
            for chunk in bytes.chunks(self.chunk_size) {
                file.write_all(chunk)?;
                if !self.chunk_delay.is_zero() {
                    thread::sleep(self.chunk_delay);
                }
            }
        }

        file.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), TsplError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            info!("closed {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConnector::open(dir.path().join("lp9")).err().unwrap();
        assert!(matches!(err, TsplError::Transport(_)));
    }

    #[test]
    fn test_no_chunk_delay_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let conn = FileConnector::create(dir.path().join("out.prn")).unwrap();
        assert_eq!(conn.chunk_size, 4096);
        assert!(conn.chunk_delay.is_zero());
    }

    #[test]
    fn test_chunked_write_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.prn");

        let mut conn = FileConnector::create(&path).unwrap();
        conn.set_chunk_size(3);
        conn.set_chunk_delay(Duration::ZERO);

        let payload: Vec<u8> = (0..=255).collect();
        conn.write(&payload).unwrap();
        conn.write(b"EOP\r\n").unwrap();
        conn.finalize().unwrap();

        let mut expected = payload.clone();
        expected.extend_from_slice(b"EOP\r\n");
        assert_eq!(std::fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn test_write_after_finalize_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = FileConnector::create(dir.path().join("out.prn")).unwrap();
        conn.finalize().unwrap();
        assert!(matches!(
            conn.write(b"BEEP\r\n"),
            Err(TsplError::Transport(_))
        ));
        // Finalizing twice is harmless.
        conn.finalize().unwrap();
    }
}
