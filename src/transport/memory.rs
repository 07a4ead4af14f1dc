//! In-memory connector that records every write.

use super::{Connector, closed};
use crate::error::TsplError;

/// Collects jobs instead of sending them.
///
/// ```
/// use tspl::transport::{Connector, MemoryConnector};
///
/// let mut conn = MemoryConnector::new();
/// conn.write(b"BEEP\r\n")?;
/// conn.finalize()?;
///
/// assert_eq!(conn.writes().len(), 1);
/// assert!(conn.is_finalized());
/// # Ok::<(), tspl::TsplError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryConnector {
    writes: Vec<Vec<u8>>,
    finalized: bool,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each write as received, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All writes concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl Connector for MemoryConnector {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TsplError> {
        if self.finalized {
            return Err(closed("memory"));
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), TsplError> {
        self.finalized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_writes_separately() {
        let mut conn = MemoryConnector::new();
        conn.write(b"A\r\n").unwrap();
        conn.write(b"B\r\n").unwrap();
        assert_eq!(conn.writes(), &[b"A\r\n".to_vec(), b"B\r\n".to_vec()]);
        assert_eq!(conn.bytes(), b"A\r\nB\r\n");
    }

    #[test]
    fn test_write_after_finalize_fails() {
        let mut conn = MemoryConnector::new();
        conn.finalize().unwrap();
        let err = conn.write(b"BEEP\r\n").unwrap_err();
        assert!(matches!(err, TsplError::Transport(_)));
        assert!(conn.writes().is_empty());
    }

    #[test]
    fn test_boxed_connector() {
        let mut conn: Box<dyn Connector> = Box::new(MemoryConnector::new());
        conn.write(b"HOME\r\n").unwrap();
        conn.finalize().unwrap();
        assert!(conn.write(b"HOME\r\n").is_err());
    }
}
