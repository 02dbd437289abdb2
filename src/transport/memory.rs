//! # Memory Transport
//!
//! Keeps every write in memory instead of printing it. Used to preview a
//! job's bytes and to test sessions without hardware. Failures can be
//! scripted to exercise error paths.
//!
//! ```
//! use recibo::transport::{MemoryTransport, Transport};
//!
//! let mut printer = MemoryTransport::new();
//! printer.write_raw(b"HELLO\n")?;
//! assert_eq!(printer.bytes(), b"HELLO\n");
//!
//! printer.fail_next_write("paper out");
//! assert!(printer.write_raw(b"again").is_err());
//! assert_eq!(printer.write_count(), 1);
//! # Ok::<(), recibo::error::TransportError>(())
//! ```

use tracing::debug;

use super::Transport;
use crate::error::TransportError;

#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    writes: Vec<Vec<u8>>,
    fail_next: Option<String>,
    offline: bool,
    closed: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each successful `write_raw` call, in order
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// All written bytes concatenated
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }

    /// Make the next write fail with `reason`.
    pub fn fail_next_write(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// While offline every write fails.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl Transport for MemoryTransport {
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Unavailable("transport closed".into()));
        }
        if let Some(reason) = self.fail_next.take() {
            return Err(TransportError::Unavailable(reason));
        }
        if self.offline {
            return Err(TransportError::Unavailable("printer offline".into()));
        }
        debug!(len = data.len(), "recorded write");
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_each_write() {
        let mut t = MemoryTransport::new();
        t.write_raw(b"ab").unwrap();
        t.write_raw(b"c").unwrap();
        assert_eq!(t.writes(), &[b"ab".to_vec(), b"c".to_vec()]);
        assert_eq!(t.bytes(), b"abc");
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let mut t = MemoryTransport::new();
        t.fail_next_write("jam");
        match t.write_raw(b"x") {
            Err(TransportError::Unavailable(reason)) => assert_eq!(reason, "jam"),
            other => panic!("unexpected {other:?}"),
        }
        t.write_raw(b"y").unwrap();
        assert_eq!(t.write_count(), 1);
    }

    #[test]
    fn test_offline_and_closed() {
        let mut t = MemoryTransport::new();
        t.set_offline(true);
        assert!(t.write_raw(b"x").is_err());
        t.set_offline(false);
        t.close().unwrap();
        assert!(t.is_closed());
        assert!(t.write_raw(b"x").is_err());
        assert_eq!(t.write_count(), 0);
    }
}
