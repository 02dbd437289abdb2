//! # File Transport
//!
//! Writes to a device node (`/dev/usb/lp0`, `/dev/rfcomm0`) or to a plain
//! file, which is handy for capturing a job and replaying it later:
//!
//! ```bash
//! cat receipt.bin > /dev/usb/lp0
//! ```
//!
//! Writes go through a [`BufWriter`]. With `flush=true` every write is
//! pushed to the device immediately; with `flush=false` bytes reach it once
//! the buffer fills or the transport is closed.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use tracing::{debug, instrument};

use super::params::FileSettings;
use super::{write_chunked, Transport, TransportKind};
use crate::error::{BuildError, TransportError};

#[derive(Debug)]
pub struct FileTransport {
    file: Option<BufWriter<File>>,
    settings: FileSettings,
}

impl FileTransport {
    /// Open `settings.path` for writing, creating or truncating it.
    #[instrument(skip(settings), fields(path = %settings.path.display()))]
    pub fn open(settings: &FileSettings) -> Result<Self, BuildError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&settings.path)
            .map_err(|e| {
                BuildError::connection(
                    TransportKind::File,
                    format!("{}: {e}", settings.path.display()),
                )
            })?;

        debug!("device file opened");
        Ok(Self {
            file: Some(BufWriter::new(file)),
            settings: settings.clone(),
        })
    }

    pub fn settings(&self) -> &FileSettings {
        &self.settings
    }
}

impl Transport for FileTransport {
    #[instrument(skip(self, data), fields(path = %self.settings.path.display(), len = data.len()))]
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| TransportError::Unavailable("file closed".into()))?;
        write_chunked(file, data)?;
        if self.settings.auto_flush {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file://{}", self.settings.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_writes_append_within_one_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.bin");
        let settings = FileSettings {
            path: path.clone(),
            auto_flush: true,
        };

        let mut transport = FileTransport::open(&settings).unwrap();
        transport.write_raw(b"\x1b@").unwrap();
        transport.write_raw(b"hello\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"\x1b@hello\n");
    }

    #[test]
    fn test_open_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.bin");
        fs::write(&path, b"old contents").unwrap();

        let settings = FileSettings {
            path: path.clone(),
            auto_flush: false,
        };
        let mut transport = FileTransport::open(&settings).unwrap();
        transport.write_raw(b"new").unwrap();
        transport.close().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(matches!(
            transport.write_raw(b"more"),
            Err(TransportError::Unavailable(_))
        ));
    }

    #[test]
    fn test_buffered_until_close_without_auto_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.bin");
        let settings = FileSettings {
            path: path.clone(),
            auto_flush: false,
        };

        let mut transport = FileTransport::open(&settings).unwrap();
        transport.write_raw(b"pending").unwrap();
        assert!(fs::read(&path).unwrap().is_empty());

        transport.close().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"pending");
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempdir().unwrap();
        let settings = FileSettings {
            path: dir.path().join("missing").join("job.bin"),
            auto_flush: true,
        };
        match FileTransport::open(&settings) {
            Err(BuildError::ConnectionFailed { kind, .. }) => assert_eq!(kind, TransportKind::File),
            other => panic!("expected ConnectionFailed, got {other:?}"),
        }
    }
}
