//! # Printer Transport Layer
//!
//! Backends that move an already-compiled ESC/POS byte stream to a printer.
//!
//! ## Available Transports
//!
//! | Kind | Type | Device |
//! |------|------|--------|
//! | USB | [`UsbTransport`] | Bulk OUT endpoint via libusb |
//! | Network | [`NetworkTransport`] | Raw TCP socket (port 9100) |
//! | Serial | [`SerialTransport`] | RS-232 / USB-serial port |
//! | File | [`FileTransport`] | Device node such as `/dev/usb/lp0` |
//! | (none) | [`MemoryTransport`] | In-memory recorder for previews and tests |
//!
//! ## Building a Transport
//!
//! Connection parameters arrive as loosely typed key/value pairs (a form,
//! a JSON preset). They are coerced into [`ConnectionSettings`] and
//! validated completely before any device is opened:
//!
//! ```text
//! TransportParameters ──► ConnectionSettings ──► Device
//!    (raw strings)          (typed, checked)      (open handle)
//! ```
//!
//! ```no_run
//! use recibo::transport::{self, TransportKind, TransportParameters};
//!
//! let params = TransportParameters::new()
//!     .with("host", "192.168.1.100")
//!     .with("port", "9100")
//!     .with("timeout", "10");
//! let device = transport::connect(TransportKind::Network, &params)?;
//! # Ok::<(), recibo::error::BuildError>(())
//! ```

pub mod factory;
pub mod file;
pub mod memory;
pub mod network;
pub mod params;
pub mod serial;
pub mod usb;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, TransportError};

pub use factory::{connect, open, TransportFactory};
pub use file::FileTransport;
pub use memory::MemoryTransport;
pub use network::NetworkTransport;
pub use params::{ConnectionConfig, ConnectionSettings, RawValue, TransportParameters};
pub use serial::SerialTransport;
pub use usb::UsbTransport;

/// Largest single write handed to a stream-based device
pub(crate) const CHUNK_SIZE: usize = 4096;

/// Capability to push raw bytes to a printer.
///
/// A session performs exactly one `write_raw` per flush; implementations
/// may split that into several device-level writes.
pub trait Transport {
    /// Write the whole of `data` to the device.
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Release the device early. Dropping the transport does the same.
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Short human-readable name of the endpoint, e.g. `tcp://10.0.0.5:9100`
    fn describe(&self) -> String;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).write_raw(data)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Write `data` in [`CHUNK_SIZE`] pieces.
pub(crate) fn write_chunked<W: Write + ?Sized>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    for chunk in data.chunks(CHUNK_SIZE) {
        writer.write_all(chunk)?;
    }
    Ok(())
}

// ===== Kind =====

/// The four supported connection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransportKind {
    Usb,
    Network,
    Serial,
    File,
}

impl TransportKind {
    pub const ALL: [Self; 4] = [Self::Usb, Self::Network, Self::Serial, Self::File];

    pub fn name(&self) -> &'static str {
        match self {
            TransportKind::Usb => "USB",
            TransportKind::Network => "Network",
            TransportKind::Serial => "Serial",
            TransportKind::File => "File",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(tag))
            .ok_or_else(|| BuildError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for TransportKind {
    type Error = BuildError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TransportKind> for String {
    fn from(kind: TransportKind) -> Self {
        kind.name().to_string()
    }
}

// ===== Device =====

/// An open printer connection of any kind, as produced by [`connect`].
#[derive(Debug)]
pub enum Device {
    Usb(UsbTransport),
    Network(NetworkTransport),
    Serial(SerialTransport),
    File(FileTransport),
}

impl Device {
    pub fn kind(&self) -> TransportKind {
        match self {
            Device::Usb(_) => TransportKind::Usb,
            Device::Network(_) => TransportKind::Network,
            Device::Serial(_) => TransportKind::Serial,
            Device::File(_) => TransportKind::File,
        }
    }

    fn inner(&mut self) -> &mut dyn Transport {
        match self {
            Device::Usb(t) => t,
            Device::Network(t) => t,
            Device::Serial(t) => t,
            Device::File(t) => t,
        }
    }
}

impl Transport for Device {
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.inner().write_raw(data)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.inner().close()
    }

    fn describe(&self) -> String {
        match self {
            Device::Usb(t) => t.describe(),
            Device::Network(t) => t.describe(),
            Device::Serial(t) => t.describe(),
            Device::File(t) => t.describe(),
        }
    }
}
