//! # Serial Transport
//!
//! RS-232 and USB-serial printers, driven through the blocking
//! `serialport` API that `tokio-serial` re-exports.
//!
//! ## Option Mapping
//!
//! | Setting | Driver |
//! |---------|--------|
//! | parity N / E / O | `Parity::None` / `Even` / `Odd` |
//! | parity M / S | not supported, fails to open |
//! | stop bits 1 / 2 | `StopBits::One` / `Two` |
//! | stop bits 1.5 | `StopBits::Two` (what POSIX does for 5-bit words) |
//! | xonoff | `FlowControl::Software` |
//! | dsrdtr | `FlowControl::Hardware` |
//!
//! Software flow control wins when both are requested.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, instrument};

use super::params::{SerialParity, SerialSettings, SerialStopBits};
use super::{write_chunked, Transport, TransportKind};
use crate::error::{BuildError, TransportError};

/// Driver timeout when none is configured
const NO_TIMEOUT: Duration = Duration::from_secs(60 * 60);

fn data_bits(bits: u8) -> Result<DataBits, String> {
    match bits {
        5 => Ok(DataBits::Five),
        6 => Ok(DataBits::Six),
        7 => Ok(DataBits::Seven),
        8 => Ok(DataBits::Eight),
        _ => Err(format!("unsupported data bits: {bits}")),
    }
}

fn parity(parity: SerialParity) -> Result<Parity, String> {
    match parity {
        SerialParity::None => Ok(Parity::None),
        SerialParity::Even => Ok(Parity::Even),
        SerialParity::Odd => Ok(Parity::Odd),
        SerialParity::Mark | SerialParity::Space => {
            Err(format!("{parity:?} parity is not supported by the serial driver"))
        }
    }
}

fn stop_bits(stop_bits: SerialStopBits) -> StopBits {
    match stop_bits {
        SerialStopBits::One => StopBits::One,
        SerialStopBits::OnePointFive | SerialStopBits::Two => StopBits::Two,
    }
}

fn flow_control(settings: &SerialSettings) -> FlowControl {
    if settings.xonxoff {
        FlowControl::Software
    } else if settings.dsrdtr {
        FlowControl::Hardware
    } else {
        FlowControl::None
    }
}

/// Open serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    settings: SerialSettings,
}

impl SerialTransport {
    #[instrument(skip(settings), fields(port = %settings.path, baud = settings.baud_rate))]
    pub fn open(settings: &SerialSettings) -> Result<Self, BuildError> {
        let kind = TransportKind::Serial;
        let fail = |detail: String| BuildError::connection(kind, detail);

        let builder = tokio_serial::new(&settings.path, settings.baud_rate)
            .data_bits(data_bits(settings.data_bits).map_err(fail)?)
            .parity(parity(settings.parity).map_err(fail)?)
            .stop_bits(stop_bits(settings.stop_bits))
            .flow_control(flow_control(settings))
            .timeout(settings.timeout.unwrap_or(NO_TIMEOUT));

        let port = builder
            .open()
            .map_err(|e| fail(format!("{}: {e}", settings.path)))?;

        debug!("serial port opened");
        Ok(Self {
            port,
            settings: settings.clone(),
        })
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }
}

impl Transport for SerialTransport {
    #[instrument(skip(self, data), fields(port = %self.settings.path, len = data.len()))]
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        write_chunked(&mut self.port, data)?;
        self.port.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("serial://{}@{}", self.settings.path, self.settings.baud_rate)
    }
}

impl fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransport")
            .field("settings", &self.settings)
            .finish()
    }
}
