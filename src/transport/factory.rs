//! # Transport Factory
//!
//! Turns a kind tag plus raw parameters into an open [`Device`].
//!
//! [`connect`] is the stateless entry point. [`TransportFactory`] keeps the
//! most recently built device, the way a connection dialog keeps "the"
//! printer: a successful build replaces it, a failed build leaves it alone.

use tracing::{info, instrument, warn};

use super::params::{ConnectionSettings, TransportParameters};
use super::{
    Device, FileTransport, NetworkTransport, SerialTransport, Transport, TransportKind,
    UsbTransport,
};
use crate::error::BuildError;
use crate::printer::PrinterProfile;
use crate::session::CommandSession;

/// Validate `params` for `kind` and open the device.
///
/// Nothing is opened unless every parameter is valid.
pub fn connect(kind: TransportKind, params: &TransportParameters) -> Result<Device, BuildError> {
    let settings = ConnectionSettings::from_parameters(kind, params).inspect_err(|e| {
        warn!(%kind, error = %e, "rejected connection parameters");
    })?;
    open(&settings)
}

/// Open a device from already validated settings.
#[instrument(skip(settings), fields(kind = %settings.kind()))]
pub fn open(settings: &ConnectionSettings) -> Result<Device, BuildError> {
    let result = match settings {
        ConnectionSettings::Usb(s) => UsbTransport::open(s).map(Device::Usb),
        ConnectionSettings::Network(s) => NetworkTransport::open(s).map(Device::Network),
        ConnectionSettings::Serial(s) => SerialTransport::open(s).map(Device::Serial),
        ConnectionSettings::File(s) => FileTransport::open(s).map(Device::File),
    };

    match &result {
        Ok(device) => info!(device = %device.describe(), "printer connected"),
        Err(e) => warn!(error = %e, "printer connection failed"),
    }
    result
}

/// Holds at most one open device.
///
/// ```no_run
/// use recibo::transport::{TransportFactory, TransportKind, TransportParameters};
/// use recibo::printer::PrinterProfile;
///
/// let mut factory = TransportFactory::new();
/// factory.build_named("Network", &TransportParameters::defaults(TransportKind::Network))?;
///
/// let mut session = factory.into_session(PrinterProfile::GENERIC_80MM)?;
/// session.append_line("Hello");
/// session.cut();
/// session.flush()?;
/// # Ok::<(), recibo::error::ReciboError>(())
/// ```
#[derive(Debug, Default)]
pub struct TransportFactory {
    device: Option<Device>,
}

impl TransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a device and make it the current one.
    ///
    /// On success the previous device is dropped (and thereby closed). On
    /// failure the previous device stays in place.
    pub fn build(
        &mut self,
        kind: TransportKind,
        params: &TransportParameters,
    ) -> Result<&Device, BuildError> {
        let device = connect(kind, params)?;
        Ok(self.device.insert(device))
    }

    /// Like [`build`](Self::build), with the kind given as a tag such as
    /// `"USB"` or `"network"`.
    pub fn build_named(
        &mut self,
        tag: &str,
        params: &TransportParameters,
    ) -> Result<&Device, BuildError> {
        let kind = tag.parse::<TransportKind>().inspect_err(|e| {
            warn!(error = %e, "rejected printer type");
        })?;
        self.build(kind, params)
    }

    pub fn get(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn take(&mut self) -> Option<Device> {
        self.device.take()
    }

    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    /// Close and forget the current device.
    pub fn disconnect(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.close() {
                warn!(error = %e, "error while closing printer");
            }
        }
    }

    /// Hand the current device to a new session.
    pub fn into_session(self, profile: PrinterProfile) -> Result<CommandSession<Device>, BuildError> {
        let device = self.device.ok_or(BuildError::NotConnected)?;
        Ok(CommandSession::with_profile(device, profile))
    }
}
