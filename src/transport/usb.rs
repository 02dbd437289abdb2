//! # USB Transport
//!
//! Talks to the printer's bulk OUT endpoint through libusb.
//!
//! ## Opening
//!
//! 1. Find the device by vendor/product ID
//! 2. Pick the first bulk OUT endpoint of the active configuration
//! 3. Detach the kernel driver (`usblp` on Linux) where the platform allows
//! 4. Claim the endpoint's interface
//!
//! The interface is released when the transport is closed or dropped.
//!
//! ## Permissions (Linux)
//!
//! ```bash
//! # /etc/udev/rules.d/99-receipt-printer.rules
//! SUBSYSTEM=="usb", ATTRS{idVendor}=="28e9", ATTRS{idProduct}=="0289", MODE="0666"
//! ```

use std::fmt;
use std::time::Duration;

use rusb::{ConfigDescriptor, DeviceHandle, Direction, GlobalContext, TransferType};
use tracing::{debug, instrument};

use super::params::UsbSettings;
use super::{Transport, TransportKind};
use crate::error::{BuildError, TransportError};

/// Open USB printer.
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    settings: UsbSettings,
    interface: u8,
    endpoint: u8,
    claimed: bool,
}

impl UsbTransport {
    /// Find, configure and claim the printer.
    ///
    /// ## Errors
    ///
    /// [`BuildError::ConnectionFailed`] if no device matches, the device has
    /// no bulk OUT endpoint, or the interface is busy or not permitted.
    #[instrument(skip(settings), fields(vid = settings.vendor_id, pid = settings.product_id))]
    pub fn open(settings: &UsbSettings) -> Result<Self, BuildError> {
        let kind = TransportKind::Usb;
        let handle = rusb::open_device_with_vid_pid(settings.vendor_id, settings.product_id)
            .ok_or_else(|| {
                BuildError::connection(
                    kind,
                    format!(
                        "no device {:04x}:{:04x} found or it could not be opened",
                        settings.vendor_id, settings.product_id
                    ),
                )
            })?;

        let config = handle
            .device()
            .active_config_descriptor()
            .map_err(|e| BuildError::connection(kind, e))?;
        let (interface, endpoint) = find_bulk_out(&config)
            .ok_or_else(|| BuildError::connection(kind, "device has no bulk OUT endpoint"))?;

        // Unsupported on macOS and Windows
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!(error = %e, "kernel driver auto-detach unavailable");
        }
        handle
            .claim_interface(interface)
            .map_err(|e| BuildError::connection(kind, format!("claim interface {interface}: {e}")))?;

        debug!(interface, endpoint, "USB interface claimed");

        Ok(Self {
            handle,
            settings: settings.clone(),
            interface,
            endpoint,
            claimed: true,
        })
    }

    pub fn settings(&self) -> &UsbSettings {
        &self.settings
    }

    fn timeout(&self) -> Duration {
        // libusb treats zero as unlimited
        self.settings.timeout.unwrap_or(Duration::ZERO)
    }
}

/// `(interface number, endpoint address)` of the first bulk OUT endpoint
fn find_bulk_out(config: &ConfigDescriptor) -> Option<(u8, u8)> {
    config
        .interfaces()
        .flat_map(|interface| interface.descriptors())
        .find_map(|desc| {
            desc.endpoint_descriptors()
                .find(|ep| ep.direction() == Direction::Out && ep.transfer_type() == TransferType::Bulk)
                .map(|ep| (desc.interface_number(), ep.address()))
        })
}

impl Transport for UsbTransport {
    #[instrument(skip(self, data), fields(len = data.len()))]
    fn write_raw(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if !self.claimed {
            return Err(TransportError::Unavailable("USB interface released".into()));
        }
        let timeout = self.timeout();
        let mut written = 0;
        while written < data.len() {
            let n = self.handle.write_bulk(self.endpoint, &data[written..], timeout)?;
            if n == 0 {
                return Err(TransportError::Unavailable(format!(
                    "device accepted no data after {written} bytes"
                )));
            }
            written += n;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.claimed {
            self.claimed = false;
            self.handle.release_interface(self.interface)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "usb://{:04x}:{:04x}",
            self.settings.vendor_id, self.settings.product_id
        )
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!(error = %e, "USB interface release failed");
        }
    }
}

impl fmt::Debug for UsbTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbTransport")
            .field("settings", &self.settings)
            .field("interface", &self.interface)
            .field("endpoint", &self.endpoint)
            .field("claimed", &self.claimed)
            .finish()
    }
}

