//! # Error Types
//!
//! Errors are split by the stage that detects them:
//!
//! | Stage | Type | When |
//! |-------|------|------|
//! | Connecting | [`BuildError`] | Bad kind tag, bad parameters, device refused |
//! | Buffering | [`DirectiveError`] | One directive rejected, buffer untouched |
//! | Flushing | [`FlushError`] | Device write failed, buffer kept for retry |
//! | Device I/O | [`TransportError`] | Raw transport failures |
//!
//! [`ReciboError`] wraps all of them for callers that want a single type.

use thiserror::Error;

use crate::protocol::barcode::Symbology;
use crate::transport::TransportKind;

/// Failure to construct a transport.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The kind tag is not one of USB, Network, Serial, File
    #[error("Unknown printer type: {0}")]
    UnknownKind(String),

    /// A parameter is missing, malformed, or out of range
    #[error("Invalid parameters for {kind}: {detail}")]
    InvalidParameters { kind: TransportKind, detail: String },

    /// Parameters were valid but the device could not be opened
    #[error("Failed to connect with {kind}: {detail}")]
    ConnectionFailed { kind: TransportKind, detail: String },

    /// A stored connection preset could not be parsed
    #[error("Invalid connection config: {0}")]
    InvalidConfig(String),

    /// A session was requested before any connection was built
    #[error("No printer connection has been built")]
    NotConnected,
}

impl BuildError {
    pub(crate) fn invalid(kind: TransportKind, detail: impl Into<String>) -> Self {
        BuildError::InvalidParameters {
            kind,
            detail: detail.into(),
        }
    }

    pub(crate) fn connection(kind: TransportKind, detail: impl ToString) -> Self {
        BuildError::ConnectionFailed {
            kind,
            detail: detail.to_string(),
        }
    }

    /// True for errors detected before any device was touched.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            BuildError::UnknownKind(_)
                | BuildError::InvalidParameters { .. }
                | BuildError::InvalidConfig(_)
        )
    }
}

/// A single buffering operation was rejected.
#[derive(Debug, Error)]
pub enum DirectiveError {
    /// Out-of-range number, unknown enum name, or unsupported combination
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image source could not be read or decoded
    #[error("Image unreadable: {0}")]
    ImageUnreadable(String),

    /// Barcode content violates the symbology's length/charset/checksum rules
    #[error("Invalid {symbology} barcode content: {reason}")]
    InvalidBarcodeContent { symbology: Symbology, reason: String },
}

impl DirectiveError {
    pub(crate) fn invalid(detail: impl Into<String>) -> Self {
        DirectiveError::InvalidArgument(detail.into())
    }
}

/// Writing the buffer to the device failed.
#[derive(Debug, Error)]
pub enum FlushError {
    #[error("Transport write failed: {0}")]
    TransportWriteFailed(String),
}

impl From<TransportError> for FlushError {
    fn from(e: TransportError) -> Self {
        FlushError::TransportWriteFailed(e.to_string())
    }
}

/// Low-level transport failures
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error wrapper (sockets, files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// libusb error
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// Serial port driver error
    #[error("Serial error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Transport was closed or is simulating a failure
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Umbrella error for callers that handle every stage in one place
#[derive(Debug, Error)]
pub enum ReciboError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error(transparent)]
    Flush(#[from] FlushError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_message_names_kind() {
        let err = BuildError::connection(TransportKind::Serial, "port busy");
        assert_eq!(err.to_string(), "Failed to connect with Serial: port busy");
    }

    #[test]
    fn test_configuration_error_classification() {
        assert!(BuildError::UnknownKind("Parallel".into()).is_configuration_error());
        assert!(BuildError::invalid(TransportKind::Usb, "missing vid").is_configuration_error());
        assert!(!BuildError::connection(TransportKind::Network, "refused").is_configuration_error());
        assert!(!BuildError::NotConnected.is_configuration_error());
    }

    #[test]
    fn test_barcode_error_names_symbology() {
        let err = DirectiveError::InvalidBarcodeContent {
            symbology: Symbology::Ean13,
            reason: "bad check digit".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid EAN13 barcode content: bad check digit"
        );
    }

    #[test]
    fn test_flush_error_from_transport() {
        let err: FlushError = TransportError::Unavailable("unplugged".into()).into();
        assert!(err.to_string().contains("unplugged"));
    }
}
