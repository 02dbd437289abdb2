//! # Recibo - ESC/POS Receipt Printer Library
//!
//! Recibo connects to ESC/POS thermal receipt printers and buffers print
//! jobs until you send them. It provides:
//!
//! - **Transports**: USB (libusb), raw TCP, serial ports and device files
//! - **Command buffer**: text, block text, images, QR codes, barcodes,
//!   styles, character sets, line spacing and cuts, queued as directives
//! - **Protocol implementation**: ESC/POS command builders
//! - **Dithering**: Bayer 8x8 ordered dithering for photos and logos
//!
//! ## Quick Start
//!
//! ```no_run
//! use recibo::{
//!     protocol::barcode::{BarcodeOptions, Symbology},
//!     protocol::barcode::qr::QrOptions,
//!     protocol::text::{Alignment, StyleSet},
//!     transport::{TransportFactory, TransportKind, TransportParameters},
//!     PrinterProfile,
//! };
//!
//! // Connect to a network printer
//! let params = TransportParameters::new()
//!     .with("host", "192.168.1.100")
//!     .with("port", "9100")
//!     .with("timeout", "10");
//! let mut factory = TransportFactory::new();
//! factory.build(TransportKind::Network, &params)?;
//! let mut session = factory.into_session(PrinterProfile::GENERIC_80MM)?;
//!
//! // Queue the job
//! session.set_style(&StyleSet::new().align(Alignment::Center).size(2, 2))?;
//! session.append_line("RECIBO");
//! session.set_style(&StyleSet::new())?;
//! session.append_block_text("Thank you for shopping with us.", None)?;
//! session.append_barcode("5901234123457", Symbology::Ean13, &BarcodeOptions::default())?;
//! session.append_qr("https://example.com/r/1234", &QrOptions::default())?;
//! session.cut();
//!
//! // One write to the printer
//! session.flush_and_reset()?;
//! # Ok::<(), recibo::ReciboError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | Connection parameters, device backends, factory |
//! | [`session`] | Command session: buffer, flush, reset |
//! | [`buffer`] | Directives and their compilation to bytes |
//! | [`protocol`] | ESC/POS command builders |
//! | [`render`] | Image loading, dithering, QR rasterization |
//! | [`printer`] | Printer profiles |
//! | [`error`] | Error types |
//!
//! ## Logging
//!
//! Events are emitted through `tracing`. Install a subscriber in the
//! application to see them; the library never installs one.

pub mod buffer;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use error::{BuildError, DirectiveError, FlushError, ReciboError, TransportError};
pub use printer::PrinterProfile;
pub use session::CommandSession;
pub use transport::{Device, Transport, TransportFactory, TransportKind, TransportParameters};
