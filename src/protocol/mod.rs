//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for the ESC/POS command set spoken by most
//! thermal receipt printers (Epson TM series and its many clones).
//!
//! Every builder is a pure function returning `Vec<u8>`; nothing here
//! touches a device.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control commands (init, feed, cut, line spacing)
//! - [`text`]: Text styling and block-text wrapping
//! - [`encoding`]: Character tables and text encoding
//! - [`cp437`]: The CP437 table
//! - [`graphics`]: Raster, graphics and column bit images
//! - [`barcode`]: Linear barcodes and native QR codes
//!
//! ## Usage Example
//!
//! ```
//! use recibo::protocol::{commands, encoding, text};
//!
//! let mut data = Vec::new();
//!
//! data.extend(text::StyleSet::new().align(text::Alignment::Center).to_commands());
//! data.extend(encoding::encode("RECEIPT\n", encoding::CodePage::Cp437));
//! data.extend(commands::cut_with_feed(commands::CutMode::Full));
//! ```

pub mod barcode;
pub mod commands;
pub mod cp437;
pub mod encoding;
pub mod graphics;
pub mod text;
