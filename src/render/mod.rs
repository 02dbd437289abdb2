//! # Rendering Module
//!
//! Turns images and QR payloads into 1-bit bitmaps the graphics commands
//! can print.
//!
//! ## Modules
//!
//! - [`source`]: Image loading and resizing to the paper width
//! - [`dither`]: Bayer 8x8 ordered dithering for binary conversion
//! - [`bitmap`]: 1-bit bitmap with raster/column packing and fragmenting
//! - [`qr`]: QR codes rasterized locally
//!
//! ## Usage Example
//!
//! ```
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use recibo::render::source::{load, ImageSource};
//!
//! let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([0, 0, 0, 255])));
//! let bitmap = load(&ImageSource::Decoded(img), 576).unwrap();
//!
//! // Packed rows, ready for protocol::graphics::raster()
//! let data = bitmap.to_raster();
//! assert_eq!(data.len(), 8 * 32);
//! ```

pub mod bitmap;
pub mod dither;
pub mod qr;
pub mod source;
