//! # ESC/POS Graphics Commands
//!
//! Three ways to put a 1-bit image on paper.
//!
//! ## Graphics Modes Overview
//!
//! | Mode | Command | Data layout | Support |
//! |------|---------|-------------|---------|
//! | Bit image raster | GS v 0 | Row-major | Nearly universal |
//! | Graphics | GS ( L | Row-major, stored then printed | Newer Epson models |
//! | Bit image column | ESC * | Column-major stripes | Oldest printers |
//!
//! ## Bit Packing
//!
//! Row-major data packs 8 horizontal dots per byte:
//! - Bit 7 (MSB) = leftmost dot
//! - 1 = black (print), 0 = white
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```
//!
//! Column-major data packs 8 vertical dots per byte, MSB on top, with 1 or
//! 3 bytes per column depending on the stripe height.
//!
//! ## Density
//!
//! Each mode can halve the resolution on either axis, which makes the image
//! twice as large on paper. "High density" keeps the native resolution.

use std::str::FromStr;

use super::commands::{ESC, GS, LF, u16_le};
use crate::error::DirectiveError;

/// Which command family prints the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageRender {
    /// GS v 0
    #[default]
    BitImageRaster,
    /// GS ( L
    Graphics,
    /// ESC *
    BitImageColumn,
}

impl FromStr for ImageRender {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bitImageRaster" | "raster" => Ok(ImageRender::BitImageRaster),
            "graphics" => Ok(ImageRender::Graphics),
            "bitImageColumn" | "column" => Ok(ImageRender::BitImageColumn),
            other => Err(DirectiveError::invalid(format!(
                "unknown image implementation '{other}'"
            ))),
        }
    }
}

/// Image directive options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub high_density_vertical: bool,
    pub high_density_horizontal: bool,
    pub render: ImageRender,
    /// Tallest slice sent in one command; `None` uses the printer profile
    pub fragment_height: Option<u32>,
    pub center: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            high_density_vertical: true,
            high_density_horizontal: true,
            render: ImageRender::BitImageRaster,
            fragment_height: None,
            center: false,
        }
    }
}

impl ImageOptions {
    pub fn validate(&self) -> Result<(), DirectiveError> {
        if self.fragment_height == Some(0) {
            return Err(DirectiveError::invalid("fragment height must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// BIT IMAGE RASTER (GS v 0)
// ============================================================================

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// - `m`: +1 halves horizontal density, +2 halves vertical density
/// - `x`: width in **bytes**
/// - `y`: height in dots
///
/// ```
/// use recibo::protocol::graphics;
///
/// let cmd = graphics::raster(2, 1, &[0xFF, 0x00], true, true);
/// assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0x00, 0x02, 0x00, 0x01, 0x00, 0xFF, 0x00]);
/// ```
pub fn raster(
    width_bytes: u16,
    height: u16,
    data: &[u8],
    high_density_horizontal: bool,
    high_density_vertical: bool,
) -> Vec<u8> {
    let m = (!high_density_horizontal) as u8 + 2 * (!high_density_vertical) as u8;
    let x = u16_le(width_bytes);
    let y = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend_from_slice(&[GS, b'v', b'0', m, x[0], x[1], y[0], y[1]]);
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// GRAPHICS (GS ( L)
// ============================================================================

/// Bytes in a GS ( L store header after pL pH: m fn a bx by c xL xH yL yH
const GRAPHICS_HEADER_LEN: usize = 10;

/// # Store Raster Graphics in Print Buffer (GS ( L pL pH 30 70 30 bx by 31 xL xH yL yH d1...dk)
///
/// - `bx`, `by`: 1 = normal, 2 = double size on that axis
/// - `x`: width in **dots**
/// - `y`: height in dots
///
/// The parameter count `p` is a u16, so a single fragment holds at most
/// 65525 data bytes.
pub fn graphics_store(
    width_dots: u16,
    height: u16,
    data: &[u8],
    high_density_horizontal: bool,
    high_density_vertical: bool,
) -> Result<Vec<u8>, DirectiveError> {
    let p = u16::try_from(data.len() + GRAPHICS_HEADER_LEN).map_err(|_| {
        DirectiveError::invalid(format!(
            "graphics fragment of {} bytes is too large; lower the fragment height",
            data.len()
        ))
    })?;
    let p = u16_le(p);
    let bx = if high_density_horizontal { 1 } else { 2 };
    let by = if high_density_vertical { 1 } else { 2 };
    let x = u16_le(width_dots);
    let y = u16_le(height);

    let mut cmd = Vec::with_capacity(5 + GRAPHICS_HEADER_LEN + data.len());
    cmd.extend_from_slice(&[GS, b'(', b'L', p[0], p[1]]);
    cmd.extend_from_slice(&[0x30, 0x70, 0x30, bx, by, 0x31, x[0], x[1], y[0], y[1]]);
    cmd.extend_from_slice(data);
    Ok(cmd)
}

/// # Print Graphics Buffer (GS ( L 02 00 30 32)
pub fn graphics_print() -> Vec<u8> {
    vec![GS, b'(', b'L', 0x02, 0x00, 0x30, 0x32]
}

// ============================================================================
// BIT IMAGE COLUMN (ESC *)
// ============================================================================

/// Line spacing that makes 24-dot stripes touch (ESC 3 16)
pub fn column_begin() -> Vec<u8> {
    vec![ESC, b'3', 16]
}

/// # Select Bit-Image Mode (ESC * m nL nH d1...dk)
///
/// | m | Stripe | Horizontal |
/// |---|--------|------------|
/// | 0 | 8 dots | half |
/// | 1 | 8 dots | full |
/// | 32 | 24 dots | half |
/// | 33 | 24 dots | full |
///
/// `n` is the width in dots; each column carries 1 byte (8-dot stripe) or
/// 3 bytes (24-dot stripe). A line feed follows so the next stripe starts
/// below this one.
pub fn column_stripe(
    width_dots: u16,
    data: &[u8],
    high_density_horizontal: bool,
    high_density_vertical: bool,
) -> Vec<u8> {
    let m = high_density_horizontal as u8 + if high_density_vertical { 32 } else { 0 };
    let n = u16_le(width_dots);

    let mut cmd = Vec::with_capacity(6 + data.len());
    cmd.extend_from_slice(&[ESC, b'*', m, n[0], n[1]]);
    cmd.extend_from_slice(data);
    cmd.push(LF);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_density_byte() {
        assert_eq!(raster(1, 1, &[0], true, true)[3], 0);
        assert_eq!(raster(1, 1, &[0], false, true)[3], 1);
        assert_eq!(raster(1, 1, &[0], true, false)[3], 2);
        assert_eq!(raster(1, 1, &[0], false, false)[3], 3);
    }

    #[test]
    fn test_raster_dimensions() {
        let data = vec![0u8; 48 * 300];
        let cmd = raster(48, 300, &data, true, true);
        assert_eq!(cmd[4..8], [48, 0, 0x2C, 0x01]);
        assert_eq!(cmd.len(), 8 + data.len());
    }

    #[test]
    fn test_graphics_store() {
        let cmd = graphics_store(8, 2, &[0xFF, 0x81], true, false).unwrap();
        assert_eq!(
            cmd,
            vec![
                0x1D, 0x28, 0x4C, 12, 0, // p = 2 + 10
                0x30, 0x70, 0x30, 1, 2, 0x31, 8, 0, 2, 0, 0xFF, 0x81,
            ]
        );
    }

    #[test]
    fn test_graphics_store_too_large() {
        let data = vec![0u8; 65_535];
        assert!(matches!(
            graphics_store(576, 1000, &data, true, true),
            Err(DirectiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_graphics_print() {
        assert_eq!(graphics_print(), vec![0x1D, 0x28, 0x4C, 0x02, 0x00, 0x30, 0x32]);
    }

    #[test]
    fn test_column_stripe() {
        let cmd = column_stripe(2, &[0xFF, 0x00, 0x00, 0x01, 0x02, 0x03], true, true);
        assert_eq!(cmd[..5], [0x1B, 0x2A, 33, 2, 0]);
        assert_eq!(cmd.last(), Some(&LF));

        let cmd = column_stripe(1, &[0xAA], false, false);
        assert_eq!(cmd, vec![0x1B, 0x2A, 0, 1, 0, 0xAA, LF]);
    }

    #[test]
    fn test_options() {
        assert!(ImageOptions::default().validate().is_ok());
        let zero = ImageOptions { fragment_height: Some(0), ..Default::default() };
        assert!(zero.validate().is_err());
        assert_eq!("graphics".parse::<ImageRender>().unwrap(), ImageRender::Graphics);
        assert_eq!(
            "bitImageColumn".parse::<ImageRender>().unwrap(),
            ImageRender::BitImageColumn
        );
        assert!("sixel".parse::<ImageRender>().is_err());
    }
}
