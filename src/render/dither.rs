//! # Bayer 8x8 Ordered Dithering
//!
//! Thermal heads print black or nothing. Photos and logos are reduced to
//! one bit per dot with an ordered (Bayer) threshold matrix, which keeps
//! mid-tones as a regular halftone screen instead of flattening them.
//!
//! For each pixel position (x, y):
//!
//! 1. Look up a threshold from the matrix at (x mod 8, y mod 8)
//! 2. Compute the pixel's darkness (0.0 = white, 1.0 = black)
//! 3. Print a dot when darkness exceeds the threshold
//!
//! ```text
//!     0   1   2   3   4   5   6   7   (x mod 8)
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! 0 │ 0 │32 │ 8 │40 │ 2 │34 │10 │42 │
//! 1 │48 │16 │56 │24 │50 │18 │58 │26 │
//! 2 │12 │44 │ 4 │36 │14 │46 │ 6 │38 │
//! 3 │60 │28 │52 │20 │62 │30 │54 │22 │
//! 4 │ 3 │35 │11 │43 │ 1 │33 │ 9 │41 │
//! 5 │51 │19 │59 │27 │49 │17 │57 │25 │
//! 6 │15 │47 │ 7 │39 │13 │45 │ 5 │37 │
//! 7 │63 │31 │55 │23 │61 │29 │53 │21 │
//!   └───┴───┴───┴───┴───┴───┴───┴───┘
//! (y mod 8)
//! ```
//!
//! Transparent pixels count as white paper.
//!
//! ## Usage Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use recibo::render::dither;
//!
//! let img = RgbaImage::from_pixel(16, 2, Rgba([0, 0, 0, 255]));
//! let bitmap = dither::dither(&img);
//!
//! assert_eq!(bitmap.width(), 16);
//! assert!(bitmap.pixels().iter().all(|&dot| dot));
//! ```

use image::{Rgba, RgbaImage};

use super::bitmap::Bitmap;

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63. The pattern creates a pleasing halftone screen
/// when used as thresholds for binary conversion.
///
/// The matrix is designed so that:
/// - Low values (0, 1, 2...) activate first at low intensities
/// - High values (61, 62, 63) activate last at high intensities
/// - The distribution minimizes visible patterns
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold for a pixel position, in (0, 1).
///
/// `(BAYER8[y mod 8][x mod 8] + 0.5) / 64`, so pure black always prints
/// and pure white never does.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Whether to print a dot at (x, y) for a pixel of the given darkness.
///
/// ```
/// use recibo::render::dither::should_print;
///
/// assert!(should_print(0, 0, 1.0));
/// assert!(!should_print(0, 0, 0.0));
///
/// // 50% gray prints roughly half of an 8x8 tile
/// let count = (0..8)
///     .flat_map(|y| (0..8).map(move |x| (x, y)))
///     .filter(|&(x, y)| should_print(x, y, 0.5))
///     .count();
/// assert!(count > 20 && count < 44);
/// ```
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Pack a row of boolean pixel values into bytes.
///
/// Converts a slice of bool values (true = black, false = white) into
/// a byte array suitable for printer graphics commands.
///
/// ## Bit Packing
///
/// - Bit 7 (MSB) = leftmost pixel
/// - Bit 0 (LSB) = rightmost pixel
/// - 1 = black (print dot), 0 = white (no dot)
///
/// ## Padding
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
///
/// ## Example
///
/// ```
/// use recibo::render::dither::pack_row;
///
/// // 8 pixels pack into 1 byte
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]); // 11110000
///
/// // 12 pixels pack into 2 bytes (4 bits padding)
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]); // 11111111 11110000
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

/// Alpha below this is treated as transparent.
pub const ALPHA_CUTOFF: u8 = 128;

/// Darkness of an RGBA pixel: 0.0 = white, 1.0 = black.
///
/// Uses Rec. 601 luma weights. Transparent pixels are white.
#[inline]
pub fn intensity(pixel: &Rgba<u8>) -> f32 {
    let [r, g, b, a] = pixel.0;
    if a < ALPHA_CUTOFF {
        return 0.0;
    }
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    1.0 - luma / 255.0
}

/// Dither an RGBA image to a 1-bit [`Bitmap`] of the same size.
pub fn dither(img: &RgbaImage) -> Bitmap {
    let (width, height) = img.dimensions();
    let mut dots = Vec::with_capacity(width as usize * height as usize);

    for (x, y, pixel) in img.enumerate_pixels() {
        dots.push(should_print(x as usize, y as usize, intensity(pixel)));
    }

    Bitmap::from_dots(width as usize, height as usize, dots)
}

// ============================================================================
// TESTS
// ============================================================================
