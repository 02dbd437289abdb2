//! # ESC/POS Printer Control Commands
//!
//! Basic control commands shared by every ESC/POS receipt printer:
//! initialization, paper feed, cutting, and line spacing.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`, `HT`
//! - Two bytes: `ESC @`, `ESC 2`
//! - Multi-byte with parameters: `ESC d n`, `GS V m`, `GS ( k pL pH ...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Reference
//!
//! Based on the Epson "ESC/POS Application Programming Guide" command
//! reference, which most thermal receipt printers clone.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, barcodes, 2D codes, and raster graphics.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// NUL - Terminator for function A barcodes
pub const NUL: u8 = 0x00;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets modes to their power-on values.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use recibo::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the line buffer and feeds `n` lines at the current line spacing.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER CONTROL
// ============================================================================

/// Lines fed before cutting so the last printed line clears the cutter.
pub const CUT_FEED_LINES: u8 = 6;

/// Cutter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutMode {
    /// Cut all the way through
    #[default]
    Full,
    /// Leave a small hinge so the receipt does not fall
    Partial,
}

/// # Cut Paper (GS V m)
///
/// | Mode    | Bytes    |
/// |---------|----------|
/// | Full    | 1D 56 00 |
/// | Partial | 1D 56 01 |
///
/// The cutter sits a few lines above the print head, so a plain cut slices
/// through the last lines printed. Use [`cut_with_feed`] for receipts.
#[inline]
pub fn cut(mode: CutMode) -> Vec<u8> {
    let m = match mode {
        CutMode::Full => 0,
        CutMode::Partial => 1,
    };
    vec![GS, b'V', m]
}

/// Feed [`CUT_FEED_LINES`] lines, then cut.
///
/// ```
/// use recibo::protocol::commands::{self, CutMode};
///
/// let cmd = commands::cut_with_feed(CutMode::Full);
/// assert_eq!(cmd, vec![0x1B, 0x64, 6, 0x1D, 0x56, 0x00]);
/// ```
pub fn cut_with_feed(mode: CutMode) -> Vec<u8> {
    let mut cmd = feed_lines(CUT_FEED_LINES);
    cmd.extend(cut(mode));
    cmd
}

// ============================================================================
// LINE SPACING
// ============================================================================

/// # Select Default Line Spacing (ESC 2)
///
/// Restores the printer's default spacing (about 1/6 inch).
#[inline]
pub fn line_spacing_default() -> Vec<u8> {
    vec![ESC, b'2']
}

/// Unit in which a line-spacing amount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpacingUnit {
    /// n/60 inch (ESC A n)
    Sixtieths,
    /// n/180 inch (ESC 3 n), the only form every printer honors
    #[default]
    OneEightieths,
    /// n/360 inch (ESC + n)
    ThreeSixtieths,
}

impl SpacingUnit {
    /// Map a divisor (60, 180, 360) to its unit.
    pub fn from_divisor(divisor: u16) -> Option<Self> {
        match divisor {
            60 => Some(SpacingUnit::Sixtieths),
            180 => Some(SpacingUnit::OneEightieths),
            360 => Some(SpacingUnit::ThreeSixtieths),
            _ => None,
        }
    }

    pub fn divisor(self) -> u16 {
        match self {
            SpacingUnit::Sixtieths => 60,
            SpacingUnit::OneEightieths => 180,
            SpacingUnit::ThreeSixtieths => 360,
        }
    }
}

/// # Set Line Spacing (ESC 3 n / ESC A n / ESC + n)
///
/// | Unit    | Bytes    |
/// |---------|----------|
/// | 1/180"  | 1B 33 n  |
/// | 1/60"   | 1B 41 n  |
/// | 1/360"  | 1B 2B n  |
///
/// `ESC A` and `ESC +` are model-dependent; printers that lack them print
/// the parameter byte as a character.
pub fn line_spacing(n: u8, unit: SpacingUnit) -> Vec<u8> {
    let code = match unit {
        SpacingUnit::Sixtieths => b'A',
        SpacingUnit::OneEightieths => b'3',
        SpacingUnit::ThreeSixtieths => b'+',
    };
    vec![ESC, code, n]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use recibo::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(384), [0x80, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(0), vec![0x1B, 0x64, 0x00]);
        assert_eq!(feed_lines(6), vec![0x1B, 0x64, 0x06]);
    }

    #[test]
    fn test_cut_modes() {
        assert_eq!(cut(CutMode::Full), vec![0x1D, 0x56, 0x00]);
        assert_eq!(cut(CutMode::Partial), vec![0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_cut_with_feed() {
        let cmd = cut_with_feed(CutMode::Partial);
        assert!(cmd.starts_with(&[0x1B, 0x64, CUT_FEED_LINES]));
        assert!(cmd.ends_with(&[0x1D, 0x56, 0x01]));
    }

    #[test]
    fn test_line_spacing_units() {
        assert_eq!(line_spacing(30, SpacingUnit::OneEightieths), vec![0x1B, 0x33, 30]);
        assert_eq!(line_spacing(10, SpacingUnit::Sixtieths), vec![0x1B, 0x41, 10]);
        assert_eq!(line_spacing(60, SpacingUnit::ThreeSixtieths), vec![0x1B, 0x2B, 60]);
        assert_eq!(line_spacing_default(), vec![0x1B, 0x32]);
    }

    #[test]
    fn test_spacing_unit_divisors() {
        for divisor in [60, 180, 360] {
            let unit = SpacingUnit::from_divisor(divisor).unwrap();
            assert_eq!(unit.divisor(), divisor);
        }
        assert_eq!(SpacingUnit::from_divisor(100), None);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
        assert_eq!(u16_le(576), [0x40, 0x02]);
    }
}
