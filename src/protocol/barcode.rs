//! # ESC/POS Barcode Commands
//!
//! Linear barcodes (`GS k`) and native QR codes (`GS ( k`).
//!
//! ## Supported Symbologies
//!
//! | Symbology | Content | Function A `m` | Function B `m` |
//! |-----------|---------|----------------|----------------|
//! | UPC-A | 11–12 digits | 0 | 65 |
//! | UPC-E | 6–8 digits | 1 | 66 |
//! | EAN13 | 12–13 digits | 2 | 67 |
//! | EAN8 | 7–8 digits | 3 | 68 |
//! | CODE39 | `0-9 A-Z space $ % + - . /` | 4 | 69 |
//! | ITF | even number of digits | 5 | 70 |
//! | NW7 (Codabar) | `A-D` start/stop around `0-9 $ + - . / :` | 6 | 71 |
//! | CODE93 | ASCII | — | 72 |
//! | CODE128 | ASCII, `{A`/`{B`/`{C` code set prefix | — | 73 |
//!
//! Function A terminates the data with NUL; function B sends an explicit
//! length byte, which is why only function B can carry CODE93 and CODE128.
//!
//! ## Usage
//!
//! ```
//! use recibo::protocol::barcode::{self, BarcodeFunction, BarcodeOptions, Symbology};
//!
//! let options = BarcodeOptions::default();
//! let code = barcode::validate("5901234123457", Symbology::Ean13).unwrap();
//!
//! let mut data = barcode::setup(&options);
//! data.extend(barcode::print(Symbology::Ean13, BarcodeFunction::B, &code).unwrap());
//! ```

use std::fmt;
use std::str::FromStr;

use super::commands::{GS, NUL};
use crate::error::DirectiveError;

// ============================================================================
// SYMBOLOGIES
// ============================================================================

/// Barcode encoding standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    UpcA,
    UpcE,
    Ean13,
    Ean8,
    Code39,
    Itf,
    Nw7,
    Code93,
    Code128,
}

impl Symbology {
    pub const ALL: [Symbology; 9] = [
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Code39,
        Symbology::Itf,
        Symbology::Nw7,
        Symbology::Code93,
        Symbology::Code128,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::Code39 => "CODE39",
            Symbology::Itf => "ITF",
            Symbology::Nw7 => "NW7",
            Symbology::Code93 => "CODE93",
            Symbology::Code128 => "CODE128",
        }
    }

    /// `m` for `GS k m d1...dk NUL`, `None` when function A can't carry it
    pub fn function_a_code(self) -> Option<u8> {
        match self {
            Symbology::UpcA => Some(0),
            Symbology::UpcE => Some(1),
            Symbology::Ean13 => Some(2),
            Symbology::Ean8 => Some(3),
            Symbology::Code39 => Some(4),
            Symbology::Itf => Some(5),
            Symbology::Nw7 => Some(6),
            Symbology::Code93 | Symbology::Code128 => None,
        }
    }

    /// `m` for `GS k m n d1...dn`
    pub fn function_b_code(self) -> u8 {
        match self {
            Symbology::UpcA => 65,
            Symbology::UpcE => 66,
            Symbology::Ean13 => 67,
            Symbology::Ean8 => 68,
            Symbology::Code39 => 69,
            Symbology::Itf => 70,
            Symbology::Nw7 => 71,
            Symbology::Code93 => 72,
            Symbology::Code128 => 73,
        }
    }

    fn reject(self, reason: impl Into<String>) -> DirectiveError {
        DirectiveError::InvalidBarcodeContent {
            symbology: self,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbology {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match key.as_str() {
            "UPCA" => Ok(Symbology::UpcA),
            "UPCE" => Ok(Symbology::UpcE),
            "EAN13" | "JAN13" => Ok(Symbology::Ean13),
            "EAN8" | "JAN8" => Ok(Symbology::Ean8),
            "CODE39" => Ok(Symbology::Code39),
            "ITF" => Ok(Symbology::Itf),
            "NW7" | "CODABAR" => Ok(Symbology::Nw7),
            "CODE93" => Ok(Symbology::Code93),
            "CODE128" => Ok(Symbology::Code128),
            _ => Err(DirectiveError::invalid(format!(
                "unknown barcode type '{}'",
                s.trim()
            ))),
        }
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// HRI (Human Readable Interpretation) position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarcodePosition {
    Off = 0,
    Above = 1,
    #[default]
    Below = 2,
    Both = 3,
}

impl FromStr for BarcodePosition {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" | "NONE" => Ok(BarcodePosition::Off),
            "ABOVE" => Ok(BarcodePosition::Above),
            "BELOW" => Ok(BarcodePosition::Below),
            "BOTH" => Ok(BarcodePosition::Both),
            other => Err(DirectiveError::invalid(format!(
                "unknown barcode text position '{other}'"
            ))),
        }
    }
}

/// HRI font selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HriFont {
    #[default]
    A = 0,
    B = 1,
}

impl FromStr for HriFont {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(HriFont::A),
            "B" => Ok(HriFont::B),
            other => Err(DirectiveError::invalid(format!(
                "unknown barcode font '{other}'"
            ))),
        }
    }
}

/// Which `GS k` form to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarcodeFunction {
    /// NUL-terminated, seven symbologies
    A,
    /// Length-prefixed, all symbologies
    #[default]
    B,
}

impl FromStr for BarcodeFunction {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(BarcodeFunction::A),
            "B" => Ok(BarcodeFunction::B),
            other => Err(DirectiveError::invalid(format!(
                "unknown barcode function '{other}'"
            ))),
        }
    }
}

/// Barcode layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarcodeOptions {
    /// Bar height in dots (1–255)
    pub height: u8,
    /// Module width (2–6)
    pub width: u8,
    pub position: BarcodePosition,
    pub font: HriFont,
    /// Center the barcode, restoring the previous alignment afterwards
    pub centered: bool,
    pub function: BarcodeFunction,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            height: 64,
            width: 3,
            position: BarcodePosition::Below,
            font: HriFont::A,
            centered: true,
            function: BarcodeFunction::B,
        }
    }
}

impl BarcodeOptions {
    pub const MIN_WIDTH: u8 = 2;
    pub const MAX_WIDTH: u8 = 6;

    pub fn validate(&self) -> Result<(), DirectiveError> {
        if self.height == 0 {
            return Err(DirectiveError::invalid("barcode height must be 1-255"));
        }
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&self.width) {
            return Err(DirectiveError::invalid(format!(
                "barcode width must be {}-{}, got {}",
                Self::MIN_WIDTH,
                Self::MAX_WIDTH,
                self.width
            )));
        }
        Ok(())
    }
}

// ============================================================================
// CONTENT VALIDATION
// ============================================================================

/// Longest payload function B can describe with its one-byte length
pub const MAX_FUNCTION_B_LEN: usize = 255;

/// Check `code` against the symbology's length, charset and check digit
/// rules and return the bytes to send.
///
/// CODE128 content without a code set prefix gets `{B` prepended.
///
/// ```
/// use recibo::protocol::barcode::{validate, Symbology};
///
/// assert!(validate("5901234123457", Symbology::Ean13).is_ok());
/// assert!(validate("5901234123458", Symbology::Ean13).is_err());
/// assert_eq!(validate("abc", Symbology::Code128).unwrap(), b"{Babc");
/// ```
pub fn validate(code: &str, symbology: Symbology) -> Result<Vec<u8>, DirectiveError> {
    if code.is_empty() {
        return Err(symbology.reject("content is empty"));
    }

    match symbology {
        Symbology::UpcA => {
            digits_with_check(code, symbology, 11, 12)?;
        }
        Symbology::Ean13 => {
            digits_with_check(code, symbology, 12, 13)?;
        }
        Symbology::Ean8 => {
            digits_with_check(code, symbology, 7, 8)?;
        }
        Symbology::UpcE => validate_upce(code)?,
        Symbology::Code39 => {
            let body = code.strip_prefix('*').unwrap_or(code);
            let body = body.strip_suffix('*').unwrap_or(body);
            if body.is_empty() {
                return Err(symbology.reject("no characters between start/stop '*'"));
            }
            if let Some(bad) = body.chars().find(|c| !is_code39_char(*c)) {
                return Err(symbology.reject(format!("character '{bad}' not allowed")));
            }
        }
        Symbology::Itf => {
            require_digits(code, symbology)?;
            if code.len() % 2 != 0 {
                return Err(symbology.reject(format!(
                    "needs an even number of digits, got {}",
                    code.len()
                )));
            }
        }
        Symbology::Nw7 => {
            let chars: Vec<char> = code.chars().collect();
            if chars.len() < 3 {
                return Err(symbology.reject("needs start, data and stop characters"));
            }
            let is_start_stop = |c: char| matches!(c.to_ascii_uppercase(), 'A'..='D');
            if !is_start_stop(chars[0]) || !is_start_stop(chars[chars.len() - 1]) {
                return Err(symbology.reject("must start and end with A, B, C or D"));
            }
            if let Some(bad) = chars[1..chars.len() - 1]
                .iter()
                .find(|c| !(c.is_ascii_digit() || "$+-./:".contains(**c)))
            {
                return Err(symbology.reject(format!("character '{bad}' not allowed")));
            }
        }
        Symbology::Code93 => {
            if !code.is_ascii() {
                return Err(symbology.reject("only ASCII characters are allowed"));
            }
        }
        Symbology::Code128 => {
            if !code.is_ascii() {
                return Err(symbology.reject("only ASCII characters are allowed"));
            }
            let has_prefix = ["{A", "{B", "{C"].iter().any(|p| code.starts_with(p));
            if !has_prefix {
                let mut out = Vec::with_capacity(code.len() + 2);
                out.extend_from_slice(b"{B");
                out.extend_from_slice(code.as_bytes());
                return Ok(out);
            }
            if code.len() == 2 {
                return Err(symbology.reject("no data after code set prefix"));
            }
        }
    }

    Ok(code.as_bytes().to_vec())
}

fn is_code39_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase() || " $%+-./".contains(c)
}

fn require_digits(code: &str, symbology: Symbology) -> Result<(), DirectiveError> {
    match code.chars().find(|c| !c.is_ascii_digit()) {
        Some(bad) => Err(symbology.reject(format!("character '{bad}' is not a digit"))),
        None => Ok(()),
    }
}

/// Digits of length `short` (printer computes the check digit) or `full`
/// (check digit verified here).
fn digits_with_check(
    code: &str,
    symbology: Symbology,
    short: usize,
    full: usize,
) -> Result<(), DirectiveError> {
    require_digits(code, symbology)?;
    let len = code.len();
    if len != short && len != full {
        return Err(symbology.reject(format!(
            "needs {short} or {full} digits, got {len}"
        )));
    }
    if len == full {
        let digits = to_digits(code);
        let expected = check_digit(&digits[..full - 1]);
        let actual = digits[full - 1];
        if expected != actual {
            return Err(symbology.reject(format!(
                "check digit is {actual}, expected {expected}"
            )));
        }
    }
    Ok(())
}

fn validate_upce(code: &str) -> Result<(), DirectiveError> {
    let symbology = Symbology::UpcE;
    require_digits(code, symbology)?;
    let len = code.len();
    if !(6..=8).contains(&len) {
        return Err(symbology.reject(format!("needs 6, 7 or 8 digits, got {len}")));
    }
    let digits = to_digits(code);
    if len >= 7 && digits[0] > 1 {
        return Err(symbology.reject(format!(
            "number system must be 0 or 1, got {}",
            digits[0]
        )));
    }
    if len == 8 {
        let upca = expand_upce(&digits[..7]);
        let expected = check_digit(&upca);
        if expected != digits[7] {
            return Err(symbology.reject(format!(
                "check digit is {}, expected {expected}",
                digits[7]
            )));
        }
    }
    Ok(())
}

fn to_digits(code: &str) -> Vec<u8> {
    code.bytes().map(|b| b - b'0').collect()
}

/// EAN/UPC check digit for `body` (the digits before the check digit).
///
/// Weights alternate 3, 1 starting from the rightmost body digit.
///
/// ```
/// use recibo::protocol::barcode::check_digit;
///
/// assert_eq!(check_digit(&[5, 9, 0, 1, 2, 3, 4, 1, 2, 3, 4, 5]), 7);
/// ```
pub fn check_digit(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Expand a UPC-E number system digit plus six data digits into the
/// eleven-digit UPC-A body.
fn expand_upce(digits: &[u8]) -> Vec<u8> {
    let ns = digits[0];
    let d = &digits[1..7];
    let mut out = vec![ns];
    match d[5] {
        0..=2 => {
            out.extend_from_slice(&[d[0], d[1], d[5], 0, 0, 0, 0, d[2], d[3], d[4]]);
        }
        3 => {
            out.extend_from_slice(&[d[0], d[1], d[2], 0, 0, 0, 0, 0, d[3], d[4]]);
        }
        4 => {
            out.extend_from_slice(&[d[0], d[1], d[2], d[3], 0, 0, 0, 0, 0, d[4]]);
        }
        _ => {
            out.extend_from_slice(&[d[0], d[1], d[2], d[3], d[4], 0, 0, 0, 0, d[5]]);
        }
    }
    out
}

// ============================================================================
// COMMANDS
// ============================================================================

/// # Set Bar Code Height (GS h n)
#[inline]
pub fn set_height(dots: u8) -> Vec<u8> {
    vec![GS, b'h', dots.max(1)]
}

/// # Set Bar Code Width (GS w n)
#[inline]
pub fn set_width(n: u8) -> Vec<u8> {
    vec![
        GS,
        b'w',
        n.clamp(BarcodeOptions::MIN_WIDTH, BarcodeOptions::MAX_WIDTH),
    ]
}

/// # Select HRI Print Position (GS H n)
#[inline]
pub fn set_hri_position(position: BarcodePosition) -> Vec<u8> {
    vec![GS, b'H', position as u8]
}

/// # Select HRI Font (GS f n)
#[inline]
pub fn set_hri_font(font: HriFont) -> Vec<u8> {
    vec![GS, b'f', font as u8]
}

/// Height, width, HRI position and HRI font in one sequence
pub fn setup(options: &BarcodeOptions) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(12);
    cmd.extend(set_height(options.height));
    cmd.extend(set_width(options.width));
    cmd.extend(set_hri_position(options.position));
    cmd.extend(set_hri_font(options.font));
    cmd
}

/// # Print Bar Code (GS k)
///
/// | Function | Bytes |
/// |----------|-------|
/// | A | 1D 6B m d1...dk 00 |
/// | B | 1D 6B m n d1...dn |
///
/// `data` should already have passed [`validate`].
pub fn print(
    symbology: Symbology,
    function: BarcodeFunction,
    data: &[u8],
) -> Result<Vec<u8>, DirectiveError> {
    let mut cmd = Vec::with_capacity(data.len() + 4);
    cmd.push(GS);
    cmd.push(b'k');

    match function {
        BarcodeFunction::A => {
            let m = symbology.function_a_code().ok_or_else(|| {
                DirectiveError::invalid(format!("{symbology} requires barcode function B"))
            })?;
            if data.contains(&NUL) {
                return Err(symbology.reject("function A data cannot contain NUL"));
            }
            cmd.push(m);
            cmd.extend_from_slice(data);
            cmd.push(NUL);
        }
        BarcodeFunction::B => {
            let n = u8::try_from(data.len())
                .map_err(|_| symbology.reject(format!(
                    "at most {MAX_FUNCTION_B_LEN} bytes, got {}",
                    data.len()
                )))?;
            cmd.push(symbology.function_b_code());
            cmd.push(n);
            cmd.extend_from_slice(data);
        }
    }
    Ok(cmd)
}

// ============================================================================
// QR CODE COMMANDS
// ============================================================================

/// Native QR code command builders (`GS ( k`, cn = 49)
///
/// A native QR code is built on the printer in four steps:
///
/// 1. Select model (fn 65)
/// 2. Set module size (fn 67) and error correction (fn 69)
/// 3. Store data in the symbol storage area (fn 80)
/// 4. Print the stored symbol (fn 81)
///
/// ```
/// use recibo::protocol::barcode::qr;
///
/// let mut data = Vec::new();
/// data.extend(qr::set_model(qr::QrModel::Model2));
/// data.extend(qr::set_size(3));
/// data.extend(qr::set_error_correction(qr::QrErrorLevel::L));
/// data.extend(qr::store(b"https://example.com").unwrap());
/// data.extend(qr::print());
/// ```
pub mod qr {
    use std::str::FromStr;

    use super::super::commands::{u16_le, GS};
    use crate::error::DirectiveError;

    /// Largest payload the QR symbol storage area accepts
    pub const MAX_DATA_LEN: usize = 7089;

    /// QR Code model selection
    ///
    /// | Model | Max Version | Notes |
    /// |-------|-------------|-------|
    /// | Model 1 | 14 | Original QR |
    /// | Model 2 | 40 | Alignment patterns, what phones expect |
    /// | Micro | M4 | Single finder pattern, tiny payloads |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum QrModel {
        Model1 = 49,
        #[default]
        Model2 = 50,
        Micro = 51,
    }

    impl FromStr for QrModel {
        type Err = DirectiveError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_uppercase().replace([' ', '_'], "").as_str() {
                "1" | "MODEL1" => Ok(QrModel::Model1),
                "2" | "MODEL2" => Ok(QrModel::Model2),
                "MICRO" => Ok(QrModel::Micro),
                other => Err(DirectiveError::invalid(format!("unknown QR model '{other}'"))),
            }
        }
    }

    /// QR Code error correction level
    ///
    /// | Level | Recovery |
    /// |-------|----------|
    /// | L | ~7% |
    /// | M | ~15% |
    /// | Q | ~25% |
    /// | H | ~30% |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum QrErrorLevel {
        #[default]
        L = 48,
        M = 49,
        Q = 50,
        H = 51,
    }

    impl FromStr for QrErrorLevel {
        type Err = DirectiveError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_uppercase().as_str() {
                "L" => Ok(QrErrorLevel::L),
                "M" => Ok(QrErrorLevel::M),
                "Q" => Ok(QrErrorLevel::Q),
                "H" => Ok(QrErrorLevel::H),
                other => Err(DirectiveError::invalid(format!(
                    "unknown QR error correction level '{other}'"
                ))),
            }
        }
    }

    /// QR directive options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QrOptions {
        pub error_correction: QrErrorLevel,
        /// Module size in dots (1–16)
        pub size: u8,
        pub model: QrModel,
        /// Let the printer build the symbol instead of sending an image
        pub native: bool,
        pub center: bool,
    }

    impl Default for QrOptions {
        fn default() -> Self {
            Self {
                error_correction: QrErrorLevel::L,
                size: 3,
                model: QrModel::Model2,
                native: false,
                center: false,
            }
        }
    }

    impl QrOptions {
        pub const MAX_SIZE: u8 = 16;

        pub fn validate(&self) -> Result<(), DirectiveError> {
            if !(1..=Self::MAX_SIZE).contains(&self.size) {
                return Err(DirectiveError::invalid(format!(
                    "QR size must be 1-{}, got {}",
                    Self::MAX_SIZE,
                    self.size
                )));
            }
            if !self.native && self.model != QrModel::Model2 {
                return Err(DirectiveError::invalid(
                    "image QR codes only support model 2; use native mode for other models",
                ));
            }
            Ok(())
        }
    }

    fn function(f: u8, params: &[u8]) -> Vec<u8> {
        let p = u16_le((params.len() + 2) as u16);
        let mut cmd = Vec::with_capacity(params.len() + 7);
        cmd.extend_from_slice(&[GS, b'(', b'k', p[0], p[1], 49, f]);
        cmd.extend_from_slice(params);
        cmd
    }

    /// # Select QR Model (GS ( k 04 00 31 41 n1 n2)
    pub fn set_model(model: QrModel) -> Vec<u8> {
        function(65, &[model as u8, 0])
    }

    /// # Set QR Module Size (GS ( k 03 00 31 43 n)
    pub fn set_size(dots: u8) -> Vec<u8> {
        function(67, &[dots.clamp(1, QrOptions::MAX_SIZE)])
    }

    /// # Set QR Error Correction (GS ( k 03 00 31 45 n)
    pub fn set_error_correction(level: QrErrorLevel) -> Vec<u8> {
        function(69, &[level as u8])
    }

    /// # Store QR Data (GS ( k pL pH 31 50 30 d1...dk)
    pub fn store(data: &[u8]) -> Result<Vec<u8>, DirectiveError> {
        if data.is_empty() {
            return Err(DirectiveError::invalid("QR content is empty"));
        }
        if data.len() > MAX_DATA_LEN {
            return Err(DirectiveError::invalid(format!(
                "QR content is {} bytes, at most {MAX_DATA_LEN} fit",
                data.len()
            )));
        }
        let mut params = Vec::with_capacity(data.len() + 1);
        params.push(48);
        params.extend_from_slice(data);
        Ok(function(80, &params))
    }

    /// # Print Stored QR Symbol (GS ( k 03 00 31 51 30)
    pub fn print() -> Vec<u8> {
        function(81, &[48])
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_set_model() {
            assert_eq!(
                set_model(QrModel::Model2),
                vec![0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]
            );
            assert_eq!(set_model(QrModel::Micro)[7], 0x33);
        }

        #[test]
        fn test_set_size_and_ec() {
            assert_eq!(
                set_size(3),
                vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x03]
            );
            assert_eq!(
                set_error_correction(QrErrorLevel::H),
                vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x33]
            );
        }

        #[test]
        fn test_store_length_prefix() {
            let cmd = store(b"ABC").unwrap();
            // pL pH = 3 data + 3 (cn fn m)
            assert_eq!(
                cmd,
                vec![0x1D, 0x28, 0x6B, 0x06, 0x00, 0x31, 0x50, 0x30, b'A', b'B', b'C']
            );
        }

        #[test]
        fn test_store_limits() {
            assert!(store(b"").is_err());
            assert!(store(&vec![b'1'; MAX_DATA_LEN]).is_ok());
            assert!(store(&vec![b'1'; MAX_DATA_LEN + 1]).is_err());
        }

        #[test]
        fn test_print() {
            assert_eq!(print(), vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);
        }

        #[test]
        fn test_options_validate() {
            assert!(QrOptions::default().validate().is_ok());
            let too_big = QrOptions { size: 17, ..Default::default() };
            assert!(too_big.validate().is_err());
            let zero = QrOptions { size: 0, ..Default::default() };
            assert!(zero.validate().is_err());

            let micro_image = QrOptions { model: QrModel::Micro, ..Default::default() };
            assert!(micro_image.validate().is_err());
            let micro_native = QrOptions { model: QrModel::Micro, native: true, ..Default::default() };
            assert!(micro_native.validate().is_ok());
        }

        #[test]
        fn test_parsing() {
            assert_eq!("h".parse::<QrErrorLevel>().unwrap(), QrErrorLevel::H);
            assert_eq!("Model 1".parse::<QrModel>().unwrap(), QrModel::Model1);
            assert_eq!("micro".parse::<QrModel>().unwrap(), QrModel::Micro);
            assert!("X".parse::<QrErrorLevel>().is_err());
        }
    }
}
