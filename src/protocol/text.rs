//! # ESC/POS Text Styling Commands
//!
//! Text formatting commands and the [`StyleSet`] directive that combines
//! them.
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right |
//! | Font | ESC M n | Font A (12×24) or B (9×17) |
//! | Bold | ESC E n | **Emphasized** text |
//! | Underline | ESC - n | 1-dot or 2-dot underline |
//! | Size | GS ! n | Width and height multipliers 1–8 |
//! | Density | GS \| n | Print density, 0 (lightest) to 8 (darkest) |
//! | Invert | GS B n | White on black |
//! | Smoothing | GS b n | Smooth edges of enlarged characters |
//! | Upside down | ESC { n | 180° rotation |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```

use std::fmt;
use std::str::FromStr;

use super::commands::{ESC, GS};
use super::encoding::CodePage;
use crate::error::DirectiveError;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl FromStr for Alignment {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(DirectiveError::invalid(format!("unknown alignment '{other}'"))),
        }
    }
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// Takes effect at the start of the next line.
///
/// ```
/// use recibo::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// FONT SELECTION
// ============================================================================

/// Character font
///
/// | Font | Cell | Columns (58mm) | Columns (80mm) |
/// |------|------|----------------|----------------|
/// | A | 12×24 dots | 32 | 48 |
/// | B | 9×17 dots | 42 | 64 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    #[default]
    A = 0,
    B = 1,
}

impl FromStr for Font {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "0" => Ok(Font::A),
            "b" | "1" => Ok(Font::B),
            other => Err(DirectiveError::invalid(format!("unknown font '{other}'"))),
        }
    }
}

/// # Select Character Font (ESC M n)
pub fn font(f: Font) -> Vec<u8> {
    vec![ESC, b'M', f as u8]
}

// ============================================================================
// EMPHASIS AND UNDERLINE
// ============================================================================

/// Combined bold/underline text type.
///
/// Parsed from the short names `NORMAL`, `B`, `U`, `U2`,
/// `BU`, `BU2`. The `2` suffix selects the 2-dot underline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextType {
    #[default]
    Normal,
    Bold,
    Underline,
    Underline2,
    BoldUnderline,
    BoldUnderline2,
}

impl TextType {
    pub fn is_bold(self) -> bool {
        matches!(
            self,
            TextType::Bold | TextType::BoldUnderline | TextType::BoldUnderline2
        )
    }

    /// Underline thickness in dots (0 = off)
    pub fn underline_dots(self) -> u8 {
        match self {
            TextType::Normal | TextType::Bold => 0,
            TextType::Underline | TextType::BoldUnderline => 1,
            TextType::Underline2 | TextType::BoldUnderline2 => 2,
        }
    }
}

impl FromStr for TextType {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(TextType::Normal),
            "B" => Ok(TextType::Bold),
            "U" => Ok(TextType::Underline),
            "U2" => Ok(TextType::Underline2),
            "BU" => Ok(TextType::BoldUnderline),
            "BU2" => Ok(TextType::BoldUnderline2),
            other => Err(DirectiveError::invalid(format!("unknown text type '{other}'"))),
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextType::Normal => "NORMAL",
            TextType::Bold => "B",
            TextType::Underline => "U",
            TextType::Underline2 => "U2",
            TextType::BoldUnderline => "BU",
            TextType::BoldUnderline2 => "BU2",
        };
        f.write_str(name)
    }
}

/// # Turn Emphasized Mode On/Off (ESC E n)
#[inline]
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', enabled as u8]
}

/// # Underline Mode (ESC - n)
///
/// - `n = 0`: off
/// - `n = 1`: 1-dot underline
/// - `n = 2`: 2-dot underline
#[inline]
pub fn underline(dots: u8) -> Vec<u8> {
    vec![ESC, b'-', dots.min(2)]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Largest width/height multiplier accepted by GS !
pub const MAX_SIZE_MULTIPLIER: u8 = 8;

/// # Select Character Size (GS ! n)
///
/// | Bits | Meaning |
/// |------|---------|
/// | 4–6 | width multiplier − 1 |
/// | 0–2 | height multiplier − 1 |
///
/// Multipliers are clamped to 1–8.
///
/// ```
/// use recibo::protocol::text::size;
///
/// assert_eq!(size(1, 1), vec![0x1D, 0x21, 0x00]);
/// assert_eq!(size(2, 2), vec![0x1D, 0x21, 0x11]);
/// assert_eq!(size(4, 1), vec![0x1D, 0x21, 0x30]);
/// ```
pub fn size(width: u8, height: u8) -> Vec<u8> {
    let w = width.clamp(1, MAX_SIZE_MULTIPLIER) - 1;
    let h = height.clamp(1, MAX_SIZE_MULTIPLIER) - 1;
    vec![GS, b'!', (w << 4) | h]
}

// ============================================================================
// PRINT DENSITY
// ============================================================================

/// Print density setting.
///
/// `Default` leaves the printer's configured density alone (level 9
/// when given as a number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    #[default]
    Default,
    /// 0 = -50% … 4 = ±0 … 8 = +50%
    Level(u8),
}

impl Density {
    pub const MAX_LEVEL: u8 = 8;

    /// Build from the numeric form value: 0–8, or 9 for "default".
    pub fn from_level(n: u8) -> Result<Self, DirectiveError> {
        match n {
            0..=Self::MAX_LEVEL => Ok(Density::Level(n)),
            9 => Ok(Density::Default),
            _ => Err(DirectiveError::invalid(format!(
                "density must be 0-8 or 9 (default), got {n}"
            ))),
        }
    }
}

impl FromStr for Density {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(Density::Default);
        }
        let n: u8 = s
            .parse()
            .map_err(|_| DirectiveError::invalid(format!("unknown density '{s}'")))?;
        Density::from_level(n)
    }
}

/// # Select Print Density (GS | n)
#[inline]
pub fn density(level: u8) -> Vec<u8> {
    vec![GS, b'|', level.min(Density::MAX_LEVEL)]
}

// ============================================================================
// INVERT, SMOOTHING, UPSIDE DOWN
// ============================================================================

/// # White/Black Reverse Printing (GS B n)
#[inline]
pub fn invert(enabled: bool) -> Vec<u8> {
    vec![GS, b'B', enabled as u8]
}

/// # Smoothing Mode (GS b n)
///
/// Smooths the stair-step edges of enlarged characters. Most visible at 2x
/// and above.
#[inline]
pub fn smoothing(enabled: bool) -> Vec<u8> {
    vec![GS, b'b', enabled as u8]
}

/// # Upside-Down Printing (ESC { n)
///
/// Only takes effect at the beginning of a line.
#[inline]
pub fn upside_down(enabled: bool) -> Vec<u8> {
    vec![ESC, b'{', enabled as u8]
}

// ============================================================================
// CODE PAGE SELECTION
// ============================================================================

/// # Select Character Code Table (ESC t n)
///
/// ```
/// use recibo::protocol::encoding::CodePage;
/// use recibo::protocol::text::codepage;
///
/// assert_eq!(codepage(CodePage::Cp866), vec![0x1B, 0x74, 17]);
/// ```
pub fn codepage(cp: CodePage) -> Vec<u8> {
    vec![ESC, b't', cp.table_number()]
}

// ============================================================================
// STYLE SET DIRECTIVE
// ============================================================================

/// A complete text style, applied in one go.
///
/// Every field is always emitted so the printer ends up in a known state
/// regardless of what came before. Width and height are multipliers 1–8.
///
/// ```
/// use recibo::protocol::text::{StyleSet, Alignment, TextType};
///
/// let style = StyleSet::new()
///     .align(Alignment::Center)
///     .text_type(TextType::BoldUnderline)
///     .size(4, 4);
///
/// assert!(style.validate().is_ok());
/// let commands = style.to_commands();
/// assert!(commands.windows(3).any(|w| w == [0x1D, 0x21, 0x33]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSet {
    pub align: Alignment,
    pub font: Font,
    pub text_type: TextType,
    pub width: u8,
    pub height: u8,
    pub density: Density,
    pub invert: bool,
    pub smooth: bool,
    pub flip: bool,
}

impl Default for StyleSet {
    fn default() -> Self {
        Self {
            align: Alignment::Left,
            font: Font::A,
            text_type: TextType::Normal,
            width: 1,
            height: 1,
            density: Density::Default,
            invert: false,
            smooth: false,
            flip: false,
        }
    }
}

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, a: Alignment) -> Self {
        self.align = a;
        self
    }

    pub fn font(mut self, f: Font) -> Self {
        self.font = f;
        self
    }

    pub fn text_type(mut self, t: TextType) -> Self {
        self.text_type = t;
        self
    }

    pub fn size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn density(mut self, d: Density) -> Self {
        self.density = d;
        self
    }

    pub fn invert(mut self, enabled: bool) -> Self {
        self.invert = enabled;
        self
    }

    pub fn smooth(mut self, enabled: bool) -> Self {
        self.smooth = enabled;
        self
    }

    pub fn flip(mut self, enabled: bool) -> Self {
        self.flip = enabled;
        self
    }

    /// Check multiplier and density ranges.
    pub fn validate(&self) -> Result<(), DirectiveError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(1..=MAX_SIZE_MULTIPLIER).contains(&value) {
                return Err(DirectiveError::invalid(format!(
                    "{name} must be 1-{MAX_SIZE_MULTIPLIER}, got {value}"
                )));
            }
        }
        if let Density::Level(n) = self.density {
            if n > Density::MAX_LEVEL {
                return Err(DirectiveError::invalid(format!(
                    "density must be 0-{}, got {n}",
                    Density::MAX_LEVEL
                )));
            }
        }
        Ok(())
    }

    /// Generate command bytes for this style
    pub fn to_commands(&self) -> Vec<u8> {
        let mut cmds = Vec::with_capacity(32);
        cmds.extend(align(self.align));
        cmds.extend(font(self.font));
        cmds.extend(bold(self.text_type.is_bold()));
        cmds.extend(underline(self.text_type.underline_dots()));
        cmds.extend(size(self.width, self.height));
        if let Density::Level(n) = self.density {
            cmds.extend(density(n));
        }
        cmds.extend(invert(self.invert));
        cmds.extend(smoothing(self.smooth));
        cmds.extend(upside_down(self.flip));
        cmds
    }
}

// ============================================================================
// BLOCK TEXT
// ============================================================================

/// Word-wrap `text` to lines of at most `columns` characters.
///
/// Whitespace runs collapse to single spaces; words longer than a line are
/// broken. Lines are joined with `\n` and no trailing newline is added.
///
/// ```
/// use recibo::protocol::text::wrap;
///
/// assert_eq!(wrap("the quick brown fox", 10), "the quick\nbrown fox");
/// ```
pub fn wrap(text: &str, columns: usize) -> String {
    let columns = columns.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        loop {
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed <= columns {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(word.iter());
                current_len += word.len();
                break;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }

            // Word alone is wider than a line
            let rest = word.split_off(columns);
            lines.push(word.into_iter().collect());
            word = rest;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_font() {
        assert_eq!(font(Font::A), vec![0x1B, 0x4D, 0x00]);
        assert_eq!(font(Font::B), vec![0x1B, 0x4D, 0x01]);
    }

    #[test]
    fn test_bold_underline() {
        assert_eq!(bold(true), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold(false), vec![0x1B, 0x45, 0x00]);
        assert_eq!(underline(2), vec![0x1B, 0x2D, 0x02]);
        // Clamped to 2 dots
        assert_eq!(underline(5), vec![0x1B, 0x2D, 0x02]);
    }

    #[test]
    fn test_size() {
        assert_eq!(size(1, 1), vec![0x1D, 0x21, 0x00]);
        assert_eq!(size(8, 8), vec![0x1D, 0x21, 0x77]);
        assert_eq!(size(2, 1), vec![0x1D, 0x21, 0x10]);
        assert_eq!(size(1, 2), vec![0x1D, 0x21, 0x01]);
        // Clamped
        assert_eq!(size(0, 20), vec![0x1D, 0x21, 0x07]);
    }

    #[test]
    fn test_toggles() {
        assert_eq!(invert(true), vec![0x1D, 0x42, 0x01]);
        assert_eq!(smoothing(true), vec![0x1D, 0x62, 0x01]);
        assert_eq!(upside_down(true), vec![0x1B, 0x7B, 0x01]);
        assert_eq!(density(3), vec![0x1D, 0x7C, 0x03]);
    }

    #[test]
    fn test_text_type_parsing() {
        assert_eq!("NORMAL".parse::<TextType>().unwrap(), TextType::Normal);
        assert_eq!("bu".parse::<TextType>().unwrap(), TextType::BoldUnderline);
        assert_eq!("BU2".parse::<TextType>().unwrap(), TextType::BoldUnderline2);
        assert!("BOLD".parse::<TextType>().is_err());
    }

    #[test]
    fn test_text_type_flags() {
        assert!(TextType::BoldUnderline2.is_bold());
        assert_eq!(TextType::BoldUnderline2.underline_dots(), 2);
        assert!(!TextType::Underline.is_bold());
        assert_eq!(TextType::Normal.underline_dots(), 0);
    }

    #[test]
    fn test_density_parsing() {
        assert_eq!("default".parse::<Density>().unwrap(), Density::Default);
        assert_eq!("9".parse::<Density>().unwrap(), Density::Default);
        assert_eq!("4".parse::<Density>().unwrap(), Density::Level(4));
        assert!("10".parse::<Density>().is_err());
        assert!("dark".parse::<Density>().is_err());
    }

    #[test]
    fn test_alignment_and_font_parsing() {
        assert_eq!("Center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("b".parse::<Font>().unwrap(), Font::B);
        assert!("justify".parse::<Alignment>().is_err());
        assert!("c".parse::<Font>().is_err());
    }

    #[test]
    fn test_style_set_validate() {
        assert!(StyleSet::new().validate().is_ok());
        assert!(StyleSet::new().size(9, 1).validate().is_err());
        assert!(StyleSet::new().size(1, 0).validate().is_err());
        assert!(StyleSet::new().density(Density::Level(9)).validate().is_err());
    }

    #[test]
    fn test_style_set_default_density_emits_nothing() {
        let cmds = StyleSet::new().to_commands();
        assert!(!cmds.windows(2).any(|w| w == [0x1D, 0x7C]));

        let cmds = StyleSet::new().density(Density::Level(8)).to_commands();
        assert!(cmds.windows(3).any(|w| w == [0x1D, 0x7C, 0x08]));
    }

    #[test]
    fn test_style_set_commands() {
        let cmds = StyleSet::new()
            .align(Alignment::Right)
            .font(Font::B)
            .text_type(TextType::Bold)
            .size(2, 3)
            .invert(true)
            .to_commands();

        assert!(cmds.starts_with(&[0x1B, 0x61, 0x02]));
        assert!(cmds.windows(3).any(|w| w == [0x1B, 0x4D, 0x01]));
        assert!(cmds.windows(3).any(|w| w == [0x1B, 0x45, 0x01]));
        assert!(cmds.windows(3).any(|w| w == [0x1B, 0x2D, 0x00]));
        assert!(cmds.windows(3).any(|w| w == [0x1D, 0x21, 0x12]));
        assert!(cmds.windows(3).any(|w| w == [0x1D, 0x42, 0x01]));
        assert!(cmds.ends_with(&[0x1B, 0x7B, 0x00]));
    }

    #[test]
    fn test_wrap_basic() {
        assert_eq!(wrap("aaa bbb ccc", 7), "aaa bbb\nccc");
        assert_eq!(wrap("aaa bbb ccc", 100), "aaa bbb ccc");
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap("  one\t\ttwo\n three  ", 16), "one two three");
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        assert_eq!(wrap("abcdefghij", 4), "abcd\nefgh\nij");
        assert_eq!(wrap("xy abcdefgh", 4), "xy\nabcd\nefgh");
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        assert_eq!(wrap("Привет мир", 6), "Привет\nмир");
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap("", 10), "");
        assert_eq!(wrap("   ", 10), "");
    }
}
