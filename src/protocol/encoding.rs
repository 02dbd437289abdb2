//! # Character Tables
//!
//! ESC/POS printers render single-byte text through a selectable character
//! table (`ESC t n`). [`CodePage`] names the tables this crate can encode
//! for; [`encode`] turns a Unicode string into bytes for one of them.
//!
//! | Code page | ESC t n | Script |
//! |-----------|---------|--------|
//! | CP437 | 0 | US / box drawing |
//! | WPC1252 | 16 | Western European |
//! | CP866 | 17 | Cyrillic (DOS) |
//! | ISO 8859-2 | 39 | Central European |
//! | ISO 8859-15 | 40 | Western European with € |
//! | WPC1250 | 45 | Central European |
//! | WPC1251 | 46 | Cyrillic |
//! | WPC1253 | 47 | Greek |
//! | WPC1254 | 48 | Turkish |
//! | WPC1257 | 51 | Baltic |
//!
//! Table numbers follow the Epson assignment; clones mostly agree on the
//! low numbers and diverge above 20.

use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;
use tracing::warn;

use super::cp437;
use crate::error::DirectiveError;

/// A printer character table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodePage {
    #[default]
    Cp437,
    Wpc1252,
    Cp866,
    Iso8859_2,
    Iso8859_15,
    Wpc1250,
    Wpc1251,
    Wpc1253,
    Wpc1254,
    Wpc1257,
}

impl CodePage {
    pub const ALL: [CodePage; 10] = [
        CodePage::Cp437,
        CodePage::Wpc1252,
        CodePage::Cp866,
        CodePage::Iso8859_2,
        CodePage::Iso8859_15,
        CodePage::Wpc1250,
        CodePage::Wpc1251,
        CodePage::Wpc1253,
        CodePage::Wpc1254,
        CodePage::Wpc1257,
    ];

    /// `n` for `ESC t n`
    pub fn table_number(self) -> u8 {
        match self {
            CodePage::Cp437 => 0,
            CodePage::Wpc1252 => 16,
            CodePage::Cp866 => 17,
            CodePage::Iso8859_2 => 39,
            CodePage::Iso8859_15 => 40,
            CodePage::Wpc1250 => 45,
            CodePage::Wpc1251 => 46,
            CodePage::Wpc1253 => 47,
            CodePage::Wpc1254 => 48,
            CodePage::Wpc1257 => 51,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CodePage::Cp437 => "CP437",
            CodePage::Wpc1252 => "CP1252",
            CodePage::Cp866 => "CP866",
            CodePage::Iso8859_2 => "ISO-8859-2",
            CodePage::Iso8859_15 => "ISO-8859-15",
            CodePage::Wpc1250 => "CP1250",
            CodePage::Wpc1251 => "CP1251",
            CodePage::Wpc1253 => "CP1253",
            CodePage::Wpc1254 => "CP1254",
            CodePage::Wpc1257 => "CP1257",
        }
    }

    /// `encoding_rs` encoder, `None` for CP437
    fn encoding(self) -> Option<&'static Encoding> {
        match self {
            CodePage::Cp437 => None,
            CodePage::Wpc1252 => Some(encoding_rs::WINDOWS_1252),
            CodePage::Cp866 => Some(encoding_rs::IBM866),
            CodePage::Iso8859_2 => Some(encoding_rs::ISO_8859_2),
            CodePage::Iso8859_15 => Some(encoding_rs::ISO_8859_15),
            CodePage::Wpc1250 => Some(encoding_rs::WINDOWS_1250),
            CodePage::Wpc1251 => Some(encoding_rs::WINDOWS_1251),
            CodePage::Wpc1253 => Some(encoding_rs::WINDOWS_1253),
            CodePage::Wpc1254 => Some(encoding_rs::WINDOWS_1254),
            CodePage::Wpc1257 => Some(encoding_rs::WINDOWS_1257),
        }
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodePage {
    type Err = DirectiveError;

    /// Accepts `CP437`, `PC437`, `WPC1252`, `windows-1251`, `ISO8859_2`,
    /// `latin9` and similar spellings, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let cp = match key.as_str() {
            "CP437" | "PC437" | "IBM437" | "USA" => CodePage::Cp437,
            "CP1252" | "WPC1252" | "WINDOWS1252" => CodePage::Wpc1252,
            "CP866" | "PC866" | "IBM866" => CodePage::Cp866,
            "ISO88592" | "LATIN2" => CodePage::Iso8859_2,
            "ISO885915" | "LATIN9" => CodePage::Iso8859_15,
            "CP1250" | "WPC1250" | "WINDOWS1250" => CodePage::Wpc1250,
            "CP1251" | "WPC1251" | "WINDOWS1251" => CodePage::Wpc1251,
            "CP1253" | "WPC1253" | "WINDOWS1253" => CodePage::Wpc1253,
            "CP1254" | "WPC1254" | "WINDOWS1254" => CodePage::Wpc1254,
            "CP1257" | "WPC1257" | "WINDOWS1257" => CodePage::Wpc1257,
            _ => {
                return Err(DirectiveError::invalid(format!(
                    "unknown character set '{}'",
                    s.trim()
                )));
            }
        };
        Ok(cp)
    }
}

/// Encode `text` for the given character table.
///
/// Characters the table cannot represent become `?`.
///
/// ```
/// use recibo::protocol::encoding::{encode, CodePage};
///
/// assert_eq!(encode("Año", CodePage::Cp437), vec![0x41, 0xA4, 0x6F]);
/// assert_eq!(encode("Да", CodePage::Wpc1251), vec![0xC4, 0xE0]);
/// ```
pub fn encode(text: &str, cp: CodePage) -> Vec<u8> {
    let Some(encoding) = cp.encoding() else {
        return cp437::encode(text);
    };

    let (bytes, _, had_errors) = encoding.encode(text);
    if !had_errors {
        return bytes.into_owned();
    }

    // encoding_rs writes HTML numeric references for unmappable characters,
    // so fall back to one character at a time.
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, had_errors) = encoding.encode(ch.encode_utf8(&mut buf));
        if had_errors {
            warn!(character = %ch, codepage = %cp, "no mapping, replacing with '?'");
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}
