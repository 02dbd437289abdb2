//! # Directives
//!
//! A [`Directive`] is one buffered print operation. Constructors validate
//! their input and do all the expensive preparation (image decoding,
//! dithering, QR rasterization) up front, so a directive that made it into
//! a buffer always compiles.

use tracing::warn;

use crate::error::DirectiveError;
use crate::printer::PrinterProfile;
use crate::protocol::barcode::qr::QrOptions;
use crate::protocol::barcode::{self, BarcodeOptions, Symbology};
use crate::protocol::commands::{CutMode, SpacingUnit};
use crate::protocol::encoding::CodePage;
use crate::protocol::graphics::ImageOptions;
use crate::protocol::text::{Font, StyleSet};
use crate::render::bitmap::Bitmap;
use crate::render::qr;
use crate::render::source::{self, ImageSource};

/// One unit of print intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    // ========== Text ==========
    /// Text as-is, no newline added
    Text(String),

    /// Text followed by a newline
    TextLine(String),

    /// Text word-wrapped to `columns` characters
    BlockText { text: String, columns: usize },

    // ========== Printer State ==========
    /// Complete text style
    Style(StyleSet),

    /// Select the character table for the text that follows
    Charset(CodePage),

    /// Line spacing; `None` restores the printer default
    LineSpacing { spacing: Option<u8>, unit: SpacingUnit },

    /// Feed and cut
    Cut(CutMode),

    // ========== Graphics ==========
    /// Dithered image
    Image {
        bitmap: Bitmap,
        options: ImageOptions,
        /// Resolved from the options or the printer profile
        fragment_height: u32,
    },

    /// QR code, either built by the printer or pre-rendered
    Qr {
        content: String,
        options: QrOptions,
        /// Present when the code is sent as an image
        rendered: Option<Bitmap>,
    },

    /// Validated linear barcode
    Barcode {
        symbology: Symbology,
        data: Vec<u8>,
        options: BarcodeOptions,
    },

    // ========== Escape Hatch ==========
    /// Bytes passed through untouched
    Raw(Vec<u8>),
}

impl Directive {
    /// Block text wrapped at `columns`, or at the line width of `font` on
    /// this profile.
    pub fn block_text(
        text: impl Into<String>,
        columns: Option<usize>,
        profile: &PrinterProfile,
        font: Font,
    ) -> Result<Self, DirectiveError> {
        let columns = match columns {
            Some(0) => return Err(DirectiveError::invalid("columns must be positive")),
            Some(n) => n,
            None => usize::from(profile.columns(font)),
        };
        Ok(Directive::BlockText {
            text: text.into(),
            columns,
        })
    }

    pub fn style(style: &StyleSet) -> Result<Self, DirectiveError> {
        style.validate()?;
        Ok(Directive::Style(style.clone()))
    }

    /// Line spacing of `spacing / divisor` inch.
    ///
    /// Only the 1/180 inch form is honored by every printer; 1/60 and
    /// 1/360 are sent as requested with a warning.
    pub fn line_spacing(spacing: Option<u8>, divisor: u16) -> Result<Self, DirectiveError> {
        let unit = SpacingUnit::from_divisor(divisor).ok_or_else(|| {
            DirectiveError::invalid(format!(
                "line spacing divisor must be 60, 180 or 360, got {divisor}"
            ))
        })?;
        if spacing.is_some() && unit != SpacingUnit::OneEightieths {
            warn!(divisor, "line spacing unit not supported by all printers");
        }
        Ok(Directive::LineSpacing { spacing, unit })
    }

    /// Decode and dither an image for the given profile.
    ///
    /// Images wider than the paper are scaled down; `center` pads the image
    /// to the full paper width.
    pub fn image(
        source: &ImageSource,
        options: &ImageOptions,
        profile: &PrinterProfile,
    ) -> Result<Self, DirectiveError> {
        options.validate()?;
        let width = u32::from(profile.width_dots);
        let mut bitmap = source::load(source, width)?;
        if options.center {
            bitmap = bitmap.centered(width as usize);
        }
        Ok(Directive::Image {
            bitmap,
            options: *options,
            fragment_height: options
                .fragment_height
                .unwrap_or(profile.default_fragment_height),
        })
    }

    pub fn qr(
        content: impl Into<String>,
        options: &QrOptions,
        profile: &PrinterProfile,
    ) -> Result<Self, DirectiveError> {
        let content = content.into();
        options.validate()?;

        let rendered = if options.native {
            // Catch oversize payloads now rather than at flush
            barcode::qr::store(content.as_bytes())?;
            None
        } else {
            let bitmap = qr::rasterize(&content, options.error_correction, options.size)?;
            let paper = usize::from(profile.width_dots);
            if bitmap.width() > paper {
                let cells = bitmap.width() / usize::from(options.size);
                let detail = match paper / cells {
                    0 => format!("QR code for this content is wider than the {paper}-dot paper"),
                    fit => format!(
                        "QR code is {} dots wide at size {}, paper is {paper}; use size {fit} or less",
                        bitmap.width(),
                        options.size
                    ),
                };
                return Err(DirectiveError::invalid(detail));
            }
            Some(if options.center {
                bitmap.centered(profile.width_dots as usize)
            } else {
                bitmap
            })
        };

        Ok(Directive::Qr {
            content,
            options: *options,
            rendered,
        })
    }

    pub fn barcode(
        code: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<Self, DirectiveError> {
        options.validate()?;
        let data = barcode::validate(code, symbology)?;
        // Encode once to surface function/length errors now
        barcode::print(symbology, options.function, &data)?;
        Ok(Directive::Barcode {
            symbology,
            data,
            options: *options,
        })
    }

    /// Human-readable description for print queue listings.
    pub fn describe(&self) -> String {
        match self {
            Directive::Text(s) => format!("Print text: {}", preview(s)),
            Directive::TextLine(s) => format!("Print line: {}", preview(s)),
            Directive::BlockText { text, columns } => {
                format!("Print block text ({columns} columns): {}", preview(text))
            }
            Directive::Style(_) => "Set new text parameters".to_string(),
            Directive::Charset(cp) => format!("Set character set {cp}"),
            Directive::LineSpacing { spacing: None, .. } => {
                "Reset line spacing".to_string()
            }
            Directive::LineSpacing {
                spacing: Some(n),
                unit,
            } => format!("Set line spacing {n}/{}\"", unit.divisor()),
            Directive::Cut(CutMode::Full) => "Cut paper".to_string(),
            Directive::Cut(CutMode::Partial) => "Cut paper (partial)".to_string(),
            Directive::Image { bitmap, .. } => {
                format!("Print image {}x{}", bitmap.width(), bitmap.height())
            }
            Directive::Qr { content, .. } => format!("Print QR code: {}", preview(content)),
            Directive::Barcode {
                symbology, data, ..
            } => format!(
                "Print {symbology} barcode: {}",
                String::from_utf8_lossy(data)
            ),
            Directive::Raw(bytes) => format!("Send {} raw bytes", bytes.len()),
        }
    }
}

const PREVIEW_CHARS: usize = 32;

/// First line of `s`, shortened for listings
fn preview(s: &str) -> String {
    let line = s.lines().next().unwrap_or("");
    if line.chars().count() > PREVIEW_CHARS || line.len() < s.trim_end().len() {
        let short: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{short}…")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::barcode::qr::QrModel;
    use crate::protocol::text::Alignment;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn profile() -> PrinterProfile {
        PrinterProfile::GENERIC_58MM
    }

    #[test]
    fn test_block_text_columns() {
        let d = Directive::block_text("hello", None, &profile(), Font::A).unwrap();
        assert_eq!(
            d,
            Directive::BlockText {
                text: "hello".into(),
                columns: 32
            }
        );

        let d = Directive::block_text("hello", None, &profile(), Font::B).unwrap();
        assert!(matches!(d, Directive::BlockText { columns: 42, .. }));

        let d = Directive::block_text("hello", Some(10), &profile(), Font::B).unwrap();
        assert!(matches!(d, Directive::BlockText { columns: 10, .. }));

        assert!(matches!(
            Directive::block_text("hello", Some(0), &profile(), Font::A),
            Err(DirectiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_style_validation() {
        let ok = StyleSet::new().align(Alignment::Center);
        assert!(Directive::style(&ok).is_ok());
        assert!(Directive::style(&StyleSet::new().size(0, 1)).is_err());
    }

    #[test]
    fn test_line_spacing() {
        assert_eq!(
            Directive::line_spacing(Some(30), 180).unwrap(),
            Directive::LineSpacing {
                spacing: Some(30),
                unit: SpacingUnit::OneEightieths
            }
        );
        assert!(Directive::line_spacing(None, 60).is_ok());
        assert!(matches!(
            Directive::line_spacing(Some(30), 100),
            Err(DirectiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_image_resolves_fragment_height() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
        let d = Directive::image(&ImageSource::Decoded(img.clone()), &ImageOptions::default(), &profile())
            .unwrap();
        assert!(matches!(d, Directive::Image { fragment_height: 1024, .. }));

        let opts = ImageOptions {
            fragment_height: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Directive::image(&ImageSource::Decoded(img), &opts, &profile()),
            Err(DirectiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_image_center_pads_to_paper() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
        let opts = ImageOptions {
            center: true,
            ..Default::default()
        };
        let d = Directive::image(&ImageSource::Decoded(img), &opts, &profile()).unwrap();
        match d {
            Directive::Image { bitmap, .. } => assert_eq!(bitmap.width(), 384),
            other => panic!("unexpected directive {other:?}"),
        }
    }

    #[test]
    fn test_qr_native_and_image() {
        let native = QrOptions {
            native: true,
            ..Default::default()
        };
        let d = Directive::qr("hello", &native, &profile()).unwrap();
        assert!(matches!(d, Directive::Qr { rendered: None, .. }));

        let d = Directive::qr("hello", &QrOptions::default(), &profile()).unwrap();
        assert!(matches!(d, Directive::Qr { rendered: Some(_), .. }));

        let model1 = QrOptions {
            model: QrModel::Model1,
            ..Default::default()
        };
        assert!(Directive::qr("hello", &model1, &profile()).is_err());
        assert!(Directive::qr("", &QrOptions::default(), &profile()).is_err());
    }

    #[test]
    fn test_image_qr_must_fit_paper() {
        let content = "x".repeat(1000);
        let huge = QrOptions {
            size: 16,
            ..Default::default()
        };
        match Directive::qr(content.as_str(), &huge, &profile()) {
            Err(DirectiveError::InvalidArgument(detail)) => {
                assert!(detail.contains("use size"), "{detail}")
            }
            other => panic!("unexpected {other:?}"),
        }

        let small = QrOptions {
            size: 1,
            center: true,
            ..Default::default()
        };
        match Directive::qr(content.as_str(), &small, &profile()).unwrap() {
            Directive::Qr {
                rendered: Some(bitmap),
                ..
            } => assert_eq!(bitmap.width(), 384),
            other => panic!("unexpected directive {other:?}"),
        }
    }

    #[test]
    fn test_barcode_rejects_per_symbology() {
        let err = Directive::barcode("123", Symbology::Ean13, &BarcodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::InvalidBarcodeContent {
                symbology: Symbology::Ean13,
                ..
            }
        ));
        assert!(Directive::barcode("5901234123457", Symbology::Ean13, &BarcodeOptions::default()).is_ok());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Directive::Cut(CutMode::Full).describe(), "Cut paper");
        assert_eq!(Directive::Style(StyleSet::new()).describe(), "Set new text parameters");
        assert_eq!(Directive::Charset(CodePage::Cp866).describe(), "Set character set CP866");
        assert_eq!(Directive::Text("Hi".into()).describe(), "Print text: Hi");
        assert_eq!(Directive::Raw(vec![1, 2]).describe(), "Send 2 raw bytes");
        assert_eq!(
            Directive::TextLine("first\nsecond".into()).describe(),
            "Print line: first…"
        );
    }
}
