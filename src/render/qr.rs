//! QR codes rendered as images, for printers without (or with a broken)
//! native QR command.

use qrcode::{Color, EcLevel, QrCode};

use super::bitmap::Bitmap;
use crate::error::DirectiveError;
use crate::protocol::barcode::qr::QrErrorLevel;

/// Light modules around the symbol
pub const QUIET_ZONE: usize = 2;

/// Rasterize `content` as a Model 2 QR code, `module_size` dots per module.
///
/// ```
/// use recibo::protocol::barcode::qr::QrErrorLevel;
/// use recibo::render::qr::{rasterize, QUIET_ZONE};
///
/// let bitmap = rasterize("hello", QrErrorLevel::L, 3).unwrap();
/// // Version 1: 21 modules plus the quiet zone on both sides
/// assert_eq!(bitmap.width(), (21 + 2 * QUIET_ZONE) * 3);
/// ```
pub fn rasterize(
    content: &str,
    level: QrErrorLevel,
    module_size: u8,
) -> Result<Bitmap, DirectiveError> {
    if content.is_empty() {
        return Err(DirectiveError::invalid("QR content is empty"));
    }

    let ec_level = match level {
        QrErrorLevel::L => EcLevel::L,
        QrErrorLevel::M => EcLevel::M,
        QrErrorLevel::Q => EcLevel::Q,
        QrErrorLevel::H => EcLevel::H,
    };

    let code = QrCode::with_error_correction_level(content.as_bytes(), ec_level)
        .map_err(|e| DirectiveError::invalid(format!("QR code generation failed: {e}")))?;

    let cell = module_size.max(1) as usize;
    let modules = code.width();
    let side = (modules + 2 * QUIET_ZONE) * cell;
    let mut bitmap = Bitmap::blank(side, side);

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] != Color::Dark {
                continue;
            }
            let left = (qx + QUIET_ZONE) * cell;
            let top = (qy + QUIET_ZONE) * cell;
            for y in top..top + cell {
                for x in left..left + cell {
                    bitmap.set(x, y, true);
                }
            }
        }
    }

    Ok(bitmap)
}
