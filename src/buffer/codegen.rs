//! # Code Generation
//!
//! Compiles a [`CommandBuffer`] to ESC/POS bytes.
//!
//! The compiler walks the directives in order and tracks the two pieces of
//! printer state later directives depend on: the selected character table
//! (text encoding) and the current justification (restored after centered
//! barcodes and QR codes). Both start at the printer's power-on values.

use tracing::warn;

use super::directive::Directive;
use super::CommandBuffer;
use crate::protocol::barcode::{self, qr};
use crate::protocol::commands;
use crate::protocol::encoding::{self, CodePage};
use crate::protocol::graphics::{self, ImageOptions, ImageRender};
use crate::protocol::text::{self, Alignment};
use crate::render::bitmap::Bitmap;

/// Largest `GS ( L` data block: the u16 parameter count minus the header
const MAX_GRAPHICS_DATA: usize = u16::MAX as usize - 10;

#[derive(Debug, Default)]
struct PrinterState {
    codepage: CodePage,
    align: Alignment,
}

impl CommandBuffer {
    /// Compile the buffer to ESC/POS bytes.
    ///
    /// No `ESC @` is prepended; the printer keeps whatever state it had
    /// before these bytes arrive.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut state = PrinterState::default();

        for directive in self.iter() {
            match directive {
                // ===== Text =====
                Directive::Text(s) => {
                    out.extend(encoding::encode(s, state.codepage));
                }
                Directive::TextLine(s) => {
                    out.extend(encoding::encode(s, state.codepage));
                    out.push(commands::LF);
                }
                Directive::BlockText { text: body, columns } => {
                    let wrapped = text::wrap(body, *columns);
                    out.extend(encoding::encode(&wrapped, state.codepage));
                }

                // ===== Printer State =====
                Directive::Style(style) => {
                    out.extend(style.to_commands());
                    state.align = style.align;
                }
                Directive::Charset(cp) => {
                    out.extend(text::codepage(*cp));
                    state.codepage = *cp;
                }
                Directive::LineSpacing { spacing, unit } => match spacing {
                    Some(n) => out.extend(commands::line_spacing(*n, *unit)),
                    None => out.extend(commands::line_spacing_default()),
                },
                Directive::Cut(mode) => {
                    out.extend(commands::cut_with_feed(*mode));
                }

                // ===== Graphics =====
                Directive::Image {
                    bitmap,
                    options,
                    fragment_height,
                } => {
                    emit_image(&mut out, bitmap, options, *fragment_height as usize);
                }
                Directive::Qr {
                    content,
                    options,
                    rendered,
                } => match rendered {
                    Some(bitmap) => {
                        let raster = ImageOptions::default();
                        emit_image(&mut out, bitmap, &raster, bitmap.height());
                    }
                    None => {
                        if options.center {
                            out.extend(text::align(Alignment::Center));
                        }
                        out.extend(qr::set_model(options.model));
                        out.extend(qr::set_size(options.size));
                        out.extend(qr::set_error_correction(options.error_correction));
                        match qr::store(content.as_bytes()) {
                            Ok(cmd) => {
                                out.extend(cmd);
                                out.extend(qr::print());
                            }
                            Err(e) => warn!(error = %e, "QR code skipped"),
                        }
                        if options.center {
                            out.extend(text::align(state.align));
                        }
                    }
                },
                Directive::Barcode {
                    symbology,
                    data,
                    options,
                } => {
                    if options.centered {
                        out.extend(text::align(Alignment::Center));
                    }
                    out.extend(barcode::setup(options));
                    match barcode::print(*symbology, options.function, data) {
                        Ok(cmd) => out.extend(cmd),
                        Err(e) => warn!(error = %e, "barcode skipped"),
                    }
                    if options.centered {
                        out.extend(text::align(state.align));
                    }
                }

                // ===== Escape Hatch =====
                Directive::Raw(bytes) => {
                    out.extend_from_slice(bytes);
                }
            }
        }

        out
    }
}

fn emit_image(out: &mut Vec<u8>, bitmap: &Bitmap, options: &ImageOptions, fragment_height: usize) {
    let hdh = options.high_density_horizontal;
    let hdv = options.high_density_vertical;

    let fragment_height = match options.render {
        // Keep each GS ( L block inside its u16 length
        ImageRender::Graphics => {
            let limit = (MAX_GRAPHICS_DATA / bitmap.width_bytes().max(1)).max(1);
            fragment_height.min(limit)
        }
        // yL yH is a u16 row count
        ImageRender::BitImageRaster => fragment_height.min(usize::from(u16::MAX)),
        ImageRender::BitImageColumn => fragment_height,
    };

    for fragment in bitmap.fragments(fragment_height) {
        let width = fragment.width() as u16;
        let height = fragment.height() as u16;

        match options.render {
            ImageRender::BitImageRaster => {
                out.extend(graphics::raster(
                    fragment.width_bytes() as u16,
                    height,
                    &fragment.to_raster(),
                    hdh,
                    hdv,
                ));
            }
            ImageRender::Graphics => {
                match graphics::graphics_store(width, height, &fragment.to_raster(), hdh, hdv) {
                    Ok(cmd) => {
                        out.extend(cmd);
                        out.extend(graphics::graphics_print());
                    }
                    Err(e) => warn!(error = %e, "image fragment skipped"),
                }
            }
            ImageRender::BitImageColumn => {
                out.extend(graphics::column_begin());
                for stripe in fragment.column_stripes(hdv) {
                    out.extend(graphics::column_stripe(width, &stripe, hdh, hdv));
                }
                out.extend(commands::line_spacing_default());
            }
        }
    }
}
