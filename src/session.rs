//! # Command Session
//!
//! A [`CommandSession`] owns one printer transport and one
//! [`CommandBuffer`]. Buffering calls only record intent; nothing reaches
//! the printer until [`flush`](CommandSession::flush), which compiles the
//! whole buffer and performs exactly one raw write.
//!
//! ## Lifecycle
//!
//! ```text
//!            append_* / set_* / cut          flush()
//! (empty) ──────────────────────────► (queued) ───────► printer
//!    ▲                                    │
//!    └──────────── reset() ───────────────┘
//! ```
//!
//! A failed flush keeps the buffer so it can be retried, possibly after
//! [`reconnect`](CommandSession::reconnect). A rejected directive leaves
//! the buffer exactly as it was.
//!
//! ## Example
//!
//! ```
//! use recibo::session::CommandSession;
//! use recibo::transport::MemoryTransport;
//! use recibo::protocol::text::{Alignment, StyleSet, TextType};
//!
//! let mut session = CommandSession::new(MemoryTransport::new());
//! session.set_style(&StyleSet::new().align(Alignment::Center).text_type(TextType::Bold))?;
//! session.append_line("CAFÉ CENTRAL");
//! session.set_style(&StyleSet::new())?;
//! session.append_block_text("Thank you for your visit, see you soon!", Some(20))?;
//! session.cut();
//!
//! assert_eq!(session.len(), 5);
//! session.flush()?;
//! assert_eq!(session.transport().write_count(), 1);
//! # Ok::<(), recibo::error::ReciboError>(())
//! ```

use tracing::{debug, info, warn};

use crate::buffer::{CommandBuffer, Directive};
use crate::error::{DirectiveError, FlushError};
use crate::printer::PrinterProfile;
use crate::protocol::barcode::qr::QrOptions;
use crate::protocol::barcode::{BarcodeOptions, Symbology};
use crate::protocol::commands::CutMode;
use crate::protocol::encoding::CodePage;
use crate::protocol::graphics::ImageOptions;
use crate::protocol::text::{Font, StyleSet};
use crate::render::source::ImageSource;
use crate::transport::Transport;

/// One printer connection plus its pending print job.
#[derive(Debug)]
pub struct CommandSession<T: Transport> {
    transport: T,
    profile: PrinterProfile,
    buffer: CommandBuffer,
    /// Font of the last buffered style, for block text wrapping
    font: Font,
}

impl<T: Transport> CommandSession<T> {
    /// Session for a generic 80mm printer.
    pub fn new(transport: T) -> Self {
        Self::with_profile(transport, PrinterProfile::default())
    }

    pub fn with_profile(transport: T, profile: PrinterProfile) -> Self {
        debug!(transport = %transport.describe(), profile = profile.name, "session opened");
        Self {
            transport,
            profile,
            buffer: CommandBuffer::new(),
            font: Font::A,
        }
    }

    fn push(&mut self, directive: Directive) {
        debug!(directive = %directive.describe(), "buffered");
        self.buffer.push(directive);
    }

    fn push_checked(
        &mut self,
        directive: Result<Directive, DirectiveError>,
    ) -> Result<(), DirectiveError> {
        match directive {
            Ok(d) => {
                self.push(d);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "directive rejected");
                Err(e)
            }
        }
    }

    // ===== Text =====

    /// Text without a trailing newline.
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.push(Directive::Text(text.into()));
    }

    /// Text followed by a newline.
    pub fn append_line(&mut self, text: impl Into<String>) {
        self.push(Directive::TextLine(text.into()));
    }

    /// Word-wrapped text. `None` wraps at the profile's line width for the
    /// font of the last [`set_style`](Self::set_style).
    pub fn append_block_text(
        &mut self,
        text: impl Into<String>,
        columns: Option<usize>,
    ) -> Result<(), DirectiveError> {
        let directive = Directive::block_text(text, columns, &self.profile, self.font);
        self.push_checked(directive)
    }

    // ===== Graphics =====

    /// Decode, scale to the paper and dither an image now; print it on flush.
    pub fn append_image(
        &mut self,
        source: impl Into<ImageSource>,
        options: &ImageOptions,
    ) -> Result<(), DirectiveError> {
        let directive = Directive::image(&source.into(), options, &self.profile);
        self.push_checked(directive)
    }

    pub fn append_qr(
        &mut self,
        content: impl Into<String>,
        options: &QrOptions,
    ) -> Result<(), DirectiveError> {
        let directive = Directive::qr(content, options, &self.profile);
        self.push_checked(directive)
    }

    pub fn append_barcode(
        &mut self,
        code: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<(), DirectiveError> {
        let directive = Directive::barcode(code, symbology, options);
        self.push_checked(directive)
    }

    // ===== Printer State =====

    /// Replace the text style for everything appended after this call.
    pub fn set_style(&mut self, style: &StyleSet) -> Result<(), DirectiveError> {
        let directive = Directive::style(style);
        self.push_checked(directive)?;
        self.font = style.font;
        Ok(())
    }

    pub fn set_charset(&mut self, codepage: CodePage) {
        self.push(Directive::Charset(codepage));
    }

    /// Character set by name, e.g. `"CP437"` or `"ISO-8859-2"`.
    pub fn set_charset_named(&mut self, name: &str) -> Result<(), DirectiveError> {
        let directive = name.parse::<CodePage>().map(Directive::Charset);
        self.push_checked(directive)
    }

    /// Feed and full cut.
    pub fn cut(&mut self) {
        self.cut_with(CutMode::Full);
    }

    pub fn cut_with(&mut self, mode: CutMode) {
        self.push(Directive::Cut(mode));
    }

    /// Line spacing of `spacing / divisor` inch; `None` restores the default.
    pub fn line_spacing(&mut self, spacing: Option<u8>, divisor: u16) -> Result<(), DirectiveError> {
        let directive = Directive::line_spacing(spacing, divisor);
        self.push_checked(directive)
    }

    /// Bytes sent to the printer untouched.
    pub fn append_raw(&mut self, bytes: impl Into<Vec<u8>>) {
        self.push(Directive::Raw(bytes.into()));
    }

    // ===== Flush =====

    /// Compile the buffer and write it to the printer in one call.
    ///
    /// The buffer is kept either way; call [`reset`](Self::reset) (or use
    /// [`flush_and_reset`](Self::flush_and_reset)) to start a new job.
    pub fn flush(&mut self) -> Result<(), FlushError> {
        let bytes = self.buffer.to_bytes();
        match self.transport.write_raw(&bytes) {
            Ok(()) => {
                info!(
                    transport = %self.transport.describe(),
                    directives = self.buffer.len(),
                    bytes = bytes.len(),
                    "print job sent"
                );
                Ok(())
            }
            Err(e) => {
                warn!(transport = %self.transport.describe(), error = %e, "print job failed");
                Err(e.into())
            }
        }
    }

    /// Flush, then clear the buffer if the write succeeded.
    pub fn flush_and_reset(&mut self) -> Result<(), FlushError> {
        self.flush()?;
        self.reset();
        Ok(())
    }

    /// Drop all buffered directives. The transport is left alone.
    pub fn reset(&mut self) {
        self.buffer = CommandBuffer::new();
        self.font = Font::A;
    }

    // ===== Inspection =====

    pub fn buffer(&self) -> &CommandBuffer {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// One human-readable line per buffered directive
    pub fn queue(&self) -> Vec<String> {
        self.buffer.descriptions()
    }

    /// The bytes the next flush would write
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_bytes()
    }

    pub fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Swap in a new transport, keeping the buffer. Returns the old one.
    pub fn reconnect(&mut self, transport: T) -> T {
        info!(transport = %transport.describe(), "session reconnected");
        std::mem::replace(&mut self.transport, transport)
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
