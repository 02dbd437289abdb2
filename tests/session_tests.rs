//! # Session Tests
//!
//! End-to-end behavior of the factory and the command session: building
//! transports from raw parameters, buffering, and the one-write flush.
//!
//! USB and serial success paths need hardware; those kinds are covered at
//! the parameter level, with [`MemoryTransport`] standing in for the device.

use std::fs;
use std::io::Read;
use std::net::{Ipv4Addr, TcpListener};
use std::thread;

use pretty_assertions::assert_eq;
use recibo::protocol::barcode::{BarcodeOptions, Symbology};
use recibo::protocol::commands::{self, CutMode};
use recibo::protocol::graphics::ImageOptions;
use recibo::protocol::text::{self, Alignment, StyleSet, TextType};
use recibo::transport::{
    self, ConnectionSettings, MemoryTransport, TransportFactory, TransportKind,
    TransportParameters,
};
use recibo::{BuildError, CommandSession, DirectiveError, FlushError, PrinterProfile, Transport};
use tempfile::tempdir;

// ============================================================================
// HELPERS
// ============================================================================

fn memory_session() -> CommandSession<MemoryTransport> {
    CommandSession::new(MemoryTransport::new())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn file_params(path: &std::path::Path) -> TransportParameters {
    TransportParameters::new()
        .with("file", path.to_string_lossy().into_owned())
        .with("flush", "true")
}

/// Four parameter sets, one per kind, that fail validation
fn broken_parameters() -> Vec<(TransportKind, TransportParameters, &'static str)> {
    let mut missing_pid = TransportParameters::defaults(TransportKind::Usb);
    missing_pid.remove("pid");
    vec![
        (TransportKind::Usb, missing_pid, "pid"),
        (
            TransportKind::Network,
            TransportParameters::defaults(TransportKind::Network).with("port", "ninety"),
            "port",
        ),
        (
            TransportKind::Serial,
            TransportParameters::defaults(TransportKind::Serial).with("bytesize", "9"),
            "bytesize",
        ),
        (
            TransportKind::File,
            TransportParameters::new().with("file", "/tmp/x").with("flush", "perhaps"),
            "flush",
        ),
    ]
}

// ============================================================================
// FACTORY
// ============================================================================

#[test]
fn test_valid_parameters_coerce_for_every_kind() {
    let usb = TransportParameters::new()
        .with("vid", "0x28E9")
        .with("pid", "0x0289")
        .with("timeout", "0");
    let settings = ConnectionSettings::from_parameters(TransportKind::Usb, &usb).unwrap();
    assert_eq!(settings.kind(), TransportKind::Usb);

    for kind in TransportKind::ALL {
        let params = TransportParameters::defaults(kind);
        let settings = ConnectionSettings::from_parameters(kind, &params).unwrap();
        assert_eq!(settings.kind(), kind);
    }
}

#[test]
fn test_file_build_then_single_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("receipt.bin");

    let mut factory = TransportFactory::new();
    factory.build_named("File", &file_params(&path)).unwrap();
    let mut session = factory.into_session(PrinterProfile::GENERIC_58MM).unwrap();

    session.append_line("Hello");
    session.cut();
    session.flush().unwrap();
    drop(session);

    let written = fs::read(&path).unwrap();
    assert!(written.starts_with(b"Hello\n"));
    assert!(written.ends_with(&commands::cut_with_feed(CutMode::Full)));
}

#[test]
fn test_network_build_then_single_flush() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).unwrap();
        received
    });

    let params = TransportParameters::new()
        .with("host", "127.0.0.1")
        .with("port", port.to_string())
        .with("timeout", "5");
    let device = transport::connect(TransportKind::Network, &params).unwrap();
    assert_eq!(device.kind(), TransportKind::Network);

    let mut session = CommandSession::new(device);
    session.append_line("over the wire");
    session.flush().unwrap();
    let mut device = session.into_transport();
    device.close().unwrap();

    assert_eq!(server.join().unwrap(), b"over the wire\n");
}

#[test]
fn test_invalid_parameters_leave_previous_device() {
    let dir = tempdir().unwrap();
    let mut factory = TransportFactory::new();
    factory
        .build(TransportKind::File, &file_params(&dir.path().join("first.bin")))
        .unwrap();
    let before = factory.get().map(|d| d.describe());

    for (kind, params, key) in broken_parameters() {
        match factory.build(kind, &params) {
            Err(BuildError::InvalidParameters { kind: k, detail }) => {
                assert_eq!(k, kind);
                assert!(detail.contains(key), "{detail}");
            }
            other => panic!("{kind}: expected InvalidParameters, got {other:?}"),
        }
        assert_eq!(factory.get().map(|d| d.describe()), before);
    }
}

#[test]
fn test_connection_failure_names_kind() {
    let dir = tempdir().unwrap();
    let params = file_params(&dir.path().join("no-such-dir").join("lp0"));
    let err = transport::connect(TransportKind::File, &params).unwrap_err();
    assert!(!err.is_configuration_error());
    assert!(err.to_string().starts_with("Failed to connect with File: "));
}

// ============================================================================
// FLUSH
// ============================================================================

#[test]
fn test_flush_is_one_write_for_any_buffer_size() {
    for n in [0usize, 1, 10] {
        let mut session = memory_session();
        for i in 0..n {
            session.append_line(format!("line {i}"));
        }
        session.flush().unwrap();
        assert_eq!(session.transport().write_count(), 1, "{n} directives");
    }
}

#[test]
fn test_reset_then_flush_sends_nothing_old() {
    let mut session = memory_session();
    session.set_style(&StyleSet::new().size(2, 2)).unwrap();
    session.append_line("gone");
    session.cut();
    session.reset();
    assert!(session.is_empty());
    assert!(session.queue().is_empty());

    session.flush().unwrap();
    assert_eq!(session.transport().writes(), &[Vec::<u8>::new()]);
}

#[test]
fn test_failed_flush_retries_same_bytes() {
    let mut session = memory_session();
    session.append_line("total 12.50");
    session.cut();
    let expected = session.to_bytes();

    session.transport_mut().fail_next_write("buffer full");
    let err = session.flush().unwrap_err();
    assert!(matches!(err, FlushError::TransportWriteFailed(_)));
    assert_eq!(session.len(), 2);
    assert_eq!(session.to_bytes(), expected);

    session.flush().unwrap();
    assert_eq!(session.transport().writes(), &[expected]);
}

// ============================================================================
// DIRECTIVES
// ============================================================================

#[test]
fn test_ean13_validation() {
    let mut session = memory_session();
    let opts = BarcodeOptions::default();

    for bad in ["123456", "5901234123458", "59012341234ab"] {
        match session.append_barcode(bad, Symbology::Ean13, &opts) {
            Err(DirectiveError::InvalidBarcodeContent { symbology, .. }) => {
                assert_eq!(symbology, Symbology::Ean13)
            }
            other => panic!("{bad}: unexpected {other:?}"),
        }
    }
    assert!(session.is_empty());

    session
        .append_barcode("5901234123457", Symbology::Ean13, &opts)
        .unwrap();
    assert_eq!(session.queue(), vec!["Print EAN13 barcode: 5901234123457"]);
}

#[test]
fn test_style_is_not_retroactive() {
    let mut session = memory_session();
    session.append_text("A");
    session.set_style(&StyleSet::new().size(2, 1)).unwrap();
    session.append_text("B");

    let style = StyleSet::new().size(2, 1).to_commands();
    let bytes = session.to_bytes();
    let mut expected = b"A".to_vec();
    expected.extend(&style);
    expected.push(b'B');
    assert_eq!(bytes, expected);
    assert!(find(&style, &text::size(2, 1)).is_some());
}

#[test]
fn test_unreadable_image_is_rejected() {
    let dir = tempdir().unwrap();
    let mut session = memory_session();
    session.append_line("before");

    let missing = dir.path().join("logo.png");
    let err = session
        .append_image(missing.as_path(), &ImageOptions::default())
        .unwrap_err();
    assert!(matches!(err, DirectiveError::ImageUnreadable(_)));

    let garbage = dir.path().join("garbage.png");
    fs::write(&garbage, b"not an image").unwrap();
    assert!(session.append_image(garbage.as_path(), &ImageOptions::default()).is_err());

    assert_eq!(session.queue(), vec!["Print line: before"]);
}

#[test]
fn test_line_spacing_is_passed_through() {
    let mut session = memory_session();
    session.line_spacing(Some(50), 180).unwrap();
    session.line_spacing(Some(20), 60).unwrap();
    session.line_spacing(None, 180).unwrap();
    assert!(matches!(
        session.line_spacing(Some(20), 72),
        Err(DirectiveError::InvalidArgument(_))
    ));
    assert_eq!(session.len(), 3);
    assert!(session.to_bytes().ends_with(&commands::line_spacing_default()));
}

// ============================================================================
// END TO END
// ============================================================================

#[test]
fn test_styled_hello_and_cut() {
    // Parameters as a connection form would submit them
    let usb = TransportParameters::new()
        .with("vid", "0x28E9")
        .with("pid", "0x0289")
        .with("timeout", "0");
    assert!(ConnectionSettings::from_parameters(TransportKind::Usb, &usb).is_ok());

    let mut session = CommandSession::with_profile(MemoryTransport::new(), PrinterProfile::QR701);
    let style = StyleSet::new()
        .align(Alignment::Center)
        .text_type(TextType::BoldUnderline)
        .size(4, 4);
    session.set_style(&style).unwrap();
    session.append_line("Hello!");
    session.cut();

    assert_eq!(
        session.queue(),
        vec!["Set new text parameters", "Print line: Hello!", "Cut paper"]
    );

    session.flush().unwrap();
    let writes = session.transport().writes();
    assert_eq!(writes.len(), 1);

    let mut expected = style.to_commands();
    expected.extend_from_slice(b"Hello!\n");
    expected.extend(commands::cut_with_feed(CutMode::Full));
    assert_eq!(writes[0], expected);
}
