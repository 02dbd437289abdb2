//! # Connection Parameters
//!
//! Parameters arrive as untyped key/value pairs and are coerced into one
//! of the typed settings structs before a device is touched.
//!
//! ## Parameters by Kind
//!
//! | Kind | Key | Type | Default |
//! |------|-----|------|---------|
//! | USB | `vid` | hex u16 (`0x` optional) | `0x28E9` |
//! | USB | `pid` | hex u16 (`0x` optional) | `0x0289` |
//! | USB | `timeout` | milliseconds, 0 = none | `0` |
//! | Network | `host` | IPv4 literal | `192.168.1.100` |
//! | Network | `port` | 1-65535 | `9100` |
//! | Network | `timeout` | seconds, 0 = none | `60` |
//! | Serial | `port` | device path | `/dev/ttyS0` |
//! | Serial | `baudrate` | > 0 | `9600` |
//! | Serial | `bytesize` | 5, 6, 7, 8 | `8` |
//! | Serial | `timeout` | seconds, 0 = none | `1` |
//! | Serial | `parity` | N, E, O, M, S | `N` |
//! | Serial | `stopbits` | 1, 1.5, 2 | `1` |
//! | Serial | `xonoff` | boolean | `false` |
//! | Serial | `dsrdtr` | boolean | `true` |
//! | File | `file` | path | `/dev/usb/lp0` |
//! | File | `flush` | boolean | `true` |
//!
//! Booleans accept native JSON booleans or `true/false/1/0/yes/no/on/off`.
//! The defaults are only applied on request ([`TransportParameters::defaults`],
//! [`ConnectionConfig::resolved_params`]); a missing key passed straight to
//! [`ConnectionSettings::from_parameters`] is an error.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::TransportKind;
use crate::error::BuildError;

// ===== Raw Values =====

/// One untyped parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    /// Textual form used for coercion
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawValue::Flag(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Text(s) => Cow::Borrowed(s.trim()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Flag(b)
    }
}

impl From<u16> for RawValue {
    fn from(n: u16) -> Self {
        RawValue::Number(n.into())
    }
}

impl From<u32> for RawValue {
    fn from(n: u32) -> Self {
        RawValue::Number(n.into())
    }
}

impl From<u64> for RawValue {
    fn from(n: u64) -> Self {
        RawValue::Number(n.into())
    }
}

// ===== Parameter Map =====

/// Ordered map of parameter name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportParameters {
    values: BTreeMap<String, RawValue>,
}

impl TransportParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &TransportParameters) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }

    /// The values a connection form starts out with for `kind`.
    pub fn defaults(kind: TransportKind) -> Self {
        match kind {
            TransportKind::Usb => Self::new()
                .with("vid", "0x28E9")
                .with("pid", "0x0289")
                .with("timeout", "0"),
            TransportKind::Network => Self::new()
                .with("host", "192.168.1.100")
                .with("port", "9100")
                .with("timeout", "60"),
            TransportKind::Serial => Self::new()
                .with("port", "/dev/ttyS0")
                .with("baudrate", "9600")
                .with("bytesize", "8")
                .with("timeout", "1")
                .with("parity", "N")
                .with("stopbits", "1")
                .with("xonoff", false)
                .with("dsrdtr", true),
            TransportKind::File => Self::new()
                .with("file", "/dev/usb/lp0")
                .with("flush", true),
        }
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for TransportParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn known_keys(kind: TransportKind) -> &'static [&'static str] {
    match kind {
        TransportKind::Usb => &["vid", "pid", "timeout"],
        TransportKind::Network => &["host", "port", "timeout"],
        TransportKind::Serial => &[
            "port", "baudrate", "bytesize", "timeout", "parity", "stopbits", "xonoff", "dsrdtr",
        ],
        TransportKind::File => &["file", "flush"],
    }
}

// ===== Coercion =====

struct Reader<'a> {
    kind: TransportKind,
    params: &'a TransportParameters,
}

impl<'a> Reader<'a> {
    fn invalid(&self, detail: impl Into<String>) -> BuildError {
        BuildError::invalid(self.kind, detail)
    }

    fn text(&self, key: &str) -> Result<Cow<'a, str>, BuildError> {
        let value = self
            .params
            .get(key)
            .ok_or_else(|| self.invalid(format!("missing parameter '{key}'")))?;
        let text = value.as_text();
        if text.is_empty() {
            return Err(self.invalid(format!("parameter '{key}' is empty")));
        }
        Ok(text)
    }

    fn parse<F: FromStr>(&self, key: &str, expected: &str) -> Result<F, BuildError> {
        let text = self.text(key)?;
        text.parse()
            .map_err(|_| self.invalid(format!("{key} must be {expected}, got '{text}'")))
    }

    fn hex_u16(&self, key: &str) -> Result<u16, BuildError> {
        let text = self.text(key)?;
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text.as_ref());
        let invalid = || self.invalid(format!("{key} must be a 16-bit hex number, got '{text}'"));
        // from_str_radix alone would take a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u16::from_str_radix(digits, 16).map_err(|_| invalid())
    }

    fn flag(&self, key: &str) -> Result<bool, BuildError> {
        if let Some(RawValue::Flag(b)) = self.params.get(key) {
            return Ok(*b);
        }
        let text = self.text(key)?;
        match text.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(self.invalid(format!("{key} must be a boolean, got '{text}'"))),
        }
    }

    /// Non-negative timeout; 0 disables it
    fn timeout(&self, key: &str, unit: fn(u64) -> Duration) -> Result<Option<Duration>, BuildError> {
        let n: u64 = self.parse(key, "a non-negative integer")?;
        Ok((n > 0).then(|| unit(n)))
    }

    fn warn_unknown(&self) {
        let known = known_keys(self.kind);
        for (key, _) in self.params.iter() {
            if !known.contains(&key) {
                warn!(kind = %self.kind, key, "ignoring unknown connection parameter");
            }
        }
    }
}

// ===== Typed Settings =====

/// USB printer addressed by vendor and product ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbSettings {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Bulk transfer timeout; `None` waits forever
    pub timeout: Option<Duration>,
}

impl UsbSettings {
    fn read(r: &Reader<'_>) -> Result<Self, BuildError> {
        Ok(Self {
            vendor_id: r.hex_u16("vid")?,
            product_id: r.hex_u16("pid")?,
            timeout: r.timeout("timeout", Duration::from_millis)?,
        })
    }
}

/// Raw TCP printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Connect and write timeout; `None` blocks
    pub timeout: Option<Duration>,
}

impl NetworkSettings {
    fn read(r: &Reader<'_>) -> Result<Self, BuildError> {
        let host = r.parse("host", "an IPv4 address")?;
        let port: u32 = r.parse("port", "an integer")?;
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| r.invalid(format!("port must be 1-65535, got {port}")))?;
        Ok(Self {
            host,
            port,
            timeout: r.timeout("timeout", Duration::from_secs)?,
        })
    }
}

/// Serial parity as written in connection forms (`N`, `E`, `O`, `M`, `S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerialParity {
    #[default]
    None,
    Even,
    Odd,
    Mark,
    Space,
}

impl FromStr for SerialParity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "N" | "NONE" => Ok(SerialParity::None),
            "E" | "EVEN" => Ok(SerialParity::Even),
            "O" | "ODD" => Ok(SerialParity::Odd),
            "M" | "MARK" => Ok(SerialParity::Mark),
            "S" | "SPACE" => Ok(SerialParity::Space),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerialStopBits {
    #[default]
    One,
    OnePointFive,
    Two,
}

impl FromStr for SerialStopBits {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "1.0" => Ok(SerialStopBits::One),
            "1.5" => Ok(SerialStopBits::OnePointFive),
            "2" | "2.0" => Ok(SerialStopBits::Two),
            _ => Err(()),
        }
    }
}

/// Serial port settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub path: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: SerialParity,
    pub stop_bits: SerialStopBits,
    /// Read/write timeout; `None` means no practical limit
    pub timeout: Option<Duration>,
    /// Software flow control
    pub xonxoff: bool,
    /// Hardware flow control
    pub dsrdtr: bool,
}

impl SerialSettings {
    fn read(r: &Reader<'_>) -> Result<Self, BuildError> {
        let baud_rate: u32 = r.parse("baudrate", "a positive integer")?;
        if baud_rate == 0 {
            return Err(r.invalid("baudrate must be positive"));
        }
        let data_bits: u8 = r.parse("bytesize", "5, 6, 7 or 8")?;
        if !(5..=8).contains(&data_bits) {
            return Err(r.invalid(format!("bytesize must be 5, 6, 7 or 8, got {data_bits}")));
        }
        Ok(Self {
            path: r.text("port")?.into_owned(),
            baud_rate,
            data_bits,
            parity: r.parse("parity", "one of N, E, O, M, S")?,
            stop_bits: r.parse("stopbits", "1, 1.5 or 2")?,
            timeout: r.timeout("timeout", Duration::from_secs)?,
            xonxoff: r.flag("xonoff")?,
            dsrdtr: r.flag("dsrdtr")?,
        })
    }
}

/// Device file (e.g. a Linux `usblp` node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSettings {
    pub path: PathBuf,
    /// Flush after every write
    pub auto_flush: bool,
}

impl FileSettings {
    fn read(r: &Reader<'_>) -> Result<Self, BuildError> {
        Ok(Self {
            path: PathBuf::from(r.text("file")?.as_ref()),
            auto_flush: r.flag("flush")?,
        })
    }
}

/// Fully validated parameters for one connection kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSettings {
    Usb(UsbSettings),
    Network(NetworkSettings),
    Serial(SerialSettings),
    File(FileSettings),
}

impl ConnectionSettings {
    /// Coerce and validate `params` for `kind`.
    ///
    /// Unknown keys are ignored with a warning.
    pub fn from_parameters(
        kind: TransportKind,
        params: &TransportParameters,
    ) -> Result<Self, BuildError> {
        let reader = Reader { kind, params };
        reader.warn_unknown();
        match kind {
            TransportKind::Usb => UsbSettings::read(&reader).map(Self::Usb),
            TransportKind::Network => NetworkSettings::read(&reader).map(Self::Network),
            TransportKind::Serial => SerialSettings::read(&reader).map(Self::Serial),
            TransportKind::File => FileSettings::read(&reader).map(Self::File),
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            ConnectionSettings::Usb(_) => TransportKind::Usb,
            ConnectionSettings::Network(_) => TransportKind::Network,
            ConnectionSettings::Serial(_) => TransportKind::Serial,
            ConnectionSettings::File(_) => TransportKind::File,
        }
    }
}

// ===== Stored Presets =====

/// A saved connection: kind plus parameters, as kept in JSON.
///
/// ```
/// use recibo::transport::{ConnectionConfig, TransportKind};
///
/// let config = ConnectionConfig::from_json(r#"{"kind": "Network", "params": {"host": "10.0.0.5"}}"#)?;
/// assert_eq!(config.kind, TransportKind::Network);
/// // Missing keys are filled from the defaults
/// assert_eq!(config.resolved_params().get("port").unwrap().to_string(), "9100");
/// # Ok::<(), recibo::error::BuildError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub kind: TransportKind,
    #[serde(default)]
    pub params: TransportParameters,
}

impl ConnectionConfig {
    pub fn new(kind: TransportKind, params: TransportParameters) -> Self {
        Self { kind, params }
    }

    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(|e| BuildError::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        serde_json::to_string_pretty(self).map_err(|e| BuildError::InvalidConfig(e.to_string()))
    }

    /// The kind's defaults overlaid with the stored parameters.
    pub fn resolved_params(&self) -> TransportParameters {
        let mut params = TransportParameters::defaults(self.kind);
        params.merge(&self.params);
        params
    }

    pub fn settings(&self) -> Result<ConnectionSettings, BuildError> {
        ConnectionSettings::from_parameters(self.kind, &self.resolved_params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: TransportKind, params: &TransportParameters) -> Result<ConnectionSettings, BuildError> {
        ConnectionSettings::from_parameters(kind, params)
    }

    fn assert_invalid(result: Result<ConnectionSettings, BuildError>, needle: &str) {
        match result {
            Err(BuildError::InvalidParameters { detail, .. }) => {
                assert!(detail.contains(needle), "'{detail}' should mention '{needle}'")
            }
            other => panic!("expected InvalidParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid_for_every_kind() {
        for kind in TransportKind::ALL {
            let s = settings(kind, &TransportParameters::defaults(kind)).unwrap();
            assert_eq!(s.kind(), kind);
        }
    }

    #[test]
    fn test_usb_hex_ids() {
        let params = TransportParameters::new()
            .with("vid", "0x04b8")
            .with("pid", "0202")
            .with("timeout", "500");
        assert_eq!(
            settings(TransportKind::Usb, &params).unwrap(),
            ConnectionSettings::Usb(UsbSettings {
                vendor_id: 0x04B8,
                product_id: 0x0202,
                timeout: Some(Duration::from_millis(500)),
            })
        );
    }

    #[test]
    fn test_usb_rejects_bad_ids() {
        let params = TransportParameters::defaults(TransportKind::Usb).with("vid", "0xZZ");
        assert_invalid(settings(TransportKind::Usb, &params), "vid");

        let params = TransportParameters::defaults(TransportKind::Usb).with("pid", "0x12345");
        assert_invalid(settings(TransportKind::Usb, &params), "pid");

        for signed in ["0x+28E9", "+28E9", "0x-1", "0x"] {
            let params = TransportParameters::defaults(TransportKind::Usb).with("vid", signed);
            assert_invalid(settings(TransportKind::Usb, &params), "vid");
        }
    }

    #[test]
    fn test_missing_parameter() {
        let mut params = TransportParameters::defaults(TransportKind::Usb);
        params.remove("pid");
        assert_invalid(settings(TransportKind::Usb, &params), "missing parameter 'pid'");
    }

    #[test]
    fn test_network_validation() {
        let base = TransportParameters::defaults(TransportKind::Network);

        let s = settings(TransportKind::Network, &base.clone().with("timeout", "0")).unwrap();
        assert!(matches!(s, ConnectionSettings::Network(NetworkSettings { timeout: None, .. })));

        assert_invalid(
            settings(TransportKind::Network, &base.clone().with("host", "printer.local")),
            "IPv4",
        );
        assert_invalid(settings(TransportKind::Network, &base.clone().with("port", "0")), "1-65535");
        assert_invalid(settings(TransportKind::Network, &base.clone().with("port", "70000")), "1-65535");
        assert_invalid(settings(TransportKind::Network, &base.with("timeout", "-1")), "timeout");
    }

    #[test]
    fn test_serial_coercion() {
        let params = TransportParameters::defaults(TransportKind::Serial)
            .with("parity", "e")
            .with("stopbits", "1.5")
            .with("xonoff", "yes")
            .with("dsrdtr", "off")
            .with("bytesize", 7u32);
        let s = settings(TransportKind::Serial, &params).unwrap();
        assert_eq!(
            s,
            ConnectionSettings::Serial(SerialSettings {
                path: "/dev/ttyS0".into(),
                baud_rate: 9600,
                data_bits: 7,
                parity: SerialParity::Even,
                stop_bits: SerialStopBits::OnePointFive,
                timeout: Some(Duration::from_secs(1)),
                xonxoff: true,
                dsrdtr: false,
            })
        );
    }

    #[test]
    fn test_serial_rejects_out_of_range() {
        let base = TransportParameters::defaults(TransportKind::Serial);
        assert_invalid(settings(TransportKind::Serial, &base.clone().with("bytesize", "9")), "bytesize");
        assert_invalid(settings(TransportKind::Serial, &base.clone().with("baudrate", "0")), "baudrate");
        assert_invalid(settings(TransportKind::Serial, &base.clone().with("parity", "X")), "parity");
        assert_invalid(settings(TransportKind::Serial, &base.clone().with("stopbits", "3")), "stopbits");
        assert_invalid(settings(TransportKind::Serial, &base.with("xonoff", "maybe")), "xonoff");
    }

    #[test]
    fn test_file_settings() {
        let params = TransportParameters::new()
            .with("file", "/tmp/out.bin")
            .with("flush", false);
        assert_eq!(
            settings(TransportKind::File, &params).unwrap(),
            ConnectionSettings::File(FileSettings {
                path: PathBuf::from("/tmp/out.bin"),
                auto_flush: false,
            })
        );

        let empty = TransportParameters::new().with("file", "  ").with("flush", true);
        assert_invalid(settings(TransportKind::File, &empty), "empty");
    }

    #[test]
    fn test_parameters_from_json() {
        let params: TransportParameters =
            serde_json::from_str(r#"{"host": "10.0.0.5", "port": 9100, "timeout": "5"}"#).unwrap();
        assert_eq!(params.get("port"), Some(&RawValue::from(9100u32)));
        let s = settings(TransportKind::Network, &params).unwrap();
        assert!(matches!(s, ConnectionSettings::Network(NetworkSettings { port: 9100, .. })));
    }

    #[test]
    fn test_connection_config_round_trip() {
        let config = ConnectionConfig::new(
            TransportKind::File,
            TransportParameters::new().with("file", "/dev/usb/lp1"),
        );
        let json = config.to_json().unwrap();
        assert_eq!(ConnectionConfig::from_json(&json).unwrap(), config);

        let resolved = config.settings().unwrap();
        assert_eq!(
            resolved,
            ConnectionSettings::File(FileSettings {
                path: PathBuf::from("/dev/usb/lp1"),
                auto_flush: true,
            })
        );
    }

    #[test]
    fn test_connection_config_rejects_unknown_kind() {
        let err = ConnectionConfig::from_json(r#"{"kind": "Parallel"}"#).unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig(_)));
        assert!(err.to_string().contains("Parallel"));
    }
}
