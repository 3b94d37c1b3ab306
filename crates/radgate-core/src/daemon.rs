// ── Daemon section: payload split and bus/GPIO derivation ──
//
// The daemon endpoint reports one blob covering both the daemon process
// configuration and the radio front-end's control bus (an SPI-like bus
// plus GPIO control lines: IRQ, BUSY, NRST, TX EN, RX EN). The device has
// no schema for this split -- group membership is decided by a key
// heuristic, with an explicit `spi` sub-object taken as the bus seed.

use serde_json::{Map, Value};

use crate::payload;
use crate::section::SectionModel;
use radgate_api::RawBody;
use serde::{Deserialize, Serialize};

/// Daemon-config side of the split.
#[derive(Debug, Clone, PartialEq)]
pub enum DaemonContent {
    /// Structured entries (everything not classified into the bus group).
    Entries(Map<String, Value>),
    /// No object could be formed at all: the raw text, surfaced verbatim.
    Raw(String),
    /// Nothing to show.
    Empty,
}

impl DaemonContent {
    /// Render the daemon group for display, with sensitive values redacted.
    pub fn display(&self) -> String {
        match self {
            Self::Entries(map) => {
                serde_json::to_string_pretty(&redact(&Value::Object(map.clone())))
                    .unwrap_or_default()
            }
            Self::Raw(text) => text.clone(),
            Self::Empty => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Result of splitting one daemon payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonSplit {
    pub daemon: DaemonContent,
    /// Raw bus group (explicit `spi.*` entries seeded first, heuristic
    /// hits merged after). Field derivation happens in [`BusSettings`].
    pub bus_source: Map<String, Value>,
}

impl DaemonSplit {
    pub fn bus(&self) -> BusSettings {
        BusSettings::from_source(&self.bus_source)
    }
}

/// Split a raw daemon response body.
pub fn split_body(body: &RawBody) -> DaemonSplit {
    match body {
        RawBody::Json(value) => split_payload(value),
        RawBody::Text(text) => split_payload(&Value::String(text.clone())),
    }
}

/// Unwrap the daemon envelope: `data`, then `config`, then `content`.
fn unwrap_any(value: &Value) -> &Value {
    if let Value::Object(map) = value {
        for key in ["data", "config", "content"] {
            if let Some(inner) = map.get(key) {
                return inner;
            }
        }
    }
    value
}

/// Split one payload into daemon-config and bus groups.
pub fn split_payload(value: &Value) -> DaemonSplit {
    let raw = unwrap_any(value);

    let obj = match raw {
        Value::Object(map) => Some(map.clone()),
        Value::String(text) => payload::normalize_text(text),
        _ => None,
    };

    let Some(obj) = obj else {
        // Nothing structured: surface the text verbatim in the daemon
        // group and leave the bus group empty.
        let daemon = match raw {
            Value::String(text) if !text.trim().is_empty() => DaemonContent::Raw(text.clone()),
            Value::Null | Value::String(_) => DaemonContent::Empty,
            other => DaemonContent::Raw(other.to_string()),
        };
        return DaemonSplit {
            daemon,
            bus_source: Map::new(),
        };
    };

    // Explicit `spi` sub-object seeds the bus group.
    let mut bus_source = match obj.get("spi") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let mut daemon = Map::new();
    for (key, val) in &obj {
        if key == "spi" {
            continue;
        }
        if is_bus_key(key) {
            // Heuristic hits never override explicit seed entries.
            bus_source.entry(key.clone()).or_insert_with(|| val.clone());
        } else {
            daemon.insert(key.clone(), val.clone());
        }
    }

    let daemon = if daemon.is_empty() {
        DaemonContent::Empty
    } else {
        DaemonContent::Entries(daemon)
    };

    DaemonSplit { daemon, bus_source }
}

/// Bus-membership heuristic: bus-name substring, `gpio` prefix, control
/// line keywords, or one of the well-known bus field names.
fn is_bus_key(key: &str) -> bool {
    let k = key.trim().to_ascii_lowercase();
    if k.contains("spi") || k.starts_with("gpio") {
        return true;
    }
    if ["irq", "busy", "nrst", "reset", "tx_en", "txen", "rx_en", "rxen"]
        .iter()
        .any(|w| k.contains(w))
    {
        return true;
    }
    [
        "miso",
        "mosi",
        "sck",
        "clk",
        "cs",
        "chipselect",
        "baud",
        "speed",
        "mode",
    ]
    .contains(&k.as_str())
}

// ── Value helpers ───────────────────────────────────────────────────

/// Scalar-to-string for bus fields: trimmed non-empty strings, and numbers
/// truncated to their integer part. Anything else is absent.
fn get_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| format!("{}", f.trunc() as i64))
            }
        }
        _ => None,
    }
}

/// Resolve a possibly-dotted path (`gpio.irq.chip`) inside a document.
fn resolve_path<'a>(src: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = src.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// First resolvable name wins.
fn lookup(src: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| resolve_path(src, name).and_then(get_str))
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Parse `spiN.M` with an optional `/dev/` prefix into `(spiN, M)`.
fn parse_spi_path(dev: &str) -> Option<(String, String)> {
    let rest = dev.strip_prefix("/dev/").unwrap_or(dev);
    let tail = rest.strip_prefix("spi")?;
    let (num, cs) = tail.split_once('.')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if all_digits(num) && all_digits(cs) {
        Some((format!("spi{num}"), cs.to_string()))
    } else {
        None
    }
}

/// Derive the SPI device path: a direct path field when present, else
/// composed from separate port + chip-select numbers. Bare `spiN.M`
/// gains the `/dev/` prefix.
fn build_spi_device(src: &Map<String, Value>) -> Option<String> {
    let mut dev = lookup(
        src,
        &["spi_device", "device", "dev", "path", "spi.device", "spi.dev"],
    );

    if dev.is_none() {
        let port = lookup(src, &["spi_port", "port", "spi.port"]).map(|s| digits(&s));
        let cs = lookup(src, &["spi_cs", "cs", "chipselect", "spi.cs"]).map(|s| digits(&s));
        if let (Some(p), Some(c)) = (port, cs) {
            if !p.is_empty() && !c.is_empty() {
                dev = Some(format!("/dev/spi{p}.{c}"));
            }
        }
    }

    if let Some(ref d) = dev {
        if let Some((chip, pin)) = parse_spi_path(d) {
            return Some(format!("/dev/{chip}.{pin}"));
        }
    }
    dev
}

/// Normalize a GPIO chip identifier: a bare number becomes `gpiochipN`,
/// a `/dev/gpiochipN` path loses the prefix, anything else passes through.
fn norm_chip(raw: &str) -> String {
    let s = raw.trim();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return format!("gpiochip{s}");
    }
    let bare = s.strip_prefix("/dev/").unwrap_or(s);
    if bare
        .strip_prefix("gpiochip")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    {
        return bare.to_string();
    }
    s.to_string()
}

// ── Bus settings model ──────────────────────────────────────────────

/// The peripheral-bus group: SPI chip/select plus one chip+line pair per
/// control line of the half-duplex radio front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusSettings {
    pub spi_chip: Option<String>,
    pub spi_pin: Option<String>,
    pub gpio_irq_chip: Option<String>,
    pub gpio_irq_pin: Option<String>,
    pub gpio_busy_chip: Option<String>,
    pub gpio_busy_pin: Option<String>,
    pub gpio_nrst_chip: Option<String>,
    pub gpio_nrst_pin: Option<String>,
    pub gpio_tx_en_chip: Option<String>,
    pub gpio_tx_en_pin: Option<String>,
    pub gpio_rx_en_chip: Option<String>,
    pub gpio_rx_en_pin: Option<String>,
}

impl BusSettings {
    /// Derive typed bus fields from the raw bus group.
    pub fn from_source(src: &Map<String, Value>) -> Self {
        let device = build_spi_device(src);
        let split = device.as_deref().and_then(parse_spi_path);

        let spi_chip = split.as_ref().map(|(chip, _)| chip.clone()).or_else(|| {
            lookup(src, &["spi_port", "port", "spi.port"])
                .map(|s| digits(&s))
                .filter(|p| !p.is_empty())
                .map(|p| format!("spi{p}"))
        });
        let spi_pin = split.map(|(_, pin)| pin).or_else(|| {
            lookup(src, &["spi_cs", "cs", "chipselect", "spi.cs"])
                .map(|s| digits(&s))
                .filter(|c| !c.is_empty())
        });

        let chip = |names: &[&str]| lookup(src, names).map(|s| norm_chip(&s));
        let pin = |names: &[&str]| lookup(src, names);

        Self {
            spi_chip,
            spi_pin,
            gpio_irq_chip: chip(&[
                "gpio_irq_chip",
                "irq_chip",
                "gpio.irq.chip",
                "gpio_irq_port",
                "irq_port",
                "gpio.irq.port",
            ]),
            gpio_irq_pin: pin(&["gpio_irq_pin", "irq_pin", "gpio.irq.pin"]),
            gpio_busy_chip: chip(&[
                "gpio_busy_chip",
                "busy_chip",
                "gpio.busy.chip",
                "gpio_busy_port",
                "busy_port",
                "gpio.busy.port",
            ]),
            gpio_busy_pin: pin(&["gpio_busy_pin", "busy_pin", "gpio.busy.pin"]),
            gpio_nrst_chip: chip(&[
                "gpio_nrst_chip",
                "nrst_chip",
                "reset_chip",
                "gpio.nrst.chip",
                "gpio.reset.chip",
                "gpio_nrst_port",
                "nrst_port",
                "gpio.nrst.port",
                "gpio.reset.port",
            ]),
            gpio_nrst_pin: pin(&[
                "gpio_nrst_pin",
                "nrst_pin",
                "reset_pin",
                "gpio.nrst.pin",
                "gpio.reset.pin",
            ]),
            gpio_tx_en_chip: chip(&[
                "gpio_tx_en_chip",
                "tx_en_chip",
                "gpio.tx_en.chip",
                "gpio.txen.chip",
                "gpio_tx_en_port",
                "tx_en_port",
                "gpio.tx_en.port",
                "gpio.txen.port",
            ]),
            gpio_tx_en_pin: pin(&[
                "gpio_tx_en_pin",
                "tx_en_pin",
                "gpio.tx_en.pin",
                "gpio.txen.pin",
            ]),
            gpio_rx_en_chip: chip(&[
                "gpio_rx_en_chip",
                "rx_en_chip",
                "gpio.rx_en.chip",
                "gpio.rxen.chip",
                "gpio_rx_en_port",
                "rx_en_port",
                "gpio.rx_en.port",
                "gpio.rxen.port",
            ]),
            gpio_rx_en_pin: pin(&[
                "gpio_rx_en_pin",
                "rx_en_pin",
                "gpio.rx_en.pin",
                "gpio.rxen.pin",
            ]),
        }
    }

    fn fields(&self) -> [&Option<String>; 12] {
        [
            &self.spi_chip,
            &self.spi_pin,
            &self.gpio_irq_chip,
            &self.gpio_irq_pin,
            &self.gpio_busy_chip,
            &self.gpio_busy_pin,
            &self.gpio_nrst_chip,
            &self.gpio_nrst_pin,
            &self.gpio_tx_en_chip,
            &self.gpio_tx_en_pin,
            &self.gpio_rx_en_chip,
            &self.gpio_rx_en_pin,
        ]
    }

    /// All fields present and non-empty -- required before a save may even
    /// be considered.
    pub fn is_complete(&self) -> bool {
        self.fields()
            .iter()
            .all(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Outbound apply payload, canonical wire names.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        const NAMES: [&str; 12] = [
            "spi_chip",
            "spi_pin",
            "gpio_irq_chip",
            "gpio_irq_pin",
            "gpio_busy_chip",
            "gpio_busy_pin",
            "gpio_nrst_chip",
            "gpio_nrst_pin",
            "gpio_tx_en_chip",
            "gpio_tx_en_pin",
            "gpio_rx_en_chip",
            "gpio_rx_en_pin",
        ];
        NAMES
            .iter()
            .zip(self.fields())
            .map(|(name, value)| (*name, value.clone().unwrap_or_default()))
            .collect()
    }
}

impl SectionModel for BusSettings {
    fn has_server_data(&self) -> bool {
        self.fields().iter().any(|f| f.is_some())
    }

    fn differs(&self, current: &Self) -> bool {
        // A field the server never reported counts as different once the
        // operator fills it in.
        let norm = |fs: [&Option<String>; 12]| {
            fs.map(|f| f.as_deref().map(str::trim).map(str::to_string))
        };
        norm(self.fields()) != norm(current.fields())
    }
}

// ── Display redaction ───────────────────────────────────────────────

const SENSITIVE: [&str; 5] = ["pass", "password", "secret", "key", "token"];

fn is_sensitive_key(key: &str) -> bool {
    let k = key.to_ascii_lowercase();
    SENSITIVE.iter().any(|w| k.contains(w))
}

/// Recursively replace values of sensitive-looking keys for display.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    if is_sensitive_key(k) {
                        (k.clone(), Value::String("\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}".into()))
                    } else {
                        (k.clone(), redact(v))
                    }
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn splits_heuristic_keys_into_bus_group() {
        let split = split_payload(&json!({
            "loglevel": "debug",
            "announce_interval": 360,
            "spi_device": "/dev/spi0.0",
            "gpio_irq_chip": 1,
            "gpio_irq_pin": 17,
        }));

        let DaemonContent::Entries(daemon) = &split.daemon else {
            panic!("expected entries");
        };
        assert!(daemon.contains_key("loglevel"));
        assert!(daemon.contains_key("announce_interval"));
        assert!(!daemon.contains_key("spi_device"));
        assert!(split.bus_source.contains_key("gpio_irq_chip"));
    }

    #[test]
    fn explicit_spi_object_seeds_bus_and_wins_over_heuristic() {
        let split = split_payload(&json!({
            "spi": { "spi_cs": 0 },
            "spi_cs": 1,
        }));
        // The heuristic `spi_cs` at top level must not override the seed.
        assert_eq!(split.bus_source.get("spi_cs"), Some(&json!(0)));
    }

    #[test]
    fn envelope_keys_tried_in_order() {
        let split = split_payload(&json!({ "config": "loglevel=info\n" }));
        let DaemonContent::Entries(daemon) = &split.daemon else {
            panic!("expected entries");
        };
        assert_eq!(daemon.get("loglevel"), Some(&json!("info")));
    }

    #[test]
    fn unparseable_text_surfaces_verbatim() {
        let split = split_payload(&json!("totally unstructured daemon dump"));
        assert_eq!(
            split.daemon,
            DaemonContent::Raw("totally unstructured daemon dump".into())
        );
        assert!(split.bus_source.is_empty());
    }

    #[test]
    fn bus_fields_from_direct_device_path() {
        let split = split_payload(&json!({ "spi_device": "spi0.1" }));
        let bus = split.bus();
        assert_eq!(bus.spi_chip.as_deref(), Some("spi0"));
        assert_eq!(bus.spi_pin.as_deref(), Some("1"));
    }

    #[test]
    fn bus_device_composed_from_port_and_cs() {
        let split = split_payload(&json!({ "spi_port": "1", "spi_cs": 0 }));
        let bus = split.bus();
        assert_eq!(bus.spi_chip.as_deref(), Some("spi1"));
        assert_eq!(bus.spi_pin.as_deref(), Some("0"));
    }

    #[test]
    fn chip_identifier_normalization() {
        assert_eq!(norm_chip("1"), "gpiochip1");
        assert_eq!(norm_chip("/dev/gpiochip0"), "gpiochip0");
        assert_eq!(norm_chip("gpiochip2"), "gpiochip2");
        assert_eq!(norm_chip("custom-chip"), "custom-chip");
    }

    #[test]
    fn nested_gpio_paths_resolve() {
        let split = split_payload(&json!({
            "gpio": { "irq": { "chip": 1, "pin": 17 }, "busy": { "chip": "/dev/gpiochip1", "pin": "18" } },
        }));
        let bus = split.bus();
        assert_eq!(bus.gpio_irq_chip.as_deref(), Some("gpiochip1"));
        assert_eq!(bus.gpio_irq_pin.as_deref(), Some("17"));
        assert_eq!(bus.gpio_busy_chip.as_deref(), Some("gpiochip1"));
        assert_eq!(bus.gpio_busy_pin.as_deref(), Some("18"));
    }

    #[test]
    fn historical_port_variants_feed_chip_slots() {
        let split = split_payload(&json!({ "gpio_nrst_port": 0, "nrst_pin": 22 }));
        let bus = split.bus();
        assert_eq!(bus.gpio_nrst_chip.as_deref(), Some("gpiochip0"));
        assert_eq!(bus.gpio_nrst_pin.as_deref(), Some("22"));
    }

    #[test]
    fn float_identifiers_truncate() {
        let split = split_payload(&json!({ "gpio_busy_pin": 6.9 }));
        assert_eq!(split.bus().gpio_busy_pin.as_deref(), Some("6"));
    }

    #[test]
    fn bus_diff_counts_missing_baseline_fields() {
        let baseline = BusSettings {
            spi_chip: Some("spi0".into()),
            spi_pin: Some("0".into()),
            ..BusSettings::default()
        };
        let mut current = baseline.clone();
        assert!(!baseline.differs(&current));
        current.gpio_irq_chip = Some("gpiochip1".into());
        assert!(baseline.differs(&current));
    }

    #[test]
    fn redaction_masks_sensitive_keys_recursively() {
        let redacted = redact(&json!({
            "identity_path": "/etc/gate/identity",
            "auth_token": "abc123",
            "nested": { "psk_key": "qwerty" },
        }));
        assert_eq!(redacted["identity_path"], json!("/etc/gate/identity"));
        assert_eq!(redacted["auth_token"], json!("\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}"));
        assert_eq!(redacted["nested"]["psk_key"], json!("\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}"));
    }
}
