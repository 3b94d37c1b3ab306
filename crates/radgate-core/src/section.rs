// ── Section domain types ──
//
// One typed, partial model per configurable section. Extractors populate
// only the keys actually present in the canonical document; render-time
// defaulting belongs to the form layer, not here.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalMap;
use crate::payload::{self, Unwrapped};
use radgate_api::RawBody;

/// A configurable functional area of the appliance. The `id` doubles as
/// the wire path segment: `GET <base>/<id>/info`, `POST <base>/<id>/apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Section {
    Daemon,
    Modem,
    #[strum(serialize = "WiFi")]
    Wifi,
    Ethernet,
}

impl Section {
    /// All sections in sidebar order.
    pub const ALL: [Section; 4] = [Self::Daemon, Self::Modem, Self::Wifi, Self::Ethernet];

    /// Wire path segment.
    pub fn id(self) -> &'static str {
        match self {
            Self::Daemon => "daemon",
            Self::Modem => "modem",
            Self::Wifi => "wifi",
            Self::Ethernet => "ethernet",
        }
    }

    /// Envelope keys this section's responses may be wrapped in, in
    /// priority order. Only the daemon answers with the older
    /// `config`/`content` wrappers.
    pub fn envelope_keys(self) -> &'static [&'static str] {
        match self {
            Self::Daemon => &["data", "config", "content"],
            _ => &["data"],
        }
    }
}

/// Behavior shared by every section's settings model: baseline seeding
/// and the save-gating diff.
pub trait SectionModel: Clone {
    /// Whether at least one recognized field is present and non-empty --
    /// the condition for establishing a server baseline.
    fn has_server_data(&self) -> bool;

    /// Whether `current` differs from `self` under the section's
    /// comparison normalization.
    fn differs(&self, current: &Self) -> bool;
}

// ── Shared helpers ──────────────────────────────────────────────────

fn get(map: &CanonicalMap, key: &str) -> Option<String> {
    map.get(key).map(|v| v.trim().to_string())
}

/// Trimmed view of an optional field, absent treated as empty.
fn t(v: &Option<String>) -> &str {
    v.as_deref().map_or("", str::trim)
}

fn non_empty(v: &Option<String>) -> bool {
    !t(v).is_empty()
}

/// Normalize an addressing-mode value through the synonym set. Anything
/// unrecognized passes through lowered; defaulting to dhcp happens at
/// render time only.
pub fn normalize_ip_config(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "dhcp" | "auto" | "automatic" => "dhcp".to_string(),
        "static" | "manual" | "fixed" => "static".to_string(),
        _ => lowered,
    }
}

/// Run the generic extraction chain for a section: normalize, unwrap the
/// envelope, canonicalize. `None` means "no data" -- the form renders with
/// defaults and no baseline.
pub fn canonical_document(body: &RawBody, section: Section) -> Option<CanonicalMap> {
    let doc = payload::normalize(body)?;
    match payload::unwrap_envelope(doc, section.envelope_keys()) {
        Unwrapped::Document(doc) => Some(crate::canonical::canonicalize(&doc)),
        Unwrapped::NoData => None,
    }
}

// ── WiFi ────────────────────────────────────────────────────────────

/// Wireless radio link settings. `mode` is the radio role (`client` or
/// `ap`), passed through verbatim at this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiSettings {
    pub mode: Option<String>,
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub ip_config: Option<String>,
    pub ip: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
    pub dns1: Option<String>,
    pub dns2: Option<String>,
}

impl WifiSettings {
    pub fn from_canonical(map: &CanonicalMap) -> Self {
        Self {
            mode: get(map, "mode"),
            ssid: get(map, "ssid"),
            password: get(map, "password"),
            ip_config: get(map, "ip_config").map(|v| normalize_ip_config(&v)),
            ip: get(map, "ip"),
            netmask: get(map, "netmask"),
            gateway: get(map, "gateway"),
            dns1: get(map, "dns1"),
            dns2: get(map, "dns2"),
        }
    }

    /// Full extraction chain from a raw response body.
    pub fn extract(body: &RawBody) -> Option<Self> {
        canonical_document(body, Section::Wifi).map(|c| Self::from_canonical(&c))
    }

    /// Render-time defaults: role falls back to `client`, addressing to
    /// `dhcp`, everything else to empty.
    pub fn with_render_defaults(&self) -> Self {
        Self {
            mode: Some(if t(&self.mode) == "ap" { "ap" } else { "client" }.to_string()),
            ssid: Some(t(&self.ssid).to_string()),
            password: Some(self.password.clone().unwrap_or_default()),
            ip_config: Some(
                if t(&self.ip_config) == "static" { "static" } else { "dhcp" }.to_string(),
            ),
            ip: Some(t(&self.ip).to_string()),
            netmask: Some(t(&self.netmask).to_string()),
            gateway: Some(t(&self.gateway).to_string()),
            dns1: Some(t(&self.dns1).to_string()),
            dns2: Some(t(&self.dns2).to_string()),
        }
    }

    /// Outbound apply payload, canonical wire names.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", t(&self.mode).to_string()),
            ("ssid", t(&self.ssid).to_string()),
            ("password", self.password.clone().unwrap_or_default()),
            ("ip_config", t(&self.ip_config).to_string()),
            ("ip", t(&self.ip).to_string()),
            ("netmask", t(&self.netmask).to_string()),
            ("gateway", t(&self.gateway).to_string()),
            ("dns1", t(&self.dns1).to_string()),
            ("dns2", t(&self.dns2).to_string()),
        ]
    }

    /// Comparison form: trimmed, with address fields blanked on both
    /// sides while addressing is dynamic.
    fn comparison_key(&self) -> [String; 8] {
        let is_static = t(&self.ip_config) == "static";
        let addr = |v: &Option<String>| {
            if is_static { t(v).to_string() } else { String::new() }
        };
        [
            t(&self.mode).to_string(),
            t(&self.ssid).to_string(),
            t(&self.ip_config).to_string(),
            addr(&self.ip),
            addr(&self.netmask),
            addr(&self.gateway),
            addr(&self.dns1),
            addr(&self.dns2),
        ]
    }
}

impl SectionModel for WifiSettings {
    fn has_server_data(&self) -> bool {
        non_empty(&self.mode)
            || non_empty(&self.ssid)
            || non_empty(&self.password)
            || non_empty(&self.ip_config)
            || non_empty(&self.ip)
            || non_empty(&self.netmask)
            || non_empty(&self.gateway)
            || non_empty(&self.dns1)
            || non_empty(&self.dns2)
    }

    fn differs(&self, current: &Self) -> bool {
        // The device never echoes the credential back in full, so the
        // comparison is one-directional: an empty submitted credential is
        // never a change on its own.
        let password_changed = t(&self.password) != t(&current.password);
        password_changed || self.comparison_key() != current.comparison_key()
    }
}

// ── Ethernet ────────────────────────────────────────────────────────

/// Wired interface settings -- addressing only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetSettings {
    pub ip_config: Option<String>,
    pub ip: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
    pub dns1: Option<String>,
    pub dns2: Option<String>,
}

impl EthernetSettings {
    pub fn from_canonical(map: &CanonicalMap) -> Self {
        Self {
            ip_config: get(map, "ip_config").map(|v| normalize_ip_config(&v)),
            ip: get(map, "ip"),
            netmask: get(map, "netmask"),
            gateway: get(map, "gateway"),
            dns1: get(map, "dns1"),
            dns2: get(map, "dns2"),
        }
    }

    pub fn extract(body: &RawBody) -> Option<Self> {
        canonical_document(body, Section::Ethernet).map(|c| Self::from_canonical(&c))
    }

    pub fn with_render_defaults(&self) -> Self {
        Self {
            ip_config: Some(
                if t(&self.ip_config) == "static" { "static" } else { "dhcp" }.to_string(),
            ),
            ip: Some(t(&self.ip).to_string()),
            netmask: Some(t(&self.netmask).to_string()),
            gateway: Some(t(&self.gateway).to_string()),
            dns1: Some(t(&self.dns1).to_string()),
            dns2: Some(t(&self.dns2).to_string()),
        }
    }

    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ip_config", t(&self.ip_config).to_string()),
            ("ip", t(&self.ip).to_string()),
            ("netmask", t(&self.netmask).to_string()),
            ("gateway", t(&self.gateway).to_string()),
            ("dns1", t(&self.dns1).to_string()),
            ("dns2", t(&self.dns2).to_string()),
        ]
    }

    fn comparison_key(&self) -> [String; 6] {
        let is_static = t(&self.ip_config) == "static";
        let addr = |v: &Option<String>| {
            if is_static { t(v).to_string() } else { String::new() }
        };
        [
            t(&self.ip_config).to_string(),
            addr(&self.ip),
            addr(&self.netmask),
            addr(&self.gateway),
            addr(&self.dns1),
            addr(&self.dns2),
        ]
    }
}

impl SectionModel for EthernetSettings {
    fn has_server_data(&self) -> bool {
        non_empty(&self.ip_config)
            || non_empty(&self.ip)
            || non_empty(&self.netmask)
            || non_empty(&self.gateway)
            || non_empty(&self.dns1)
            || non_empty(&self.dns2)
    }

    fn differs(&self, current: &Self) -> bool {
        self.comparison_key() != current.comparison_key()
    }
}

// ── Radio modem ─────────────────────────────────────────────────────

pub const MODEM_MODES: [&str; 2] = ["FSK2", "FSK4"];
pub const MODEM_RATES: [&str; 5] = ["500", "200", "100", "50", "20"];
pub const MODEM_LDPC: [&str; 2] = ["768/256", "512/256"];

/// Radio-modem link settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModemSettings {
    pub mode: Option<String>,
    pub rate: Option<String>,
    pub ldpc: Option<String>,
}

impl ModemSettings {
    pub fn from_canonical(map: &CanonicalMap) -> Self {
        Self {
            mode: get(map, "mode").map(|v| v.to_ascii_uppercase()),
            rate: get(map, "rate"),
            ldpc: get(map, "ldpc"),
        }
    }

    pub fn extract(body: &RawBody) -> Option<Self> {
        canonical_document(body, Section::Modem).map(|c| Self::from_canonical(&c))
    }

    /// Render-time defaults snap each field to its enumeration, falling
    /// back to the first member.
    pub fn with_render_defaults(&self) -> Self {
        let mode = t(&self.mode).to_ascii_uppercase();
        let rate = t(&self.rate).to_string();
        let ldpc = t(&self.ldpc).to_string();
        Self {
            mode: Some(if mode == "FSK4" { "FSK4" } else { "FSK2" }.to_string()),
            rate: Some(
                if MODEM_RATES.contains(&rate.as_str()) { rate } else { "500".to_string() },
            ),
            ldpc: Some(if ldpc == "512/256" { "512/256" } else { "768/256" }.to_string()),
        }
    }

    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mode", t(&self.mode).to_string()),
            ("rate", t(&self.rate).to_string()),
            ("ldpc", t(&self.ldpc).to_string()),
        ]
    }
}

impl SectionModel for ModemSettings {
    fn has_server_data(&self) -> bool {
        non_empty(&self.mode) || non_empty(&self.rate) || non_empty(&self.ldpc)
    }

    fn differs(&self, current: &Self) -> bool {
        t(&self.mode).to_ascii_uppercase() != t(&current.mode).to_ascii_uppercase()
            || t(&self.rate) != t(&current.rate)
            || t(&self.ldpc) != t(&current.ldpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canon(pairs: &[(&str, &str)]) -> CanonicalMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn section_ids_are_wire_segments() {
        assert_eq!(Section::Wifi.id(), "wifi");
        assert_eq!(Section::Daemon.id(), "daemon");
        assert_eq!(Section::Wifi.to_string(), "WiFi");
    }

    #[test]
    fn ip_config_synonyms() {
        assert_eq!(normalize_ip_config("AUTO"), "dhcp");
        assert_eq!(normalize_ip_config("automatic"), "dhcp");
        assert_eq!(normalize_ip_config("Manual"), "static");
        assert_eq!(normalize_ip_config("fixed"), "static");
        // Unrecognized passes through lowered -- no defaulting here
        assert_eq!(normalize_ip_config("Bootp"), "bootp");
    }

    #[test]
    fn wifi_extracts_only_present_keys() {
        let model = WifiSettings::from_canonical(&canon(&[
            ("ssid", "HomeNet"),
            ("password", "s3cr3t12"),
        ]));
        assert_eq!(model.ssid.as_deref(), Some("HomeNet"));
        assert_eq!(model.password.as_deref(), Some("s3cr3t12"));
        assert_eq!(model.mode, None);
        assert_eq!(model.ip_config, None);
    }

    #[test]
    fn wifi_extract_from_text_body() {
        let body = RawBody::Text("ssid=HomeNet\npass=\"s3cr3t12\"\n".to_string());
        let model = WifiSettings::extract(&body).expect("model");
        assert_eq!(model.ssid.as_deref(), Some("HomeNet"));
        assert_eq!(model.password.as_deref(), Some("s3cr3t12"));
    }

    #[test]
    fn wifi_render_defaults() {
        let model = WifiSettings::default().with_render_defaults();
        assert_eq!(model.mode.as_deref(), Some("client"));
        assert_eq!(model.ip_config.as_deref(), Some("dhcp"));
        assert_eq!(model.ssid.as_deref(), Some(""));
    }

    #[test]
    fn wifi_dhcp_blanks_address_fields_in_diff() {
        let baseline = WifiSettings {
            mode: Some("client".into()),
            ssid: Some("HomeNet".into()),
            ip_config: Some("dhcp".into()),
            ip: Some("10.0.0.5".into()),
            ..WifiSettings::default()
        };
        // Same settings but a different (inert) address: no difference.
        let mut current = baseline.clone();
        current.ip = Some("192.168.1.99".into());
        assert!(!baseline.differs(&current));

        // Switching to static wakes the address fields up.
        current.ip_config = Some("static".into());
        assert!(baseline.differs(&current));
    }

    #[test]
    fn wifi_empty_submitted_password_is_not_a_change() {
        let baseline = WifiSettings {
            ssid: Some("HomeNet".into()),
            password: Some(String::new()),
            ..WifiSettings::default()
        };
        let current = baseline.clone();
        assert!(!baseline.differs(&current));

        let mut changed = baseline.clone();
        changed.password = Some("newpass99".into());
        assert!(baseline.differs(&changed));
    }

    #[test]
    fn ethernet_extraction_scenario() {
        let body = RawBody::Json(serde_json::json!({
            "ipcfg": "dhcp",
            "address": "10.0.0.5",
        }));
        let model = EthernetSettings::extract(&body).expect("model");
        assert_eq!(model.ip_config.as_deref(), Some("dhcp"));
        assert_eq!(model.ip.as_deref(), Some("10.0.0.5"));

        // In dhcp mode the address is inert: an untouched form reports
        // no difference against the established baseline.
        let rendered = model.with_render_defaults();
        assert!(!rendered.differs(&rendered.clone()));
    }

    #[test]
    fn modem_envelope_scenario() {
        let body = RawBody::Json(serde_json::json!({
            "data": "mode=fsk2\nrate=500\n",
        }));
        let model = ModemSettings::extract(&body).expect("model");
        assert_eq!(model.mode.as_deref(), Some("FSK2"));
        assert_eq!(model.rate.as_deref(), Some("500"));
    }

    #[test]
    fn modem_mode_compares_case_insensitively() {
        let a = ModemSettings {
            mode: Some("fsk2".into()),
            rate: Some("500".into()),
            ldpc: Some("768/256".into()),
        };
        let b = ModemSettings {
            mode: Some("FSK2".into()),
            ..a.clone()
        };
        assert!(!a.differs(&b));
    }

    #[test]
    fn has_server_data_requires_a_non_empty_field() {
        assert!(!WifiSettings::default().has_server_data());
        let empty_strings = WifiSettings {
            ssid: Some(String::new()),
            ..WifiSettings::default()
        };
        assert!(!empty_strings.has_server_data());
        let populated = WifiSettings {
            ssid: Some("HomeNet".into()),
            ..WifiSettings::default()
        };
        assert!(populated.has_server_data());
    }
}
