// ── Key canonicalization ──
//
// Device firmware has gone through several generations of field naming.
// This module maps every historical spelling onto one canonical vocabulary
// so the section extractors only ever see canonical keys.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Ordered mapping from canonical field name to string-coerced value.
///
/// Insertion order follows the source payload, which matters for the
/// repeated-DNS redirect rule.
pub type CanonicalMap = IndexMap<String, String>;

/// Alias table: historical/alternate key → canonical key.
///
/// Keys are matched after lower-casing and trimming. Anything not listed
/// passes through under its own lowered name.
const ALIASES: &[(&str, &str)] = &[
    // Addressing
    ("ipcfg", "ip_config"),
    ("ip_config", "ip_config"),
    ("addrmode", "ip_config"),
    ("address", "ip"),
    ("ipaddr", "ip"),
    ("ip", "ip"),
    ("mask", "netmask"),
    ("netmask", "netmask"),
    ("gateway", "gateway"),
    ("gw", "gateway"),
    ("dns", "dns1"),
    ("dns1", "dns1"),
    ("dns2", "dns2"),
    // Wireless
    ("mode", "mode"),
    ("ssid", "ssid"),
    ("pass", "password"),
    ("password", "password"),
    ("psk", "password"),
    ("key", "password"),
    // Radio modem
    ("modem_mode", "mode"),
    ("modem_rate", "rate"),
    ("modem_ldpc", "ldpc"),
    ("rate", "rate"),
    ("ldpc", "ldpc"),
];

fn canonical_target(key: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, target)| *target)
}

/// Coerce a JSON scalar to its string form. Strings are trimmed; nested
/// structures are serialized so nothing is silently lost.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Rewrite a document onto the canonical vocabulary.
///
/// A second entry aliased to an already-populated `dns1` slot is redirected
/// to `dns2` instead of overwriting -- the device reports its resolvers as
/// repeated `dns` keys, and the first one wins the primary slot.
pub fn canonicalize(doc: &Map<String, Value>) -> CanonicalMap {
    let mut out = CanonicalMap::new();

    for (raw_key, value) in doc {
        let lowered = raw_key.trim().to_ascii_lowercase();
        let target = canonical_target(&lowered).unwrap_or(lowered.as_str());
        let coerced = coerce_string(value);

        if target == "dns1" && out.contains_key("dns1") {
            out.insert("dns2".to_string(), coerced);
        } else {
            out.insert(target.to_string(), coerced);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect()
    }

    #[test]
    fn aliases_map_to_canonical_names() {
        let canon = canonicalize(&doc(&[
            ("ipcfg", "dhcp"),
            ("ipaddr", "10.0.0.5"),
            ("mask", "255.255.255.0"),
            ("gw", "10.0.0.1"),
            ("psk", "hunter22"),
        ]));
        assert_eq!(canon.get("ip_config").map(String::as_str), Some("dhcp"));
        assert_eq!(canon.get("ip").map(String::as_str), Some("10.0.0.5"));
        assert_eq!(canon.get("netmask").map(String::as_str), Some("255.255.255.0"));
        assert_eq!(canon.get("gateway").map(String::as_str), Some("10.0.0.1"));
        assert_eq!(canon.get("password").map(String::as_str), Some("hunter22"));
    }

    #[test]
    fn unknown_keys_pass_through_lowered() {
        let canon = canonicalize(&doc(&[("Country", "NZ")]));
        assert_eq!(canon.get("country").map(String::as_str), Some("NZ"));
    }

    #[test]
    fn repeated_dns_lands_in_secondary_slot() {
        // `dns` and `dns1` both alias to dns1; the second hit must not
        // overwrite the first.
        let canon = canonicalize(&doc(&[("dns", "8.8.8.8"), ("dns1", "1.1.1.1")]));
        assert_eq!(canon.get("dns1").map(String::as_str), Some("8.8.8.8"));
        assert_eq!(canon.get("dns2").map(String::as_str), Some("1.1.1.1"));
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let first = canonicalize(&doc(&[
            ("ipcfg", "static"),
            ("address", "192.168.1.10"),
            ("dns", "8.8.8.8"),
            ("dns2", "1.1.1.1"),
        ]));

        let as_doc: Map<String, Value> = first
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let second = canonicalize(&as_doc);

        assert_eq!(first, second);
    }

    #[test]
    fn values_are_string_coerced() {
        let mut raw = Map::new();
        raw.insert("rate".to_string(), Value::Number(500.into()));
        raw.insert("enabled".to_string(), Value::Bool(true));
        raw.insert("note".to_string(), Value::Null);
        raw.insert("ssid".to_string(), Value::String("  HomeNet  ".into()));

        let canon = canonicalize(&raw);
        assert_eq!(canon.get("rate").map(String::as_str), Some("500"));
        assert_eq!(canon.get("enabled").map(String::as_str), Some("true"));
        assert_eq!(canon.get("note").map(String::as_str), Some(""));
        assert_eq!(canon.get("ssid").map(String::as_str), Some("HomeNet"));
    }

    #[test]
    fn keys_are_trimmed_and_lowered() {
        let canon = canonicalize(&doc(&[(" SSID ", "HomeNet")]));
        assert_eq!(canon.get("ssid").map(String::as_str), Some("HomeNet"));
    }
}
