// ── Response body normalization ──
//
// The device answers `info` requests with whatever its firmware generation
// produces: a JSON object, a JSON-encoded string, or a `key=value` text
// block, optionally wrapped in an envelope object. This module reduces all
// of those to a plain key/value document, or reports that no document could
// be formed. Nothing here knows about sections or field meanings.

use radgate_api::RawBody;
use serde_json::{Map, Value};

/// Result of envelope unwrapping.
///
/// `NoData` means the response carried an envelope whose payload could not
/// be resolved to an object -- distinct from an empty document, and a signal
/// to abort extraction for this response.
#[derive(Debug, Clone, PartialEq)]
pub enum Unwrapped {
    Document(Map<String, Value>),
    NoData,
}

/// Normalize a transport body into a key/value document.
///
/// JSON objects are used directly. Text is tried as strict JSON first; when
/// that fails (or yields a non-object), it falls back to line-oriented
/// `key=value` parsing. Returns `None` when nothing could be extracted.
pub fn normalize(body: &RawBody) -> Option<Map<String, Value>> {
    match body {
        RawBody::Json(Value::Object(map)) => Some(map.clone()),
        RawBody::Json(Value::String(s)) => normalize_text(s),
        RawBody::Json(_) => None,
        RawBody::Text(s) => normalize_text(s),
    }
}

/// Normalize free text: strict JSON object parse, else `key=value` lines.
pub fn normalize_text(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Some(map);
    }

    let map = parse_key_values(trimmed);
    if map.is_empty() { None } else { Some(map) }
}

/// Line-oriented `key=value` / `key: value` parser.
///
/// Blank lines and lines starting with `#`, `;`, or `//` are skipped.
/// The separator is the first `=` or `:`, preferring `=` when it occurs
/// before `:`. One layer of matching surrounding quotes is stripped from
/// the value. Lines without a separator are dropped silently.
pub fn parse_key_values(text: &str) -> Map<String, Value> {
    let mut out = Map::new();

    for raw in text.replace("\r\n", "\n").replace('\r', "\n").split('\n') {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') || line.starts_with("//")
        {
            continue;
        }

        let eq = line.find('=');
        let colon = line.find(':');
        let idx = match (eq, colon) {
            (Some(e), Some(c)) if e < c => e,
            (Some(e), None) => e,
            (_, Some(c)) => c,
            (None, None) => continue,
        };

        let key = line[..idx].trim();
        let mut value = line[idx + 1..].trim();
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }

        if !key.is_empty() {
            out.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    out
}

/// Strip one level of envelope from a document.
///
/// `envelope_keys` is an ordered priority list (`["data"]` for most
/// sections; the daemon section also accepts `config` and `content`).
/// A present key substitutes its value as the working document; a string
/// payload is re-run through JSON-then-`key=value` parsing. A payload that
/// cannot be resolved to an object aborts with [`Unwrapped::NoData`].
/// Without any envelope key the document passes through unchanged.
pub fn unwrap_envelope(map: Map<String, Value>, envelope_keys: &[&str]) -> Unwrapped {
    let Some(key) = envelope_keys.iter().find(|k| map.contains_key(**k)) else {
        return Unwrapped::Document(map);
    };

    let inner = map.get(*key).cloned().unwrap_or(Value::Null);
    let resolved = match inner {
        Value::Object(m) => Some(m),
        Value::String(s) => normalize_text(&s),
        _ => None,
    };

    match resolved {
        Some(m) => Unwrapped::Document(m),
        None => Unwrapped::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> RawBody {
        RawBody::Text(s.to_string())
    }

    #[test]
    fn object_body_passes_through() {
        let body = RawBody::Json(serde_json::json!({ "ssid": "HomeNet" }));
        let doc = normalize(&body).expect("document");
        assert_eq!(doc.get("ssid"), Some(&Value::String("HomeNet".into())));
    }

    #[test]
    fn json_encoded_string_body() {
        let body = RawBody::Json(Value::String("{\"mode\":\"FSK2\"}".into()));
        let doc = normalize(&body).expect("document");
        assert_eq!(doc.get("mode"), Some(&Value::String("FSK2".into())));
    }

    #[test]
    fn key_value_text_with_comments_and_quotes() {
        let doc = normalize(&text(
            "# wireless settings\nssid=HomeNet\npass=\"s3cr3t12\"\n; trailer\n",
        ))
        .expect("document");
        assert_eq!(doc.get("ssid"), Some(&Value::String("HomeNet".into())));
        assert_eq!(doc.get("pass"), Some(&Value::String("s3cr3t12".into())));
        assert!(!doc.contains_key("# wireless settings"));
    }

    #[test]
    fn colon_separator_and_equals_preference() {
        let doc = normalize(&text("host: gateway\nopt=a:b\n")).expect("document");
        assert_eq!(doc.get("host"), Some(&Value::String("gateway".into())));
        // '=' comes before ':' so the value keeps the colon
        assert_eq!(doc.get("opt"), Some(&Value::String("a:b".into())));
    }

    #[test]
    fn separatorless_lines_dropped() {
        assert_eq!(normalize(&text("just some words\n")), None);
    }

    #[test]
    fn non_object_json_yields_nothing() {
        assert_eq!(normalize(&RawBody::Json(serde_json::json!([1, 2, 3]))), None);
        assert_eq!(normalize(&RawBody::Json(Value::Number(7.into()))), None);
    }

    #[test]
    fn crlf_lines_parse() {
        let doc = normalize(&text("a=1\r\nb=2\r")).expect("document");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn envelope_with_object_payload() {
        let doc = normalize(&RawBody::Json(serde_json::json!({
            "section": "modem",
            "data": { "mode": "fsk2" },
            "updatedAt": 123,
        })))
        .expect("document");
        let unwrapped = unwrap_envelope(doc, &["data"]);
        match unwrapped {
            Unwrapped::Document(d) => {
                assert_eq!(d.get("mode"), Some(&Value::String("fsk2".into())));
                assert!(!d.contains_key("section"));
            }
            Unwrapped::NoData => panic!("expected document"),
        }
    }

    #[test]
    fn envelope_with_key_value_string_payload() {
        let doc = normalize(&RawBody::Json(serde_json::json!({
            "data": "mode=FSK2\nrate=500\n",
        })))
        .expect("document");
        let Unwrapped::Document(d) = unwrap_envelope(doc, &["data"]) else {
            panic!("expected document");
        };
        assert_eq!(d.get("mode"), Some(&Value::String("FSK2".into())));
        assert_eq!(d.get("rate"), Some(&Value::String("500".into())));
    }

    #[test]
    fn envelope_with_unresolvable_payload_is_no_data() {
        let doc = normalize(&RawBody::Json(serde_json::json!({ "data": 42 })))
            .expect("document");
        assert_eq!(unwrap_envelope(doc, &["data"]), Unwrapped::NoData);
    }

    #[test]
    fn envelope_priority_order() {
        let doc = normalize(&RawBody::Json(serde_json::json!({
            "content": { "b": 2 },
            "config": { "a": 1 },
        })))
        .expect("document");
        let Unwrapped::Document(d) = unwrap_envelope(doc, &["data", "config", "content"]) else {
            panic!("expected document");
        };
        assert!(d.contains_key("a"));
        assert!(!d.contains_key("b"));
    }

    #[test]
    fn no_envelope_passes_through() {
        let doc = normalize(&text("ip=10.0.0.1")).expect("document");
        let Unwrapped::Document(d) = unwrap_envelope(doc, &["data"]) else {
            panic!("expected document");
        };
        assert_eq!(d.get("ip"), Some(&Value::String("10.0.0.1".into())));
    }
}
