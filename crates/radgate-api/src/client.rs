// Device control-plane HTTP client
//
// Wraps `reqwest::Client` with appliance-specific URL construction and
// response decoding. The device convention:
//
//   GET  <base>/<section>/info    -- current configuration of a section
//   POST <base>/<section>/apply   -- apply configuration (form-urlencoded)
//
// Responses are JSON when the device can manage it, but older firmware
// answers with plain `key=value` text; decoding to a typed model is the
// job of `radgate-core` -- this client only distinguishes JSON from text.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;

/// A decoded response body, split by content type.
///
/// Anything the device labels `application/json` arrives as
/// [`RawBody::Json`]; everything else is handed over verbatim as text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Json(serde_json::Value),
    Text(String),
}

/// Options for constructing a [`DeviceClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Root of the control-plane API, e.g. `http://192.168.4.1/cgi-bin`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Start in offline mode: requests fail fast without touching the
    /// network. Toggleable at runtime via [`DeviceClient::set_offline`].
    pub offline: bool,
}

impl ClientOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(8),
            offline: false,
        }
    }
}

/// HTTP client for the appliance's section-scoped configuration API.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
    offline: AtomicBool,
}

impl DeviceClient {
    /// Create a new client from options.
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent("radgate/0.1.0")
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            http,
            base_url: options.base_url,
            timeout_secs: options.timeout.as_secs(),
            offline: AtomicBool::new(options.offline),
        })
    }

    /// The configured API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether the client is currently in offline mode.
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }

    /// Flip offline mode. While offline every request short-circuits to
    /// [`Error::Offline`] before any I/O.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `<base>/<section>/<leaf>`, tolerating a trailing slash on
    /// the configured base.
    fn endpoint(&self, section: &str, leaf: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{section}/{leaf}"))?)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Fetch the current configuration of a section.
    pub async fn get_info(&self, section: &str) -> Result<RawBody, Error> {
        if self.is_offline() {
            return Err(Error::Offline);
        }

        let url = self.endpoint(section, "info")?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .header("Accept", "application/json, text/plain, */*")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| self.transport_err(e))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp, &url).await);
        }

        Self::decode_body(resp).await
    }

    /// Apply a section's configuration as a form-urlencoded field set.
    ///
    /// Success is any 2xx; a JSON body, if present, is returned for
    /// callers that care.
    pub async fn apply(
        &self,
        section: &str,
        fields: &[(&str, String)],
    ) -> Result<Option<serde_json::Value>, Error> {
        if self.is_offline() {
            return Err(Error::Offline);
        }

        let url = self.endpoint(section, "apply")?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url.clone())
            .header("Accept", "application/json, text/plain, */*")
            .form(fields)
            .send()
            .await
            .map_err(|e| self.transport_err(e))?;

        if !resp.status().is_success() {
            return Err(Self::failure(resp, &url).await);
        }

        match Self::decode_body(resp).await? {
            RawBody::Json(v) => Ok(Some(v)),
            RawBody::Text(_) => Ok(None),
        }
    }

    // ── Response decoding ────────────────────────────────────────────

    fn transport_err(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn decode_body(resp: reqwest::Response) -> Result<RawBody, Error> {
        let is_json = content_type(&resp).contains("application/json");
        let text = resp.text().await.map_err(Error::Transport)?;

        if is_json {
            match serde_json::from_str(&text) {
                Ok(value) => Ok(RawBody::Json(value)),
                // Mislabeled content-type: treat as text, core will retry
                // a JSON parse anyway.
                Err(_) => Ok(RawBody::Text(text)),
            }
        } else {
            Ok(RawBody::Text(text))
        }
    }

    /// Turn a non-2xx response into [`Error::Http`], pulling a detail
    /// string out of the body: a JSON `message` field if present, else
    /// the serialized JSON, else the HTML `<title>` text.
    async fn failure(resp: reqwest::Response, url: &Url) -> Error {
        let status = resp.status().as_u16();
        let is_json = content_type(&resp).contains("application/json");
        let body = resp.text().await.unwrap_or_default();

        let detail = if is_json {
            match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(v) => v
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| v.to_string(), ToOwned::to_owned),
                Err(_) => String::new(),
            }
        } else {
            html_title(&body).unwrap_or_default()
        };

        Error::Http {
            status,
            detail,
            url: url.to_string(),
        }
    }
}

fn content_type(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Extract the text of the first `<title>` element, case-insensitively.
fn html_title(body: &str) -> Option<String> {
    let lower = body.to_ascii_lowercase();
    let open = lower.find("<title>")?;
    let start = open + "<title>".len();
    let end = lower[start..].find("</title>")? + start;
    Some(body[start..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_title_extraction() {
        assert_eq!(
            html_title("<html><head><TITLE>404 Not Found</TITLE></head></html>"),
            Some("404 Not Found".to_string())
        );
        assert_eq!(html_title("no markup here"), None);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = DeviceClient::new(ClientOptions::new(
            Url::parse("http://device/cgi-bin/").expect("static URL"),
        ))
        .expect("client");
        let url = client.endpoint("wifi", "info").expect("endpoint");
        assert_eq!(url.as_str(), "http://device/cgi-bin/wifi/info");
    }
}
