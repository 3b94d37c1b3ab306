use thiserror::Error;

/// Top-level error type for the `radgate-api` crate.
///
/// Every failure mode of the device control-plane transport lands here.
/// `radgate-core` maps these into user-facing diagnostics; consumers never
/// inspect HTTP internals directly.
#[derive(Debug, Error)]
pub enum Error {
    // ── Preconditions ───────────────────────────────────────────────
    /// The client is in offline mode -- no request was attempted.
    #[error("offline -- device API unavailable")]
    Offline,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Device responses ────────────────────────────────────────────
    /// Non-2xx response from the device. `detail` is the best-effort
    /// message pulled from the body (JSON `message` field or HTML title).
    #[error("HTTP {status}{} at {url}", fmt_detail(.detail))]
    Http {
        status: u16,
        detail: String,
        url: String,
    },
}

fn fmt_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" -- {detail}")
    }
}

impl Error {
    /// Returns `true` if the request was short-circuited by offline mode.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }

    /// The HTTP status code, when the device answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest folds our per-client timeout into a generic error;
            // surface it as the distinct Timeout variant.
            Self::Timeout { timeout_secs: 0 }
        } else {
            Self::Transport(err)
        }
    }
}
