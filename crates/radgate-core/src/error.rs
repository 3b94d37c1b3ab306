// ── Core error types ──
//
// User-facing errors for the console. Consumers never see raw reqwest
// errors; the `From<radgate_api::Error>` impl translates transport-layer
// failures into display-ready variants.

use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Offline precondition: no request was attempted.
    #[error("offline mode -- device API unavailable")]
    Offline,

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The device answered with an error.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    /// Network-level failure (connection refused, DNS, etc.)
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    /// Local validation failure; never sent to the transport.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether this failure came from the offline precondition (as opposed
    /// to a network attempt that failed).
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }
}

impl From<radgate_api::Error> for CoreError {
    fn from(err: radgate_api::Error) -> Self {
        match err {
            radgate_api::Error::Offline => Self::Offline,
            radgate_api::Error::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            radgate_api::Error::Http {
                status,
                detail,
                url,
            } => Self::Api {
                message: if detail.is_empty() {
                    format!("HTTP {status} at {url}")
                } else {
                    detail
                },
                status: Some(status),
            },
            radgate_api::Error::Transport(e) => Self::Transport {
                message: e.to_string(),
            },
            radgate_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL: {e}"),
            },
        }
    }
}
