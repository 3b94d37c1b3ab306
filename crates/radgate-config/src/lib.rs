//! Configuration and local persistence for the radgate console.
//!
//! Two files live under the platform config dir:
//! - `config.toml` -- console settings (device URL, timeout, autofill
//!   mode), loaded through figment with `RADGATE_*` env overrides.
//! - `profiles.toml` -- the last successfully submitted field set per
//!   persistable section (wifi, ethernet), used to pre-fill or suggest
//!   values on later visits. Purely a convenience cache: read failures
//!   degrade to "no profile".

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use radgate_core::{EthernetSettings, WifiSettings};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Autofill mode ───────────────────────────────────────────────────

/// How saved profiles are applied to a freshly rendered form:
/// non-binding suggestions, or automatic population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutofillMode {
    #[default]
    Hints,
    Fill,
}

impl AutofillMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Hints => Self::Fill,
            Self::Fill => Self::Hints,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hints => "suggestions",
            Self::Fill => "auto-fill",
        }
    }
}

// ── Console config ──────────────────────────────────────────────────

/// Top-level console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Root of the device control-plane API.
    pub device_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Start in offline mode (no requests are attempted).
    #[serde(default)]
    pub offline: bool,

    /// Profile application mode.
    #[serde(default)]
    pub autofill: AutofillMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_url: "http://192.168.4.1/cgi-bin".into(),
            timeout_secs: default_timeout(),
            offline: false,
            autofill: AutofillMode::default(),
        }
    }
}

fn default_timeout() -> u64 {
    8
}

// ── Paths ───────────────────────────────────────────────────────────

fn base_dir() -> PathBuf {
    ProjectDirs::from("io", "radgate", "radgate").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("radgate");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Resolve the config file path via platform conventions.
pub fn config_path() -> PathBuf {
    base_dir().join("config.toml")
}

/// Resolve the profile store path.
pub fn profiles_path() -> PathBuf {
    base_dir().join("profiles.toml")
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the console config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("RADGATE_"));

    Ok(figment.extract()?)
}

/// Load config, falling back to defaults when the file is absent or bad.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Profile store ───────────────────────────────────────────────────

/// One persisted profile: the submitted field set plus when it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProfile<T> {
    pub saved_at: DateTime<Utc>,
    pub settings: T,
}

/// The on-disk profile store: one table per persistable section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStore {
    pub wifi: Option<StoredProfile<WifiSettings>>,
    pub ethernet: Option<StoredProfile<EthernetSettings>>,
}

/// Read the profile store from an explicit path. Any failure degrades to
/// an empty store -- profiles are a convenience, never load-bearing.
pub fn load_profiles_from(path: &Path) -> ProfileStore {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|text| toml::from_str(&text).ok())
        .unwrap_or_default()
}

/// Write the profile store to an explicit path.
pub fn save_profiles_to(path: &Path, store: &ProfileStore) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(store)?)?;
    Ok(())
}

/// Read the profile store from the canonical path.
pub fn load_profiles() -> ProfileStore {
    load_profiles_from(&profiles_path())
}

/// Write the profile store to the canonical path.
pub fn save_profiles(store: &ProfileStore) -> Result<(), ConfigError> {
    save_profiles_to(&profiles_path(), store)
}

/// Record a successfully submitted wifi payload.
pub fn record_wifi_profile(settings: WifiSettings) -> Result<(), ConfigError> {
    let mut store = load_profiles();
    store.wifi = Some(StoredProfile {
        saved_at: Utc::now(),
        settings,
    });
    save_profiles(&store)
}

/// Record a successfully submitted ethernet payload.
pub fn record_ethernet_profile(settings: EthernetSettings) -> Result<(), ConfigError> {
    let mut store = load_profiles();
    store.ethernet = Some(StoredProfile {
        saved_at: Utc::now(),
        settings,
    });
    save_profiles(&store)
}

// ── Suggestions ─────────────────────────────────────────────────────

/// Assemble the suggestion list for one input: candidate values first
/// (current, then profile), then well-known defaults; trimmed, blanks
/// dropped, first occurrence wins.
pub fn suggestions(candidates: &[Option<&str>], defaults: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let all = candidates
        .iter()
        .filter_map(|c| *c)
        .chain(defaults.iter().copied());
    for value in all {
        let v = value.trim();
        if !v.is_empty() && !out.iter().any(|existing| existing == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn autofill_mode_toggles_and_serializes() {
        assert_eq!(AutofillMode::Hints.toggle(), AutofillMode::Fill);
        assert_eq!(AutofillMode::Fill.toggle(), AutofillMode::Hints);
        let rendered = toml::to_string(&Config {
            autofill: AutofillMode::Fill,
            ..Config::default()
        })
        .expect("toml");
        assert!(rendered.contains("autofill = \"fill\""));
    }

    #[test]
    fn profile_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profiles.toml");

        let store = ProfileStore {
            wifi: Some(StoredProfile {
                saved_at: Utc::now(),
                settings: WifiSettings {
                    mode: Some("client".into()),
                    ssid: Some("HomeNet".into()),
                    password: Some("s3cr3t12".into()),
                    ip_config: Some("dhcp".into()),
                    ..WifiSettings::default()
                },
            }),
            ethernet: None,
        };

        save_profiles_to(&path, &store).expect("save");
        let loaded = load_profiles_from(&path);
        assert_eq!(
            loaded.wifi.as_ref().map(|p| &p.settings),
            store.wifi.as_ref().map(|p| &p.settings)
        );
        assert!(loaded.ethernet.is_none());
    }

    #[test]
    fn missing_or_corrupt_profiles_degrade_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert_eq!(load_profiles_from(&missing), ProfileStore::default());

        let corrupt = dir.path().join("bad.toml");
        std::fs::write(&corrupt, "not [valid toml").expect("write");
        assert_eq!(load_profiles_from(&corrupt), ProfileStore::default());
    }

    #[test]
    fn suggestions_dedupe_and_preserve_order() {
        let got = suggestions(
            &[Some("192.168.1.10"), Some(" "), Some("192.168.1.10"), None],
            &["192.168.1.10", "10.0.0.1"],
        );
        assert_eq!(got, vec!["192.168.1.10".to_string(), "10.0.0.1".to_string()]);
    }
}
