// radgate-core: response normalization, diff, and validation engine
// between radgate-api and the console UI.
//
// The device's info payloads are heterogeneous -- JSON objects, JSON
// strings, key=value text, enveloped or not, with a decade of field name
// spellings. This crate turns them into typed per-section models, tracks
// the last server-confirmed baseline per form, and decides whether a save
// is safe, necessary, and valid.

pub mod baseline;
pub mod canonical;
pub mod daemon;
pub mod error;
pub mod form;
pub mod payload;
pub mod section;
pub mod status;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use baseline::Baseline;
pub use canonical::{CanonicalMap, canonicalize};
pub use daemon::{BusSettings, DaemonContent, DaemonSplit, split_body};
pub use error::CoreError;
pub use form::FormSession;
pub use section::{
    EthernetSettings, MODEM_LDPC, MODEM_MODES, MODEM_RATES, ModemSettings, Section, SectionModel,
    WifiSettings,
};
pub use status::{STATUS_MIN_DWELL, Status, StatusDebouncer, StatusKind};
pub use validate::{
    ValidationError, is_valid_ipv4, validate_bus, validate_ethernet, validate_modem, validate_wifi,
};
