//! All possible UI actions. Actions are the sole mechanism for state
//! mutation: key handling and background tasks both resolve to actions
//! drained by the app loop.

use radgate_core::daemon::DaemonSplit;
use radgate_core::status::Status;
use radgate_core::{EthernetSettings, ModemSettings, Section, WifiSettings};

/// Outcome of a section load, carrying the extracted model (or `None`
/// when the response held no recognizable data -- the form renders with
/// defaults and no baseline).
#[derive(Debug, Clone)]
pub enum LoadResult {
    Wifi(Option<WifiSettings>),
    Ethernet(Option<EthernetSettings>),
    Modem(Option<ModemSettings>),
    Daemon(Box<DaemonSplit>),
    /// Load failed; the form still renders with defaults.
    Failed { offline: bool, message: String },
}

/// Every state transition in the console is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchSection(Section),

    // ── Section data ──────────────────────────────────────────────
    /// Reload the active section without switching ("fill current data").
    Refresh,
    SectionLoaded {
        section: Section,
        result: LoadResult,
    },

    // ── Save flow ─────────────────────────────────────────────────
    SaveFinished {
        section: Section,
        /// `None` on success; the display message otherwise.
        error: Option<String>,
    },

    // ── Form utilities ────────────────────────────────────────────
    /// Blank the active form's editable inputs (local only).
    ClearFields,
    ToggleAutofill,
    ToggleOffline,

    // ── Status bar ────────────────────────────────────────────────
    SetStatus(Status),
}
