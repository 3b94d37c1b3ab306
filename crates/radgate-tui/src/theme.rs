//! Gate Amber palette and semantic styling for the console.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 179, 71); // #ffb347
pub const SIGNAL_CYAN: Color = Color::Rgb(102, 229, 214); // #66e5d6
pub const SUCCESS_GREEN: Color = Color::Rgb(122, 229, 130); // #7ae582
pub const ERROR_RED: Color = Color::Rgb(255, 107, 107); // #ff6b6b
pub const WARN_YELLOW: Color = Color::Rgb(240, 225, 48); // #f0e130

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(196, 199, 206); // #c4c7ce
pub const BORDER_GRAY: Color = Color::Rgb(92, 99, 112); // #5c6370
pub const BG_DARK: Color = Color::Rgb(24, 26, 31); // #181a1f
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 44, 52); // #282c34

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel or input.
pub fn border_focused() -> Style {
    Style::default().fg(AMBER)
}

/// Border for an unfocused panel or input.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Active sidebar entry.
pub fn menu_active() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Inactive sidebar entry.
pub fn menu_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Field label next to an input.
pub fn label(active: bool) -> Style {
    if active {
        Style::default().fg(SIGNAL_CYAN)
    } else {
        Style::default().fg(DIM_WHITE)
    }
}

/// Input value text.
pub fn input_value(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(SIGNAL_CYAN)
    } else {
        Style::default().fg(BORDER_GRAY)
    }
}

/// Key hint text (e.g., "^R refresh  ^C quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Inline hint styles per severity.
pub fn hint_error() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn hint_success() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn hint_warn() -> Style {
    Style::default().fg(WARN_YELLOW)
}

pub fn hint_neutral() -> Style {
    Style::default().fg(DIM_WHITE)
}
