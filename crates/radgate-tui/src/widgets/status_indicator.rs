//! Connectivity status indicator — ●/○/◐/◌ with color mapping.
//!
//! Fed by the debounced status machine in `radgate-core`, never directly
//! by request handlers -- rapid busy/online flips stay invisible.

use ratatui::style::Style;
use ratatui::text::Span;
use radgate_core::StatusKind;

use crate::theme;

/// Returns a styled `Span` with the appropriate status dot and color.
pub fn status_span(kind: StatusKind) -> Span<'static> {
    let (symbol, color) = match kind {
        StatusKind::Online => ("\u{25CF}", theme::SUCCESS_GREEN),
        StatusKind::Offline => ("\u{25CB}", theme::WARN_YELLOW),
        StatusKind::Busy => ("\u{25D0}", theme::SIGNAL_CYAN),
        StatusKind::Error => ("\u{25CF}", theme::ERROR_RED),
        StatusKind::Unknown => ("\u{25CC}", theme::BORDER_GRAY),
    };
    Span::styled(symbol.to_string(), Style::default().fg(color))
}

/// Short tooltip-style description for the status bar.
pub fn status_label(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Online => "online",
        StatusKind::Offline => "offline",
        StatusKind::Busy => "working",
        StatusKind::Error => "error",
        StatusKind::Unknown => "",
    }
}
