//! Shared form-field rendering: labeled text inputs and inline selectors.
//!
//! Every section screen draws its fields through these helpers so the
//! forms stay visually uniform. Each field occupies a fixed-height band:
//! one label row plus a bordered 3-row input box.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::theme;

/// Rows consumed by one field band.
pub const FIELD_HEIGHT: u16 = 4;

/// A labeled single-line text input.
///
/// `enabled: false` renders the band dimmed (static-only fields while
/// addressing is dynamic). `masked` replaces the value with dots.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    enabled: bool,
    masked: bool,
) {
    if area.height < FIELD_HEIGHT - 1 {
        return;
    }

    let label_area = Rect::new(area.x, area.y, area.width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("  {label}"),
            if enabled { theme::label(active) } else { theme::input_value(false) },
        )),
        label_area,
    );

    let display = if masked && !value.is_empty() {
        "\u{25CF}".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let border_style = if active && enabled {
        theme::border_focused()
    } else {
        theme::border_default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
    let inner = block.inner(block_area);
    frame.render_widget(block, block_area);

    let text = if active && enabled {
        format!("{display}\u{2588}")
    } else {
        display
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, theme::input_value(enabled))),
        inner,
    );
}

/// An inline `◂ value ▸` selector cycling through a fixed option list.
pub fn render_selector(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
) {
    if area.height < FIELD_HEIGHT - 1 {
        return;
    }

    frame.render_widget(
        Paragraph::new(Span::styled(format!("  {label}"), theme::label(active))),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let border_style = if active {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    let block_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
    let inner = block.inner(block_area);
    frame.render_widget(block, block_area);

    let arrow_style = if active {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" \u{25C2} ", arrow_style),
            Span::styled(value.to_string(), theme::input_value(true)),
            Span::styled(" \u{25B8}", arrow_style),
        ])),
        inner,
    );
}

/// One row of the chip/pin table: a row title plus two bordered cells.
pub fn render_chip_pin_row(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    chip: &str,
    pin: &str,
    active_cell: Option<usize>,
) {
    if area.height < 3 {
        return;
    }

    let title_w = 10u16.min(area.width / 4);
    let cell_w = area.width.saturating_sub(title_w) / 2;

    frame.render_widget(
        Paragraph::new(Span::styled(
            title.to_string(),
            theme::label(active_cell.is_some()),
        )),
        Rect::new(area.x, area.y + 1, title_w, 1),
    );

    for (idx, value) in [chip, pin].into_iter().enumerate() {
        let x = area.x + title_w + cell_w * u16::try_from(idx).unwrap_or(0);
        let active = active_cell == Some(idx);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let cell = Rect::new(x, area.y, cell_w, 3);
        let inner = block.inner(cell);
        frame.render_widget(block, cell);
        let text = if active {
            format!("{value}\u{2588}")
        } else {
            value.to_string()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, theme::input_value(true))),
            inner,
        );
    }
}

/// Severity of an inline form hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintLevel {
    Neutral,
    Success,
    Warn,
    Error,
}

/// Render the inline hint line under a form.
pub fn render_hint(frame: &mut Frame, area: Rect, hint: Option<&(String, HintLevel)>) {
    let Some((text, level)) = hint else {
        return;
    };
    let style: Style = match level {
        HintLevel::Neutral => theme::hint_neutral(),
        HintLevel::Success => theme::hint_success(),
        HintLevel::Warn => theme::hint_warn(),
        HintLevel::Error => theme::hint_error(),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("  {text}"), style)),
        area,
    );
}
