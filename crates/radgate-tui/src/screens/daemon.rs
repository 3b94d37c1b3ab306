//! Daemon screen — daemon process configuration (read-only, redacted)
//! plus the radio front-end's bus/GPIO control table.
//!
//! The daemon endpoint has no schema: one payload is heuristically split
//! into the daemon-config group and the bus group. Only the bus group is
//! editable here; the daemon group is displayed as the device reported it,
//! with sensitive values masked.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::UnboundedSender;

use radgate_api::DeviceClient;
use radgate_core::daemon::DaemonSplit;
use radgate_core::status::Status;
use radgate_core::{BusSettings, CoreError, FormSession, Section, validate_bus};

use crate::action::{Action, LoadResult};
use crate::component::Component;
use crate::theme;
use crate::widgets::fields::{self, HintLevel};

const ROWS: [&str; 6] = ["SPI", "IRQ", "Busy", "NRST", "TX EN", "RX EN"];
const ROW_HEIGHT: u16 = 3;

pub struct DaemonScreen {
    client: Arc<DeviceClient>,
    session: FormSession<BusSettings>,
    action_tx: Option<UnboundedSender<Action>>,
    daemon_text: String,
    /// 6 rows x (chip, pin) cells.
    inputs: [[String; 2]; 6],
    active: (usize, usize),
    hint: Option<(String, HintLevel)>,
    loading: bool,
    saving: bool,
    pending_save: Option<BusSettings>,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl DaemonScreen {
    pub fn new(client: Arc<DeviceClient>) -> Self {
        Self {
            client,
            session: FormSession::new(),
            action_tx: None,
            daemon_text: String::new(),
            inputs: Default::default(),
            active: (0, 0),
            hint: None,
            loading: true,
            saving: false,
            pending_save: None,
            throbber: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn collect(&self) -> BusSettings {
        let cell = |row: usize, col: usize| {
            let v = self.inputs[row][col].trim();
            if v.is_empty() { None } else { Some(v.to_string()) }
        };
        BusSettings {
            spi_chip: cell(0, 0),
            spi_pin: cell(0, 1),
            gpio_irq_chip: cell(1, 0),
            gpio_irq_pin: cell(1, 1),
            gpio_busy_chip: cell(2, 0),
            gpio_busy_pin: cell(2, 1),
            gpio_nrst_chip: cell(3, 0),
            gpio_nrst_pin: cell(3, 1),
            gpio_tx_en_chip: cell(4, 0),
            gpio_tx_en_pin: cell(4, 1),
            gpio_rx_en_chip: cell(5, 0),
            gpio_rx_en_pin: cell(5, 1),
        }
    }

    fn seed(&mut self, split: &DaemonSplit) {
        self.daemon_text = split.daemon.display();
        let bus = split.bus();
        self.session.seed(&bus, bus.clone());

        let set = |v: &Option<String>| v.clone().unwrap_or_default();
        self.inputs = [
            [set(&bus.spi_chip), set(&bus.spi_pin)],
            [set(&bus.gpio_irq_chip), set(&bus.gpio_irq_pin)],
            [set(&bus.gpio_busy_chip), set(&bus.gpio_busy_pin)],
            [set(&bus.gpio_nrst_chip), set(&bus.gpio_nrst_pin)],
            [set(&bus.gpio_tx_en_chip), set(&bus.gpio_tx_en_pin)],
            [set(&bus.gpio_rx_en_chip), set(&bus.gpio_rx_en_pin)],
        ];
        self.loading = false;
    }

    fn focus_step(&mut self, forward: bool) {
        let flat = self.active.0 * 2 + self.active.1;
        let total = ROWS.len() * 2;
        let next = if forward {
            (flat + 1) % total
        } else {
            (flat + total - 1) % total
        };
        self.active = (next / 2, next % 2);
    }

    fn try_save(&mut self) {
        if self.saving || self.loading {
            return;
        }
        if self.client.is_offline() {
            self.hint = Some((
                "offline mode -- saving unavailable".into(),
                HintLevel::Warn,
            ));
            return;
        }

        let payload = self.collect();
        if !payload.is_complete() {
            self.hint = Some(("fill in all bus fields".into(), HintLevel::Neutral));
            return;
        }
        if !self.session.permits_save(&payload) {
            self.hint = Some(("no changes to save".into(), HintLevel::Neutral));
            return;
        }
        if let Err(err) = validate_bus(&payload) {
            self.hint = Some((err.to_string(), HintLevel::Error));
            return;
        }

        self.saving = true;
        self.hint = Some(("saving...".into(), HintLevel::Neutral));
        self.pending_save = Some(payload.clone());

        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let _ = tx.send(Action::SetStatus(Status::busy()));

        let client = Arc::clone(&self.client);
        let fields = payload.to_fields();
        tokio::spawn(async move {
            let error = match client.apply(Section::Daemon.id(), &fields).await {
                Ok(_) => None,
                Err(e) => Some(CoreError::from(e).to_string()),
            };
            let _ = tx.send(Action::SaveFinished {
                section: Section::Daemon,
                error,
            });
        });
    }

    fn finish_save(&mut self, error: Option<&str>) {
        self.saving = false;
        match error {
            None => {
                if let Some(submitted) = self.pending_save.take() {
                    self.session.commit(submitted);
                }
                self.hint = Some(("changes submitted".into(), HintLevel::Success));
            }
            Some(message) => {
                self.pending_save = None;
                self.hint = Some((format!("save failed: {message}"), HintLevel::Error));
            }
        }
    }
}

impl Component for DaemonScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.loading {
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Right => self.focus_step(true),
            KeyCode::BackTab | KeyCode::Left => self.focus_step(false),
            KeyCode::Down => {
                self.active.0 = (self.active.0 + 1) % ROWS.len();
            }
            KeyCode::Up => {
                self.active.0 = (self.active.0 + ROWS.len() - 1) % ROWS.len();
            }
            KeyCode::Enter => self.try_save(),
            KeyCode::Backspace => {
                self.inputs[self.active.0][self.active.1].pop();
                self.hint = None;
            }
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.inputs[self.active.0][self.active.1].push(c);
                    self.hint = None;
                }
            }
            _ => {}
        }

        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SectionLoaded {
                section: Section::Daemon,
                result,
            } => match result {
                LoadResult::Daemon(split) => self.seed(split),
                LoadResult::Failed { offline, message } => {
                    self.daemon_text.clear();
                    self.inputs = Default::default();
                    self.loading = false;
                    self.hint = Some(if *offline {
                        ("offline mode -- no daemon data".into(), HintLevel::Warn)
                    } else {
                        (format!("load failed: {message}"), HintLevel::Error)
                    });
                }
                _ => {}
            },
            Action::SaveFinished {
                section: Section::Daemon,
                error,
            } => self.finish_save(error.as_deref()),
            Action::ClearFields => {
                for row in &mut self.inputs {
                    for cell in row {
                        cell.clear();
                    }
                }
                self.hint = None;
            }
            Action::Tick => {
                if self.saving || self.loading {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if self.loading {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("  loading section data...")
                .style(theme::hint_neutral());
            frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
            return;
        }

        let table_height = u16::try_from(ROWS.len()).unwrap_or(6) * ROW_HEIGHT;
        let rows = Layout::vertical([
            Constraint::Length(1),            // daemon group title
            Constraint::Min(4),               // daemon config display
            Constraint::Length(1),            // bus group title
            Constraint::Length(1),            // column headers
            Constraint::Length(table_height), // chip/pin table
            Constraint::Length(1),            // hint
        ])
        .split(Rect::new(
            area.x + 1,
            area.y,
            area.width.saturating_sub(2),
            area.height,
        ));

        frame.render_widget(
            Paragraph::new(Span::styled(" Daemon", theme::title_style())),
            rows[0],
        );

        let daemon_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let daemon_inner = daemon_block.inner(rows[1]);
        frame.render_widget(daemon_block, rows[1]);
        let body = if self.daemon_text.is_empty() {
            Span::styled("no daemon data", theme::hint_neutral())
        } else {
            Span::styled(self.daemon_text.clone(), theme::input_value(true))
        };
        frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), daemon_inner);

        frame.render_widget(
            Paragraph::new(Span::styled(" Bus / GPIO", theme::title_style())),
            rows[2],
        );

        // Column headers aligned with the table cells
        let title_w = 10u16.min(rows[3].width / 4);
        let cell_w = rows[3].width.saturating_sub(title_w) / 2;
        frame.render_widget(
            Paragraph::new(Span::styled("Chip", theme::key_hint())),
            Rect::new(rows[3].x + title_w + 2, rows[3].y, cell_w, 1),
        );
        frame.render_widget(
            Paragraph::new(Span::styled("Pin", theme::key_hint())),
            Rect::new(rows[3].x + title_w + cell_w + 2, rows[3].y, cell_w, 1),
        );

        for (idx, title) in ROWS.iter().enumerate() {
            let y = rows[4].y + u16::try_from(idx).unwrap_or(0) * ROW_HEIGHT;
            let row_area = Rect::new(rows[4].x, y, rows[4].width, ROW_HEIGHT);
            let active_cell = (self.active.0 == idx).then_some(self.active.1);
            fields::render_chip_pin_row(
                frame,
                row_area,
                title,
                &self.inputs[idx][0],
                &self.inputs[idx][1],
                active_cell,
            );
        }

        fields::render_hint(frame, rows[5], self.hint.as_ref());
    }

    fn id(&self) -> &'static str {
        "daemon"
    }
}
