//! Modem screen — radio-modem link settings (mode, rate, LDPC profile).
//!
//! All three fields are members of small fixed enumerations, so the form
//! is three selectors. Save availability is re-evaluated on every change
//! and surfaced as a live hint, matching the diff gate.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;

use radgate_api::DeviceClient;
use radgate_core::status::Status;
use radgate_core::{
    CoreError, FormSession, MODEM_LDPC, MODEM_MODES, MODEM_RATES, ModemSettings, Section,
    validate_modem,
};

use crate::action::{Action, LoadResult};
use crate::component::Component;
use crate::theme;
use crate::widgets::fields::{self, FIELD_HEIGHT, HintLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModemField {
    Mode,
    Rate,
    Ldpc,
}

impl ModemField {
    const ALL: [ModemField; 3] = [Self::Mode, Self::Rate, Self::Ldpc];
}

pub struct ModemScreen {
    client: Arc<DeviceClient>,
    session: FormSession<ModemSettings>,
    action_tx: Option<UnboundedSender<Action>>,
    active_field: ModemField,
    mode_index: usize,
    rate_index: usize,
    ldpc_index: usize,
    hint: Option<(String, HintLevel)>,
    loading: bool,
    saving: bool,
    pending_save: Option<ModemSettings>,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl ModemScreen {
    pub fn new(client: Arc<DeviceClient>) -> Self {
        Self {
            client,
            session: FormSession::new(),
            action_tx: None,
            active_field: ModemField::Mode,
            mode_index: 0,
            rate_index: 0,
            ldpc_index: 0,
            hint: None,
            loading: true,
            saving: false,
            pending_save: None,
            throbber: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn collect(&self) -> ModemSettings {
        ModemSettings {
            mode: Some(MODEM_MODES[self.mode_index].to_string()),
            rate: Some(MODEM_RATES[self.rate_index].to_string()),
            ldpc: Some(MODEM_LDPC[self.ldpc_index].to_string()),
        }
    }

    fn seed(&mut self, extracted: Option<ModemSettings>) {
        let extracted = extracted.unwrap_or_default();
        let rendered = extracted.with_render_defaults();
        self.session.seed(&extracted, rendered.clone());

        let pick = |options: &[&str], value: &Option<String>| {
            let v = value.as_deref().unwrap_or("");
            options.iter().position(|o| *o == v).unwrap_or(0)
        };
        self.mode_index = pick(&MODEM_MODES, &rendered.mode);
        self.rate_index = pick(&MODEM_RATES, &rendered.rate);
        self.ldpc_index = pick(&MODEM_LDPC, &rendered.ldpc);

        self.loading = false;
        self.refresh_hint();
    }

    /// Live save-availability hint: validation error, pending changes,
    /// or nothing.
    fn refresh_hint(&mut self) {
        let current = self.collect();
        if let Err(err) = validate_modem(&current) {
            self.hint = Some((err.to_string(), HintLevel::Error));
        } else if self.client.is_offline() {
            self.hint = Some((
                "offline mode -- saving unavailable".into(),
                HintLevel::Warn,
            ));
        } else if self.session.permits_save(&current) {
            self.hint = Some(("unsaved changes".into(), HintLevel::Neutral));
        } else {
            self.hint = None;
        }
    }

    fn focus_next(&mut self) {
        let pos = ModemField::ALL
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field = ModemField::ALL[(pos + 1) % ModemField::ALL.len()];
    }

    fn focus_prev(&mut self) {
        let pos = ModemField::ALL
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field =
            ModemField::ALL[(pos + ModemField::ALL.len() - 1) % ModemField::ALL.len()];
    }

    fn cycle(&mut self, forward: bool) {
        let step = |index: usize, len: usize| {
            if forward { (index + 1) % len } else { (index + len - 1) % len }
        };
        match self.active_field {
            ModemField::Mode => self.mode_index = step(self.mode_index, MODEM_MODES.len()),
            ModemField::Rate => self.rate_index = step(self.rate_index, MODEM_RATES.len()),
            ModemField::Ldpc => self.ldpc_index = step(self.ldpc_index, MODEM_LDPC.len()),
        }
        self.refresh_hint();
    }

    fn try_save(&mut self) {
        if self.saving || self.loading || self.client.is_offline() {
            return;
        }

        let payload = self.collect();
        if !self.session.permits_save(&payload) {
            return;
        }
        if let Err(err) = validate_modem(&payload) {
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
            let error = match client.apply(Section::Modem.id(), &fields).await {
                Ok(_) => None,
                Err(e) => Some(CoreError::from(e).to_string()),
            };
            let _ = tx.send(Action::SaveFinished {
                section: Section::Modem,
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

impl Component for ModemScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.loading {
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Left | KeyCode::Up => self.cycle(false),
            KeyCode::Right | KeyCode::Down => self.cycle(true),
            KeyCode::Enter => self.try_save(),
            _ => {}
        }

        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SectionLoaded {
                section: Section::Modem,
                result,
            } => match result {
                LoadResult::Modem(extracted) => self.seed(extracted.clone()),
                LoadResult::Failed { offline, message } => {
                    self.seed(None);
                    self.hint = Some(if *offline {
                        ("offline mode -- showing defaults".into(), HintLevel::Warn)
                    } else {
                        (format!("load failed: {message}"), HintLevel::Error)
                    });
                }
                _ => {}
            },
            Action::SaveFinished {
                section: Section::Modem,
                error,
            } => self.finish_save(error.as_deref()),
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

        let rows = Layout::vertical([
            Constraint::Length(1),            // group title
            Constraint::Length(FIELD_HEIGHT), // mode
            Constraint::Length(FIELD_HEIGHT), // rate
            Constraint::Length(FIELD_HEIGHT), // ldpc
            Constraint::Length(1),            // hint
            Constraint::Min(0),
        ])
        .split(Rect::new(
            area.x + 1,
            area.y,
            area.width.saturating_sub(2),
            area.height,
        ));

        frame.render_widget(
            Paragraph::new(Span::styled(" Modem", theme::title_style())),
            rows[0],
        );
        fields::render_selector(
            frame,
            rows[1],
            "Mode",
            MODEM_MODES[self.mode_index],
            self.active_field == ModemField::Mode,
        );
        fields::render_selector(
            frame,
            rows[2],
            "Rate",
            MODEM_RATES[self.rate_index],
            self.active_field == ModemField::Rate,
        );
        fields::render_selector(
            frame,
            rows[3],
            "LDPC",
            MODEM_LDPC[self.ldpc_index],
            self.active_field == ModemField::Ldpc,
        );

        fields::render_hint(frame, rows[4], self.hint.as_ref());
    }

    fn id(&self) -> &'static str {
        "modem"
    }
}
