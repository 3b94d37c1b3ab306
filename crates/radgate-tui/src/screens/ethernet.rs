//! Ethernet screen — wired interface addressing form.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use radgate_api::DeviceClient;
use radgate_config::AutofillMode;
use radgate_core::status::Status;
use radgate_core::{CoreError, EthernetSettings, FormSession, Section, validate_ethernet};

use crate::action::{Action, LoadResult};
use crate::component::Component;
use crate::theme;
use crate::widgets::fields::{self, FIELD_HEIGHT, HintLevel};

const IPCFG_OPTIONS: [(&str, &str); 2] = [("dhcp", "DHCP"), ("static", "Static")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EthField {
    IpConfig,
    Ip,
    Netmask,
    Gateway,
    Dns1,
    Dns2,
}

impl EthField {
    const ALL: [EthField; 6] = [
        Self::IpConfig,
        Self::Ip,
        Self::Netmask,
        Self::Gateway,
        Self::Dns1,
        Self::Dns2,
    ];

    fn enabled(self, is_static: bool) -> bool {
        matches!(self, Self::IpConfig) || is_static
    }
}

pub struct EthernetScreen {
    client: Arc<DeviceClient>,
    autofill: AutofillMode,
    profile: Option<EthernetSettings>,
    session: FormSession<EthernetSettings>,
    action_tx: Option<UnboundedSender<Action>>,
    active_field: EthField,
    ipcfg_index: usize,
    ip: String,
    netmask: String,
    gateway: String,
    dns1: String,
    dns2: String,
    initial: EthernetSettings,
    hint: Option<(String, HintLevel)>,
    loading: bool,
    saving: bool,
    pending_save: Option<EthernetSettings>,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl EthernetScreen {
    pub fn new(
        client: Arc<DeviceClient>,
        autofill: AutofillMode,
        profile: Option<EthernetSettings>,
    ) -> Self {
        Self {
            client,
            autofill,
            profile,
            session: FormSession::new(),
            action_tx: None,
            active_field: EthField::IpConfig,
            ipcfg_index: 0,
            ip: String::new(),
            netmask: String::new(),
            gateway: String::new(),
            dns1: String::new(),
            dns2: String::new(),
            initial: EthernetSettings::default(),
            hint: None,
            loading: true,
            saving: false,
            pending_save: None,
            throbber: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn is_static(&self) -> bool {
        IPCFG_OPTIONS[self.ipcfg_index].0 == "static"
    }

    fn collect(&self) -> EthernetSettings {
        EthernetSettings {
            ip_config: Some(IPCFG_OPTIONS[self.ipcfg_index].0.to_string()),
            ip: Some(self.ip.clone()),
            netmask: Some(self.netmask.clone()),
            gateway: Some(self.gateway.clone()),
            dns1: Some(self.dns1.clone()),
            dns2: Some(self.dns2.clone()),
        }
    }

    fn apply_model(&mut self, model: &EthernetSettings) {
        let v = model.ip_config.as_deref().unwrap_or("");
        self.ipcfg_index = IPCFG_OPTIONS
            .iter()
            .position(|(id, _)| *id == v)
            .unwrap_or(0);
        self.ip = model.ip.clone().unwrap_or_default();
        self.netmask = model.netmask.clone().unwrap_or_default();
        self.gateway = model.gateway.clone().unwrap_or_default();
        self.dns1 = model.dns1.clone().unwrap_or_default();
        self.dns2 = model.dns2.clone().unwrap_or_default();
    }

    fn seed(&mut self, extracted: Option<EthernetSettings>) {
        let extracted = extracted.unwrap_or_default();
        let rendered = extracted.with_render_defaults();
        self.session.seed(&extracted, rendered.clone());
        self.initial = rendered.clone();
        self.apply_model(&rendered);

        if self.autofill == AutofillMode::Fill {
            if let Some(profile) = self.profile.clone() {
                self.apply_model(&profile);
            }
        }

        self.loading = false;
        self.clamp_focus();
    }

    fn focusable(&self) -> Vec<EthField> {
        let is_static = self.is_static();
        EthField::ALL
            .iter()
            .copied()
            .filter(|f| f.enabled(is_static))
            .collect()
    }

    fn focus_next(&mut self) {
        let fields = self.focusable();
        let pos = fields
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field = fields[(pos + 1) % fields.len()];
    }

    fn focus_prev(&mut self) {
        let fields = self.focusable();
        let pos = fields
            .iter()
            .position(|&f| f == self.active_field)
            .unwrap_or(0);
        self.active_field = fields[(pos + fields.len() - 1) % fields.len()];
    }

    fn clamp_focus(&mut self) {
        if !self.active_field.enabled(self.is_static()) {
            self.active_field = EthField::IpConfig;
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            EthField::Ip => Some(&mut self.ip),
            EthField::Netmask => Some(&mut self.netmask),
            EthField::Gateway => Some(&mut self.gateway),
            EthField::Dns1 => Some(&mut self.dns1),
            EthField::Dns2 => Some(&mut self.dns2),
            EthField::IpConfig => None,
        }
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
        if !self.session.permits_save(&payload) {
            self.hint = Some(("no changes to save".into(), HintLevel::Neutral));
            return;
        }
        if let Err(err) = validate_ethernet(&payload) {
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
            let error = match client.apply(Section::Ethernet.id(), &fields).await {
                Ok(_) => None,
                Err(e) => Some(CoreError::from(e).to_string()),
            };
            let _ = tx.send(Action::SaveFinished {
                section: Section::Ethernet,
                error,
            });
        });
    }

    fn finish_save(&mut self, error: Option<&str>) {
        self.saving = false;
        match error {
            None => {
                if let Some(submitted) = self.pending_save.take() {
                    if let Err(e) = radgate_config::record_ethernet_profile(submitted.clone()) {
                        warn!("failed to persist ethernet profile: {e}");
                    }
                    self.profile = Some(submitted.clone());
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

    fn suggestion_line(&self) -> Option<String> {
        if self.autofill != AutofillMode::Hints || self.loading {
            return None;
        }
        let profile = self.profile.as_ref();
        let (candidates, defaults): ([Option<&str>; 2], &[&str]) = match self.active_field {
            EthField::Ip => (
                [
                    self.initial.ip.as_deref(),
                    profile.and_then(|p| p.ip.as_deref()),
                ],
                &["192.168.1.10"],
            ),
            EthField::Netmask => (
                [
                    self.initial.netmask.as_deref(),
                    profile.and_then(|p| p.netmask.as_deref()),
                ],
                &["255.255.255.0", "255.255.0.0"],
            ),
            EthField::Gateway => (
                [
                    self.initial.gateway.as_deref(),
                    profile.and_then(|p| p.gateway.as_deref()),
                ],
                &["192.168.1.1"],
            ),
            EthField::Dns1 => (
                [
                    self.initial.dns1.as_deref(),
                    profile.and_then(|p| p.dns1.as_deref()),
                ],
                &["8.8.8.8", "1.1.1.1"],
            ),
            EthField::Dns2 => (
                [
                    self.initial.dns2.as_deref(),
                    profile.and_then(|p| p.dns2.as_deref()),
                ],
                &["1.0.0.1", "8.8.4.4"],
            ),
            EthField::IpConfig => return None,
        };
        let values = radgate_config::suggestions(&candidates, defaults);
        if values.is_empty() {
            None
        } else {
            Some(format!("suggestions: {}", values.join("  ")))
        }
    }
}

impl Component for EthernetScreen {
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
            KeyCode::Enter => self.try_save(),
            KeyCode::Left | KeyCode::Up | KeyCode::Right | KeyCode::Down => {
                if self.active_field == EthField::IpConfig {
                    self.ipcfg_index = (self.ipcfg_index + 1) % IPCFG_OPTIONS.len();
                    self.clamp_focus();
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.active_input_mut() {
                    input.pop();
                    self.hint = None;
                }
            }
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    if let Some(input) = self.active_input_mut() {
                        input.push(c);
                        self.hint = None;
                    }
                }
            }
            _ => {}
        }

        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SectionLoaded {
                section: Section::Ethernet,
                result,
            } => match result {
                LoadResult::Ethernet(extracted) => self.seed(extracted.clone()),
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
                section: Section::Ethernet,
                error,
            } => self.finish_save(error.as_deref()),
            Action::ClearFields => {
                for input in [
                    &mut self.ip,
                    &mut self.netmask,
                    &mut self.gateway,
                    &mut self.dns1,
                    &mut self.dns2,
                ] {
                    input.clear();
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

        let is_static = self.is_static();
        let rows = Layout::vertical([
            Constraint::Length(1),            // group title
            Constraint::Length(FIELD_HEIGHT), // ipcfg
            Constraint::Length(FIELD_HEIGHT), // ip
            Constraint::Length(FIELD_HEIGHT), // netmask
            Constraint::Length(FIELD_HEIGHT), // gateway
            Constraint::Length(FIELD_HEIGHT), // dns1
            Constraint::Length(FIELD_HEIGHT), // dns2
            Constraint::Length(1),            // hint
            Constraint::Length(1),            // suggestions
            Constraint::Min(0),
        ])
        .split(Rect::new(
            area.x + 1,
            area.y,
            area.width.saturating_sub(2),
            area.height,
        ));

        frame.render_widget(
            Paragraph::new(Span::styled(" Ethernet", theme::title_style())),
            rows[0],
        );
        fields::render_selector(
            frame,
            rows[1],
            "Addressing",
            IPCFG_OPTIONS[self.ipcfg_index].1,
            self.active_field == EthField::IpConfig,
        );

        let inputs = [
            (EthField::Ip, "IP address", &self.ip),
            (EthField::Netmask, "Netmask", &self.netmask),
            (EthField::Gateway, "Gateway", &self.gateway),
            (EthField::Dns1, "DNS 1", &self.dns1),
            (EthField::Dns2, "DNS 2", &self.dns2),
        ];
        for (offset, (field, label, value)) in inputs.into_iter().enumerate() {
            fields::render_input(
                frame,
                rows[2 + offset],
                label,
                value,
                self.active_field == field,
                is_static,
                false,
            );
        }

        fields::render_hint(frame, rows[7], self.hint.as_ref());
        if let Some(line) = self.suggestion_line() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {line}"), theme::key_hint())),
                rows[8],
            );
        }
    }

    fn id(&self) -> &'static str {
        "ethernet"
    }
}
