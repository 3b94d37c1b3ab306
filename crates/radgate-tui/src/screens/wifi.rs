//! WiFi screen — wireless radio link settings form.
//!
//! Seeds its fields from the extracted section model, tracks the server
//! baseline through a `FormSession`, and only lets a save through when the
//! edit actually differs and validates. The credential is masked by
//! default (Ctrl+U reveals it).

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
use radgate_core::{CoreError, FormSession, Section, WifiSettings, validate_wifi};

use crate::action::{Action, LoadResult};
use crate::component::Component;
use crate::theme;
use crate::widgets::fields::{self, FIELD_HEIGHT, HintLevel};

const MODE_OPTIONS: [(&str, &str); 2] = [("client", "Client"), ("ap", "Access point")];
const IPCFG_OPTIONS: [(&str, &str); 2] = [("dhcp", "DHCP"), ("static", "Static")];

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WifiField {
    Mode,
    Ssid,
    Password,
    IpConfig,
    Ip,
    Netmask,
    Gateway,
    Dns1,
    Dns2,
}

impl WifiField {
    const ALL: [WifiField; 9] = [
        Self::Mode,
        Self::Ssid,
        Self::Password,
        Self::IpConfig,
        Self::Ip,
        Self::Netmask,
        Self::Gateway,
        Self::Dns1,
        Self::Dns2,
    ];

    /// Static-only fields are inert (and skipped in tab order) while
    /// addressing is dynamic.
    fn enabled(self, is_static: bool) -> bool {
        match self {
            Self::Ip | Self::Netmask | Self::Gateway | Self::Dns1 | Self::Dns2 => is_static,
            _ => true,
        }
    }
}

pub struct WifiScreen {
    client: Arc<DeviceClient>,
    autofill: AutofillMode,
    profile: Option<WifiSettings>,
    session: FormSession<WifiSettings>,
    action_tx: Option<UnboundedSender<Action>>,
    active_field: WifiField,
    // Form data
    mode_index: usize,
    ssid: String,
    password: String,
    ipcfg_index: usize,
    ip: String,
    netmask: String,
    gateway: String,
    dns1: String,
    dns2: String,
    show_password: bool,
    // Suggestion source: what the server reported at load time
    initial: WifiSettings,
    hint: Option<(String, HintLevel)>,
    loading: bool,
    saving: bool,
    pending_save: Option<WifiSettings>,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl WifiScreen {
    pub fn new(
        client: Arc<DeviceClient>,
        autofill: AutofillMode,
        profile: Option<WifiSettings>,
    ) -> Self {
        Self {
            client,
            autofill,
            profile,
            session: FormSession::new(),
            action_tx: None,
            active_field: WifiField::Mode,
            mode_index: 0,
            ssid: String::new(),
            password: String::new(),
            ipcfg_index: 0,
            ip: String::new(),
            netmask: String::new(),
            gateway: String::new(),
            dns1: String::new(),
            dns2: String::new(),
            show_password: false,
            initial: WifiSettings::default(),
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

    /// Current form contents as a settings model.
    fn collect(&self) -> WifiSettings {
        WifiSettings {
            mode: Some(MODE_OPTIONS[self.mode_index].0.to_string()),
            ssid: Some(self.ssid.clone()),
            password: Some(self.password.clone()),
            ip_config: Some(IPCFG_OPTIONS[self.ipcfg_index].0.to_string()),
            ip: Some(self.ip.clone()),
            netmask: Some(self.netmask.clone()),
            gateway: Some(self.gateway.clone()),
            dns1: Some(self.dns1.clone()),
            dns2: Some(self.dns2.clone()),
        }
    }

    fn apply_model(&mut self, model: &WifiSettings) {
        let pick = |options: &[(&str, &str); 2], value: &Option<String>| {
            let v = value.as_deref().unwrap_or("");
            options.iter().position(|(id, _)| *id == v).unwrap_or(0)
        };
        self.mode_index = pick(&MODE_OPTIONS, &model.mode);
        self.ipcfg_index = pick(&IPCFG_OPTIONS, &model.ip_config);
        self.ssid = model.ssid.clone().unwrap_or_default();
        self.password = model.password.clone().unwrap_or_default();
        self.ip = model.ip.clone().unwrap_or_default();
        self.netmask = model.netmask.clone().unwrap_or_default();
        self.gateway = model.gateway.clone().unwrap_or_default();
        self.dns1 = model.dns1.clone().unwrap_or_default();
        self.dns2 = model.dns2.clone().unwrap_or_default();
    }

    /// Seed the form from a completed load. `None` means the response held
    /// no recognizable data: render defaults, baseline absent.
    fn seed(&mut self, extracted: Option<WifiSettings>) {
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

    // ── Field navigation ─────────────────────────────────────────────

    fn focusable(&self) -> Vec<WifiField> {
        let is_static = self.is_static();
        WifiField::ALL
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
            self.active_field = WifiField::IpConfig;
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            WifiField::Ssid => Some(&mut self.ssid),
            WifiField::Password => Some(&mut self.password),
            WifiField::Ip => Some(&mut self.ip),
            WifiField::Netmask => Some(&mut self.netmask),
            WifiField::Gateway => Some(&mut self.gateway),
            WifiField::Dns1 => Some(&mut self.dns1),
            WifiField::Dns2 => Some(&mut self.dns2),
            WifiField::Mode | WifiField::IpConfig => None,
        }
    }

    fn cycle_selector(&mut self, forward: bool) {
        match self.active_field {
            WifiField::Mode => {
                self.mode_index = cycle(self.mode_index, MODE_OPTIONS.len(), forward);
            }
            WifiField::IpConfig => {
                self.ipcfg_index = cycle(self.ipcfg_index, IPCFG_OPTIONS.len(), forward);
                self.clamp_focus();
            }
            _ => {}
        }
    }

    // ── Save flow ────────────────────────────────────────────────────

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
        if let Err(err) = validate_wifi(&payload) {
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
            let error = match client.apply(Section::Wifi.id(), &fields).await {
                Ok(_) => None,
                Err(e) => Some(CoreError::from(e).to_string()),
            };
            let _ = tx.send(Action::SaveFinished {
                section: Section::Wifi,
                error,
            });
        });
    }

    fn finish_save(&mut self, error: Option<&str>) {
        self.saving = false;
        match error {
            None => {
                if let Some(submitted) = self.pending_save.take() {
                    // Baseline becomes exactly what was submitted; the
                    // local profile remembers it for future visits.
                    if let Err(e) = radgate_config::record_wifi_profile(submitted.clone()) {
                        warn!("failed to persist wifi profile: {e}");
                    }
                    self.profile = Some(submitted.clone());
                    self.session.commit(submitted);
                }
                self.hint = Some(("changes submitted".into(), HintLevel::Success));
            }
            Some(message) => {
                // Baseline untouched; the operator can correct and retry.
                self.pending_save = None;
                self.hint = Some((format!("save failed: {message}"), HintLevel::Error));
            }
        }
    }

    // ── Suggestions ──────────────────────────────────────────────────

    fn suggestion_line(&self) -> Option<String> {
        if self.autofill != AutofillMode::Hints || self.loading {
            return None;
        }
        let profile = self.profile.as_ref();
        let (candidates, defaults): ([Option<&str>; 2], &[&str]) = match self.active_field {
            WifiField::Ssid => (
                [
                    self.initial.ssid.as_deref(),
                    profile.and_then(|p| p.ssid.as_deref()),
                ],
                &[],
            ),
            WifiField::Ip => (
                [
                    self.initial.ip.as_deref(),
                    profile.and_then(|p| p.ip.as_deref()),
                ],
                &["192.168.1.10"],
            ),
            WifiField::Netmask => (
                [
                    self.initial.netmask.as_deref(),
                    profile.and_then(|p| p.netmask.as_deref()),
                ],
                &["255.255.255.0", "255.255.0.0"],
            ),
            WifiField::Gateway => (
                [
                    self.initial.gateway.as_deref(),
                    profile.and_then(|p| p.gateway.as_deref()),
                ],
                &["192.168.1.1"],
            ),
            WifiField::Dns1 => (
                [
                    self.initial.dns1.as_deref(),
                    profile.and_then(|p| p.dns1.as_deref()),
                ],
                &["8.8.8.8", "1.1.1.1"],
            ),
            WifiField::Dns2 => (
                [
                    self.initial.dns2.as_deref(),
                    profile.and_then(|p| p.dns2.as_deref()),
                ],
                &["1.0.0.1", "8.8.4.4"],
            ),
            _ => return None,
        };
        let values = radgate_config::suggestions(&candidates, defaults);
        if values.is_empty() {
            None
        } else {
            Some(format!("suggestions: {}", values.join("  ")))
        }
    }
}

fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

impl Component for WifiScreen {
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
            KeyCode::Left | KeyCode::Up => self.cycle_selector(false),
            KeyCode::Right | KeyCode::Down => self.cycle_selector(true),
            KeyCode::Backspace => {
                if let Some(input) = self.active_input_mut() {
                    input.pop();
                    self.hint = None;
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'u' {
                    self.show_password = !self.show_password;
                } else if !key.modifiers.contains(KeyModifiers::CONTROL) {
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
                section: Section::Wifi,
                result,
            } => match result {
                LoadResult::Wifi(extracted) => self.seed(extracted.clone()),
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
                section: Section::Wifi,
                error,
            } => self.finish_save(error.as_deref()),
            Action::ClearFields => {
                for input in [
                    &mut self.ssid,
                    &mut self.password,
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
        let mut constraints = vec![
            Constraint::Length(1), // "WiFi" group title
            Constraint::Length(FIELD_HEIGHT), // mode
            Constraint::Length(FIELD_HEIGHT), // ssid
            Constraint::Length(FIELD_HEIGHT), // password
            Constraint::Length(1), // "IP settings" group title
            Constraint::Length(FIELD_HEIGHT), // ipcfg
            Constraint::Length(FIELD_HEIGHT), // ip
            Constraint::Length(FIELD_HEIGHT), // netmask
            Constraint::Length(FIELD_HEIGHT), // gateway
            Constraint::Length(FIELD_HEIGHT), // dns1
            Constraint::Length(FIELD_HEIGHT), // dns2
            Constraint::Length(1), // hint
            Constraint::Length(1), // suggestions
        ];
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints)
            .split(Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), area.height));

        frame.render_widget(
            Paragraph::new(Span::styled(" WiFi", theme::title_style())),
            rows[0],
        );
        fields::render_selector(
            frame,
            rows[1],
            "Mode",
            MODE_OPTIONS[self.mode_index].1,
            self.active_field == WifiField::Mode,
        );
        fields::render_input(
            frame,
            rows[2],
            "SSID",
            &self.ssid,
            self.active_field == WifiField::Ssid,
            true,
            false,
        );
        fields::render_input(
            frame,
            rows[3],
            "Password",
            &self.password,
            self.active_field == WifiField::Password,
            true,
            !self.show_password,
        );

        frame.render_widget(
            Paragraph::new(Span::styled(" IP settings", theme::title_style())),
            rows[4],
        );
        fields::render_selector(
            frame,
            rows[5],
            "Addressing",
            IPCFG_OPTIONS[self.ipcfg_index].1,
            self.active_field == WifiField::IpConfig,
        );

        let inputs = [
            (WifiField::Ip, "IP address", &self.ip),
            (WifiField::Netmask, "Netmask", &self.netmask),
            (WifiField::Gateway, "Gateway", &self.gateway),
            (WifiField::Dns1, "DNS 1", &self.dns1),
            (WifiField::Dns2, "DNS 2", &self.dns2),
        ];
        for (offset, (field, label, value)) in inputs.into_iter().enumerate() {
            fields::render_input(
                frame,
                rows[6 + offset],
                label,
                value,
                self.active_field == field,
                is_static,
                false,
            );
        }

        fields::render_hint(frame, rows[11], self.hint.as_ref());
        if let Some(line) = self.suggestion_line() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {line}"), theme::key_hint())),
                rows[12],
            );
        }
    }

    fn id(&self) -> &'static str {
        "wifi"
    }
}
