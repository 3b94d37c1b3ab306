//! Application core — event loop, section navigation, action dispatch.
//!
//! The app owns the shell (sidebar, header, status bar, key hints) and
//! exactly one live section screen. Switching sections drops the old
//! screen -- and with it the baseline -- and constructs a fresh one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use radgate_api::DeviceClient;
use radgate_config::AutofillMode;
use radgate_core::daemon as daemon_core;
use radgate_core::status::{Status, StatusDebouncer, StatusKind};
use radgate_core::{
    CoreError, EthernetSettings, ModemSettings, Section, WifiSettings,
};

use crate::action::{Action, LoadResult};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::create_screen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::status_indicator;

/// Top-level application state and event loop.
pub struct App {
    client: Arc<DeviceClient>,
    autofill: AutofillMode,
    active_section: Section,
    screen: Box<dyn Component>,
    running: bool,
    /// Debounced indicator state; the message line updates instantly.
    status: StatusDebouncer,
    top_message: String,
    top_message_kind: StatusKind,
    /// A manual refresh is in flight; the control is disabled until the
    /// load completes (success or failure).
    refresh_in_flight: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(client: DeviceClient, autofill: AutofillMode) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let client = Arc::new(client);
        let active_section = Section::ALL[0];
        let screen = create_screen(active_section, &client, autofill);

        Self {
            client,
            autofill,
            active_section,
            screen,
            running: true,
            status: StatusDebouncer::new(),
            top_message: String::new(),
            top_message_kind: StatusKind::Unknown,
            refresh_in_flight: false,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.screen.init(self.action_tx.clone())?;
        self.apply_status(self.base_status());
        self.spawn_load(self.active_section);

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("console event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("console event loop ended");
        Ok(())
    }

    /// Resting status for the current connectivity mode.
    fn base_status(&self) -> Status {
        if self.client.is_offline() {
            Status::offline()
        } else {
            Status::online()
        }
    }

    // ── Key handling ─────────────────────────────────────────────────

    /// Global chords are handled here; everything else goes to the active
    /// screen (the forms own plain characters, Tab, Enter, and arrows).
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c' | 'q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('n') => {
                    return Ok(Some(Action::SwitchSection(self.neighbor_section(true))));
                }
                KeyCode::Char('p') => {
                    return Ok(Some(Action::SwitchSection(self.neighbor_section(false))));
                }
                KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
                KeyCode::Char('l') => return Ok(Some(Action::ClearFields)),
                KeyCode::Char('f') => return Ok(Some(Action::ToggleAutofill)),
                KeyCode::Char('o') => return Ok(Some(Action::ToggleOffline)),
                _ => {}
            }
        }

        self.screen.handle_key_event(key)
    }

    fn neighbor_section(&self, forward: bool) -> Section {
        let idx = Section::ALL
            .iter()
            .position(|&s| s == self.active_section)
            .unwrap_or(0);
        let len = Section::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        Section::ALL[next]
    }

    // ── Action processing ────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
                return Ok(());
            }
            Action::Tick => {
                self.status.poll(Instant::now());
            }
            Action::SwitchSection(section) => {
                if *section != self.active_section {
                    self.switch_section(*section)?;
                }
                return Ok(());
            }
            Action::Refresh => {
                if !self.refresh_in_flight {
                    self.spawn_load(self.active_section);
                }
                return Ok(());
            }
            Action::SectionLoaded { section, result } => {
                if *section == self.active_section {
                    self.refresh_in_flight = false;
                    match result {
                        LoadResult::Failed { offline, message } => {
                            if *offline {
                                self.apply_status(Status::offline());
                            } else {
                                self.apply_status(Status::error(format!(
                                    "load failed: {message}"
                                )));
                            }
                        }
                        _ => self.apply_status(self.base_status()),
                    }
                }
            }
            Action::SaveFinished { section, error } => match error {
                None => self.apply_status(Status::new(
                    StatusKind::Online,
                    format!("{section} settings applied"),
                )),
                Some(_) => {
                    if self.client.is_offline() {
                        self.apply_status(Status::offline());
                    } else {
                        self.apply_status(Status::error(format!(
                            "failed to save {section} settings"
                        )));
                    }
                }
            },
            Action::ToggleAutofill => {
                self.autofill = self.autofill.toggle();
                let mut cfg = radgate_config::load_config_or_default();
                cfg.autofill = self.autofill;
                if let Err(e) = radgate_config::save_config(&cfg) {
                    warn!("failed to persist autofill mode: {e}");
                }
                self.apply_status(Status::new(
                    self.status.current().kind,
                    format!("autofill: {}", self.autofill.label()),
                ));
                return Ok(());
            }
            Action::ToggleOffline => {
                let offline = !self.client.is_offline();
                self.client.set_offline(offline);
                info!(offline, "offline mode toggled");
                self.apply_status(self.base_status());
            }
            Action::SetStatus(status) => {
                self.apply_status(status.clone());
                return Ok(());
            }
            _ => {}
        }

        // Forward to the active screen; it may produce a follow-up action.
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }

        Ok(())
    }

    fn apply_status(&mut self, status: Status) {
        // Message updates immediately; the indicator color is debounced.
        self.top_message.clone_from(&status.message);
        self.top_message_kind = status.kind;
        self.status.request(status, Instant::now());
    }

    fn switch_section(&mut self, section: Section) -> Result<()> {
        info!(%section, "section selected");
        self.active_section = section;
        self.screen = create_screen(section, &self.client, self.autofill);
        self.screen.init(self.action_tx.clone())?;
        self.refresh_in_flight = false;
        self.spawn_load(section);
        Ok(())
    }

    /// Load a section's data in the background, reporting back through the
    /// action channel. The busy indicator goes up immediately; it is wound
    /// down on completion regardless of outcome.
    fn spawn_load(&mut self, section: Section) {
        self.refresh_in_flight = true;
        self.apply_status(Status::busy());

        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match client.get_info(section.id()).await {
                Ok(body) => match section {
                    Section::Wifi => LoadResult::Wifi(WifiSettings::extract(&body)),
                    Section::Ethernet => LoadResult::Ethernet(EthernetSettings::extract(&body)),
                    Section::Modem => LoadResult::Modem(ModemSettings::extract(&body)),
                    Section::Daemon => {
                        LoadResult::Daemon(Box::new(daemon_core::split_body(&body)))
                    }
                },
                Err(e) => {
                    let err = CoreError::from(e);
                    LoadResult::Failed {
                        offline: err.is_offline(),
                        message: err.to_string(),
                    }
                }
            };
            let _ = tx.send(Action::SectionLoaded { section, result });
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let outer = Layout::horizontal([Constraint::Length(18), Constraint::Min(0)])
            .split(frame.area());

        self.render_sidebar(frame, outer[0]);

        let main = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // key hints
        ])
        .split(outer[1]);

        self.render_header(frame, main[0]);
        self.screen.render(frame, main[1]);
        self.render_key_hints(frame, main[2]);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" radgate ", theme::title_style()))
            .borders(Borders::RIGHT)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (idx, section) in Section::ALL.iter().enumerate() {
            let y = inner.y + 1 + u16::try_from(idx).unwrap_or(0);
            if y >= inner.bottom() {
                break;
            }
            let style = if *section == self.active_section {
                theme::menu_active()
            } else {
                theme::menu_inactive()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {section} "), style)),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([
            Constraint::Length(12),
            Constraint::Min(0),
            Constraint::Length(12),
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", self.active_section),
                theme::title_style(),
            )),
            cols[0],
        );

        // Centered top-bar message: not debounced, latest request wins.
        if !self.top_message.is_empty() {
            let style = match self.top_message_kind {
                StatusKind::Error => theme::hint_error(),
                StatusKind::Offline => theme::hint_warn(),
                _ => theme::hint_neutral(),
            };
            frame.render_widget(
                Paragraph::new(Span::styled(self.top_message.clone(), style))
                    .alignment(Alignment::Center),
                cols[1],
            );
        }

        // Debounced indicator dot on the right.
        let kind = self.status.current().kind;
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{} ", status_indicator::status_label(kind)),
                    theme::key_hint(),
                ),
                status_indicator::status_span(kind),
                Span::raw(" "),
            ]))
            .alignment(Alignment::Right),
            cols[2],
        );
    }

    fn render_key_hints(&self, frame: &mut Frame, area: Rect) {
        let hints =
            "Tab field  Enter save  ^R refresh  ^L clear  ^F autofill  ^N/^P section  ^O offline  ^C quit";
        frame.render_widget(
            Paragraph::new(Span::styled(hints, theme::key_hint())).alignment(Alignment::Center),
            area,
        );
    }
}
