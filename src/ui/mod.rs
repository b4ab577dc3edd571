//! # OpenDash User Interface Module
//!
//! Implements the complete eframe/egui interface: the dashboard page with
//! the virtual stick and gauges, the server-driven clock page, and the
//! settings page. The UI is the coordination point between the user and
//! the transport task: it owns no sockets and does no I/O of its own.
//!
//! ## Layout Architecture
//!
//! Every screen shares the same three-panel layout:
//! - **Top Panel**: navigation buttons for the three pages
//! - **Central Panel**: the active page
//! - **Bottom Panel**: endpoint, connection state, signal quality and the
//!   current control value
//!
//! ## Backend Communication
//!
//! All transport integration is channel-based and non-blocking. Incoming
//! link events are drained with `try_recv` at the start of every frame;
//! outgoing control values and commands go out with `try_send`. A frame is
//! never allowed to wait on the network.
//!
//! ## Update Ordering
//!
//! Locally mapped values and remote echo values land in the same widgets
//! with last-write-wins semantics; no ordering is enforced between them.
//! The repaint cadence is taken from the configured fps (default 30).

pub mod clock_view;
pub mod common;
pub mod dash_view;
pub mod settings_view;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Button, Color32, Vec2};
use tokio::sync::{mpsc, watch};

use crate::input::ControlXY;
use crate::persistence::{ConfigPortal, DashConfig, TransportMode};
use crate::transport::{
    ActivePage, ConnectionState, LinkCommand, LinkEvent, LinkStatus, SignalQuality,
};

use self::clock_view::ClockView;
use self::common::{fixed3, quality_color, MenuState, UiColors};
use self::dash_view::DashView;
use self::settings_view::SettingsView;

/// Central UI controller: navigation state, the three pages and the
/// channel endpoints toward the transport task.
pub struct OpendashUI {
    menu_state: MenuState,

    /// Incoming link events (echo, clock, quality, status).
    event_receiver: mpsc::Receiver<LinkEvent>,

    /// Tells the poll link which page is showing.
    page_sender: watch::Sender<ActivePage>,

    dash_view: DashView,
    clock_view: ClockView,
    settings_view: SettingsView,

    /// Latest link status for the bottom panel.
    status: LinkStatus,

    /// Latest decorative signal quality (poll link only).
    quality: SignalQuality,

    repaint_interval: Duration,
}

impl OpendashUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        event_receiver: mpsc::Receiver<LinkEvent>,
        control_sender: mpsc::Sender<ControlXY>,
        command_sender: mpsc::Sender<LinkCommand>,
        config_tx: watch::Sender<DashConfig>,
        page_sender: watch::Sender<ActivePage>,
        config_portal: Arc<ConfigPortal>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // The watch channel was seeded with the loaded configuration; the
        // settings draft starts from the same snapshot.
        let initial_config = config_tx.borrow().clone();
        let fps = initial_config.ui.fps.max(1) as u64;

        OpendashUI {
            menu_state: MenuState::Dash,
            event_receiver,
            page_sender,
            dash_view: DashView::new(control_sender),
            clock_view: ClockView::new(),
            settings_view: SettingsView::new(
                initial_config,
                config_tx,
                command_sender,
                config_portal,
            ),
            status: LinkStatus::default(),
            quality: SignalQuality::default(),
            repaint_interval: Duration::from_millis(1000 / fps),
        }
    }

    /// Drains the link event channel without blocking the frame.
    fn drain_link_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                LinkEvent::Echo(control) => self.dash_view.set_remote(control),
                LinkEvent::Clock(hands) => self.clock_view.set_hands(hands),
                LinkEvent::Quality(quality) => self.quality = quality,
                LinkEvent::Status(status) => self.status = status,
            }
        }
    }

    fn switch_page(&mut self, state: MenuState) {
        if self.menu_state == state {
            return;
        }
        self.menu_state = state;
        let page = match state {
            MenuState::Clock => ActivePage::Clock,
            _ => ActivePage::Dash,
        };
        let _ = self.page_sender.send(page);
    }

    fn state_color(state: &ConnectionState) -> Color32 {
        match state {
            ConnectionState::Connected => UiColors::ACTIVE,
            ConnectionState::Connecting | ConnectionState::Reconnecting => UiColors::BUSY,
            ConnectionState::Disconnected | ConnectionState::Failed => UiColors::INACTIVE,
        }
    }

    fn render_status_line(&mut self, ui: &mut egui::Ui) {
        let config = self.settings_view.applied();
        let endpoint = match config.transport {
            TransportMode::Mqtt => format!("MQTT {}", config.mqtt.server),
            TransportMode::Poll => format!("poll {}", config.poll.base_url),
        };

        ui.horizontal_centered(|ui| {
            ui.colored_label(Self::state_color(&self.status.connection_state), "\u{2B24}");
            ui.label(format!("{} ({})", endpoint, self.status.connection_state));

            if config.transport == TransportMode::Poll {
                ui.colored_label(
                    quality_color(self.quality),
                    format!("signal {}", self.quality),
                );
            }

            let local = self.dash_view.local();
            ui.label(format!("x {}  y {}", fixed3(local.x), fixed3(local.y)));

            if !self.status.detail.is_empty() {
                ui.label(&self.status.detail);
            }
        });
    }
}

impl eframe::App for OpendashUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_link_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.ctx().request_repaint_after(self.repaint_interval);
            let width = ui.available_width() - 60.0;

            // Top navigation panel with one button per page.
            egui::TopBottomPanel::top("top_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        let dash_button = Button::new("Dash").min_size(Vec2 {
                            x: width / 3.0,
                            y: 20.0,
                        });
                        let clock_button = Button::new("Clock").min_size(Vec2 {
                            x: width / 3.0,
                            y: 20.0,
                        });
                        let settings_button = Button::new("Settings").min_size(Vec2 {
                            x: width / 3.0,
                            y: 20.0,
                        });

                        if ui.add(dash_button).clicked() {
                            self.switch_page(MenuState::Dash);
                        };
                        if ui.add(clock_button).clicked() {
                            self.switch_page(MenuState::Clock);
                        };
                        if ui.add(settings_button).clicked() {
                            self.switch_page(MenuState::Settings);
                        };
                    });
                });

            // Central content panel with the active page.
            egui::CentralPanel::default().show_inside(ui, |ui| match self.menu_state {
                MenuState::Dash => self.dash_view.render(ui),
                MenuState::Clock => self.clock_view.render(ui),
                MenuState::Settings => self.settings_view.render(ui),
            });

            // Bottom status panel.
            egui::TopBottomPanel::bottom("bottom_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    self.render_status_line(ui);
                });
        });
    }
}
