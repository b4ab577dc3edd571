//! Settings page: transport selection, endpoint configuration and the
//! power controls.
//!
//! The page edits a draft copy of the configuration. Apply pushes the
//! draft through the config watch channel (the transport rebuilds itself
//! from it) and persists it through the portal in a background task, so
//! the UI thread never waits on the filesystem.

use std::sync::Arc;

use eframe::egui::{self, DragValue, Frame, TextEdit, Ui};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use crate::persistence::{ConfigPortal, DashConfig, TransportMode};
use crate::transport::{ExitTarget, LinkCommand};
use crate::ui::common::{create_frame, UiColors};

pub struct SettingsView {
    draft: DashConfig,
    config_tx: watch::Sender<DashConfig>,
    command_sender: mpsc::Sender<LinkCommand>,
    config_portal: Arc<ConfigPortal>,
}

impl SettingsView {
    pub fn new(
        draft: DashConfig,
        config_tx: watch::Sender<DashConfig>,
        command_sender: mpsc::Sender<LinkCommand>,
        config_portal: Arc<ConfigPortal>,
    ) -> Self {
        Self {
            draft,
            config_tx,
            command_sender,
            config_portal,
        }
    }

    /// Configuration currently applied to the transport.
    pub fn applied(&self) -> DashConfig {
        self.config_tx.borrow().clone()
    }

    pub fn render(&mut self, ui: &mut Ui) {
        ui.vertical(|ui| {
            ui.heading("Settings");

            let section_spacing = 5.0;

            self.render_transport_section(ui);
            ui.add_space(section_spacing);
            self.render_mqtt_section(ui);
            ui.add_space(section_spacing);
            self.render_poll_section(ui);
            ui.add_space(section_spacing);
            self.render_ui_section(ui);
            ui.add_space(section_spacing);
            self.render_power_section(ui);
        });
    }

    fn section_frame() -> Frame {
        create_frame(UiColors::MAIN_BG, UiColors::BORDER).inner_margin(8.0)
    }

    fn render_transport_section(&mut self, ui: &mut Ui) {
        Self::section_frame().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading("Transport");

                ui.horizontal(|ui| {
                    ui.label("Variant:");
                    egui::ComboBox::from_id_salt("transport_mode")
                        .selected_text(self.draft.transport.to_string())
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut self.draft.transport,
                                TransportMode::Mqtt,
                                TransportMode::Mqtt.to_string(),
                            );
                            ui.selectable_value(
                                &mut self.draft.transport,
                                TransportMode::Poll,
                                TransportMode::Poll.to_string(),
                            );
                        });

                    if ui.button("Apply").clicked() {
                        self.apply();
                    }
                });
            });
        });
    }

    fn render_mqtt_section(&mut self, ui: &mut Ui) {
        Self::section_frame().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading("MQTT");

                ui.horizontal(|ui| {
                    ui.label("Broker:");
                    ui.add(
                        TextEdit::singleline(&mut self.draft.mqtt.server.url)
                            .hint_text("host:port"),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("User:");
                    ui.text_edit_singleline(&mut self.draft.mqtt.server.user);
                });
                ui.horizontal(|ui| {
                    ui.label("Password:");
                    ui.add(
                        TextEdit::singleline(&mut self.draft.mqtt.server.pw)
                            .password(true)
                            .hint_text("Enter Password"),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Topic root:");
                    ui.text_edit_singleline(&mut self.draft.mqtt.topic_root);
                });
            });
        });
    }

    fn render_poll_section(&mut self, ui: &mut Ui) {
        Self::section_frame().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading("HTTP Poll");

                ui.horizontal(|ui| {
                    ui.label("Server:");
                    ui.add(
                        TextEdit::singleline(&mut self.draft.poll.base_url)
                            .hint_text("http://host:port"),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Interval (ms):");
                    ui.add(
                        DragValue::new(&mut self.draft.poll.interval_ms)
                            .speed(10)
                            .range(20..=2000),
                    );
                });
            });
        });
    }

    fn render_ui_section(&mut self, ui: &mut Ui) {
        Self::section_frame().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading("Display");

                ui.horizontal(|ui| {
                    ui.label("Refresh (fps):");
                    ui.add(DragValue::new(&mut self.draft.ui.fps).speed(1).range(10..=60));
                });
                ui.checkbox(&mut self.draft.ui.fullscreen, "Start fullscreen");
            });
        });
    }

    fn render_power_section(&mut self, ui: &mut Ui) {
        Self::section_frame().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading("Power");

                ui.horizontal(|ui| {
                    if ui.button("Stop Car").clicked() {
                        self.send_exit(ExitTarget::Car);
                    }
                    if ui.button("Stop Controller").clicked() {
                        self.send_exit(ExitTarget::Controller);
                    }
                });
            });
        });
    }

    /// Pushes the draft to the transport and persists it.
    fn apply(&mut self) {
        info!("Applying configuration: {:?}", self.draft.transport);
        if self.config_tx.send(self.draft.clone()).is_err() {
            warn!("Transport task gone, configuration not applied");
        }

        let portal = self.config_portal.clone();
        let config = self.draft.clone();
        tokio::spawn(async move {
            if let Err(e) = portal.replace(config).await {
                error!("Failed to persist configuration: {}", e);
            }
        });
    }

    fn send_exit(&self, target: ExitTarget) {
        if let Err(e) = self.command_sender.try_send(LinkCommand::SystemExit(target)) {
            warn!("Exit command dropped: {}", e);
        }
    }
}
