//! # Debugger Window
//!
//! eframe application for the debugger. Layout:
//!
//! - **Top Panel**: title, broker address and connection indicator
//! - **Left Panel**: the topic tree
//! - **Central Panel**: selected topic / generated payload, the draft editor,
//!   `Send` and `Generate random message`, and the recently sent list
//!
//! Widgets only produce [`Command`]s. After the panels are drawn the frame's
//! commands are dispatched to the [`Session`] in the order they were produced.

pub mod common;
pub mod mqtt_menu;

use egui::Key;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

use crate::mqtt::config::BrokerConfig;
use crate::mqtt::mqtt_handler::MqttStatus;
use crate::session::{Command, Session, Tools};

use self::common::{panel_frame, status_color, status_text, UiColors};

/// Repaint interval so status changes show up without input.
const REFRESH: Duration = Duration::from_millis(250);

pub struct MqttDebuggerUI {
    session: Session,
    tools: Tools,
    status: watch::Receiver<MqttStatus>,
    broker: String,
}

impl MqttDebuggerUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        tools: Tools,
        status: watch::Receiver<MqttStatus>,
        broker: &BrokerConfig,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        MqttDebuggerUI {
            session: Session::new(),
            tools,
            status,
            broker: broker.to_string(),
        }
    }

    fn top_bar(&self, ui: &mut egui::Ui) {
        let status = self.status.borrow();
        ui.horizontal(|ui| {
            ui.heading("MQTT Debugger");
            ui.separator();
            ui.label(&self.broker);
            ui.colored_label(status_color(&status), "\u{2B24}")
                .on_hover_text(status_text(&status));
            ui.label(format!("sent: {}", status.messages_sent));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak("Ctrl+Q to quit");
            });
        });
    }
}

impl eframe::App for MqttDebuggerUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(REFRESH);

        if ctx.input(|i| i.modifiers.command && i.key_pressed(Key::Q)) {
            info!("Quit requested");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let mut commands: Vec<Command> = Vec::new();

        egui::TopBottomPanel::top("top_panel")
            .frame(panel_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| self.top_bar(ui));

        egui::SidePanel::left("topic_panel")
            .resizable(true)
            .default_width(340.0)
            .frame(panel_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("topic_tree")
                    .show(ui, |ui| {
                        if let Some(command) =
                            mqtt_menu::topic_tree(ui, &self.tools.catalog, &self.session)
                        {
                            commands.push(command);
                        }
                    });
            });

        egui::CentralPanel::default()
            .frame(panel_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| {
                mqtt_menu::message_panel(ui, &self.session, &mut commands);
            });

        for command in commands {
            self.session.dispatch(command, &self.tools);
        }
    }
}
