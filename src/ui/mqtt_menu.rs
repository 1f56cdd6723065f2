use egui::{
    Align, CollapsingHeader, Label, Layout, RichText, ScrollArea, TextEdit, Ui, Vec2,
};
use tracing::debug;

use crate::mqtt::message_manager::SentLog;
use crate::mqtt::topics::Catalog;
use crate::session::{Command, Notice, Session};

use super::common::{panel_frame, UiColors};

const EDITOR_ROWS: usize = 16;

/// Renders the topic tree and returns the selection command, if any.
pub fn topic_tree(ui: &mut Ui, catalog: &Catalog, session: &Session) -> Option<Command> {
    let mut command = None;
    let selected_raw = session.selected().map(|t| t.raw());

    CollapsingHeader::new("Topics")
        .default_open(true)
        .show(ui, |ui| {
            for (index, topic) in catalog.list_topics().iter().enumerate() {
                let is_selected = selected_raw == Some(topic.raw());
                let mut label = RichText::new(topic.raw()).monospace();
                if topic.category().is_some_and(|c| c.is_reply()) {
                    label = label.italics();
                }
                let hover = match topic.category() {
                    Some(category) => format!("{} [{}]", topic.resolved(), category),
                    None => topic.resolved().to_string(),
                };
                if ui
                    .selectable_label(is_selected, label)
                    .on_hover_text(hover)
                    .clicked()
                {
                    command = Some(Command::SelectTopic(index));
                }
            }
        });

    command
}

/// Renders the content area, the draft editor and the action buttons.
/// Commands are appended in the order the operator triggered them.
pub fn message_panel(ui: &mut Ui, session: &Session, commands: &mut Vec<Command>) {
    panel_frame(UiColors::INNER_BG, UiColors::BORDER).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        notice(ui, session.notice());
    });

    ui.add_space(4.0);

    panel_frame(UiColors::EXTREME_BG, UiColors::BORDER).show(ui, |ui| {
        let mut draft = session.draft().to_string();
        ScrollArea::vertical()
            .id_salt("msg_editor")
            .max_height(ui.available_height() * 0.6)
            .show(ui, |ui| {
                let response = ui.add(
                    TextEdit::multiline(&mut draft)
                        .code_editor()
                        .desired_rows(EDITOR_ROWS)
                        .desired_width(f32::INFINITY)
                        .hint_text("Enter message content (JSON)"),
                );
                if response.changed() {
                    commands.push(Command::EditDraft(draft));
                }
            });
    });

    ui.add_space(4.0);

    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
        let button_size = Vec2::new(180.0, 24.0);
        if ui
            .add_sized(button_size, egui::Button::new("Generate random message"))
            .clicked()
        {
            debug!("Generate button pressed");
            commands.push(Command::GenerateRandom);
        }
        ui.add_space(4.0);
        if ui.add_sized(button_size, egui::Button::new("Send")).clicked() {
            debug!("Send button pressed");
            commands.push(Command::Send);
        }
    });

    ui.add_space(4.0);
    sent_log(ui, session.sent());
}

fn notice(ui: &mut Ui, notice: &Notice) {
    match notice {
        Notice::Idle => {
            ui.label("Message content");
        }
        Notice::Selected(topic) => {
            ui.label(format!("Selected Topic: {}", topic));
        }
        Notice::Generated { topic, body } => {
            ui.strong(format!("Selected Topic: {}", topic));
            ScrollArea::vertical()
                .id_salt("generated_preview")
                .max_height(160.0)
                .show(ui, |ui| {
                    ui.add(Label::new(RichText::new(body).monospace()).selectable(true));
                });
        }
        Notice::Sent(topic) => {
            ui.colored_label(UiColors::ACTIVE, format!("Sent to {}", topic));
        }
        Notice::Warning(text) => {
            ui.colored_label(UiColors::INACTIVE, text);
        }
    }
}

fn sent_log(ui: &mut Ui, sent: &SentLog) {
    CollapsingHeader::new(format!("Recently sent ({})", sent.len()))
        .default_open(false)
        .show(ui, |ui| {
            ScrollArea::vertical()
                .id_salt("sent_log")
                .max_height(200.0)
                .show(ui, |ui| {
                    for msg in sent.iter() {
                        ui.add(Label::new(RichText::new(msg.to_string()).monospace()))
                            .on_hover_text(msg.render());
                    }
                });
        });
}
