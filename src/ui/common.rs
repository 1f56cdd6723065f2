//! Shared styling for the debugger window.

use egui::{Color32, Frame, Stroke};

use crate::mqtt::mqtt_handler::{ConnectionState, MqttStatus};

/// Dark palette used by every panel.
pub struct UiColors;

impl UiColors {
    /// Main content background (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Nested components (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Editor and log areas (RGB: 20, 20, 20)
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Connected, or a successful send
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Disconnected, or a rejected send
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);

    /// Connection attempt in progress
    pub const PENDING: Color32 = Color32::from_rgb(220, 170, 30);
}

pub fn panel_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

pub fn status_color(status: &MqttStatus) -> Color32 {
    match status.connection_state {
        ConnectionState::Connected => UiColors::ACTIVE,
        ConnectionState::Connecting => UiColors::PENDING,
        ConnectionState::Disconnected | ConnectionState::Failed => UiColors::INACTIVE,
    }
}

pub fn status_text(status: &MqttStatus) -> String {
    let state = match status.connection_state {
        ConnectionState::Connected => "connected",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Disconnected => "disconnected",
        ConnectionState::Failed => "connection failed",
    };
    match &status.last_error {
        Some(e) if !status.is_connected() => format!("{} ({})", state, e),
        _ => state.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_shows_error_only_when_not_connected() {
        let mut status = MqttStatus {
            connection_state: ConnectionState::Failed,
            last_error: Some("refused".to_string()),
            ..MqttStatus::default()
        };
        assert_eq!(status_text(&status), "connection failed (refused)");
        assert_eq!(status_color(&status), UiColors::INACTIVE);

        status.connection_state = ConnectionState::Connected;
        assert_eq!(status_text(&status), "connected");
        assert_eq!(status_color(&status), UiColors::ACTIVE);
    }
}
