//! Shared UI components and styling.
//!
//! Centralizes the dark palette, the page-navigation state and a couple of
//! small helpers so the individual views stay consistent without repeating
//! color constants and frame boilerplate.

use eframe::egui::{Color32, Frame, Stroke};

use crate::transport::SignalQuality;

/// Current active page in the UI navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Stick zone, markers and gauges.
    Dash,
    /// Server-driven clock face.
    Clock,
    /// Transport and UI configuration.
    Settings,
}

/// Centralized color palette for the dark theme.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background color for nested components
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Deepest background color for emphasized content areas
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Active/connected status indicator color
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Inactive/disconnected status indicator color
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);

    /// Transitional status indicator color (connecting, reconnecting)
    pub const BUSY: Color32 = Color32::from_rgb(220, 180, 40);

    /// Local (user) position marker
    pub const MARKER_LOCAL: Color32 = Color32::from_rgb(220, 40, 30);

    /// Remote (echo) position marker
    pub const MARKER_REMOTE: Color32 = Color32::from_rgb(60, 110, 220);

    /// Axis cross inside the stick zone
    pub const AXIS: Color32 = Color32::from_rgb(90, 90, 90);
}

/// Strip color for a signal-quality state.
pub fn quality_color(quality: SignalQuality) -> Color32 {
    match quality {
        SignalQuality::Good => UiColors::ACTIVE,
        SignalQuality::Poor => UiColors::BUSY,
        SignalQuality::Lost => UiColors::INACTIVE,
    }
}

/// Fixed-3-decimal rendering used for every on-screen control value.
pub fn fixed3(value: f32) -> String {
    format!("{:.3}", value)
}

/// Styled frame with the standard border, fill and margins.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}
