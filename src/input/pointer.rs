use eframe::egui::{Pos2, Response};

/// Device-agnostic snapshot of the pointer over the stick zone.
///
/// Mouse, touch and pen all reduce to the same two facts: an optional
/// position and whether the contact is currently pressed. Everything else
/// (button numbers, touch phases, hover) stays in egui.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Latest pointer position in screen coordinates, if one is known.
    pub position: Option<Pos2>,
    /// True while a button is held or a touch contact is active.
    pub pressed: bool,
}

impl PointerSample {
    pub fn new(position: Option<Pos2>, pressed: bool) -> Self {
        Self { position, pressed }
    }

    /// Builds a sample from the interact response of the stick zone.
    ///
    /// `interact_pointer_pos` covers press and drag; `hover_pos` keeps the
    /// position current between contacts so a release maps cleanly back to
    /// the zone center.
    pub fn from_response(response: &Response) -> Self {
        Self::new(
            response.interact_pointer_pos().or_else(|| response.hover_pos()),
            response.is_pointer_button_down_on() || response.dragged(),
        )
    }
}
