//! Clock page: a dial face whose hands rotate by server-supplied angles.
//!
//! The server does the time arithmetic and answers the clock query with
//! three ready-made rotations in degrees; this view only applies them.
//! The last received hands stay cached between polls so the face renders
//! stably even when a tick goes unanswered.

use eframe::egui::{Align2, Color32, FontId, Pos2, Sense, Stroke, Ui};

use crate::transport::ClockHands;
use crate::ui::common::UiColors;

const HAND_COLOR: Color32 = Color32::WHITE;
const SECOND_HAND_COLOR: Color32 = Color32::from_rgb(220, 40, 30);

pub struct ClockView {
    hands: Option<ClockHands>,
}

impl ClockView {
    pub fn new() -> Self {
        Self { hands: None }
    }

    pub fn set_hands(&mut self, hands: ClockHands) {
        self.hands = Some(hands);
    }

    pub fn render(&mut self, ui: &mut Ui) {
        let rect = ui.available_rect_before_wrap();
        let _ = ui.allocate_rect(rect, Sense::hover());
        let painter = ui.painter_at(rect);

        let center = rect.center();
        let radius = (rect.width().min(rect.height()) / 2.0) - 20.0;
        if radius <= 0.0 {
            return;
        }

        painter.circle(
            center,
            radius,
            UiColors::INNER_BG,
            Stroke::new(2.0, UiColors::BORDER),
        );

        for i in 0..12 {
            let angle = (i as f32) * 30.0;
            painter.line_segment(
                [
                    hand_point(center, angle, radius * 0.85),
                    hand_point(center, angle, radius * 0.95),
                ],
                Stroke::new(2.0, UiColors::AXIS),
            );
        }

        match self.hands {
            Some(hands) => {
                draw_hand(&painter, center, hands.hours_deg, radius * 0.5, 4.0, HAND_COLOR);
                draw_hand(&painter, center, hands.minutes_deg, radius * 0.75, 3.0, HAND_COLOR);
                draw_hand(
                    &painter,
                    center,
                    hands.seconds_deg,
                    radius * 0.9,
                    1.5,
                    SECOND_HAND_COLOR,
                );
                painter.circle(center, 5.0, Color32::BLACK, Stroke::new(1.5, SECOND_HAND_COLOR));
            }
            None => {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    "waiting for time",
                    FontId::proportional(16.0),
                    UiColors::AXIS,
                );
            }
        }
    }
}

impl Default for ClockView {
    fn default() -> Self {
        Self::new()
    }
}

/// Point at `length` from `center` for a hand rotated by `angle_deg`.
///
/// Zero degrees points at twelve o'clock; positive angles rotate the hand
/// clockwise, matching the rotation convention of the server payload.
fn hand_point(center: Pos2, angle_deg: f32, length: f32) -> Pos2 {
    let rad = angle_deg.to_radians();
    Pos2::new(center.x + rad.sin() * length, center.y - rad.cos() * length)
}

fn draw_hand(
    painter: &eframe::egui::Painter,
    center: Pos2,
    angle_deg: f32,
    length: f32,
    width: f32,
    color: Color32,
) {
    painter.line_segment(
        [center, hand_point(center, angle_deg, length)],
        Stroke::new(width, color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn zero_degrees_points_at_twelve() {
        let tip = hand_point(pos2(100.0, 100.0), 0.0, 50.0);
        assert!((tip.x - 100.0).abs() < 1e-4);
        assert!((tip.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn ninety_degrees_points_at_three() {
        let tip = hand_point(pos2(100.0, 100.0), 90.0, 50.0);
        assert!((tip.x - 150.0).abs() < 1e-3);
        assert!((tip.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn negative_angles_rotate_counterclockwise() {
        // The time server sends negated angles; -90° is nine o'clock.
        let tip = hand_point(pos2(100.0, 100.0), -90.0, 50.0);
        assert!((tip.x - 50.0).abs() < 1e-3);
        assert!((tip.y - 100.0).abs() < 1e-3);
    }
}
