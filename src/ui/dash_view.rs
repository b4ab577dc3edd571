//! Dashboard page: stick zone, position markers, readouts and dials.
//!
//! The red marker and the numeric readouts follow the user's pointer
//! directly; the blue marker and the dial needles follow the echo the
//! transport feeds back. Both paths write the same screen regions with
//! last-write-wins semantics; a frame where a local and a remote update
//! land together may flicker, which is acceptable for this UI.

use std::time::Instant;

use eframe::egui::{Align2, FontId, Pos2, Sense, Stroke, StrokeKind, Ui, Vec2};
use tokio::sync::mpsc;
use tracing::debug;

use crate::gauge::{draw_dial, draw_marker};
use crate::input::{map_pointer, ControlXY, PointerSample};
use crate::layout::{ResizeThrottle, ViewportGeometry};
use crate::ui::common::{fixed3, UiColors};

pub struct DashView {
    control_sender: mpsc::Sender<ControlXY>,
    geometry: Option<ViewportGeometry>,
    page_size: Vec2,
    throttle: ResizeThrottle,
    local: ControlXY,
    last_sent: Option<ControlXY>,
    remote: ControlXY,
}

impl DashView {
    pub fn new(control_sender: mpsc::Sender<ControlXY>) -> Self {
        Self {
            control_sender,
            geometry: None,
            page_size: Vec2::ZERO,
            throttle: ResizeThrottle::default(),
            local: ControlXY::default(),
            last_sent: None,
            remote: ControlXY::default(),
        }
    }

    /// Current locally mapped control value, for the status line.
    pub fn local(&self) -> ControlXY {
        self.local
    }

    /// Remote echo feedback; drives the dials and the blue marker.
    pub fn set_remote(&mut self, control: ControlXY) {
        self.remote = control;
    }

    pub fn render(&mut self, ui: &mut Ui) {
        let now = Instant::now();
        let page_rect = ui.available_rect_before_wrap();
        let _ = ui.allocate_rect(page_rect, Sense::hover());
        let painter = ui.painter_at(page_rect);

        // Layout runs once at startup and then throttled on size changes;
        // size events during the pending window are dropped.
        if page_rect.size() != self.page_size {
            self.page_size = page_rect.size();
            self.throttle.request(now);
        }
        if self.geometry.is_none() || self.throttle.fire(now) {
            self.geometry =
                Some(ViewportGeometry::compute(page_rect.size()).translated(page_rect.min.to_vec2()));
        }
        let geom = match self.geometry {
            Some(geom) => geom,
            None => return,
        };

        // Pointer handling: one device-agnostic sample per frame.
        let response = ui.interact(
            geom.stick_zone,
            ui.id().with("stick_zone"),
            Sense::click_and_drag(),
        );
        let sample = PointerSample::from_response(&response);
        let mapped = map_pointer(&sample, geom.stick_zone);
        self.local = mapped;
        if self.last_sent != Some(mapped) {
            if let Err(e) = self.control_sender.try_send(mapped) {
                debug!("Control value dropped: {}", e);
            }
            self.last_sent = Some(mapped);
        }

        // Stick zone with its axis cross.
        painter.rect_filled(geom.stick_zone, 0.0, UiColors::EXTREME_BG);
        painter.rect_stroke(
            geom.stick_zone,
            0.0,
            Stroke::new(1.0, UiColors::BORDER),
            StrokeKind::Inside,
        );
        let center = geom.stick_zone.center();
        painter.line_segment(
            [
                Pos2::new(geom.stick_zone.left(), center.y),
                Pos2::new(geom.stick_zone.right(), center.y),
            ],
            Stroke::new(1.0, UiColors::AXIS),
        );
        painter.line_segment(
            [
                Pos2::new(center.x, geom.stick_zone.top()),
                Pos2::new(center.x, geom.stick_zone.bottom()),
            ],
            Stroke::new(1.0, UiColors::AXIS),
        );

        // Echo marker below the user's own.
        draw_marker(&painter, geom.stick_zone, self.remote, UiColors::MARKER_REMOTE);
        draw_marker(&painter, geom.stick_zone, self.local, UiColors::MARKER_LOCAL);

        self.draw_readout(&painter, geom.x_readout, "X", self.local.x);
        self.draw_readout(&painter, geom.y_readout, "Y", self.local.y);

        draw_dial(&painter, geom.forward_dial, self.remote.y, "BCK", "FWD");
        draw_dial(&painter, geom.steer_dial, self.remote.x, "L", "R");
    }

    fn draw_readout(
        &self,
        painter: &eframe::egui::Painter,
        slot: eframe::egui::Rect,
        label: &str,
        value: f32,
    ) {
        painter.rect_filled(slot, 0.0, UiColors::EXTREME_BG);
        painter.rect_stroke(slot, 0.0, Stroke::new(1.0, UiColors::BORDER), StrokeKind::Inside);
        let font = FontId::monospace((slot.height() * 0.4).clamp(12.0, 40.0));
        painter.text(
            slot.center(),
            Align2::CENTER_CENTER,
            format!("{} {}", label, fixed3(value)),
            font,
            UiColors::ACTIVE,
        );
    }
}
