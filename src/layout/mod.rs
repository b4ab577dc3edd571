//! Viewport layout for the dashboard page.
//!
//! The dash view is carved into a square interactive stick zone anchored
//! bottom-right and a gauge zone in the top-left corner holding four slots:
//! two numeric readouts and the two dials. The split branches on the
//! viewport aspect ratio: a wide viewport stacks the gauges in a column
//! beside the stick, a tall one lays them out as a 2×2 grid above it.
//!
//! Geometry is recomputed only when the viewport size actually changes, and
//! those recomputations are rate-limited by [`ResizeThrottle`].

pub mod throttle;

pub use throttle::ResizeThrottle;

use eframe::egui::{pos2, vec2, Rect, Vec2};

/// Margin between the viewport edge and the page content.
const PAGE_MARGIN: f32 = 20.0;
/// Gap between gauge slots.
const SLOT_GAP: f32 = 20.0;

/// Computed placement of every dashboard element, in coordinates relative
/// to the page origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Square zone the pointer steers in.
    pub stick_zone: Rect,
    /// Slot for the numeric X readout.
    pub x_readout: Rect,
    /// Slot for the numeric Y readout.
    pub y_readout: Rect,
    /// Dial for the Y axis (BCK/FWD).
    pub forward_dial: Rect,
    /// Dial for the X axis (L/R).
    pub steer_dial: Rect,
}

impl ViewportGeometry {
    /// Lays the page out for a viewport of `size`.
    pub fn compute(size: Vec2) -> Self {
        let sw = (size.x - PAGE_MARGIN).max(0.0);
        let sh = (size.y - PAGE_MARGIN).max(0.0);
        let portrait = sw <= sh;

        // Stick zone side length and the space left for the gauge zone.
        let (uw, gauge_w, gauge_h) = if portrait {
            let uw_max = sw - 100.0;
            let uh_max = sh - 300.0;
            let uw = uw_max.min(uh_max).max(0.0);
            (uw, uw_max.max(0.0), (sh - 120.0 - uw).max(0.0))
        } else {
            let uw_max = sw - 200.0;
            let uh_max = sh - 100.0;
            let uw = uw_max.min(uh_max).max(0.0);
            (uw, (sw - 120.0 - uw).max(0.0), uh_max.max(0.0))
        };

        let stick_center = pos2(sw - 50.0 - uw / 2.0, sh - 50.0 - uw / 2.0);
        let stick_zone = Rect::from_center_size(stick_center, vec2(uw, uw));

        let gauge_origin = pos2(50.0, 50.0);
        let slots = if gauge_w > gauge_h {
            // Gauge zone is wider than tall: dial pairs in two columns.
            let slot = vec2(
                ((gauge_w - SLOT_GAP) / 2.0).max(0.0),
                ((gauge_h - SLOT_GAP) / 2.0).max(0.0),
            );
            let col2 = gauge_origin.x + slot.x + SLOT_GAP;
            let row2 = gauge_origin.y + slot.y + SLOT_GAP;
            [
                Rect::from_min_size(gauge_origin, slot),
                Rect::from_min_size(pos2(col2, gauge_origin.y), slot),
                Rect::from_min_size(pos2(gauge_origin.x, row2), slot),
                Rect::from_min_size(pos2(col2, row2), slot),
            ]
        } else {
            // Stacked column of four slots.
            let slot = vec2(gauge_w, ((gauge_h - 3.0 * SLOT_GAP) / 4.0).max(0.0));
            let step = slot.y + SLOT_GAP;
            [
                Rect::from_min_size(gauge_origin, slot),
                Rect::from_min_size(pos2(gauge_origin.x, gauge_origin.y + step), slot),
                Rect::from_min_size(pos2(gauge_origin.x, gauge_origin.y + 2.0 * step), slot),
                Rect::from_min_size(pos2(gauge_origin.x, gauge_origin.y + 3.0 * step), slot),
            ]
        };

        Self {
            stick_zone,
            x_readout: slots[0],
            y_readout: slots[1],
            forward_dial: slots[2],
            steer_dial: slots[3],
        }
    }

    /// Shifts the whole layout by `offset`, used to move from page-local
    /// coordinates into the panel's screen position.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            stick_zone: self.stick_zone.translate(offset),
            x_readout: self.x_readout.translate(offset),
            y_readout: self.y_readout.translate(offset),
            forward_dial: self.forward_dial.translate(offset),
            steer_dial: self.steer_dial.translate(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_zone_is_square() {
        for size in [vec2(1044.0, 620.0), vec2(620.0, 1020.0)] {
            let geom = ViewportGeometry::compute(size);
            assert_eq!(geom.stick_zone.width(), geom.stick_zone.height());
        }
    }

    #[test]
    fn wide_viewport_stacks_gauges_in_a_column() {
        // 1044x620 -> page 1024x600, stick side 500, gauge zone 404x500.
        let geom = ViewportGeometry::compute(vec2(1044.0, 620.0));
        assert_eq!(geom.stick_zone.width(), 500.0);
        assert_eq!(geom.x_readout.min.x, geom.steer_dial.min.x);
        assert!(geom.x_readout.min.y < geom.y_readout.min.y);
        assert!(geom.forward_dial.min.y < geom.steer_dial.min.y);
    }

    #[test]
    fn tall_viewport_uses_two_columns() {
        // 620x1020 -> page 600x1000, stick side 500, gauge zone 500x380.
        let geom = ViewportGeometry::compute(vec2(620.0, 1020.0));
        assert_eq!(geom.x_readout.min.y, geom.y_readout.min.y);
        assert!(geom.x_readout.min.x < geom.y_readout.min.x);
        assert_eq!(geom.forward_dial.min.x, geom.x_readout.min.x);
        assert_eq!(geom.steer_dial.min.x, geom.y_readout.min.x);
    }

    #[test]
    fn stick_zone_keeps_its_corner_anchor() {
        let geom = ViewportGeometry::compute(vec2(1044.0, 620.0));
        // 50 px from the page's right and bottom edges.
        assert_eq!(geom.stick_zone.center().x, 1024.0 - 50.0 - 250.0);
        assert_eq!(geom.stick_zone.center().y, 600.0 - 50.0 - 250.0);
    }

    #[test]
    fn tiny_viewports_collapse_without_negative_extents() {
        let geom = ViewportGeometry::compute(vec2(40.0, 40.0));
        assert!(geom.stick_zone.width() >= 0.0);
        assert!(geom.x_readout.width() >= 0.0);
        assert!(geom.x_readout.height() >= 0.0);
    }

    #[test]
    fn translated_moves_every_rect() {
        let geom = ViewportGeometry::compute(vec2(1044.0, 620.0));
        let moved = geom.translated(vec2(7.0, 11.0));
        assert_eq!(moved.stick_zone.min, geom.stick_zone.min + vec2(7.0, 11.0));
        assert_eq!(moved.steer_dial.min, geom.steer_dial.min + vec2(7.0, 11.0));
    }
}
