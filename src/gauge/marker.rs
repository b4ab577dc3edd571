use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::input::ControlXY;

const MARKER_RADIUS: f32 = 10.0;

/// Screen position of a control value inside the stick zone.
///
/// Scales the normalized value by the zone's half-extents around the zone
/// center; control y points up, screen y points down.
pub fn marker_position(control: ControlXY, region: Rect) -> Pos2 {
    let center = region.center();
    Pos2::new(
        center.x + control.x * region.width() / 2.0,
        center.y - control.y * region.height() / 2.0,
    )
}

/// Paints a position marker for `control` inside `region`.
pub fn draw_marker(painter: &Painter, region: Rect, control: ControlXY, color: Color32) {
    painter.circle(
        marker_position(control, region),
        MARKER_RADIUS,
        color,
        Stroke::new(1.0, Color32::BLACK),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn origin_maps_to_region_center() {
        let region = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0));
        assert_eq!(marker_position(ControlXY::default(), region), region.center());
    }

    #[test]
    fn marker_scales_by_half_extents() {
        // "0.250,-0.500" over a 400x300 zone lands a quarter half-width
        // right of center and half a half-height below it.
        let region = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0));
        let control = ControlXY { x: 0.250, y: -0.500 };
        let pos = marker_position(control, region);
        assert_eq!(pos.x - region.center().x, 0.25 * 200.0);
        assert_eq!(pos.y - region.center().y, 0.5 * 150.0);
    }

    #[test]
    fn full_deflection_reaches_the_edges() {
        let region = Rect::from_min_size(pos2(100.0, 100.0), vec2(200.0, 200.0));
        let pos = marker_position(ControlXY { x: 1.0, y: 1.0 }, region);
        assert_eq!(pos, pos2(region.right(), region.top()));
    }
}
