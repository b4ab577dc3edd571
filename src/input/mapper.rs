use eframe::egui::Rect;

use super::pointer::PointerSample;

/// Normalized 2D control value, both axes in [-1, 1].
///
/// Positive x steers right, positive y drives forward. (0, 0) is the rest
/// position and corresponds to the exact center of the stick zone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlXY {
    pub x: f32,
    pub y: f32,
}

impl ControlXY {
    /// Builds a control value, clamping both axes into range.
    ///
    /// Remote peers are not trusted to stay in range, so every decoded
    /// value passes through here as well.
    pub fn clamped(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }
}

/// Maps a pointer sample over the stick zone to a normalized control value.
///
/// The sample position is only honored while the pointer is pressed;
/// releasing the stick snaps the control back to (0, 0) so the vehicle
/// stops when the user lets go. Positions outside the zone clamp to ±1 on
/// the exceeded axis. Screen y grows downward, control y grows upward.
pub fn map_pointer(sample: &PointerSample, region: Rect) -> ControlXY {
    let half_w = region.width() / 2.0;
    let half_h = region.height() / 2.0;
    if half_w <= 0.0 || half_h <= 0.0 {
        return ControlXY::default();
    }

    let center = region.center();
    let raw = match sample.position {
        Some(pos) if sample.pressed => pos,
        _ => center,
    };

    // Center-origin coordinates, y flipped to point up.
    let dx = (raw.x - center.x).clamp(-half_w, half_w);
    let dy = (center.y - raw.y).clamp(-half_h, half_h);

    ControlXY {
        x: dx / half_w,
        y: dy / half_h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2, Rect};

    fn zone() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0))
    }

    fn pressed_at(x: f32, y: f32) -> PointerSample {
        PointerSample::new(Some(pos2(x, y)), true)
    }

    #[test]
    fn center_maps_to_origin() {
        let c = map_pointer(&pressed_at(200.0, 100.0), zone());
        assert_eq!(c, ControlXY { x: 0.0, y: 0.0 });
    }

    #[test]
    fn interior_positions_stay_strictly_inside_unit_range() {
        let region = zone();
        for (px, py) in [(150.0, 75.0), (260.0, 130.0), (101.0, 149.0)] {
            let c = map_pointer(&pressed_at(px, py), region);
            assert!(c.x > -1.0 && c.x < 1.0, "x out of open range: {}", c.x);
            assert!(c.y > -1.0 && c.y < 1.0, "y out of open range: {}", c.y);
        }
    }

    #[test]
    fn positions_outside_clamp_to_exactly_one() {
        let region = zone();

        let right = map_pointer(&pressed_at(500.0, 100.0), region);
        assert_eq!(right.x, 1.0);
        assert_eq!(right.y, 0.0);

        let above = map_pointer(&pressed_at(200.0, -40.0), region);
        assert_eq!(above.x, 0.0);
        assert_eq!(above.y, 1.0);

        let corner = map_pointer(&pressed_at(-10.0, 400.0), region);
        assert_eq!(corner.x, -1.0);
        assert_eq!(corner.y, -1.0);
    }

    #[test]
    fn screen_y_inverts_to_control_y() {
        // Upper half of the zone is positive y.
        let c = map_pointer(&pressed_at(200.0, 60.0), zone());
        assert!(c.y > 0.0);
    }

    #[test]
    fn released_pointer_recenters() {
        let sample = PointerSample::new(Some(pos2(280.0, 60.0)), false);
        assert_eq!(map_pointer(&sample, zone()), ControlXY::default());
    }

    #[test]
    fn pressed_without_position_recenters() {
        let sample = PointerSample::new(None, true);
        assert_eq!(map_pointer(&sample, zone()), ControlXY::default());
    }

    #[test]
    fn degenerate_region_maps_to_origin() {
        let region = Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0));
        assert_eq!(map_pointer(&pressed_at(5.0, 5.0), region), ControlXY::default());
    }

    #[test]
    fn decoded_values_are_clamped() {
        let c = ControlXY::clamped(3.5, -1.2);
        assert_eq!(c, ControlXY { x: 1.0, y: -1.0 });
    }
}
