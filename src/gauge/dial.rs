use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

/// Needle deflection per unit of normalized input, in degrees.
///
/// Full stick travel sweeps the needle across ±60°; positive input deflects
/// toward the right-hand label.
pub const NEEDLE_DEG_PER_UNIT: f32 = 60.0;

/// Dial face radius in dial-space units. Ticks start between
/// [`tick_inner_radius`] and this outer edge; the needle spans the full
/// radius.
const DIAL_RADIUS: f32 = 80.0;

const DIAL_BG: Color32 = Color32::from_rgb(17, 17, 17);
const TICK_COLOR: Color32 = Color32::WHITE;
const NEEDLE_COLOR: Color32 = Color32::from_rgb(220, 40, 30);
const PIVOT_FILL: Color32 = Color32::BLACK;
const LABEL_COLOR: Color32 = Color32::WHITE;

/// Needle angle for a normalized axis value. Linear and antisymmetric:
/// `needle_angle(-v) == -needle_angle(v)`.
pub fn needle_angle(value: f32) -> f32 {
    NEEDLE_DEG_PER_UNIT * value
}

/// Inner radius of the tick at `angle_deg`, in dial-space units.
///
/// The scale puts a long mark at center, medium marks at ±25° and ±50°,
/// and short marks everywhere else on the 5° grid.
fn tick_inner_radius(angle_deg: i32) -> f32 {
    match angle_deg.abs() {
        0 => 40.0,
        50 => 50.0,
        25 => 60.0,
        _ => 70.0,
    }
}

/// Anisotropic projection from dial space into a slot rectangle.
///
/// The dial lives in a 160×80 local space with the pivot at the origin and
/// angles measured from vertical. The slot keeps a 10 px inset on each side,
/// so the dial stretches to whatever aspect ratio the layout hands it.
struct DialProjection {
    pivot: Pos2,
    sx: f32,
    sy: f32,
}

impl DialProjection {
    fn new(slot: Rect) -> Self {
        Self {
            pivot: Pos2::new(slot.center().x, slot.bottom() - 10.0),
            sx: (slot.width() - 20.0) / 160.0,
            sy: (slot.height() - 20.0) / 80.0,
        }
    }

    /// Projects the dial-space point at `angle_deg` from vertical and
    /// `radius` from the pivot into screen coordinates.
    fn project(&self, angle_deg: f32, radius: f32) -> Pos2 {
        let rad = angle_deg.to_radians();
        Pos2::new(
            self.pivot.x + rad.sin() * radius * self.sx,
            self.pivot.y - rad.cos() * radius * self.sy,
        )
    }
}

/// Paints one dial gauge into `slot`: background, tick scale, needle at
/// [`needle_angle`]`(value)`, pivot and the two end labels.
pub fn draw_dial(painter: &Painter, slot: Rect, value: f32, label_left: &str, label_right: &str) {
    painter.rect_filled(slot, 0.0, DIAL_BG);

    let proj = DialProjection::new(slot);

    let mut angle = -60;
    while angle <= 60 {
        let inner = proj.project(angle as f32, tick_inner_radius(angle));
        let outer = proj.project(angle as f32, DIAL_RADIUS);
        painter.line_segment([inner, outer], Stroke::new(1.5, TICK_COLOR));
        angle += 5;
    }

    let theta = needle_angle(value);
    painter.line_segment(
        [proj.pivot, proj.project(theta, DIAL_RADIUS)],
        Stroke::new(3.0, NEEDLE_COLOR),
    );
    painter.circle(proj.pivot, 5.0, PIVOT_FILL, Stroke::new(1.5, NEEDLE_COLOR));

    let font = FontId::proportional((slot.height() * 0.18).clamp(10.0, 35.0));
    painter.text(
        Pos2::new(slot.left() + 10.0, slot.bottom() - 10.0),
        Align2::LEFT_BOTTOM,
        label_left,
        font.clone(),
        LABEL_COLOR,
    );
    painter.text(
        Pos2::new(slot.right() - 10.0, slot.bottom() - 10.0),
        Align2::RIGHT_BOTTOM,
        label_right,
        font,
        LABEL_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn needle_angle_is_linear() {
        assert_eq!(needle_angle(1.0), 60.0);
        assert_eq!(needle_angle(0.5), 30.0);
        assert_eq!(needle_angle(0.0), 0.0);
    }

    #[test]
    fn needle_angle_is_antisymmetric() {
        for v in [0.1_f32, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(needle_angle(-v), -needle_angle(v));
        }
    }

    #[test]
    fn tick_lengths_follow_the_scale() {
        assert_eq!(tick_inner_radius(0), 40.0);
        assert_eq!(tick_inner_radius(50), 50.0);
        assert_eq!(tick_inner_radius(-50), 50.0);
        assert_eq!(tick_inner_radius(25), 60.0);
        assert_eq!(tick_inner_radius(-25), 60.0);
        assert_eq!(tick_inner_radius(5), 70.0);
        assert_eq!(tick_inner_radius(-60), 70.0);
    }

    #[test]
    fn projection_pivot_sits_at_bottom_center() {
        let slot = Rect::from_min_size(pos2(100.0, 200.0), vec2(180.0, 100.0));
        let proj = DialProjection::new(slot);
        assert_eq!(proj.pivot, pos2(190.0, 290.0));
    }

    #[test]
    fn projection_vertical_points_straight_up() {
        let slot = Rect::from_min_size(pos2(0.0, 0.0), vec2(180.0, 100.0));
        let proj = DialProjection::new(slot);
        let tip = proj.project(0.0, DIAL_RADIUS);
        assert!((tip.x - proj.pivot.x).abs() < 1e-4);
        assert!(tip.y < proj.pivot.y);
    }

    #[test]
    fn positive_deflection_leans_right() {
        let slot = Rect::from_min_size(pos2(0.0, 0.0), vec2(180.0, 100.0));
        let proj = DialProjection::new(slot);
        let tip = proj.project(needle_angle(1.0), DIAL_RADIUS);
        assert!(tip.x > proj.pivot.x);
        let mirrored = proj.project(needle_angle(-1.0), DIAL_RADIUS);
        assert!(((mirrored.x - proj.pivot.x) + (tip.x - proj.pivot.x)).abs() < 1e-3);
        assert!(mirrored.x < proj.pivot.x);
    }
}
