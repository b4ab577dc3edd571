//! Gauge rendering for the dashboard.
//!
//! Two kinds of read-outs share the gauge zone: dial gauges whose needle
//! deflects linearly with one control axis, and position markers that show
//! the stick value inside the interactive zone itself. Both are plain
//! immediate-mode painting; every frame redraws from the current value,
//! there is no animation state.

pub mod dial;
pub mod marker;

pub use dial::{draw_dial, needle_angle};
pub use marker::{draw_marker, marker_position};
