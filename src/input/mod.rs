//! Pointer input handling for the virtual stick.
//!
//! One pointer abstraction serves every input device: egui already folds
//! mouse, touch and pen into a single pointer stream, and [`PointerSample`]
//! reduces that stream to the two facts the stick cares about: where the
//! pointer is and whether it is pressed. [`map_pointer`] projects a sample
//! into the normalized [-1, 1]² control range used by the rest of the
//! application.

pub mod mapper;
pub mod pointer;

pub use mapper::{map_pointer, ControlXY};
pub use pointer::PointerSample;
