//! Screens shown instead of the farm layout.

mod waiting;

pub use waiting::{MAX_VISIBLE_ENTRIES, draw_waiting};
