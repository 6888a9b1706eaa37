mod cursor;
mod zoom;

pub use cursor::{CursorAction, CursorState, DirectionPad};
pub use zoom::{FocusTracker, ZoomLevel};
