//! The draggable backlog bottom sheet.

pub mod gesture;

pub use gesture::{offset_for_gesture, DragGestureController, GestureFrame, PanelMode, SnapTarget};
