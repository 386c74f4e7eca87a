//! Selection tools for image editing.
//!
//! - **Crop**: movable, resizable rectangle with eight handles, driven by
//!   pointer down/move/up events in buffer coordinates.

pub mod crop;

pub use crop::{CropRect, CropTool, CursorKind, Handle, InteractionState};
