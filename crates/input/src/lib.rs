//! Input snapshot: raw key and mouse events accumulated between frames.
//!
//! # Invariants
//! - Window-system types never cross this boundary; hosts translate their key
//!   codes into [`MoveKey`] before feeding events in.
//! - Consuming a frame resets the mouse delta but keeps held keys.

pub mod action;
pub mod snapshot;

pub use action::{InputEvent, MoveKey};
pub use snapshot::{FrameInput, InputSnapshot, MoveIntent};

pub fn crate_info() -> &'static str {
    "starlight-input v0.1.0"
}
