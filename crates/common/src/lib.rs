//! Shared types for the starlight renderer.
//!
//! Coordinates are left-handed: +X right, +Y up, +Z forward.

mod types;

pub use types::{Transform, WORLD_FORWARD, WORLD_RIGHT, WORLD_UP, rotation_from_euler};

pub fn crate_info() -> &'static str {
    "starlight-common v0.1.0"
}
