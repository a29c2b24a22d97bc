//! Simulation side of the renderer: the first-person player, scene objects,
//! and the frame driver that ties input, simulation and rendering together.
//!
//! # Invariants
//! - Per tick: input, elapsed time, player, view matrix, animation, clear,
//!   backdrop, objects in registration order, present.
//! - The view-projection matrix is computed once per tick and passed into
//!   every draw; nothing reaches into a global player.

pub mod clock;
pub mod driver;
pub mod player;
pub mod scene;
pub mod setup;

pub use clock::{DEFAULT_MAX_FRAME_TIME, FrameClock};
pub use driver::{DriverConfig, DriverState, FrameDriver, Projection};
pub use player::{Player, PlayerConfig};
pub use scene::{Animation, ObjectId, Scene, SceneObject};
pub use setup::{DEFAULT_MODEL_PATH, DefaultScene, default_scene};

pub fn crate_info() -> &'static str {
    "starlight-kernel v0.1.0"
}
