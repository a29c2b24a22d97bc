//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - A frame is a command list: one `Clear`, draws, one `Present`, in that order.
//! - Renderers never see the player or the scene; all per-object state arrives
//!   inside [`PerObjectConstants`].
//!
//! The wgpu backend lives in `starlight-render-wgpu`. [`DebugTextRenderer`]
//! implements the same trait without a GPU for tooling and tests.

mod constants;
mod frame;
mod renderer;

pub use constants::PerObjectConstants;
pub use frame::{Frame, RenderCommand};
pub use renderer::{DebugTextRenderer, MeshHandle, RenderError, Renderer};

pub fn crate_info() -> &'static str {
    "starlight-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
