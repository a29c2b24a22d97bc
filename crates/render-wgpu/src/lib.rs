//! wgpu render backend.
//!
//! Implements [`starlight_render::Renderer`]: owns the device, queue, surface
//! and depth target, uploads meshes, and executes frame command lists in a
//! single render pass.
//!
//! # Invariants
//! - The backdrop is drawn without depth test or depth write.
//! - Every mesh draw reads its own constant slot, even when objects share a mesh.
//! - Any device object creation error is returned, never swallowed.

mod backdrop;
mod gpu;
mod shaders;
mod uniforms;

pub use gpu::{SurfaceOptions, WgpuRenderer};

pub fn crate_info() -> &'static str {
    "starlight-render-wgpu v0.1.0"
}
