use crate::frame::{Frame, RenderCommand};
use starlight_assets::MeshData;
use std::fmt::Write as _;

/// Handle to a mesh uploaded to a renderer. Only meaningful to the renderer
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// Errors from renderer setup and frame submission.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no suitable graphics adapter found")]
    AdapterUnavailable,
    #[error("surface error: {0}")]
    Surface(String),
    #[error("device request failed: {0}")]
    Device(String),
    #[error("failed to create {label}: {message}")]
    ResourceCreation { label: String, message: String },
    #[error("mesh `{0}` has no triangles")]
    EmptyMesh(String),
    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshHandle),
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),
}

/// Renderer interface. All backends implement this trait.
///
/// Geometry is uploaded once at load time; each tick the frame driver submits
/// one [`Frame`]. The renderer never reads scene or player state directly.
pub trait Renderer {
    /// Upload geometry and return a handle for later draw commands. The
    /// renderer owns the resulting device resources until it is dropped.
    fn upload_mesh(&mut self, label: &str, mesh: &MeshData) -> Result<MeshHandle, RenderError>;

    /// Resize render targets to the new surface size in pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Execute one frame's commands in order.
    fn submit(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

#[derive(Debug, Clone)]
struct DebugMesh {
    label: String,
    triangles: usize,
}

/// Headless renderer that turns each frame into a text listing.
///
/// Useful for CLI output, logging, and testing frame ordering without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    meshes: Vec<DebugMesh>,
    size: (u32, u32),
    frames_submitted: u64,
    last_frame: Option<Frame>,
    last_output: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// The most recently submitted frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Text listing of the most recently submitted frame.
    pub fn last_output(&self) -> &str {
        &self.last_output
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn describe(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let (width, height) = self.size();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}) ===",
            self.frames_submitted, width, height
        );
        for command in frame.commands() {
            match command {
                RenderCommand::Clear { color } => {
                    let _ = writeln!(
                        out,
                        "clear color=({:.2}, {:.2}, {:.2}, {:.2}) depth=1.0",
                        color[0], color[1], color[2], color[3]
                    );
                }
                RenderCommand::DrawBackdrop => out.push_str("draw backdrop\n"),
                RenderCommand::DrawMesh { mesh, constants } => {
                    let info = &self.meshes[mesh.0 as usize];
                    let origin = constants.world().w_axis;
                    let _ = writeln!(
                        out,
                        "draw mesh `{}` triangles={} origin=({:.2}, {:.2}, {:.2})",
                        info.label, info.triangles, origin.x, origin.y, origin.z
                    );
                }
                RenderCommand::Present => out.push_str("present\n"),
            }
        }
        out
    }
}

impl Renderer for DebugTextRenderer {
    fn upload_mesh(&mut self, label: &str, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        if mesh.is_empty() {
            return Err(RenderError::EmptyMesh(label.to_string()));
        }
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(DebugMesh {
            label: label.to_string(),
            triangles: mesh.triangle_count(),
        });
        tracing::debug!(label, ?handle, "registered debug mesh");
        Ok(handle)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn submit(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let (_, draws) = frame.validate()?;
        for command in draws {
            if let RenderCommand::DrawMesh { mesh, .. } = command {
                if mesh.0 as usize >= self.meshes.len() {
                    return Err(RenderError::UnknownMesh(*mesh));
                }
            }
        }
        self.last_output = self.describe(frame);
        self.last_frame = Some(frame.clone());
        self.frames_submitted += 1;
        Ok(())
    }
}
