use crate::constants::PerObjectConstants;
use crate::renderer::{MeshHandle, RenderError};

/// One step of a frame, executed by a renderer in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Clear color (RGBA) and depth (to 1.0) targets.
    Clear { color: [f32; 4] },
    /// Draw the fullscreen starfield behind everything else.
    DrawBackdrop,
    /// Write the object's constant block and draw all of its triangles.
    DrawMesh {
        mesh: MeshHandle,
        constants: PerObjectConstants,
    },
    /// Hand the finished frame to the presentation surface.
    Present,
}

/// Ordered command list for one frame.
///
/// The buffer is reused across ticks to avoid reallocating every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    commands: Vec<RenderCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of `DrawMesh` commands.
    pub fn mesh_draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawMesh { .. }))
            .count()
    }

    /// Check the frame shape: `Clear` first, `Present` last, neither in between.
    ///
    /// Returns the clear color and the draw commands between the two.
    pub fn validate(&self) -> Result<([f32; 4], &[RenderCommand]), RenderError> {
        let (first, rest) = self
            .commands
            .split_first()
            .ok_or(RenderError::MalformedFrame("frame is empty"))?;
        let RenderCommand::Clear { color } = first else {
            return Err(RenderError::MalformedFrame("frame must begin with Clear"));
        };
        let Some((RenderCommand::Present, draws)) = rest.split_last() else {
            return Err(RenderError::MalformedFrame("frame must end with Present"));
        };
        if draws
            .iter()
            .any(|c| matches!(c, RenderCommand::Clear { .. } | RenderCommand::Present))
        {
            return Err(RenderError::MalformedFrame(
                "Clear and Present may only appear once",
            ));
        }
        Ok((*color, draws))
    }
}
