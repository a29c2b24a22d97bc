//! Mesh geometry for the renderer.
//!
//! Geometry is produced once at load time, either procedurally ([`shapes`]) or
//! from a Wavefront OBJ file ([`obj`]), and handed to a renderer for upload.
//! Nothing here touches the GPU.

mod mesh;
pub mod obj;
pub mod shapes;

pub use mesh::{MeshData, MeshSummary, Vertex};
pub use obj::{load_obj, parse_obj};

/// Errors from loading geometry.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: vertex record needs three coordinates")]
    MissingCoordinate { line: usize },
    #[error("line {line}: invalid vertex index `{token}`")]
    InvalidIndex { line: usize, token: String },
    #[error("line {line}: vertex index {index} out of range ({count} vertices defined)")]
    IndexOutOfRange { line: usize, index: i64, count: usize },
    #[error("line {line}: face needs at least 3 vertices, got {count}")]
    DegenerateFace { line: usize, count: usize },
    #[error("model contains no triangles")]
    Empty,
}

pub fn crate_info() -> &'static str {
    "starlight-assets v0.1.0"
}
