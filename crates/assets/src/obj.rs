//! Wavefront OBJ loading.
//!
//! Only `v` position records and `f` face records are read. Face tokens may
//! carry `/texcoord/normal` suffixes; only the position index is used. Other
//! records (`vn`, `vt`, `o`, `g`, `s`, `usemtl`, ...) and comments are skipped.

use crate::AssetError;
use crate::mesh::MeshData;
use glam::Vec3;
use std::path::Path;

/// Load an OBJ model from disk.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&source)?;
    tracing::info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "loaded OBJ model"
    );
    Ok(mesh)
}

/// Parse OBJ text into triangle-list geometry with smooth normals.
pub fn parse_obj(source: &str) -> Result<MeshData, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Vec<u32>> = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let mut tokens = raw.split_whitespace();
        match tokens.next() {
            Some("v") => positions.push(parse_position(line, tokens)?),
            Some("f") => faces.push(parse_face(line, tokens, positions.len())?),
            _ => {}
        }
    }

    let mesh = MeshData::from_faces(&positions, &[], &faces);
    if mesh.is_empty() {
        return Err(AssetError::Empty);
    }
    Ok(mesh)
}

fn parse_position<'a>(
    line: usize,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<Vec3, AssetError> {
    let mut xyz = [0.0f32; 3];
    for slot in &mut xyz {
        let token = tokens.next().ok_or(AssetError::MissingCoordinate { line })?;
        *slot = token.parse().map_err(|_| AssetError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(Vec3::from_array(xyz))
}

fn parse_face<'a>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
    vertex_count: usize,
) -> Result<Vec<u32>, AssetError> {
    let face = tokens
        .map(|token| resolve_index(line, token, vertex_count))
        .collect::<Result<Vec<_>, _>>()?;
    if face.len() < 3 {
        return Err(AssetError::DegenerateFace {
            line,
            count: face.len(),
        });
    }
    Ok(face)
}

/// Turn a 1-based (or negative, relative) OBJ index into a 0-based one.
fn resolve_index(line: usize, token: &str, vertex_count: usize) -> Result<u32, AssetError> {
    let head = token.split('/').next().unwrap_or_default();
    let invalid = || AssetError::InvalidIndex {
        line,
        token: token.to_string(),
    };
    let index: i64 = head.parse().map_err(|_| invalid())?;
    if index == 0 {
        return Err(invalid());
    }

    let count = vertex_count as i64;
    let resolved = if index > 0 { index - 1 } else { count + index };
    if !(0..count).contains(&resolved) {
        return Err(AssetError::IndexOutOfRange {
            line,
            index,
            count: vertex_count,
        });
    }
    u32::try_from(resolved).map_err(|_| invalid())
}
