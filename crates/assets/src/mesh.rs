use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

/// GPU vertex layout: position, normal, color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Triangle-list geometry ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Size statistics for a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshSummary {
    pub vertex_count: usize,
    pub index_count: usize,
    pub triangle_count: usize,
}

impl MeshData {
    /// Build a mesh from positions and per-face vertex lists.
    ///
    /// Every face is fan-triangulated from its first vertex. Normals are the
    /// renormalized sum of the unit normals of every face touching a vertex.
    /// Face indices must already be in range.
    pub fn from_faces(positions: &[Vec3], colors: &[Vec3], faces: &[Vec<u32>]) -> Self {
        let mut normals = vec![Vec3::ZERO; positions.len()];
        let mut indices = Vec::new();
        for face in faces {
            accumulate_face_normal(&mut normals, positions, face);
            fan_triangulate(face, &mut indices);
        }
        Self::assemble(positions, colors, &normals, indices)
    }

    pub(crate) fn assemble(
        positions: &[Vec3],
        colors: &[Vec3],
        normals: &[Vec3],
        indices: Vec<u32>,
    ) -> Self {
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, p)| Vertex {
                position: p.to_array(),
                normal: normals[i].normalize_or_zero().to_array(),
                color: colors.get(i).copied().unwrap_or(Vec3::ONE).to_array(),
            })
            .collect();
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn summary(&self) -> MeshSummary {
        MeshSummary {
            vertex_count: self.vertices.len(),
            index_count: self.indices.len(),
            triangle_count: self.triangle_count(),
        }
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Add the unit normal of `face` to each of its vertices.
///
/// The normal is `(b - a) x (c - a)` over the first three vertices. Degenerate
/// faces contribute nothing.
pub(crate) fn accumulate_face_normal(normals: &mut [Vec3], positions: &[Vec3], face: &[u32]) {
    let [a, b, c] = match face {
        [a, b, c, ..] => [*a, *b, *c].map(|i| positions[i as usize]),
        _ => return,
    };
    let n = (b - a).cross(c - a).normalize_or_zero();
    for &i in face {
        normals[i as usize] += n;
    }
}

pub(crate) fn fan_triangulate(face: &[u32], out: &mut Vec<u32>) {
    for i in 1..face.len().saturating_sub(1) {
        out.extend_from_slice(&[face[0], face[i], face[i + 1]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn quad_fans_into_two_triangles() {
        let mesh = MeshData::from_faces(&quad(), &[], &[vec![0, 1, 2, 3]]);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn vertex_size_matches_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn flat_face_normal_uses_right_hand_rule() {
        let mesh = MeshData::from_faces(&quad(), &[], &[vec![0, 1, 2, 3]]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn shared_vertex_normal_is_unweighted_average() {
        // Two faces meeting at a right angle along the edge 0-1.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, -5.0),
        ];
        // First face normal +Z, second face (larger) normal +Y.
        let mesh = MeshData::from_faces(&positions, &[], &[vec![0, 1, 2], vec![0, 1, 3]]);
        let n = Vec3::from(mesh.vertices[0].normal);
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!(n.abs_diff_eq(expected, 1e-6), "{n:?}");
        assert!(Vec3::from(mesh.vertices[2].normal).abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn degenerate_face_contributes_nothing() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let mesh = MeshData::from_faces(&positions, &[], &[vec![0, 1, 2]]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_colors_default_to_white() {
        let mesh = MeshData::from_faces(&quad(), &[], &[vec![0, 1, 2]]);
        assert_eq!(mesh.vertices[3].color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = MeshData::from_faces(&quad(), &[], &[vec![0, 1, 2, 3]]);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::ZERO);
        assert_eq!(hi, Vec3::new(1.0, 1.0, 0.0));
        assert!(MeshData::default().bounds().is_none());
    }

    #[test]
    fn face_normal_is_added_to_every_face_vertex() {
        let positions = quad();
        let mut normals = vec![Vec3::ZERO; positions.len()];
        accumulate_face_normal(&mut normals, &positions, &[0, 1, 2]);
        accumulate_face_normal(&mut normals, &positions, &[0, 2, 3]);
        assert_eq!(normals[0], Vec3::Z * 2.0);
        assert_eq!(normals[1], Vec3::Z);
        assert_eq!(normals[3], Vec3::Z);
    }
}
