//! Procedurally generated shapes.

use crate::mesh::MeshData;
use glam::Vec3;

/// Square pyramid with a unit base centered on the origin.
///
/// Base corners are red, green, blue and yellow; the apex is magenta.
pub fn pyramid() -> MeshData {
    let positions = [
        Vec3::new(-0.5, -0.5, -0.5), // left-back
        Vec3::new(0.5, -0.5, -0.5),  // right-back
        Vec3::new(0.5, -0.5, 0.5),   // right-front
        Vec3::new(-0.5, -0.5, 0.5),  // left-front
        Vec3::new(0.0, 0.5, 0.0),    // apex
    ];
    let colors = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
    ];
    #[rustfmt::skip]
    let faces = [
        vec![0, 1, 2], vec![0, 2, 3], // base
        vec![0, 4, 1], vec![1, 4, 2],
        vec![2, 4, 3], vec![3, 4, 0], // sides
    ];
    MeshData::from_faces(&positions, &colors, &faces)
}
