use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-object constant block written to the GPU before each draw.
///
/// Matrices are column-major, matching both glam and WGSL, so no transpose
/// happens on upload. Layout matches `ObjectConstants` in the mesh shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PerObjectConstants {
    pub world_view_proj: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    /// Inverse-transpose of `world`, for normals under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    /// Direction toward the light in world space; `w` is unused.
    pub light_dir: [f32; 4],
}

impl PerObjectConstants {
    pub fn new(world: Mat4, view_proj: Mat4, light_dir: Vec3) -> Self {
        Self {
            world_view_proj: (view_proj * world).to_cols_array_2d(),
            world: world.to_cols_array_2d(),
            normal_matrix: normal_matrix(world).to_cols_array_2d(),
            light_dir: light_dir.extend(0.0).to_array(),
        }
    }

    pub fn world_view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.world_view_proj)
    }

    pub fn world(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.world)
    }

    pub fn normal_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.normal_matrix)
    }
}

/// A singular world matrix (zero scale on some axis) has no inverse; it is
/// used as-is since the object collapses to nothing visible anyway.
fn normal_matrix(world: Mat4) -> Mat4 {
    if world.determinant().abs() > f32::EPSILON {
        world.inverse().transpose()
    } else {
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn block_size_is_uniform_friendly() {
        assert_eq!(std::mem::size_of::<PerObjectConstants>(), 208);
        assert_eq!(std::mem::size_of::<PerObjectConstants>() % 16, 0);
    }

    #[test]
    fn world_view_proj_applies_world_first() {
        let world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let view_proj = Mat4::from_scale(Vec3::splat(2.0));
        let c = PerObjectConstants::new(world, view_proj, Vec3::Y);
        let p = c.world_view_proj().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
        assert_eq!(c.world(), world);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(3.0, 0.0, 0.0),
        );
        let c = PerObjectConstants::new(world, Mat4::IDENTITY, Vec3::Y);
        // The surface x - y = 0 stretched along X has normal (0.5, -1, 0) direction.
        let n = c.normal_matrix().transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(n.abs_diff_eq(Vec3::new(0.5, -1.0, 0.0), 1e-6));
    }

    #[test]
    fn singular_world_does_not_produce_nan() {
        let world = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let c = PerObjectConstants::new(world, Mat4::IDENTITY, Vec3::Y);
        assert!(!c.normal_matrix().is_nan());
    }

    #[test]
    fn light_direction_is_stored_with_zero_w() {
        let c = PerObjectConstants::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::new(0.3, 1.0, 0.5));
        assert_eq!(c.light_dir, [0.3, 1.0, 0.5, 0.0]);
    }
}
