use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space forward axis (left-handed, +Z into the screen).
pub const WORLD_FORWARD: Vec3 = Vec3::Z;
/// World-space right axis.
pub const WORLD_RIGHT: Vec3 = Vec3::X;
/// World-space up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Build a rotation from pitch (X), yaw (Y) and roll (Z) angles in radians.
///
/// Roll is applied first, then pitch, then yaw.
pub fn rotation_from_euler(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll)
}

/// Spatial transform: position, Euler rotation, scale.
///
/// `rotation` holds (pitch, yaw, roll) in radians as x, y, z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        rotation_from_euler(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Object-to-world matrix: scale first, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert!(t.matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let t = Transform::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(7.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn rotation_applies_before_translation() {
        // Quarter turn of yaw takes +X to -Z before the offset is added.
        let t = Transform::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, FRAC_PI_2, 0.0),
            Vec3::ONE,
        );
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 9.0), 1e-5));
    }

    #[test]
    fn yaw_turns_forward_toward_right() {
        let q = rotation_from_euler(0.0, FRAC_PI_2, 0.0);
        assert!((q * WORLD_FORWARD).abs_diff_eq(WORLD_RIGHT, 1e-6));
    }
}
