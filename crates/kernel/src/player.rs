use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use starlight_common::{WORLD_FORWARD, WORLD_RIGHT, WORLD_UP, rotation_from_euler};
use starlight_input::MoveIntent;
use std::f32::consts::FRAC_PI_2;

/// Margin kept between pitch and straight up/down so the basis never flips.
pub const PITCH_MARGIN: f32 = 0.01;

/// Tunables for a first-person viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub start: Vec3,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Radians of rotation per mouse count.
    pub sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 0.0, -5.0),
            speed: 20.0,
            sensitivity: 0.005,
        }
    }
}

/// First-person viewpoint: position plus yaw/pitch, with a derived basis.
///
/// Positive yaw turns right, positive pitch looks down. Yaw is unbounded;
/// pitch stays strictly inside (-pi/2, pi/2).
#[derive(Debug, Clone)]
pub struct Player {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    speed: f32,
    sensitivity: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        let mut player = Self {
            position: config.start,
            yaw: 0.0,
            pitch: 0.0,
            forward: WORLD_FORWARD,
            right: WORLD_RIGHT,
            up: WORLD_UP,
            speed: config.speed,
            sensitivity: config.sensitivity,
        };
        player.recompute_basis();
        player
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Turn by a mouse delta in device counts and clamp pitch.
    pub fn apply_mouse_delta(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.sensitivity;
        self.pitch = (self.pitch + delta.y * self.sensitivity)
            .clamp(-FRAC_PI_2 + PITCH_MARGIN, FRAC_PI_2 - PITCH_MARGIN);
        self.recompute_basis();
    }

    /// Move along the current basis for every held direction.
    ///
    /// Opposing directions cancel; the sum is normalized so diagonals are not
    /// faster than straight lines.
    pub fn apply_movement(&mut self, intent: MoveIntent, dt: f32) {
        let mut direction = Vec3::ZERO;
        if intent.forward {
            direction += self.forward;
        }
        if intent.backward {
            direction -= self.forward;
        }
        if intent.left {
            direction -= self.right;
        }
        if intent.right {
            direction += self.right;
        }

        let direction = direction.normalize_or_zero();
        if direction != Vec3::ZERO {
            self.position += direction * self.speed * dt;
        }
    }

    /// Derive forward/right/up from yaw and pitch.
    ///
    /// `up` must stay `forward x right`; swapping the operands flips handedness.
    pub fn recompute_basis(&mut self) {
        let rotation = rotation_from_euler(self.pitch, self.yaw, 0.0);
        self.forward = rotation * WORLD_FORWARD;
        self.right = rotation * WORLD_RIGHT;
        self.up = self.forward.cross(self.right);
    }

    /// Left-handed look-at from the current position along `forward`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.position + self.forward, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn held(forward: bool, backward: bool, left: bool, right: bool) -> MoveIntent {
        MoveIntent {
            forward,
            backward,
            left,
            right,
        }
    }

    fn assert_orthonormal(p: &Player) {
        let (f, r, u) = (p.forward(), p.right(), p.up());
        assert!(f.dot(r).abs() < EPS, "forward.right = {}", f.dot(r));
        assert!(f.dot(u).abs() < EPS, "forward.up = {}", f.dot(u));
        assert!(r.dot(u).abs() < EPS, "right.up = {}", r.dot(u));
        for v in [f, r, u] {
            assert!((v.length() - 1.0).abs() < EPS, "{v:?} not unit");
        }
        assert!(u.abs_diff_eq(f.cross(r), EPS));
        // (right, up, forward) spans a positively oriented frame.
        assert!((r.cross(u).dot(f) - 1.0).abs() < EPS);
    }

    #[test]
    fn default_player() {
        let p = Player::default();
        assert_eq!(p.position(), Vec3::new(0.0, 0.0, -5.0));
        assert!(p.forward().abs_diff_eq(WORLD_FORWARD, EPS));
        assert!(p.right().abs_diff_eq(WORLD_RIGHT, EPS));
        assert!(p.up().abs_diff_eq(WORLD_UP, EPS));
        assert!(!p.view_matrix().is_nan());
    }

    #[test]
    fn pitch_clamps_instead_of_wrapping() {
        let mut p = Player::default();
        for _ in 0..1000 {
            p.apply_mouse_delta(Vec2::new(0.0, 500.0));
            assert!(p.pitch() < FRAC_PI_2 && p.pitch() > -FRAC_PI_2);
        }
        assert!((p.pitch() - (FRAC_PI_2 - PITCH_MARGIN)).abs() < EPS);

        p.apply_mouse_delta(Vec2::new(0.0, -1.0e6));
        assert!((p.pitch() + (FRAC_PI_2 - PITCH_MARGIN)).abs() < EPS);
        assert!(p.pitch() > -FRAC_PI_2);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut p = Player::default();
        p.apply_mouse_delta(Vec2::new(10_000.0, 0.0));
        assert!((p.yaw() - 50.0).abs() < 1e-3);
        assert_orthonormal(&p);
    }

    #[test]
    fn basis_is_orthonormal_across_range() {
        let mut p = Player::default();
        for step in 0..64 {
            let dx = 37.0 * step as f32;
            let dy = if step % 2 == 0 { 41.0 } else { -67.0 };
            p.apply_mouse_delta(Vec2::new(dx, dy));
            assert_orthonormal(&p);
        }
    }

    #[test]
    fn positive_pitch_looks_down() {
        let mut p = Player::default();
        p.apply_mouse_delta(Vec2::new(0.0, 100.0));
        assert!(p.forward().y < 0.0);
    }

    #[test]
    fn quarter_yaw_faces_positive_x() {
        let mut p = Player::new(PlayerConfig {
            sensitivity: 1.0,
            ..PlayerConfig::default()
        });
        p.apply_mouse_delta(Vec2::new(FRAC_PI_2, 0.0));
        assert!(p.forward().abs_diff_eq(Vec3::X, EPS));
        assert!(p.right().abs_diff_eq(-Vec3::Z, EPS));
    }

    #[test]
    fn no_keys_means_no_movement() {
        let mut p = Player::default();
        let start = p.position();
        p.apply_movement(MoveIntent::default(), 1.0e3);
        assert_eq!(p.position(), start);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut p = Player::default();
        let start = p.position();
        p.apply_movement(held(true, true, false, false), 1.0);
        assert_eq!(p.position(), start);
        p.apply_movement(held(true, true, true, true), 1.0);
        assert_eq!(p.position(), start);
        assert!(!p.position().is_nan());
    }

    #[test]
    fn forward_moves_speed_times_dt() {
        let mut p = Player::default();
        p.apply_movement(held(true, false, false, false), 0.5);
        assert!(p.position().abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));
    }

    #[test]
    fn diagonal_is_normalized() {
        let mut p = Player::default();
        let start = p.position();
        p.apply_movement(held(true, false, false, true), 1.0);
        assert!(((p.position() - start).length() - 20.0).abs() < 1e-3);
        let moved = p.position() - start;
        assert!(moved.x > 0.0 && moved.z > 0.0);
    }

    #[test]
    fn view_matrix_maps_forward_point_onto_positive_z() {
        let mut p = Player::default();
        p.apply_mouse_delta(Vec2::new(123.0, -45.0));
        let target = p.position() + p.forward() * 3.0;
        let in_view = p.view_matrix().transform_point3(target);
        assert!(in_view.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-4));
        let side = p.view_matrix().transform_point3(p.position() + p.right());
        assert!(side.abs_diff_eq(Vec3::X, 1e-4));
    }
}
