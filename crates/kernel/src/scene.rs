use glam::{Mat4, Vec3};
use starlight_assets::MeshData;
use starlight_common::Transform;
use starlight_render::{MeshHandle, PerObjectConstants, RenderCommand, RenderError, Renderer};
use std::f32::consts::TAU;

/// Time-driven motion applied to an object every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    Static,
    /// Continuous rotation. `axes` scales the accumulated angle per Euler
    /// component (pitch, yaw, roll).
    Spin {
        axes: Vec3,
        angular_speed: f32,
        angle: f32,
    },
}

impl Animation {
    pub fn spin(axes: Vec3, angular_speed: f32) -> Self {
        Self::Spin {
            axes,
            angular_speed,
            angle: 0.0,
        }
    }
}

/// A drawable object: renderer-side mesh, transform, cached world matrix.
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    mesh: MeshHandle,
    transform: Transform,
    world: Mat4,
    animation: Animation,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: MeshHandle) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform::default(),
            world: Mat4::IDENTITY,
            animation: Animation::Static,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.update_world_matrix();
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Store all three components verbatim and recompose the world matrix.
    pub fn set_transform(&mut self, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.transform = Transform::new(position, rotation, scale);
        self.update_world_matrix();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.update_world_matrix();
    }

    /// Rotation as (pitch, yaw, roll) in radians.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.rotation = rotation;
        self.update_world_matrix();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.update_world_matrix();
    }

    /// Recompose scale, rotation, translation into the world matrix.
    pub fn update_world_matrix(&mut self) {
        self.world = self.transform.matrix();
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    /// Advance the animation by `dt` seconds.
    pub fn animate(&mut self, dt: f32) {
        if let Animation::Spin {
            axes,
            angular_speed,
            angle,
        } = &mut self.animation
        {
            *angle = (*angle + *angular_speed * dt).rem_euclid(TAU);
            let rotation = *axes * *angle;
            self.set_rotation(rotation);
        }
    }

    /// Draw command carrying this object's constant block.
    pub fn draw(&self, view_proj: Mat4, light_dir: Vec3) -> RenderCommand {
        RenderCommand::DrawMesh {
            mesh: self.mesh,
            constants: PerObjectConstants::new(self.world, view_proj, light_dir),
        }
    }
}

/// Index of an object in its scene's registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Objects drawn each frame, in registration order, over an optional backdrop.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    backdrop: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            backdrop: true,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        tracing::debug!(name = object.name(), ?id, "added scene object");
        self.objects.push(object);
        id
    }

    /// Upload `mesh` to `renderer` and register an object drawing it.
    pub fn spawn<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        name: &str,
        mesh: &MeshData,
        transform: Transform,
        animation: Animation,
    ) -> Result<ObjectId, RenderError> {
        let handle = renderer.upload_mesh(name, mesh)?;
        let object = SceneObject::new(name, handle)
            .with_transform(transform)
            .with_animation(animation);
        Ok(self.add(object))
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn backdrop(&self) -> bool {
        self.backdrop
    }

    pub fn set_backdrop(&mut self, enabled: bool) {
        self.backdrop = enabled;
    }

    pub fn animate(&mut self, dt: f32) {
        for object in &mut self.objects {
            object.animate(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlight_assets::shapes;
    use starlight_render::DebugTextRenderer;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn world_matrix_is_scale_rotation_translation() {
        let mut obj = SceneObject::new("marker", MeshHandle(0));
        obj.set_transform(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let p = obj.world_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(7.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn individual_setters_keep_world_current() {
        let mut obj = SceneObject::new("marker", MeshHandle(0));
        obj.set_scale(Vec3::splat(3.0));
        obj.set_position(Vec3::new(0.0, 1.0, 0.0));
        obj.set_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        assert_eq!(obj.world_matrix(), obj.transform().matrix());
        let p = obj.world_matrix().transform_point3(Vec3::Z);
        assert!(p.abs_diff_eq(Vec3::new(3.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn set_transform_stores_values_verbatim() {
        let mut obj = SceneObject::new("marker", MeshHandle(0));
        let scale = Vec3::new(-1.0, 0.0, 4.0);
        obj.set_transform(Vec3::ONE, Vec3::splat(7.0), scale);
        assert_eq!(obj.transform().scale, scale);
        assert_eq!(obj.transform().rotation, Vec3::splat(7.0));
    }

    #[test]
    fn spin_accumulates_angle() {
        let mut obj = SceneObject::new("pyramid", MeshHandle(0))
            .with_animation(Animation::spin(Vec3::new(1.0, 1.0, 0.0), FRAC_PI_4));
        obj.animate(1.0);
        obj.animate(1.0);
        let r = obj.transform().rotation;
        assert!(r.abs_diff_eq(Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0), 1e-5));
        assert_eq!(obj.world_matrix(), obj.transform().matrix());
    }

    #[test]
    fn spin_angle_wraps() {
        let mut obj = SceneObject::new("model", MeshHandle(0))
            .with_animation(Animation::spin(Vec3::Y, 1.0));
        obj.animate(TAU + 0.5);
        assert!((obj.transform().rotation.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn static_objects_do_not_move() {
        let mut obj = SceneObject::new("rock", MeshHandle(0))
            .with_transform(Transform::new(Vec3::X, Vec3::Y, Vec3::ONE));
        let before = obj.world_matrix();
        obj.animate(10.0);
        assert_eq!(obj.world_matrix(), before);
    }

    #[test]
    fn draw_carries_world_and_view_projection() {
        let obj = SceneObject::new("marker", MeshHandle(3))
            .with_transform(Transform::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, Vec3::ONE));
        let view_proj = Mat4::from_scale(Vec3::splat(0.5));
        let RenderCommand::DrawMesh { mesh, constants } = obj.draw(view_proj, Vec3::Y) else {
            panic!("expected a mesh draw");
        };
        assert_eq!(mesh, MeshHandle(3));
        let p = constants.world_view_proj().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn spawn_uploads_and_registers_in_order() {
        let mut renderer = DebugTextRenderer::new();
        let mut scene = Scene::new();
        let a = scene
            .spawn(&mut renderer, "a", &shapes::pyramid(), Transform::default(), Animation::Static)
            .unwrap();
        let b = scene
            .spawn(&mut renderer, "b", &shapes::pyramid(), Transform::default(), Animation::Static)
            .unwrap();
        assert_eq!((a, b), (ObjectId(0), ObjectId(1)));
        let names: Vec<_> = scene.objects().iter().map(SceneObject::name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(renderer.mesh_count(), 2);
        assert_ne!(scene.get(a).unwrap().mesh(), scene.get(b).unwrap().mesh());
    }

    #[test]
    fn spawn_propagates_upload_failure() {
        let mut renderer = DebugTextRenderer::new();
        let mut scene = Scene::new();
        let result = scene.spawn(
            &mut renderer,
            "empty",
            &MeshData::default(),
            Transform::default(),
            Animation::Static,
        );
        assert!(matches!(result, Err(RenderError::EmptyMesh(_))));
        assert!(scene.is_empty());
    }

    #[test]
    fn objects_sharing_a_mesh_draw_with_their_own_constants() {
        let mut renderer = DebugTextRenderer::new();
        let handle = renderer.upload_mesh("rock", &shapes::pyramid()).unwrap();
        let mut scene = Scene::new();
        for x in [3.0, -3.0] {
            scene.add(
                SceneObject::new("rock", handle)
                    .with_transform(Transform::new(Vec3::new(x, 0.0, 0.0), Vec3::ZERO, Vec3::ONE)),
            );
        }
        let origins: Vec<f32> = scene
            .objects()
            .iter()
            .map(|o| match o.draw(Mat4::IDENTITY, Vec3::Y) {
                RenderCommand::DrawMesh { mesh, constants } => {
                    assert_eq!(mesh, handle);
                    constants.world().w_axis.x
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(origins, [3.0, -3.0]);
    }
}
