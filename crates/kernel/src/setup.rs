use crate::scene::{Animation, ObjectId, Scene};
use glam::Vec3;
use starlight_assets::{MeshData, shapes};
use starlight_common::Transform;
use starlight_render::{RenderError, Renderer};
use std::f32::consts::FRAC_PI_4;

/// Model path used when none is given on the command line.
pub const DEFAULT_MODEL_PATH: &str = "assets/models/cube.obj";

/// Handles of the objects in the default scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultScene {
    pub pyramid: ObjectId,
    pub model: ObjectId,
}

/// Build the stock scene: a small spinning pyramid in front of the model,
/// with the model turning about its vertical axis behind it.
pub fn default_scene<R: Renderer + ?Sized>(
    renderer: &mut R,
    model: &MeshData,
) -> Result<(Scene, DefaultScene), RenderError> {
    let mut scene = Scene::new();

    let pyramid = scene.spawn(
        renderer,
        "pyramid",
        &shapes::pyramid(),
        Transform::new(Vec3::new(0.0, 0.0, -0.9), Vec3::ZERO, Vec3::splat(0.1)),
        Animation::spin(Vec3::new(1.0, 1.0, 0.0), FRAC_PI_4),
    )?;

    let model = scene.spawn(
        renderer,
        "model",
        model,
        Transform::new(Vec3::new(0.0, -0.5, -0.3), Vec3::ZERO, Vec3::splat(0.8)),
        Animation::spin(Vec3::Y, FRAC_PI_4),
    )?;

    tracing::info!(objects = scene.len(), "default scene ready");
    Ok((scene, DefaultScene { pyramid, model }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use starlight_render::DebugTextRenderer;

    #[test]
    fn pyramid_is_registered_before_model() {
        let mut renderer = DebugTextRenderer::new();
        let (scene, ids) = default_scene(&mut renderer, &shapes::pyramid()).unwrap();
        assert_eq!(ids.pyramid, ObjectId(0));
        assert_eq!(ids.model, ObjectId(1));
        assert_eq!(scene.get(ids.model).unwrap().name(), "model");
        assert!(scene.backdrop());
    }

    #[test]
    fn placements_match_stock_layout() {
        let mut renderer = DebugTextRenderer::new();
        let (scene, ids) = default_scene(&mut renderer, &shapes::pyramid()).unwrap();
        let pyramid = scene.get(ids.pyramid).unwrap().transform();
        assert_eq!(pyramid.position, Vec3::new(0.0, 0.0, -0.9));
        assert_eq!(pyramid.scale, Vec3::splat(0.1));
        let model = scene.get(ids.model).unwrap().transform();
        assert_eq!(model.position, Vec3::new(0.0, -0.5, -0.3));
        assert_eq!(model.scale, Vec3::splat(0.8));
    }

    #[test]
    fn empty_model_fails() {
        let mut renderer = DebugTextRenderer::new();
        let result = default_scene(&mut renderer, &MeshData::default());
        assert!(matches!(result, Err(RenderError::EmptyMesh(name)) if name == "model"));
    }
}
