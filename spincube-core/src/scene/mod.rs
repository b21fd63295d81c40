//! Minimal scene graph: entities carrying a [`Transform`], a camera, and a
//! renderer that walks the scene.
//!
//! Animation and rendering are separate steps. [`Spin::animate`] is the only
//! thing that changes a transform between frames, and
//! [`SceneRenderer::render`] only reads the scene.

pub mod camera;
pub mod transform;

pub use camera::PerspectiveCamera;
pub use transform::{EulerRotation, Transform};

use crate::color::Color;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::matrix::{to_column_major, ColumnMajor};
use crate::renderer::{DrawCall, FrameRenderer, Uniforms};
use crate::viewport::Viewport;

/// Renderable: geometry plus where it sits.
#[derive(Debug, Clone)]
pub struct MeshEntity {
    pub geometry: Geometry,
    pub transform: Transform,
}

impl MeshEntity {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            transform: Transform::identity(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    entities: Vec<MeshEntity>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            entities: Vec::new(),
        }
    }

    pub fn add(&mut self, entity: MeshEntity) -> EntityId {
        self.entities.push(entity);
        EntityId(self.entities.len() - 1)
    }

    pub fn get(&self, id: EntityId) -> Option<&MeshEntity> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut MeshEntity> {
        self.entities.get_mut(id.0)
    }

    pub fn entities(&self) -> &[MeshEntity] {
        &self.entities
    }
}

/// Animate step: adds a fixed Euler delta to one entity per frame.
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    pub target: EntityId,
    pub delta: EulerRotation,
}

impl Spin {
    /// Spin about the vertical axis by `step` radians per frame.
    pub fn about_y(target: EntityId, step: f32) -> Self {
        Self {
            target,
            delta: EulerRotation::new(0.0, step, 0.0),
        }
    }

    pub fn animate(&self, scene: &mut Scene) {
        if let Some(entity) = scene.get_mut(self.target) {
            entity
                .transform
                .rotation
                .rotate(self.delta.x, self.delta.y, self.delta.z);
        }
    }
}

/// Draws a [`Scene`] through a [`FrameRenderer`].
///
/// Entity geometry is uploaded the first time the entity is rendered.
pub struct SceneRenderer<R: FrameRenderer> {
    renderer: R,
    resident: Vec<(R::Geometry, DrawCall)>,
}

impl<R: FrameRenderer> SceneRenderer<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            resident: Vec::new(),
        }
    }

    pub fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, viewport: &Viewport) -> Result<()> {
        let pending = scene.entities().get(self.resident.len()..).unwrap_or(&[]);
        for entity in pending {
            let handle = self.renderer.upload_geometry(&entity.geometry)?;
            self.resident.push((handle, DrawCall::whole(&entity.geometry)));
            log::debug!("uploaded scene entity #{}", self.resident.len() - 1);
        }

        self.renderer.begin_frame(viewport, scene.background);

        let projection = camera.projection_matrix();
        for (entity, (handle, call)) in scene.entities().iter().zip(&self.resident) {
            self.renderer.set_uniforms(&Uniforms {
                projection,
                model_view: entity_model_view(camera, entity),
            });
            self.renderer.draw_indexed(handle, *call);
        }
        Ok(())
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

/// The scene-graph program: one cube, spun and drawn every frame.
pub struct SpinningCube<R: FrameRenderer> {
    scene: Scene,
    camera: PerspectiveCamera,
    spin: Spin,
    cube: EntityId,
    renderer: SceneRenderer<R>,
}

impl<R: FrameRenderer> SpinningCube<R> {
    pub fn new(renderer: R, config: &SceneConfig, viewport: &Viewport) -> Self {
        let mut scene = Scene::new(config.background);
        let size = config.cube_size;
        let cube = scene.add(MeshEntity::new(Geometry::cuboid(
            size,
            size,
            size,
            &config.face_colors,
        )));

        let mut camera = PerspectiveCamera::new(&config.perspective, viewport.aspect());
        camera.set_z(config.camera_z);

        Self {
            scene,
            camera,
            spin: Spin::about_y(cube, config.spin_step),
            cube,
            renderer: SceneRenderer::new(renderer),
        }
    }

    /// Animate, then render.
    pub fn frame(&mut self, viewport: &Viewport) -> Result<()> {
        self.spin.animate(&mut self.scene);
        self.renderer.render(&self.scene, &self.camera, viewport)
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn cube_rotation(&self) -> EulerRotation {
        self.scene
            .get(self.cube)
            .map(|e| e.transform.rotation)
            .unwrap_or_default()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        self.renderer.renderer()
    }
}

/// Camera view combined with the entity's model transform.
pub fn entity_model_view(camera: &PerspectiveCamera, entity: &MeshEntity) -> ColumnMajor {
    to_column_major(&(camera.view_matrix() * entity.transform.matrix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Command, IndexType, RecordingRenderer};

    fn cube_scene() -> (Scene, EntityId) {
        let mut scene = Scene::new(Color::BLACK);
        let id = scene.add(MeshEntity::new(Geometry::cuboid(
            2.0,
            2.0,
            2.0,
            &SceneConfig::default().face_colors,
        )));
        (scene, id)
    }

    #[test]
    fn test_animate_only_touches_transform() {
        let (mut scene, id) = cube_scene();
        let before = scene.get(id).unwrap().geometry.clone();
        let spin = Spin::about_y(id, -0.01);
        spin.animate(&mut scene);
        spin.animate(&mut scene);

        let entity = scene.get(id).unwrap();
        assert!((entity.transform.rotation.y + 0.02).abs() < 1e-6);
        assert_eq!(entity.transform.rotation.x, 0.0);
        assert_eq!(entity.geometry, before);
    }

    #[test]
    fn test_render_does_not_advance_animation() {
        let (scene, id) = cube_scene();
        let camera = PerspectiveCamera::default();
        let mut renderer = SceneRenderer::new(RecordingRenderer::new());
        renderer.render(&scene, &camera, &Viewport::default()).unwrap();
        renderer.render(&scene, &camera, &Viewport::default()).unwrap();

        assert_eq!(scene.get(id).unwrap().transform.rotation.y, 0.0);
        let uploads = renderer
            .renderer()
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Upload { .. }))
            .count();
        assert_eq!(uploads, 1);
        assert_eq!(renderer.renderer().draw_calls().count(), 2);
    }

    #[test]
    fn test_render_draws_each_entity() {
        let (mut scene, _) = cube_scene();
        scene.add(MeshEntity::new(Geometry::colored_cube()));
        let mut renderer = SceneRenderer::new(RecordingRenderer::new());
        renderer
            .render(&scene, &PerspectiveCamera::default(), &Viewport::default())
            .unwrap();

        let calls: Vec<_> = renderer.renderer().draw_calls().collect();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.count == 36 && c.index_type == IndexType::U16));
    }

    #[test]
    fn test_spinning_cube_frame() {
        let viewport = Viewport::new(800.0, 400.0, 1.0);
        let mut program = SpinningCube::new(RecordingRenderer::new(), &SceneConfig::default(), &viewport);
        program.frame(&viewport).unwrap();

        assert!((program.cube_rotation().y + 0.01).abs() < 1e-6);

        let uniforms = program.renderer().last_uniforms().unwrap();
        assert!((uniforms.model_view[14] + 6.0).abs() < 1e-5);
        assert!((uniforms.projection[0] * 2.0 - uniforms.projection[5]).abs() < 1e-5);
        assert_eq!(
            program.renderer().commands()[1],
            Command::BeginFrame {
                viewport,
                clear_color: Color::BLACK
            }
        );
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let viewport = Viewport::new(800.0, 400.0, 1.0);
        let mut program = SpinningCube::new(RecordingRenderer::new(), &SceneConfig::default(), &viewport);
        program.resize(&Viewport::new(300.0, 300.0, 1.0));
        assert_eq!(program.camera().aspect, 1.0);
    }

    #[test]
    fn test_entity_model_view_rotates_then_offsets() {
        let (mut scene, id) = cube_scene();
        Spin::about_y(id, 0.4).animate(&mut scene);
        let mut camera = PerspectiveCamera::default();
        camera.set_z(6.0);

        let m = entity_model_view(&camera, scene.get(id).unwrap());
        let (sin, cos) = 0.4f32.sin_cos();
        assert!((m[0] - cos).abs() < 1e-6);
        assert!((m[8] - sin).abs() < 1e-6);
        assert!((m[2] + sin).abs() < 1e-6);
        assert!((m[14] + 6.0).abs() < 1e-6);
    }
}
