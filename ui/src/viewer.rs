//! The viewer session: scene, camera and orbit controller under one owner.
//!
//! Event handlers, the frame loop and the model load all go through a shared
//! `Rc<RefCell<ViewerState>>`; nothing here touches the DOM or the GPU.

use glam::{Vec2, Vec3};

use crate::assets::{LoadError, ModelAsset};
use crate::config::{CameraSettings, SceneSettings};
use crate::render::renderer::camera::Camera;
use crate::render::renderer::camera_input::{ActivePointer, Cursor};
use crate::render::renderer::orbit::OrbitController;
use crate::scene::{Primitive, Scene, SceneObject};

/// Camera pose used when there is no model to frame.
pub const FALLBACK_EYE: Vec3 = Vec3::new(5.0, 5.0, 5.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Loaded,
    /// Showing the fallback cube.
    Failed,
}

pub struct ViewerState {
    pub scene: Scene,
    pub camera: Camera,
    pub orbit: OrbitController,
    pointer: ActivePointer,
    settings: SceneSettings,
    status: ModelStatus,
}

impl ViewerState {
    pub fn new(camera_settings: CameraSettings, scene_settings: SceneSettings, width: u32, height: u32) -> Self {
        let aspect = if width > 0 && height > 0 { width as f32 / height as f32 } else { 1.0 };
        Self {
            scene: Scene::new(&scene_settings),
            camera: Camera::new(&camera_settings, aspect),
            orbit: OrbitController::new(camera_settings),
            pointer: ActivePointer::default(),
            settings: scene_settings,
            status: ModelStatus::Loading,
        }
    }

    pub fn status(&self) -> ModelStatus {
        self.status
    }

    pub fn cursor(&self) -> Cursor {
        self.orbit.cursor()
    }

    /// Apply the outcome of the one model load. Later calls are ignored.
    pub fn apply_load(&mut self, result: Result<ModelAsset, LoadError>) {
        if self.status != ModelStatus::Loading {
            log::warn!("model load already settled, ignoring another outcome");
            return;
        }

        match result {
            Ok(model) => self.on_model_loaded(model),
            Err(e) => self.on_model_failed(&e),
        }
    }

    fn on_model_loaded(&mut self, model: ModelAsset) {
        // the model stays where the file put it, at unit scale
        let bounds = model.bounds;
        self.scene.add(SceneObject::Model(model));
        self.orbit.on_model_loaded(&bounds, &mut self.camera);
        self.status = ModelStatus::Loaded;
        log::info!("model loaded and positioned");
    }

    fn on_model_failed(&mut self, error: &LoadError) {
        log::error!("error loading model: {error}");

        self.scene.add(SceneObject::Fallback(Primitive::Cube {
            size: self.settings.fallback_size,
            color: self.settings.fallback_color,
        }));
        self.camera.eye = FALLBACK_EYE;
        self.camera.look_at(Vec3::ZERO);
        self.status = ModelStatus::Failed;

        log::warn!("showing fallback cube: the renderer works but the model did not load");
    }

    /// Whether pointer `id` is the one dragging.
    pub fn drives(&self, id: i32) -> bool {
        self.pointer.owns(id)
    }

    /// Start a drag with pointer `id`, unless another pointer is already dragging.
    pub fn pointer_down(&mut self, id: i32, pos: Vec2) {
        if self.pointer.claim(id) {
            self.orbit.on_drag_start(pos);
        }
    }

    pub fn pointer_move(&mut self, id: i32, pos: Vec2) {
        if self.pointer.owns(id) {
            self.orbit.on_drag_move(pos);
        }
    }

    pub fn pointer_up(&mut self, id: i32) {
        if self.pointer.release(id) {
            self.orbit.on_drag_end();
        }
    }

    /// The host took the pointer away (touch cancel, lost capture).
    pub fn pointer_cancel(&mut self, id: i32) {
        self.pointer_up(id);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Once per frame, before drawing.
    pub fn tick(&mut self) {
        self.orbit.tick(&mut self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::model::{Material, ModelPrimitive};
    use crate::config::{CAMERA_SETTINGS, SCENE_SETTINGS};
    use crate::render::renderer::bounds::Aabb;
    use crate::render::renderer::vertex::Vertex;

    fn viewer() -> ViewerState {
        ViewerState::new(CAMERA_SETTINGS, SCENE_SETTINGS, 800, 600)
    }

    fn model(min: Vec3, max: Vec3) -> ModelAsset {
        let v = |p: Vec3| Vertex {
            position: p.to_array(),
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
        };
        ModelAsset {
            primitives: vec![ModelPrimitive {
                vertices: vec![v(min), v(max), v(Vec3::new(min.x, max.y, min.z))],
                indices: vec![0, 1, 2],
                material: None,
            }],
            materials: vec![Material::default()],
            images: vec![],
            bounds: Aabb::new(min, max),
        }
    }

    #[test]
    fn load_failure_shows_single_fallback() {
        let mut v = viewer();
        v.apply_load(Err(LoadError::Empty));

        assert_eq!(v.status(), ModelStatus::Failed);
        assert_eq!(v.scene.objects().len(), 1);
        assert_eq!(v.scene.fallback_count(), 1);
        assert_eq!(v.camera.eye, FALLBACK_EYE);
        assert_eq!(v.camera.target, Vec3::ZERO);
        assert!(v.orbit.focus().is_none());
    }

    #[test]
    fn fallback_pose_ignores_drags() {
        let mut v = viewer();
        v.apply_load(Err(LoadError::NoScene));
        v.pointer_down(1, Vec2::ZERO);
        v.pointer_move(1, Vec2::new(200.0, 50.0));
        v.pointer_up(1);
        for _ in 0..30 {
            v.tick();
        }
        assert_eq!(v.camera.eye, FALLBACK_EYE);
    }

    #[test]
    fn successful_load_frames_model() {
        let mut v = viewer();
        v.apply_load(Ok(model(Vec3::new(-2.0, 3.0, -1.0), Vec3::new(2.0, 7.0, 1.0))));

        assert_eq!(v.status(), ModelStatus::Loaded);
        assert_eq!(v.scene.fallback_count(), 0);
        assert_eq!(v.orbit.focus(), Some(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(v.camera.target, Vec3::new(0.0, 5.0, 0.0));
        assert!((v.camera.eye.distance(v.camera.target) - 2.606).abs() < 1e-3);
    }

    #[test]
    fn only_first_outcome_counts() {
        let mut v = viewer();
        v.apply_load(Ok(model(Vec3::ZERO, Vec3::ONE)));
        v.apply_load(Err(LoadError::Empty));
        assert_eq!(v.status(), ModelStatus::Loaded);
        assert_eq!(v.scene.objects().len(), 1);
        assert_eq!(v.scene.fallback_count(), 0);
    }

    #[test]
    fn drag_then_ticks_orbit_camera() {
        let mut v = viewer();
        v.apply_load(Ok(model(Vec3::splat(-1.0), Vec3::splat(1.0))));
        let start = v.camera.eye;

        v.pointer_down(1, Vec2::new(100.0, 100.0));
        assert_eq!(v.cursor(), Cursor::Grabbing);
        v.pointer_move(1, Vec2::new(160.0, 100.0));
        v.pointer_up(1);
        assert_eq!(v.cursor(), Cursor::Grab);

        v.tick();
        assert!(!v.camera.eye.abs_diff_eq(start, 1e-4));
        // pure azimuth drag keeps height
        assert!((v.camera.eye.y - start.y).abs() < 1e-4);
    }

    #[test]
    fn cancelled_drag_does_not_leak_into_next_one() {
        let mut v = viewer();
        v.pointer_down(1, Vec2::new(100.0, 100.0));
        // touch cancelled, no pointerup
        v.pointer_cancel(1);
        assert_eq!(v.cursor(), Cursor::Grab);

        v.pointer_down(2, Vec2::new(600.0, 400.0));
        v.pointer_move(2, Vec2::new(605.0, 400.0));

        let t = v.orbit.target_angles();
        assert!((t.y - -0.05).abs() < 1e-5);
        assert_eq!(t.x, 0.0);
    }

    #[test]
    fn second_pointer_cannot_steer_or_end_the_drag() {
        let mut v = viewer();
        v.pointer_down(1, Vec2::new(100.0, 100.0));
        v.pointer_down(2, Vec2::new(400.0, 300.0));
        v.pointer_move(2, Vec2::new(500.0, 300.0));
        assert_eq!(v.orbit.target_angles(), Vec2::ZERO);

        v.pointer_up(2);
        assert!(v.orbit.is_dragging());
        assert!(v.drives(1));
        assert!(!v.drives(2));

        v.pointer_move(1, Vec2::new(110.0, 100.0));
        assert!((v.orbit.target_angles().y - -0.1).abs() < 1e-5);

        v.pointer_up(1);
        assert!(!v.orbit.is_dragging());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut v = viewer();
        v.resize(1000, 500);
        assert_eq!(v.camera.aspect, 2.0);
    }
}
