pub mod color;
pub mod light;

use crate::assets::model::ModelAsset;
use crate::config::SceneSettings;

use color::Color;
use light::Light;

/// Stand-in geometry shown when the model fails to load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Axis-aligned cube centered on the origin.
    Cube { size: f32, color: Color },
}

#[derive(Debug, Clone)]
pub enum SceneObject {
    Model(ModelAsset),
    Fallback(Primitive),
}

pub struct Scene {
    pub background: Color,
    pub lights: Vec<Light>,
    objects: Vec<SceneObject>,
    /// Bumped on every change to `objects`, so the GPU side knows to re-upload.
    revision: u64,
}

impl Scene {
    pub fn new(settings: &SceneSettings) -> Self {
        Self {
            background: settings.background,
            lights: light::default_rig(),
            objects: Vec::new(),
            revision: 0,
        }
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
        self.revision += 1;
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn fallback_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, SceneObject::Fallback(_)))
            .count()
    }
}
