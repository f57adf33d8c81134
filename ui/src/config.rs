//! Compile-time viewer settings.
//!
//! Everything here is trusted: values are not validated at runtime.

use std::f32::consts::PI;

use crate::scene::color::Color;

/// Path of the model, relative to the page.
pub const MODEL_PATH: &str = "cake/birthday_cake.gltf";

/// Extra rotation sensitivity on touch / coarse-pointer devices.
pub const TOUCH_SENSITIVITY_BOOST: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Horizontal rotation in radians (0 = front, PI/2 = side, PI = back).
    pub initial_rotation_y: f32,
    /// Vertical rotation in radians (0 = level, PI/4 = looking down).
    pub initial_rotation_x: f32,

    /// Camera distance multiplier; smaller is closer.
    pub zoom_level: f32,
    /// Added to the camera's Y after spherical placement.
    pub height_offset: f32,

    /// Degrees.
    pub max_up_rotation: f32,
    /// Degrees.
    pub max_down_rotation: f32,

    /// Radians of rotation per pixel of pointer travel.
    pub rotation_speed: f32,
    /// Exponential smoothing factor in (0, 1]; lower is smoother.
    pub dampening: f32,

    /// Vertical field of view, degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

pub const CAMERA_SETTINGS: CameraSettings = CameraSettings {
    initial_rotation_y: PI * 0.15,
    initial_rotation_x: PI * 0.3,

    zoom_level: 1.0,
    height_offset: 0.0,

    max_up_rotation: 55.0,
    max_down_rotation: 45.0,

    rotation_speed: 0.01,
    dampening: 0.1,

    fov_y: 75.0,
    near: 0.1,
    far: 1000.0,
};

impl Default for CameraSettings {
    fn default() -> Self {
        CAMERA_SETTINGS
    }
}

impl CameraSettings {
    pub fn max_up_radians(&self) -> f32 {
        self.max_up_rotation.to_radians()
    }

    pub fn max_down_radians(&self) -> f32 {
        self.max_down_rotation.to_radians()
    }

    /// Same settings with pointer sensitivity scaled, used for touch devices.
    pub fn with_rotation_boost(mut self, factor: f32) -> Self {
        self.rotation_speed *= factor;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub background: Color,
    /// Fallback cube, shown when the model can't be loaded.
    pub fallback_color: Color,
    pub fallback_size: f32,
}

pub const SCENE_SETTINGS: SceneSettings = SceneSettings {
    background: Color::from_hex(0x222222),
    fallback_color: Color::from_hex(0xff69b4),
    fallback_size: 2.0,
};

impl Default for SceneSettings {
    fn default() -> Self {
        SCENE_SETTINGS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_convert_to_radians() {
        let s = CameraSettings::default();
        assert!((s.max_up_radians() - 55f32.to_radians()).abs() < 1e-6);
        assert!((s.max_down_radians() - 0.785_398_2).abs() < 1e-6);
    }

    #[test]
    fn touch_boost_only_touches_sensitivity() {
        let boosted = CAMERA_SETTINGS.with_rotation_boost(TOUCH_SENSITIVITY_BOOST);
        assert!((boosted.rotation_speed - 0.012).abs() < 1e-6);
        assert_eq!(boosted.dampening, CAMERA_SETTINGS.dampening);
    }
}
