use glam::Vec3;

use super::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Shines from `position` towards the origin.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
    /// Fades out completely at `range`.
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
        range: f32,
    },
}

/// Soft ambient fill, a key light from the front-right and two point lights
/// above and to the left.
pub fn default_rig() -> Vec<Light> {
    vec![
        Light::Ambient {
            color: Color::from_hex(0x404040),
            intensity: 0.6,
        },
        Light::Directional {
            color: Color::WHITE,
            intensity: 0.8,
            position: Vec3::new(5.0, 5.0, 5.0),
        },
        Light::Point {
            color: Color::WHITE,
            intensity: 0.5,
            position: Vec3::new(0.0, 10.0, 0.0),
            range: 100.0,
        },
        Light::Point {
            color: Color::WHITE,
            intensity: 0.3,
            position: Vec3::new(-5.0, 5.0, 5.0),
            range: 50.0,
        },
    ]
}
