use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::camera::Camera;
use crate::scene::light::Light;

pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye:       [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye:       camera.eye.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 4], // towards the light, normalized
    pub color:     [f32; 4], // linear rgb * intensity
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
pub struct PointLightRaw {
    pub position_range: [f32; 4],
    pub color:          [f32; 4],
}

/// Mirrors `Lights` in model.wgsl (224 bytes).
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient:     [f32; 4],
    pub counts:      [u32; 4], // x = directional, y = point
    pub directional: [DirectionalLightRaw; MAX_DIRECTIONAL_LIGHTS],
    pub points:      [PointLightRaw; MAX_POINT_LIGHTS],
}

impl LightsUniform {
    /// Ambient lights add up; extra directional/point lights past the
    /// shader's fixed slots are dropped.
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut out = Self::zeroed();
        let (mut n_dir, mut n_point) = (0usize, 0usize);

        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let c = color.to_linear_scaled(intensity);
                    for i in 0..3 {
                        out.ambient[i] += c[i];
                    }
                }
                Light::Directional { color, intensity, position } => {
                    if n_dir == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("too many directional lights, ignoring one");
                        continue;
                    }
                    out.directional[n_dir] = DirectionalLightRaw {
                        direction: position.normalize_or(Vec3::Y).extend(0.0).to_array(),
                        color:     color.to_linear_scaled(intensity),
                    };
                    n_dir += 1;
                }
                Light::Point { color, intensity, position, range } => {
                    if n_point == MAX_POINT_LIGHTS {
                        log::warn!("too many point lights, ignoring one");
                        continue;
                    }
                    out.points[n_point] = PointLightRaw {
                        position_range: position.extend(range).to_array(),
                        color:          color.to_linear_scaled(intensity),
                    };
                    n_point += 1;
                }
            }
        }

        out.counts = [n_dir as u32, n_point as u32, 0, 0];
        out
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4], // linear
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::color::Color;
    use crate::scene::light::default_rig;

    #[test]
    fn layout_matches_shader() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 224);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
    }

    #[test]
    fn default_rig_packs() {
        let u = LightsUniform::from_lights(&default_rig());
        assert_eq!(u.counts, [1, 2, 0, 0]);

        let d = Vec3::from_slice(&u.directional[0].direction[..3]);
        assert!(d.abs_diff_eq(Vec3::ONE.normalize(), 1e-6));
        assert_eq!(u.points[0].position_range, [0.0, 10.0, 0.0, 100.0]);
        assert_eq!(u.points[1].position_range, [-5.0, 5.0, 5.0, 50.0]);
        assert!(u.ambient[0] > 0.0 && u.ambient[0] < 0.6);
    }

    #[test]
    fn overflowing_lights_are_dropped() {
        let point = Light::Point {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::ZERO,
            range: 10.0,
        };
        let u = LightsUniform::from_lights(&[point; 6]);
        assert_eq!(u.counts[1], MAX_POINT_LIGHTS as u32);
    }
}
