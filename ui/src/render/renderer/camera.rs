use glam::{Mat4, Vec3};

use crate::config::CameraSettings;

/// Point on a sphere around the origin, Y up.
///
/// `polar` is measured from +Y, `azimuth` around +Y starting at +Z.
pub fn spherical_to_cartesian(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    pub fov_y: f32, // in radians
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,

            fov_y: settings.fov_y.to_radians(),
            aspect,
            near: settings.near,
            far: settings.far,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        // wgpu clip space has z in 0..1
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::config::CAMERA_SETTINGS;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn spherical_axes() {
        assert!(close(spherical_to_cartesian(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)));
        assert!(close(spherical_to_cartesian(2.0, FRAC_PI_2, 0.0), Vec3::new(0.0, 0.0, 2.0)));
        assert!(close(spherical_to_cartesian(2.0, FRAC_PI_2, FRAC_PI_2), Vec3::new(2.0, 0.0, 0.0)));
        assert!(close(spherical_to_cartesian(2.0, PI, 1.0), Vec3::new(0.0, -2.0, 0.0)));
    }

    #[test]
    fn spherical_keeps_radius() {
        let p = spherical_to_cartesian(3.5, 0.7, -2.3);
        assert!((p.length() - 3.5).abs() < 1e-5);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut cam = Camera::new(&CAMERA_SETTINGS, 4.0 / 3.0);
        cam.set_aspect(0, 600);
        assert_eq!(cam.aspect, 4.0 / 3.0);
        cam.set_aspect(1920, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut cam = Camera::new(&CAMERA_SETTINGS, 1.0);
        cam.eye = Vec3::new(5.0, 5.0, 5.0);
        cam.look_at(Vec3::ZERO);
        let clip = cam.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
