//! Drag-to-orbit camera with smoothing and one-shot framing.
//!
//! Pointer samples only move the *target* angles. Once per frame [`OrbitController::tick`]
//! eases the *current* angles toward them and places the camera on a sphere around the
//! model's center. Pitch is clamped twice: the target to the configured up/down limits,
//! and the final polar angle away from the poles so the view never flips.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

use super::bounds::Aabb;
use super::camera::{Camera, spherical_to_cartesian};
use super::camera_input::{Cursor, DragSession};
use crate::config::CameraSettings;

/// Keeps the polar angle this far away from straight up / straight down.
pub const POLE_MARGIN: f32 = 0.1;

/// Orbit center and radius, known once the model has loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub focus: Vec3,
    pub distance: f32,
}

impl Framing {
    /// Center on the box and back off until its largest side fills the vertical FOV.
    pub fn from_bounds(bounds: &Aabb, fov_y: f32, zoom_level: f32) -> Self {
        let half = bounds.max_dimension() / 2.0;
        let distance = (half / (fov_y / 2.0).tan()).abs() * zoom_level;
        Self {
            focus: bounds.center(),
            distance,
        }
    }
}

pub struct OrbitController {
    settings: CameraSettings,

    /// x = pitch, y = azimuth; both relative to the initial rotation.
    current: Vec2,
    target: Vec2,

    framing: Option<Framing>,
    drag: DragSession,
}

impl OrbitController {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            framing: None,
            drag: DragSession::default(),
        }
    }

    pub fn current_angles(&self) -> Vec2 {
        self.current
    }

    pub fn target_angles(&self) -> Vec2 {
        self.target
    }

    pub fn framing(&self) -> Option<Framing> {
        self.framing
    }

    pub fn focus(&self) -> Option<Vec3> {
        self.framing.map(|f| f.focus)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn cursor(&self) -> Cursor {
        self.drag.cursor()
    }

    /// Frame the model and put the camera at the initial rotation.
    ///
    /// Only the first call has an effect; returns whether this one did.
    pub fn on_model_loaded(&mut self, bounds: &Aabb, camera: &mut Camera) -> bool {
        if self.framing.is_some() {
            log::warn!("orbit already framed, ignoring second model load");
            return false;
        }

        let framing = Framing::from_bounds(bounds, camera.fov_y, self.settings.zoom_level);
        self.framing = Some(framing);

        let polar = FRAC_PI_2 - self.settings.initial_rotation_x;
        self.place(camera, framing, polar, self.settings.initial_rotation_y);

        log::info!(
            "framed model: center {:?}, size {:?}, distance {:.3}",
            framing.focus,
            bounds.size(),
            framing.distance
        );
        true
    }

    pub fn on_drag_start(&mut self, pointer: Vec2) {
        self.drag.begin(pointer);
    }

    pub fn on_drag_move(&mut self, pointer: Vec2) {
        let Some(delta) = self.drag.advance(pointer) else {
            return;
        };

        self.target.y -= delta.x * self.settings.rotation_speed;
        self.target.x -= delta.y * self.settings.rotation_speed;

        // up is positive, down negative; azimuth wraps freely
        self.target.x = self
            .target
            .x
            .clamp(-self.settings.max_down_radians(), self.settings.max_up_radians());
    }

    pub fn on_drag_end(&mut self) {
        self.drag.end();
    }

    /// Polar angle for the given pitch offset, kept off the poles.
    pub fn polar_angle(&self, pitch: f32) -> f32 {
        (FRAC_PI_2 - self.settings.initial_rotation_x + pitch).clamp(POLE_MARGIN, PI - POLE_MARGIN)
    }

    /// Advance smoothing one frame and reposition the camera.
    ///
    /// The camera is left alone until the model has been framed.
    pub fn tick(&mut self, camera: &mut Camera) {
        let dampening = self.settings.dampening;
        self.current += (self.target - self.current) * dampening;

        let Some(framing) = self.framing else {
            return;
        };

        let polar = self.polar_angle(self.current.x);
        let azimuth = self.settings.initial_rotation_y + self.current.y;
        self.place(camera, framing, polar, azimuth);
    }

    fn place(&self, camera: &mut Camera, framing: Framing, polar: f32, azimuth: f32) {
        let mut eye = spherical_to_cartesian(framing.distance, polar, azimuth) + framing.focus;
        eye.y += self.settings.height_offset;

        camera.eye = eye;
        camera.look_at(framing.focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CAMERA_SETTINGS;

    const EPS: f32 = 1e-4;

    fn cake_bounds() -> Aabb {
        // center (0,5,0), largest side 4
        Aabb::new(Vec3::new(-1.0, 3.0, -1.5), Vec3::new(1.0, 7.0, 1.5))
    }

    fn framed() -> (OrbitController, Camera) {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        let mut camera = Camera::new(&CAMERA_SETTINGS, 1.0);
        orbit.on_model_loaded(&cake_bounds(), &mut camera);
        (orbit, camera)
    }

    fn drag(orbit: &mut OrbitController, from: Vec2, to: Vec2) {
        orbit.on_drag_start(from);
        orbit.on_drag_move(to);
        orbit.on_drag_end();
    }

    #[test]
    fn framing_distance_from_bounding_box() {
        let (orbit, camera) = framed();
        let framing = orbit.framing().unwrap();

        let expected = 2.0 / 37.5f32.to_radians().tan();
        assert!((framing.distance - expected).abs() < EPS);
        assert!((framing.distance - 2.606).abs() < 1e-3);
        assert_eq!(framing.focus, Vec3::new(0.0, 5.0, 0.0));

        let polar = FRAC_PI_2 - CAMERA_SETTINGS.initial_rotation_x;
        let want = spherical_to_cartesian(expected, polar, CAMERA_SETTINGS.initial_rotation_y)
            + Vec3::new(0.0, 5.0, 0.0);
        assert!(camera.eye.abs_diff_eq(want, EPS));
        assert_eq!(camera.target, framing.focus);
    }

    #[test]
    fn zoom_and_height_offset_apply() {
        let settings = CameraSettings {
            zoom_level: 2.0,
            height_offset: 1.5,
            ..CAMERA_SETTINGS
        };
        let mut orbit = OrbitController::new(settings);
        let mut camera = Camera::new(&settings, 1.0);
        orbit.on_model_loaded(&cake_bounds(), &mut camera);

        let distance = orbit.framing().unwrap().distance;
        assert!((distance - 2.0 * 2.0 / 37.5f32.to_radians().tan()).abs() < EPS);

        let polar = FRAC_PI_2 - settings.initial_rotation_x;
        let mut want = spherical_to_cartesian(distance, polar, settings.initial_rotation_y)
            + Vec3::new(0.0, 5.0, 0.0);
        want.y += 1.5;
        assert!(camera.eye.abs_diff_eq(want, EPS));
    }

    #[test]
    fn second_load_is_ignored() {
        let (mut orbit, mut camera) = framed();
        let before = orbit.framing();
        let other = Aabb::new(Vec3::splat(10.0), Vec3::splat(30.0));
        assert!(!orbit.on_model_loaded(&other, &mut camera));
        assert_eq!(orbit.framing(), before);
    }

    #[test]
    fn drag_scenario_updates_target() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        drag(&mut orbit, Vec2::new(100.0, 100.0), Vec2::new(150.0, 120.0));
        let t = orbit.target_angles();
        assert!((t.y - -0.5).abs() < EPS);
        assert!((t.x - -0.2).abs() < EPS);
        // dragging never touches the displayed angles directly
        assert_eq!(orbit.current_angles(), Vec2::ZERO);
    }

    #[test]
    fn drag_moves_are_relative_to_previous_sample() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        orbit.on_drag_start(Vec2::new(0.0, 0.0));
        orbit.on_drag_move(Vec2::new(10.0, 0.0));
        orbit.on_drag_move(Vec2::new(20.0, 0.0));
        assert!((orbit.target_angles().y - -0.2).abs() < EPS);
    }

    #[test]
    fn move_without_drag_is_noop() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        orbit.on_drag_move(Vec2::new(500.0, 500.0));
        assert_eq!(orbit.target_angles(), Vec2::ZERO);

        drag(&mut orbit, Vec2::ZERO, Vec2::new(10.0, 0.0));
        orbit.on_drag_move(Vec2::new(900.0, 900.0));
        assert!((orbit.target_angles().y - -0.1).abs() < EPS);
    }

    #[test]
    fn cursor_follows_drag() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        assert_eq!(orbit.cursor(), Cursor::Grab);
        orbit.on_drag_start(Vec2::ZERO);
        assert_eq!(orbit.cursor(), Cursor::Grabbing);
        orbit.on_drag_end();
        assert_eq!(orbit.cursor(), Cursor::Grab);
    }

    #[test]
    fn pitch_target_stays_within_limits() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        let up = CAMERA_SETTINGS.max_up_radians();
        let down = CAMERA_SETTINGS.max_down_radians();

        let mut y = 0.0;
        for step in [-400.0, 900.0, -30.0, 12.5, -2000.0, 3000.0, 7.0] {
            orbit.on_drag_start(Vec2::new(0.0, y));
            y += step;
            orbit.on_drag_move(Vec2::new(0.0, y));
            orbit.on_drag_end();

            let pitch = orbit.target_angles().x;
            assert!(pitch >= -down - 1e-6 && pitch <= up + 1e-6, "pitch {pitch}");
        }

        // dragging up by a lot pins the target to the upper/lower limit
        drag(&mut orbit, Vec2::ZERO, Vec2::new(0.0, -10_000.0));
        assert!((orbit.target_angles().x - up).abs() < 1e-6);
        drag(&mut orbit, Vec2::ZERO, Vec2::new(0.0, 10_000.0));
        assert!((orbit.target_angles().x + down).abs() < 1e-6);
    }

    #[test]
    fn azimuth_accumulates_without_clamping() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        let n = 100;
        let d = 40.0;
        for _ in 0..n {
            drag(&mut orbit, Vec2::ZERO, Vec2::new(d, 0.0));
        }
        let expected = -(n as f32) * d * CAMERA_SETTINGS.rotation_speed;
        assert!((orbit.target_angles().y - expected).abs() < 1e-3);
        assert!(orbit.target_angles().y < -2.0 * PI);
    }

    #[test]
    fn converges_monotonically() {
        for dampening in [0.1, 0.5, 1.0] {
            let ticks = ticks_to_converge(dampening);
            let bound = (10.0 / dampening) as usize;
            assert!(ticks <= bound, "dampening {dampening}: {ticks} ticks > {bound}");
        }
    }

    #[test]
    fn full_dampening_snaps_in_one_tick() {
        assert_eq!(ticks_to_converge(1.0), 1);
    }

    /// Ticks until every angle is within 1e-3 of its target, asserting the
    /// gap never grows on the way.
    fn ticks_to_converge(dampening: f32) -> usize {
        let settings = CameraSettings { dampening, ..CAMERA_SETTINGS };
        let mut orbit = OrbitController::new(settings);
        let mut camera = Camera::new(&settings, 1.0);
        orbit.on_model_loaded(&cake_bounds(), &mut camera);

        drag(&mut orbit, Vec2::ZERO, Vec2::new(-150.0, 30.0));
        let target = orbit.target_angles();

        let mut prev = (target - orbit.current_angles()).abs();
        for i in 1..=1000 {
            orbit.tick(&mut camera);
            let gap = (target - orbit.current_angles()).abs();
            assert!(gap.x <= prev.x && gap.y <= prev.y);
            prev = gap;
            if gap.max_element() < 1e-3 {
                return i;
            }
        }
        panic!("dampening {dampening} did not converge");
    }

    #[test]
    fn converged_ticks_leave_pose_unchanged() {
        let (mut orbit, mut camera) = framed();
        drag(&mut orbit, Vec2::ZERO, Vec2::new(80.0, -20.0));
        for _ in 0..500 {
            orbit.tick(&mut camera);
        }
        let eye = camera.eye;
        let target = camera.target;
        for _ in 0..50 {
            orbit.tick(&mut camera);
        }
        assert!(camera.eye.abs_diff_eq(eye, 1e-5));
        assert_eq!(camera.target, target);
    }

    #[test]
    fn polar_angle_never_reaches_poles() {
        let orbit = OrbitController::new(CAMERA_SETTINGS);
        for pitch in [-100.0, -PI, -1.0, 0.0, 0.3, 1.0, PI, 100.0] {
            let polar = orbit.polar_angle(pitch);
            assert!((POLE_MARGIN..=PI - POLE_MARGIN).contains(&polar), "polar {polar}");
        }
    }

    #[test]
    fn tick_before_load_holds_pose() {
        let mut orbit = OrbitController::new(CAMERA_SETTINGS);
        let mut camera = Camera::new(&CAMERA_SETTINGS, 1.0);
        let eye = camera.eye;
        drag(&mut orbit, Vec2::ZERO, Vec2::new(50.0, 0.0));
        orbit.tick(&mut camera);
        assert_eq!(camera.eye, eye);
        assert!(orbit.focus().is_none());
        // smoothing still runs
        assert!(orbit.current_angles().y < 0.0);
    }

    #[test]
    fn camera_keeps_distance_while_orbiting() {
        let (mut orbit, mut camera) = framed();
        let framing = orbit.framing().unwrap();
        drag(&mut orbit, Vec2::ZERO, Vec2::new(300.0, 40.0));
        for _ in 0..20 {
            orbit.tick(&mut camera);
            let d = camera.eye.distance(framing.focus);
            assert!((d - framing.distance).abs() < 1e-3);
            assert_eq!(camera.target, framing.focus);
        }
    }
}
