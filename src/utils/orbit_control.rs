use glam::{Vec2, Vec3};

use crate::input::{Input, MouseButton};
use crate::scene::transform::Transform;

/// Orbit camera controller: left drag rotates, wheel zooms, right drag pans.
///
/// The spherical offset is re-read from the camera position on every update,
/// so anything else that moves the camera between updates (the fly-away
/// drift, for instance) is kept rather than overwritten.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub target: Vec3,

    rotate_delta: Vec2,
    pan_offset: Vec3,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: false,
            min_distance: 0.0,
            max_distance: f32::INFINITY,

            target,

            rotate_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
        }
    }

    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let screen_height = input.screen_size().y.max(1.0);
        let cursor_delta = input.mouse_delta();

        // Current spherical coordinates, relative to the target.
        let offset = transform.position - self.target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if input.get_mouse_button(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta.x -= cursor_delta.x * rotate_per_pixel * self.rotate_speed;
            self.rotate_delta.y -= cursor_delta.y * rotate_per_pixel * self.rotate_speed;
        }

        if input.get_mouse_button(MouseButton::Right) {
            let half_fov = fov_degrees.to_radians() / 2.0;
            let target_world_height = 2.0 * radius * half_fov.tan();
            let pixels_to_world_ratio = target_world_height / screen_height;

            let forward = -offset / radius;
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.pan_offset +=
                (right * -cursor_delta.x + up * cursor_delta.y) * pixels_to_world_ratio * self.pan_speed;
        }

        let scroll = input.scroll_delta().y;
        if scroll != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(scroll.abs());
            if scroll > 0.0 {
                radius *= scale;
            } else {
                radius /= scale;
            }
        }
        radius = radius.clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let keep = 1.0 - retention;

            theta += self.rotate_delta.x * keep;
            phi += self.rotate_delta.y * keep;
            self.target += self.pan_offset * keep;

            self.rotate_delta *= retention;
            self.pan_offset *= retention;
        } else {
            theta += self.rotate_delta.x;
            phi += self.rotate_delta.y;
            self.target += self.pan_offset;

            self.rotate_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }

        const EPS: f32 = 0.0001;
        phi = phi.clamp(EPS, std::f32::consts::PI - EPS);

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        transform.position = self.target + new_offset;
        transform.look_at(self.target, Vec3::Y);
    }
}
