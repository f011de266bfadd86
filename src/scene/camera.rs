use glam::{Affine3A, Mat4, Vec2, Vec3, Vec4};

use crate::scene::raycast::Ray;

/// Perspective camera component.
///
/// `fov` is the vertical field of view in degrees. After changing `fov`,
/// `aspect`, `near` or `far` call [`Camera::update_projection_matrix`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    // Cached matrices, read-only for the renderer
    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees,
            aspect,
            near,
            far,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        // perspective_rh maps depth to [0, 1]
        self.projection_matrix =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect.max(1e-4), self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Called by the transform system whenever the camera node moved.
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        Vec3::from(self.world_matrix.translation)
    }

    /// World-space ray from the camera through a point given in normalized
    /// device coordinates (x right, y up, both in [-1, 1]).
    ///
    /// Returns `None` when the view-projection matrix is degenerate.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let inv_view_proj = self.view_projection_matrix.inverse();
        if !inv_view_proj.is_finite() {
            return None;
        }
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let origin = self.world_position();
        let dir = far.truncate() / far.w - origin;
        if dir.length_squared() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(origin, dir.normalize()))
    }
}
