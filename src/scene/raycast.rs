//! Ray picking against mesh bounds.
//!
//! Meshes are tested as oriented boxes: the ray is moved into the mesh's
//! local space and intersected with its local AABB, and the hit point is
//! moved back to measure the world-space distance.

use glam::{Affine3A, Vec3};

use crate::scene::mesh::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Slab test. Returns the entry distance along `dir` and the hit point, or
/// the exit distance when the origin is inside the box.
#[must_use]
pub fn ray_aabb_intersection(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_min: f32 = 0.0;
    let mut t_max: f32 = f32::INFINITY;
    let origin_arr = origin.to_array();
    let dir_arr = dir.to_array();
    let min_arr = min.to_array();
    let max_arr = max.to_array();

    for axis in 0..3 {
        let o = origin_arr[axis];
        let d = dir_arr[axis];
        if d.abs() < 1e-6 {
            if o < min_arr[axis] || o > max_arr[axis] {
                return None;
            }
            continue;
        }
        let inv_d = 1.0 / d;
        let mut t1 = (min_arr[axis] - o) * inv_d;
        let mut t2 = (max_arr[axis] - o) * inv_d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    let t_hit = if t_min >= 0.0 { t_min } else { t_max };
    Some((t_hit, origin + dir * t_hit))
}

/// Distance from the ray origin to the box `bounds` placed by `world`.
#[must_use]
pub fn ray_hit_obb(ray: &Ray, world: &Affine3A, bounds: &BoundingBox) -> Option<f32> {
    if !world.is_finite() {
        return None;
    }
    let inv = world.inverse();
    if !inv.is_finite() {
        return None;
    }

    let origin_local = inv.transform_point3(ray.origin);
    let dir_local = inv.transform_vector3(ray.direction);
    if dir_local.length_squared() <= f32::EPSILON {
        return None;
    }
    let dir_local = dir_local.normalize();

    let (_, hit_local) = ray_aabb_intersection(origin_local, dir_local, bounds.min, bounds.max)?;
    let hit_world = world.transform_point3(hit_local);
    Some((hit_world - ray.origin).length())
}
