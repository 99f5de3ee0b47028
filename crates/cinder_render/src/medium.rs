//! Homogeneous participating medium bounded by another hittable.

use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::rng;
use crate::texture::Texture;

/// Offset past the entry hit when probing for the exit point, so grazing
/// boundaries are not re-reported.
const REENTRY_BIAS: f32 = 5e-4;

/// Constant-density volume with isotropic scattering.
///
/// A ray's free-flight distance through the medium is exponentially
/// distributed with rate `density`. Distances are measured in world units,
/// scaled by `|ray.direction|`; callers must not pre-normalise rays before
/// querying volumes.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase: Isotropic::textured(texture),
        }
    }

    pub fn from_color(boundary: Arc<dyn Hittable>, density: f32, color: Vec3) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase: Isotropic::new(color),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Entry and exit of the boundary along the unbounded ray.
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + REENTRY_BIAS, f32::INFINITY))?;

        // Clip the traversed span to the query interval and the ray start.
        let t_entry = entry.t.max(ray_t.min).max(0.0);
        let t_exit = exit.t.min(ray_t.max);
        if t_entry >= t_exit {
            return None;
        }

        let ray_length = ray.direction.length();
        let distance_inside = (t_exit - t_entry) * ray_length;
        let hit_distance = self.neg_inv_density * rng::random_f32().ln();

        if hit_distance > distance_inside {
            return None;
        }

        let t = t_entry + hit_distance / ray_length;

        // The normal and uv are meaningless inside a volume; the isotropic
        // phase function ignores them. Any other material reading them
        // sees arbitrary values.
        Some(HitRecord {
            t,
            front_face: true,
            p: ray.at(t),
            normal: Vec3::X,
            material: &self.phase,
            uv: Vec2::ZERO,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
