//! Sphere primitive, static or moving.

use std::f32::consts::PI;
use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// A sphere whose center moves linearly over the shutter interval.
///
/// The center is stored as a ray from the t=0 position toward the t=1
/// position; static spheres have zero center velocity.
pub struct Sphere {
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self::new_moving(center, center, radius, material)
    }

    /// Create a sphere moving from `center1` (t = 0) to `center2` (t = 1).
    pub fn new_moving(
        center1: Vec3,
        center2: Vec3,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        assert!(radius > 0.0, "sphere radius must be positive");

        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);

        Self {
            center: Ray::new_simple(center1, center2 - center1),
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    /// Texture coordinates for a point on the unit sphere around the origin.
    fn sphere_uv(p: Vec3) -> Vec2 {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = self.center.at(ray.time);
        let oc = center - ray.origin;

        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Nearest root in range, else the farther one.
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - center) / self.radius;

        Some(HitRecord::new(
            ray,
            root,
            p,
            outward_normal,
            &*self.material,
            Self::sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
