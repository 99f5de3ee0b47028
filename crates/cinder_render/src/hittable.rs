//! Ray-object intersection contract.

use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::material::Material;

/// Record of a ray-object intersection.
///
/// The normal is unit length and always faces against the incoming ray;
/// `front_face` records which side was struck.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the outside of the surface was struck
    pub front_face: bool,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, oriented against the ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Texture coordinates
    pub uv: Vec2,
}

impl<'a> HitRecord<'a> {
    /// Build a record from an outward normal, orienting it against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        p: Vec3,
        outward_normal: Vec3,
        material: &'a dyn Material,
        uv: Vec2,
    ) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        Self {
            t,
            front_face,
            p,
            normal: if front_face {
                outward_normal
            } else {
                -outward_normal
            },
            material,
            uv,
        }
    }
}

/// Trait for anything a ray can intersect.
///
/// `None` is the uniform miss signal; implementations must only accept
/// parameters strictly inside `ray_t`. Objects are immutable once built
/// and shared read-only across render threads.
pub trait Hittable: Send + Sync {
    /// Closest intersection within `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Axis-aligned bounding box, valid over the whole shutter interval.
    fn bounding_box(&self) -> Aabb;
}

/// A scene as a flat list of objects, intersected by linear scan.
pub struct HittableList {
    pub objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn extend(&mut self, objects: impl IntoIterator<Item = Arc<dyn Hittable>>) {
        for object in objects {
            self.add(object);
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.shrink_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
