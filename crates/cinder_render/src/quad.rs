//! Parallelogram primitive.

use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// Determinant of the 3x3 matrix with columns a, b, c.
pub(crate) fn determinant(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    a.x * (b.y * c.z - c.y * b.z) - a.y * (b.x * c.z - c.x * b.z) + a.z * (b.x * c.y - c.x * b.y)
}

/// The parallelogram p + u*q + v*r with u, v in [0, 1].
pub struct Quad {
    p: Vec3,
    q: Vec3,
    r: Vec3,
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(p: Vec3, q: Vec3, r: Vec3, material: Arc<dyn Material>) -> Self {
        // The box of a planar quad is the hull of its two diagonals.
        let diagonal1 = Aabb::from_points(p, p + q + r);
        let diagonal2 = Aabb::from_points(p + q, p + r);

        Self {
            p,
            q,
            r,
            normal: q.cross(r).normalize(),
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Solve o + t*d = p + u*q + v*r by Cramer's rule on
        // [q | r | -d] (u, v, t)^T = o - p.
        let det = determinant(self.q, self.r, -ray.direction);
        if det.abs() < 1e-6 {
            return None;
        }
        let inv_det = 1.0 / det;
        let po = ray.origin - self.p;

        let u = determinant(po, self.r, -ray.direction) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let v = determinant(self.q, po, -ray.direction) * inv_det;
        if !(0.0..=1.0).contains(&v) {
            return None;
        }

        let t = determinant(self.q, self.r, po) * inv_det;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            ray.at(t),
            self.normal,
            &*self.material,
            Vec2::new(u, v),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six faces of the axis-aligned box spanning corners `a` and `b`.
pub fn cuboid(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Vec<Arc<dyn Hittable>> {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    vec![
        Arc::new(Quad::new(
            Vec3::new(min.x, min.y, max.z),
            dx,
            dy,
            material.clone(),
        )), // front
        Arc::new(Quad::new(
            Vec3::new(max.x, min.y, max.z),
            -dz,
            dy,
            material.clone(),
        )), // right
        Arc::new(Quad::new(
            Vec3::new(max.x, min.y, min.z),
            -dx,
            dy,
            material.clone(),
        )), // back
        Arc::new(Quad::new(
            Vec3::new(min.x, min.y, min.z),
            dz,
            dy,
            material.clone(),
        )), // left
        Arc::new(Quad::new(
            Vec3::new(min.x, max.y, max.z),
            dx,
            -dz,
            material.clone(),
        )), // top
        Arc::new(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material)), // bottom
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_unit_quad_hit_parameters() {
        let quad = Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray());
        let ray = Ray::new_simple(Vec3::new(0.3, 0.7, 1.0), -Vec3::Z);

        let rec = quad
            .hit(&ray, Interval::new(0.0, f32::INFINITY))
            .expect("ray must hit the quad");
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.uv.x - 0.3).abs() < 1e-5);
        assert!((rec.uv.y - 0.7).abs() < 1e-5);
        assert!(rec.front_face);
        assert!(ray.direction.dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_outside_parameter_range_misses() {
        let quad = Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray());
        let ray = Ray::new_simple(Vec3::new(1.3, 0.5, 1.0), -Vec3::Z);
        assert!(quad.hit(&ray, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let quad = Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray());
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 1.0), Vec3::X);
        assert!(quad.hit(&ray, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_back_face_flips_the_normal() {
        let quad = Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, gray());
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, -1.0), Vec3::Z);

        let rec = quad.hit(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();
        assert!(!rec.front_face);
        assert!(ray.direction.dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_cuboid_has_six_faces_and_encloses_its_corners() {
        let sides = cuboid(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), gray());
        assert_eq!(sides.len(), 6);

        let mut bbox = Aabb::EMPTY;
        for side in &sides {
            bbox = Aabb::surrounding(&bbox, &side.bounding_box());
        }
        assert!(bbox.x.min <= 0.0 && bbox.x.max >= 1.0);
        assert!(bbox.y.min <= 0.0 && bbox.y.max >= 2.0);
        assert!(bbox.z.min <= 0.0 && bbox.z.max >= 3.0);
    }
}
