//! Instancing wrappers: rays are rewritten into the child's local frame
//! and hits are mapped back out.

use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};

/// A hittable displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().offset(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Move the ray into the child's frame instead of moving the child.
        let local = Ray::new(ray.origin - self.offset, ray.direction, ray.time);
        let mut rec = self.object.hit(&local, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A hittable rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    /// Wrap `object`, rotating it by `angle` radians about Y.
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let sin_theta = angle.sin();
        let cos_theta = angle.cos();

        // Hull of the child's eight rotated corners.
        let child_box = object.bounding_box();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { child_box.x.min } else { child_box.x.max };
                    let y = if j == 0 { child_box.y.min } else { child_box.y.max };
                    let z = if k == 0 { child_box.z.min } else { child_box.z.max };

                    let corner = Vec3::new(
                        cos_theta * x + sin_theta * z,
                        y,
                        -sin_theta * x + cos_theta * z,
                    );
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Rotate a vector from world space into the child's frame (by -θ).
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Rotate a vector from the child's frame back to world space (by +θ).
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let local = Ray::new(
            self.to_local(ray.origin),
            self.to_local(ray.direction),
            ray.time,
        );

        let mut rec = self.object.hit(&local, ray_t)?;

        // Rotation preserves lengths and dot products, so the normal stays
        // unit and front_face is unchanged.
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian, Material};
    use crate::sphere::Sphere;
    use std::f32::consts::{FRAC_PI_2, TAU};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unit_sphere_at(center: Vec3) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(center, 1.0, gray()))
    }

    #[test]
    fn test_translate_moves_the_hit_point() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));
        let moved = Translate::new(sphere, Vec3::new(2.0, 0.0, 0.0));

        let ray = Ray::new_simple(Vec3::new(2.0, 0.0, 0.0), -Vec3::Z);
        let rec = moved
            .hit(&ray, Interval::new(0.0, f32::INFINITY))
            .expect("translated sphere sits on this ray");
        assert!((rec.p - Vec3::new(2.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_translation_composes_like_a_group_action() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 0.5, 2.0);

        let base = unit_sphere_at(Vec3::new(0.0, 0.0, -5.0));
        let nested = Translate::new(
            Arc::new(Translate::new(base.clone(), a)) as Arc<dyn Hittable>,
            b,
        );

        // Hitting the nested wrapper equals hitting the bare object with
        // the origin shifted by -(a + b), plus (a + b) on the point.
        let ray = Ray::new_simple(a + b, -Vec3::Z);
        let shifted = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        let nested_rec = nested.hit(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();
        let base_rec = base.hit(&shifted, Interval::new(0.0, f32::INFINITY)).unwrap();

        assert!((nested_rec.t - base_rec.t).abs() < 1e-5);
        assert!((nested_rec.p - (base_rec.p + a + b)).length() < 1e-4);
    }

    #[test]
    fn test_rotate_quarter_turn_moves_x_to_z() {
        let sphere = unit_sphere_at(Vec3::new(5.0, 0.0, 0.0));
        let rotated = RotateY::new(sphere, FRAC_PI_2);

        // Rotating +x by 90 degrees about Y lands on -z.
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = rotated
            .hit(&ray, Interval::new(0.0, f32::INFINITY))
            .expect("rotated sphere must sit on -z");
        assert!((rec.t - 4.0).abs() < 1e-3);

        // The original location no longer intersects.
        let old_spot = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!(rotated.hit(&old_spot, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_full_turn_is_identity() {
        let sphere = unit_sphere_at(Vec3::new(3.0, 1.0, -4.0));
        let rotated = RotateY::new(sphere.clone(), TAU);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(3.0, 1.0, -4.0));
        let plain = sphere.hit(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();
        let full = rotated.hit(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();

        assert!((plain.p - full.p).length() < 1e-4);
        assert!((plain.normal - full.normal).length() < 1e-4);
        assert!((plain.t - full.t).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_box_hull_contains_the_child() {
        let sphere = unit_sphere_at(Vec3::new(5.0, 0.0, 0.0));
        let rotated = RotateY::new(sphere, FRAC_PI_2);
        let bbox = rotated.bounding_box();

        // The sphere now lives around (0, 0, -5).
        assert!(bbox.z.min <= -6.0 + 1e-3);
        assert!(bbox.z.max >= -4.0 - 1e-3);
        assert!(bbox.x.min <= -1.0 + 1e-3);
        assert!(bbox.x.max >= 1.0 - 1e-3);
    }

    #[test]
    fn test_rotation_keeps_normals_unit_and_front_facing() {
        let sphere = unit_sphere_at(Vec3::new(2.0, 0.0, -2.0));
        let rotated = RotateY::new(sphere, 0.7);

        let bbox = rotated.bounding_box();
        let target = Vec3::new(
            (bbox.x.min + bbox.x.max) / 2.0,
            0.0,
            (bbox.z.min + bbox.z.max) / 2.0,
        );
        let ray = Ray::new_simple(Vec3::ZERO, target);
        let rec = rotated
            .hit(&ray, Interval::new(0.0, f32::INFINITY))
            .expect("aiming at the box center must hit the sphere");
        assert!((rec.normal.length() - 1.0).abs() < 1e-4);
        assert!(ray.direction.dot(rec.normal) <= 0.0);
    }
}
