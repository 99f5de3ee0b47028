//! Triangle primitive with per-vertex attributes.

use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::quad::determinant;

/// A triangle carrying per-vertex normals and texture coordinates,
/// interpolated barycentrically at the hit point.
pub struct Triangle {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    normals: [Vec3; 3],
    texcoords: [Vec2; 3],
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(
        a: Vec3,
        b: Vec3,
        c: Vec3,
        normals: [Vec3; 3],
        texcoords: [Vec2; 3],
        material: Arc<dyn Material>,
    ) -> Self {
        let bbox = Aabb::from_points(a.min(b).min(c), a.max(b).max(c));
        Self {
            a,
            b,
            c,
            normals,
            texcoords,
            material,
            bbox,
        }
    }

    /// Triangle with a single face normal and zero texture coordinates.
    pub fn flat(a: Vec3, b: Vec3, c: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self::new(a, b, c, [normal; 3], [Vec2::ZERO; 3], material)
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Same Cramer formulation as the quad, with edges ab and ac and
        // the barycentric acceptance u >= 0, v >= 0, u + v <= 1.
        let ab = self.b - self.a;
        let ac = self.c - self.a;

        let det = determinant(ab, ac, -ray.direction);
        if det.abs() < 1e-6 {
            return None;
        }
        let inv_det = 1.0 / det;
        let po = ray.origin - self.a;

        let u = determinant(po, ac, -ray.direction) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let v = determinant(ab, po, -ray.direction) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = determinant(ab, ac, po) * inv_det;
        if !ray_t.surrounds(t) {
            return None;
        }

        let w = 1.0 - u - v;
        let normal =
            (w * self.normals[0] + u * self.normals[1] + v * self.normals[2]).normalize();
        let uv = w * self.texcoords[0] + u * self.texcoords[1] + v * self.texcoords[2];

        Some(HitRecord::new(ray, t, ray.at(t), normal, &*self.material, uv))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_hit_inside_misses_outside() {
        let tri = Triangle::flat(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            gray(),
        );

        let center = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = tri
            .hit(&center, Interval::new(0.0, f32::INFINITY))
            .expect("centroid ray must hit");
        assert!((rec.t - 1.0).abs() < 1e-5);

        // Inside the quad's corner but outside the triangle half.
        let corner = Ray::new_simple(Vec3::new(0.9, 0.9, 0.0), -Vec3::Z);
        assert!(tri.hit(&corner, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_barycentric_interpolation_of_attributes() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            [Vec3::Z, Vec3::Z, Vec3::Z],
            [Vec2::ZERO, Vec2::X, Vec2::Y],
            gray(),
        );

        // Hitting vertex b exactly gives its texture coordinate.
        let at_b = Ray::new_simple(Vec3::new(1.0, 0.0, 0.0), -Vec3::Z);
        let rec = tri.hit(&at_b, Interval::new(0.0, f32::INFINITY)).unwrap();
        assert!((rec.uv.x - 1.0).abs() < 1e-5);
        assert!(rec.uv.y.abs() < 1e-5);

        // The centroid averages all three.
        let centroid = Ray::new_simple(Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), -Vec3::Z);
        let rec = tri.hit(&centroid, Interval::new(0.0, f32::INFINITY)).unwrap();
        assert!((rec.uv.x - 1.0 / 3.0).abs() < 1e-4);
        assert!((rec.uv.y - 1.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_smooth_normals_blend_across_the_face() {
        let na = Vec3::new(-1.0, 0.0, 1.0).normalize();
        let nb = Vec3::new(1.0, 0.0, 1.0).normalize();
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            [na, nb, Vec3::Z],
            [Vec2::ZERO; 3],
            gray(),
        );

        let rec = tri
            .hit(
                &Ray::new_simple(Vec3::new(0.0, -0.5, 0.0), -Vec3::Z),
                Interval::new(0.0, f32::INFINITY),
            )
            .unwrap();
        // Between a and b the x components cancel; the blend stays unit.
        assert!((rec.normal.length() - 1.0).abs() < 1e-5);
        assert!(rec.normal.z > 0.9);
    }

    #[test]
    fn test_normal_faces_the_ray() {
        let tri = Triangle::flat(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            gray(),
        );
        let from_behind = Ray::new_simple(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let rec = tri
            .hit(&from_behind, Interval::new(0.0, f32::INFINITY))
            .unwrap();
        assert!(from_behind.direction.dot(rec.normal) <= 0.0);
    }
}
