//! Material system: how light leaves a surface.

use std::sync::Arc;

use cinder_math::{Ray, Vec3};

use crate::hittable::HitRecord;
use crate::rng;
use crate::texture::{SolidColor, Texture};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Offset applied along the normal to scattered ray origins so a bounce
/// never re-intersects the surface it left.
const SURFACE_BIAS: f32 = 1e-4;

/// Result of scattering a ray off a material.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel attenuation applied to the scattered radiance
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// How light interacts with a surface.
///
/// `scatter` returning `None` means the ray was absorbed. Emission is
/// separate so lights simply absorb and emit.
pub trait Material: Send + Sync {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterResult>;

    /// Emitted radiance; black for everything but lights.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material over a texture.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(albedo)),
        }
    }

    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterResult> {
        let mut direction = rec.normal + rng::random_unit_vector();

        // Catch degenerate scatter direction
        if direction.length_squared() < 1e-12 {
            direction = rec.normal;
        }

        let origin = rec.p + rec.normal * SURFACE_BIAS;
        Some(ScatterResult {
            attenuation: self.texture.value(rec.uv.x, rec.uv.y, rec.p),
            scattered: Ray::new(origin, direction, ray_in.time),
        })
    }
}

/// Metal with fuzzy reflection.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction, rec.normal);
        let direction = reflected.normalize() + self.fuzz * rng::random_unit_vector();

        // Fuzzed below the surface: absorbed.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        let origin = rec.p + rec.normal * SURFACE_BIAS;
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(origin, direction, ray_in.time),
        })
    }
}

/// Dielectric (glass) with Schlick reflectance.
pub struct Dielectric {
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterResult> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;

        let (direction, origin) = if cannot_refract || reflectance(cos_theta, ri) > rng::random_f32()
        {
            (
                reflect(unit_direction, rec.normal),
                rec.p + rec.normal * SURFACE_BIAS,
            )
        } else {
            (
                refract(unit_direction, rec.normal, ri),
                rec.p - rec.normal * SURFACE_BIAS,
            )
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(origin, direction, ray_in.time),
        })
    }
}

/// Emissive surface sampling a texture; absorbs everything it receives.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(emit)),
        }
    }

    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.texture.value(u, v, p)
    }
}

/// Direction-less scattering for participating media.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(albedo)),
        }
    }

    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.texture.value(rec.uv.x, rec.uv.y, rec.p),
            scattered: Ray::new(rec.p, rng::random_unit_vector(), ray_in.time),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with the given index ratio.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_math::Vec2;

    fn record<'a>(material: &'a dyn Material, normal: Vec3) -> HitRecord<'a> {
        HitRecord {
            t: 1.0,
            front_face: true,
            p: Vec3::ZERO,
            normal,
            material,
            uv: Vec2::ZERO,
        }
    }

    #[test]
    fn test_lambertian_scatters_into_the_normal_hemisphere() {
        let material = Lambertian::new(Color::splat(0.8));
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&material, Vec3::Y);

        for _ in 0..100 {
            let scatter = material.scatter(&ray, &rec).expect("lambertian never absorbs");
            assert!(scatter.scattered.direction.dot(Vec3::Y) >= 0.0);
            assert_eq!(scatter.attenuation, Color::splat(0.8));
            // Origin is lifted off the surface.
            assert!(scatter.scattered.origin.y > 0.0);
        }
    }

    #[test]
    fn test_metal_mirrors_about_the_normal() {
        let material = Metal::new(Color::ONE, 0.0);
        let incoming = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&material, Vec3::Y);

        let scatter = material.scatter(&incoming, &rec).unwrap();
        let direction = scatter.scattered.direction.normalize();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_absorbs_grazing_fuzz() {
        let material = Metal::new(Color::ONE, 1.0);
        let incoming = Ray::new_simple(Vec3::new(-1.0, 0.001, 0.0), Vec3::new(1.0, -0.001, 0.0));
        let rec = record(&material, Vec3::Y);

        // At grazing incidence full fuzz pushes many samples below the
        // surface; at least some must be absorbed.
        let absorbed = (0..200)
            .filter(|_| material.scatter(&incoming, &rec).is_none())
            .count();
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(1.5);
        // Back face (inside the glass), hitting at a steep grazing angle.
        let incoming = Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, -0.1, 0.0));
        let mut rec = record(&material, Vec3::Y);
        rec.front_face = false;

        let scatter = material.scatter(&incoming, &rec).unwrap();
        // Must reflect: the outgoing direction stays above the surface.
        assert!(scatter.scattered.direction.y > 0.0);
        assert_eq!(scatter.attenuation, Color::ONE);
    }

    #[test]
    fn test_dielectric_straight_through_refracts() {
        let material = Dielectric::new(1.5);
        let incoming = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = record(&material, Vec3::Y);

        // Head-on, reflectance is (0.5/2.5)^2 = 4%; nearly all samples
        // refract straight through with a lowered origin.
        let mut refracted = 0;
        for _ in 0..200 {
            let scatter = material.scatter(&incoming, &rec).unwrap();
            if scatter.scattered.direction.y < 0.0 {
                refracted += 1;
                assert!(scatter.scattered.origin.y < 0.0);
            }
        }
        assert!(refracted > 150);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let material = DiffuseLight::new(Color::new(4.0, 3.0, 2.0));
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Y);
        let rec = record(&material, Vec3::Y);

        assert!(material.scatter(&ray, &rec).is_none());
        assert_eq!(material.emitted(0.0, 0.0, Vec3::ZERO), Color::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn test_isotropic_scatters_uniformly() {
        let material = Isotropic::new(Color::splat(0.9));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let rec = record(&material, Vec3::X);

        let mut backward = 0;
        for _ in 0..400 {
            let scatter = material.scatter(&ray, &rec).unwrap();
            if scatter.scattered.direction.x < 0.0 {
                backward += 1;
            }
        }
        // Roughly half the phase function points backward.
        assert!(backward > 100 && backward < 300);
    }

    #[test]
    fn test_refract_bends_toward_the_surface() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let bent = refract(incoming, Vec3::Y, 1.0 / 1.5);
        // Entering a denser medium bends toward the normal.
        let sin_in = incoming.x.abs();
        let sin_out = bent.x.abs() / bent.length();
        assert!(sin_out < sin_in);
    }
}
