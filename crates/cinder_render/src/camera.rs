//! Camera for ray generation.

use cinder_math::{Ray, Vec3};

use crate::material::Color;
use crate::rng;

/// Everything the caller configures about a render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Vertical field of view, in radians
    pub fov: f32,
    /// Sampling budget per pixel; stratified as floor(sqrt(n))^2
    pub num_samples: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// Distance from the camera to the plane of perfect focus
    pub focus_distance: f32,
    /// Aperture cone angle, in radians; 0 disables defocus blur
    pub defocus_angle: f32,
    /// Radiance of rays that escape the scene
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_2,
            num_samples: 100,
            max_depth: 50,
            look_from: Vec3::ZERO,
            look_at: -Vec3::Z,
            focus_distance: 10.0,
            defocus_angle: 0.0,
            background: Color::ZERO,
        }
    }
}

/// Thin-lens camera with a precomputed viewport frame.
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    pub max_depth: u32,
    pub background: Color,

    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    defocus_angle: f32,
    defocus_radius: f32,
    sqrt_spp: u32,
    sample_scale: f32,
}

impl Camera {
    pub fn new(options: &RenderOptions, image_width: u32, image_height: u32) -> Self {
        let image_height = image_height.max(1);
        let aspect_ratio = image_width as f32 / image_height as f32;

        // Orthonormal camera frame; w points opposite the view direction.
        let w = (options.look_from - options.look_at).normalize();
        let u = Vec3::Y.cross(w).normalize();
        let v = w.cross(u);

        let viewport_height = 2.0 * options.focus_distance * (options.fov / 2.0).tan();
        let viewport_width = aspect_ratio * viewport_height;

        let pixel_delta_u = u * (viewport_width / image_width as f32);
        let pixel_delta_v = -v * (viewport_height / image_height as f32);

        // Center of the top-left pixel.
        let pixel00_loc = options.look_from - 0.5 * viewport_width * u + 0.5 * viewport_height * v
            - options.focus_distance * w
            + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = options.focus_distance * (options.defocus_angle / 2.0).tan();

        let sqrt_spp = (options.num_samples as f32).sqrt().floor().max(1.0) as u32;

        Self {
            image_width,
            image_height,
            max_depth: options.max_depth,
            background: options.background,
            center: options.look_from,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            defocus_angle: options.defocus_angle,
            defocus_radius,
            sqrt_spp,
            sample_scale: 1.0 / (sqrt_spp * sqrt_spp) as f32,
        }
    }

    /// Strata per pixel axis.
    pub fn sqrt_spp(&self) -> u32 {
        self.sqrt_spp
    }

    /// Weight of one sample in the pixel average.
    pub fn sample_scale(&self) -> f32 {
        self.sample_scale
    }

    /// Generate a ray through pixel (x, y), jittered within stratum
    /// (sx, sy), with a lens offset and a shutter time.
    pub fn get_ray(&self, x: u32, y: u32, sx: u32, sy: u32) -> Ray {
        let offset = self.sample_square_stratified(sx, sy);
        let pixel_sample = self.pixel00_loc
            + (x as f32 + offset.x) * self.pixel_delta_u
            + (y as f32 + offset.y) * self.pixel_delta_v;

        let origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample()
        };

        Ray::new(origin, pixel_sample - origin, rng::random_f32())
    }

    /// Jittered offset within the given stratum cell, in [-0.5, 0.5).
    fn sample_square_stratified(&self, sx: u32, sy: u32) -> Vec3 {
        let inv = 1.0 / self.sqrt_spp as f32;
        Vec3::new(
            (sx as f32 + rng::random_f32()) * inv - 0.5,
            (sy as f32 + rng::random_f32()) * inv - 0.5,
            0.0,
        )
    }

    /// Point on the aperture disk.
    ///
    /// The radius is sampled uniformly in r, concentrating density toward
    /// the optical axis; sqrt(r) would make it uniform in area.
    fn defocus_disk_sample(&self) -> Vec3 {
        let theta = rng::random_range(0.0, 2.0 * std::f32::consts::PI);
        let r = rng::random_f32();
        self.center + self.defocus_radius * r * (theta.cos() * self.u + theta.sin() * self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_camera(num_samples: u32, defocus_angle: f32) -> Camera {
        let options = RenderOptions {
            num_samples,
            defocus_angle,
            focus_distance: 1.0,
            ..Default::default()
        };
        Camera::new(&options, 100, 100)
    }

    #[test]
    fn test_center_ray_points_down_the_view_axis() {
        let camera = simple_camera(1, 0.0);
        let ray = camera.get_ray(50, 50, 0, 0);
        let direction = ray.direction.normalize();
        assert!(direction.z < -0.99);
    }

    #[test]
    fn test_stratification_counts() {
        assert_eq!(simple_camera(100, 0.0).sqrt_spp(), 10);
        assert_eq!(simple_camera(99, 0.0).sqrt_spp(), 9);
        assert_eq!(simple_camera(2, 0.0).sqrt_spp(), 1);

        let camera = simple_camera(16, 0.0);
        assert!((camera.sample_scale() - 1.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_strata_stay_inside_their_cells() {
        let camera = simple_camera(16, 0.0);
        for sx in 0..4 {
            for sy in 0..4 {
                for _ in 0..20 {
                    let offset = camera.sample_square_stratified(sx, sy);
                    assert!(offset.x >= sx as f32 * 0.25 - 0.5);
                    assert!(offset.x < (sx + 1) as f32 * 0.25 - 0.5);
                    assert!(offset.y >= sy as f32 * 0.25 - 0.5);
                    assert!(offset.y < (sy + 1) as f32 * 0.25 - 0.5);
                }
            }
        }
    }

    #[test]
    fn test_rays_carry_shutter_times_in_unit_range() {
        let camera = simple_camera(4, 0.0);
        for _ in 0..100 {
            let ray = camera.get_ray(10, 10, 0, 0);
            assert!((0.0..1.0).contains(&ray.time));
        }
    }

    #[test]
    fn test_pinhole_rays_share_one_origin() {
        let camera = simple_camera(4, 0.0);
        for _ in 0..20 {
            assert_eq!(camera.get_ray(3, 7, 1, 1).origin, Vec3::ZERO);
        }
    }

    #[test]
    fn test_defocus_origins_spread_on_the_lens_disk() {
        let camera = simple_camera(4, 0.2);
        let mut spread = 0.0f32;
        for _ in 0..100 {
            let origin = camera.get_ray(50, 50, 0, 0).origin;
            assert!(origin.length() <= camera.defocus_radius + 1e-5);
            spread = spread.max(origin.length());
        }
        assert!(spread > 0.0);
    }
}
