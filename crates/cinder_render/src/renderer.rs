//! The integrator and the parallel scanline driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use cinder_math::{Interval, Ray};
use log::info;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::material::Color;

/// Rows rendered between progress reports.
const PROGRESS_INTERVAL: usize = 50;

/// Linear HDR framebuffer, row-major from the top-left.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Pixels in write order: top-to-bottom, left-to-right.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

/// Radiance arriving along a ray.
///
/// Recurses through scatter events until the ray is absorbed, escapes to
/// the background, or exhausts the bounce budget. Materials offset their
/// scattered origins off the surface, so the query interval starts at 0.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, background: Color) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(0.0, f32::INFINITY)) else {
        return background;
    };

    let emitted = rec.material.emitted(rec.uv.x, rec.uv.y, rec.p);
    match rec.material.scatter(ray, &rec) {
        Some(scatter) => {
            emitted
                + scatter.attenuation * ray_color(&scatter.scattered, world, depth - 1, background)
        }
        None => emitted,
    }
}

/// Average of all stratified samples through one pixel.
pub fn render_pixel(camera: &Camera, world: &dyn Hittable, x: u32, y: u32) -> Color {
    let mut color = Color::ZERO;
    for sy in 0..camera.sqrt_spp() {
        for sx in 0..camera.sqrt_spp() {
            let ray = camera.get_ray(x, y, sx, sy);
            color += ray_color(&ray, world, camera.max_depth, camera.background);
        }
    }
    color * camera.sample_scale()
}

/// Render the scene into a framebuffer.
///
/// Scanlines are distributed across worker threads with 1-row granularity;
/// rows are independent and the scene is immutable, so workers share
/// nothing but the progress counter.
pub fn render(camera: &Camera, world: &dyn Hittable) -> Framebuffer {
    let width = camera.image_width;
    let height = camera.image_height;
    let mut framebuffer = Framebuffer::new(width, height);

    info!(
        "rendering {}x{} at {} samples per pixel on {} threads",
        width,
        height,
        camera.sqrt_spp() * camera.sqrt_spp(),
        rayon::current_num_threads()
    );
    let start = Instant::now();
    let rows_done = AtomicUsize::new(0);

    framebuffer
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(camera, world, x as u32, y as u32);
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                info!(
                    "rendered {}/{} rows in {:.1}s",
                    done,
                    height,
                    start.elapsed().as_secs_f32()
                );
            }
        });

    info!("render finished in {:.2}s", start.elapsed().as_secs_f32());
    framebuffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::RenderOptions;
    use crate::hittable::HittableList;
    use crate::material::{DiffuseLight, Lambertian, Material};
    use crate::quad::Quad;
    use crate::sphere::Sphere;
    use cinder_math::Vec3;
    use std::sync::Arc;

    #[test]
    fn test_escaping_ray_returns_background() {
        let world = HittableList::new();
        let background = Color::new(0.2, 0.4, 0.6);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&ray, &world, 10, background), background);
    }

    #[test]
    fn test_depth_zero_gathers_nothing() {
        let world = HittableList::new();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&ray, &world, 0, Color::ONE), Color::ZERO);
    }

    #[test]
    fn test_emissive_surface_is_seen_directly() {
        let mut world = HittableList::new();
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(3.0, 2.0, 1.0)));
        world.add(Arc::new(Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            light,
        )));

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let color = ray_color(&ray, &world, 5, Color::ZERO);
        assert_eq!(color, Color::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_single_bounce_converges_to_albedo_times_background() {
        // A ray hitting the top of a diffuse sphere scatters into the
        // upper hemisphere and always escapes, so each sample is exactly
        // albedo * background and the average converges there.
        let albedo = Color::splat(0.5);
        let background = Color::new(1.0, 0.8, 0.6);

        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, -1.0, 0.0),
            1.0,
            Arc::new(Lambertian::new(albedo)),
        )));

        let ray = Ray::new_simple(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        let samples = 2000;
        let mut mean = Color::ZERO;
        for _ in 0..samples {
            mean += ray_color(&ray, &world, 3, background);
        }
        mean /= samples as f32;

        let expected = albedo * background;
        assert!(
            (mean - expected).length() < 0.02,
            "mean {:?} vs expected {:?}",
            mean,
            expected
        );
    }

    #[test]
    fn test_render_fills_every_pixel() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )));

        let options = RenderOptions {
            num_samples: 4,
            max_depth: 4,
            background: Color::new(0.1, 0.1, 0.1),
            focus_distance: 1.0,
            ..Default::default()
        };
        let camera = Camera::new(&options, 16, 12);
        let framebuffer = render(&camera, &world);

        assert_eq!(framebuffer.pixels().len(), 16 * 12);
        // The corner pixels see only background.
        let corner = framebuffer.get(0, 0);
        assert!((corner - Color::splat(0.1)).length() < 1e-4);
        // The center pixel sees the lit sphere, which differs from it.
        let center = framebuffer.get(8, 6);
        assert!((center - corner).length() > 1e-3);
    }
}
