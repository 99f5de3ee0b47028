//! Cinder renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer over a BVH-accelerated scene of spheres,
//! quads, triangles, and participating media, with thin-lens defocus,
//! stratified anti-aliasing, and motion blur.

mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod model;
mod perlin;
mod quad;
mod renderer;
pub mod rng;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bvh::BvhNode;
pub use camera::{Camera, RenderOptions};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use model::model_to_hittables;
pub use perlin::Perlin;
pub use quad::{cuboid, Quad};
pub use renderer::{ray_color, render, Framebuffer};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{RotateY, Translate};
pub use triangle::Triangle;

/// Re-export the math types from cinder_math
pub use cinder_math::{Aabb, Interval, Ray, Vec2, Vec3};
