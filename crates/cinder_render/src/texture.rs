//! Textures: mappings from (u, v, point) to a radiance tint.

use std::sync::Arc;

use cinder_core::Image;
use cinder_math::Vec3;

use crate::material::Color;
use crate::perlin::Perlin;

/// Anything that can be sampled for a color at a surface point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// A 3D checkerboard: space is partitioned into cells of the given scale
/// and the parity of the summed cell coordinates picks a sub-texture.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i32;
        let y = (self.inv_scale * p.y).floor() as i32;
        let z = (self.inv_scale * p.z).floor() as i32;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Nearest-neighbour sampling of a decoded raster.
///
/// The loader already flipped the image so row 0 is the bottom; v indexes
/// rows directly.
pub struct ImageTexture {
    image: Arc<Image>,
}

impl ImageTexture {
    pub fn new(image: Arc<Image>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let x = (u * self.image.width as f32) as i64;
        let y = (v * self.image.height as f32) as i64;

        let x = x.clamp(0, self.image.width as i64 - 1) as u32;
        let y = y.clamp(0, self.image.height as i64 - 1) as u32;

        self.image.pixel(x, y)
    }
}

/// Marble-like gradient noise: a sine over z swept by turbulence.
pub struct NoiseTexture {
    scale: f32,
    perlin: Perlin,
}

impl NoiseTexture {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            perlin: Perlin::new(),
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.perlin.turbulence(self.scale * p, 7);
        Color::splat(0.5 * (1.0 + phase.sin()))
    }
}
