//! Raster decoding for image textures.
//!
//! Images are decoded once into linear float RGB and shared read-only
//! across threads during rendering.

use std::path::Path;

use cinder_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded raster: linear RGB floats, row-major with the bottom row
/// first, so texture coordinate `v = 0` addresses row 0 directly.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl Image {
    /// Pixel at integer coordinates; callers are expected to clamp.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Decode an image file into a bottom-up linear float buffer.
///
/// Failure is reported on standard error and returned for the caller to
/// decide; rendering never aborts inside the loader.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image, ImageError> {
    let path = path.as_ref();

    let decoded = image::open(path).map_err(|e| {
        log::error!("failed to load image {}: {}", path.display(), e);
        e
    })?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    // Flip vertically while converting so row 0 is the bottom of the image.
    let mut pixels = vec![Vec3::ZERO; (width * height) as usize];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let flipped_y = height - 1 - y;
        pixels[(flipped_y * width + x) as usize] = Vec3::new(
            srgb_to_linear(pixel[0]),
            srgb_to_linear(pixel[1]),
            srgb_to_linear(pixel[2]),
        );
    }

    log::debug!("loaded image {} ({}x{})", path.display(), width, height);

    Ok(Image {
        width,
        height,
        pixels,
    })
}

/// Convert an sRGB byte value to a linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 1e-6);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-3);

        // Mid-gray is darker in linear space.
        let mid = srgb_to_linear(128);
        assert!(mid > 0.1 && mid < 0.5);
    }

    #[test]
    fn test_missing_file_is_an_error_not_a_panic() {
        assert!(load_image("/definitely/not/here.png").is_err());
    }

    #[test]
    fn test_pixel_indexing_is_row_major() {
        let image = Image {
            width: 2,
            height: 2,
            pixels: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        };
        assert_eq!(image.pixel(1, 0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(image.pixel(0, 1), Vec3::new(0.0, 1.0, 0.0));
    }
}
