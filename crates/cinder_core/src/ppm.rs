//! Binary PPM (P6) framebuffer writer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use cinder_math::Vec3;

/// Gamma-encode a linear color component with exponent 1/2.2.
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / 2.2)
    } else {
        0.0
    }
}

/// Streaming writer for a binary portable pixmap.
///
/// The header is emitted on creation; pixels are then written one at a
/// time, top-to-bottom, left-to-right.
pub struct PpmWriter {
    out: BufWriter<File>,
    width: u32,
    height: u32,
}

impl PpmWriter {
    /// Open the output file and write the P6 header.
    pub fn create(path: impl AsRef<Path>, width: u32, height: u32) -> io::Result<Self> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        write!(out, "P6\n{} {}\n255\n", width, height)?;
        Ok(Self { out, width, height })
    }

    /// Gamma-correct, clamp, and append one pixel.
    pub fn write_color(&mut self, color: Vec3) -> io::Result<()> {
        let r = linear_to_gamma(color.x).clamp(0.0, 0.999);
        let g = linear_to_gamma(color.y).clamp(0.0, 0.999);
        let b = linear_to_gamma(color.z).clamp(0.0, 0.999);

        self.out
            .write_all(&[(r * 256.0) as u8, (g * 256.0) as u8, (b * 256.0) as u8])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flush buffered pixel data to disk.
    pub fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}
