//! Gradient noise.

use cinder_math::Vec3;

use crate::rng;

const POINT_COUNT: usize = 256;

/// Perlin gradient noise with three independent permutation tables.
///
/// Generated once per texture; immutable and shared across threads after
/// construction.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new() -> Self {
        Self {
            gradients: (0..POINT_COUNT).map(|_| rng::random_unit_vector()).collect(),
            perm_x: generate_perm(),
            perm_y: generate_perm(),
            perm_z: generate_perm(),
        }
    }

    /// Smoothed gradient noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *corner = self.gradients[index];
                }
            }
        }

        interpolate(&corners, u, v, w)
    }

    /// Absolute value of summed octaves with halving weights and doubling
    /// frequencies.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

/// Fisher-Yates shuffle of the identity permutation.
fn generate_perm() -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    for i in (1..POINT_COUNT).rev() {
        let target = rng::random_index(i);
        perm.swap(i, target);
    }
    perm
}

/// Trilinear interpolation of corner-gradient dot products with Hermite
/// smoothing.
fn interpolate(corners: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);
    let mut accum = 0.0;

    for (i, plane) in corners.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let fi = i as f32;
                let fj = j as f32;
                let fk = k as f32;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }

    accum
}
