//! Random number generation for sampling.
//!
//! Each worker thread owns a ChaCha20 generator, created lazily on first
//! use and seeded from OS entropy mixed with a high-resolution clock.
//! Nothing is shared or locked across threads.

use std::cell::RefCell;
use std::f32::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

use cinder_math::Vec3;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

thread_local! {
    static RNG: RefCell<ChaCha20Rng> = RefCell::new(fresh_rng());
}

fn fresh_rng() -> ChaCha20Rng {
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64);
    ChaCha20Rng::seed_from_u64(rand::rng().next_u64() ^ clock)
}

/// Uniform f32 in [0, 1).
pub fn random_f32() -> f32 {
    RNG.with(|rng| rng.borrow_mut().random())
}

/// Uniform f32 in [min, max).
pub fn random_range(min: f32, max: f32) -> f32 {
    min + (max - min) * random_f32()
}

/// Uniform integer in [0, max], inclusive.
pub fn random_index(max: usize) -> usize {
    RNG.with(|rng| rng.borrow_mut().random_range(0..=max))
}

/// Uniformly distributed point on the unit sphere.
pub fn random_unit_vector() -> Vec3 {
    let z = random_range(-1.0, 1.0);
    let a = random_range(0.0, 2.0 * PI);
    let r = (1.0 - z * z).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Random color with components in [0, 1).
pub fn random_color() -> Vec3 {
    Vec3::new(random_f32(), random_f32(), random_f32())
}

/// Random color with components in [min, max).
pub fn random_color_range(min: f32, max: f32) -> Vec3 {
    Vec3::new(
        random_range(min, max),
        random_range(min, max),
        random_range(min, max),
    )
}
