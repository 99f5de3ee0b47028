use crate::Vec3;

/// A ray in 3D space with origin, direction, and time.
///
/// The direction is not required to be unit length; callers that need a
/// normalized direction do it themselves. The `time` field places the ray
/// on the shutter interval for motion blur.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Create a ray at time 0.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    /// Point along the ray at parameter t: origin + t * direction.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            time: 0.0,
        }
    }
}
