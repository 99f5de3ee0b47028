use crate::{Interval, Ray, Vec3};

/// Minimum extent of any AABB axis. Degenerate boxes (planar primitives)
/// are padded symmetrically so the slab test never divides a zero-width
/// span.
const MIN_EXTENT: f32 = 2e-4;

/// Axis-aligned bounding box stored as one [`Interval`] per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Build a box from per-axis intervals. Each interval must be ordered.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        debug_assert!(x.min <= x.max && y.min <= y.max && z.min <= z.max);
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Build a box spanning two corner points, in either order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// The component-wise hull of two boxes.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Interval of the given axis (0 = X, 1 = Y, 2 = Z).
    pub fn axis_interval(&self, axis: usize) -> Interval {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Shift the box by an offset vector.
    pub fn offset(&self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.add_scalar(offset.x),
            y: self.y.add_scalar(offset.y),
            z: self.z.add_scalar(offset.z),
        }
    }

    /// Slab test: does the ray pass through the box within `ray_t`?
    ///
    /// Tightens the interval one axis at a time and rejects as soon as it
    /// becomes empty.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv = 1.0 / ray.direction[axis];

            let mut t0 = (slab.min - ray.origin[axis]) * inv;
            let mut t1 = (slab.max - ray.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Index of the axis with the largest extent, ties broken x > y > z.
    pub fn longest_axis(&self) -> usize {
        let x = self.x.size();
        let y = self.y.size();
        let z = self.z.size();

        if x >= y && x >= z {
            0
        } else if y >= z {
            1
        } else {
            2
        }
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }
}
