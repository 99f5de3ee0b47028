//! Bounding volume hierarchy.
//!
//! A binary tree built top-down over the scene's hittables. Leaves are
//! represented by a node whose two children are the same object, so
//! traversal never special-cases leaf nodes.

use std::cmp::Ordering;
use std::sync::Arc;

use cinder_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a hierarchy over the given objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        assert!(!objects.is_empty(), "cannot build a BVH over an empty scene");
        Self::build(&mut objects)
    }

    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        // Split along the longest axis of the slice's combined bounds.
        let mut bounds = objects[0].bounding_box();
        for object in objects[1..].iter() {
            bounds = Aabb::surrounding(&bounds, &object.bounding_box());
        }
        let axis = bounds.longest_axis();

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            len => {
                objects.sort_unstable_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
                });

                let (lower, upper) = objects.split_at_mut(len / 2);
                (
                    Arc::new(Self::build(lower)) as Arc<dyn Hittable>,
                    Arc::new(Self::build(upper)) as Arc<dyn Hittable>,
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self { left, right, bbox }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let left_hit = self.left.hit(ray, ray_t);

        // A left hit tightens the right query so the commonly-closer
        // subtree short-circuits the other.
        let right_t = match &left_hit {
            Some(rec) => ray_t.shrink_max(rec.t),
            None => ray_t,
        };
        let right_hit = self.right.hit(ray, right_t);

        right_hit.or(left_hit)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
