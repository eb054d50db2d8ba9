//! Axis-aligned bounding boxes
//!
//! Broad-phase primitive for the lane geometry. Boxes are immutable after
//! construction; `min <= max` componentwise is a precondition, not something
//! checked defensively.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Vec2,
    max: Vec2,
}

impl BoundingBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y,
            "malformed bounding box: min {min:?} max {max:?}"
        );
        Self { min, max }
    }

    /// Tight box around a set of points. Returns `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Closed-interval containment: points on the boundary count
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.x <= self.max.x
            && point.y <= self.max.y
    }

    /// Interval-overlap test on both axes; boxes that only touch still
    /// intersect
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        other.min.x <= self.max.x
            && other.max.x >= self.min.x
            && other.min.y <= self.max.y
            && other.max.y >= self.min.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size() / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Smallest box enclosing both operands
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
