//! Axis-aligned rectangles.
//!
//! [`Rect`] is used for camera viewports, sprite bounds, and culling. All
//! comparisons are strict: rectangles that merely share an edge do not
//! intersect, and a point on the border is not contained.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its minimum corner and its size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum x coordinate.
    pub x: f32,
    /// Minimum y coordinate.
    pub y: f32,
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its minimum corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from a minimum corner and a size vector.
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// The minimum corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The size as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// The centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns `true` if `self` and `other` overlap at any point.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Returns `true` if `other` lies wholly inside `self`.
    #[must_use]
    pub fn contains(&self, other: &Rect) -> bool {
        self.x < other.x
            && self.x + self.width > other.x + other.width
            && self.y < other.y
            && self.y + self.height > other.y + other.height
    }

    /// Returns `true` if `point` lies strictly inside `self`.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.x < point.x
            && self.x + self.width > point.x
            && self.y < point.y
            && self.y + self.height > point.y
    }
}
