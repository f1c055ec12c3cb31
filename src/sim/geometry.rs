//! Axis-aligned rectangle geometry
//!
//! Every collidable in the arena (ball, paddle, bricks, pickups, laser
//! bolts) resolves through the same AABB overlap test.

use glam::Vec2;

/// An axis-aligned rectangle in arena space (origin top-left, Y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect from its center point
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Standard AABB overlap test: two rectangles overlap unless one is
/// entirely above, below, left of, or right of the other. Touching edges
/// count as overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.bottom() < b.top() || a.top() > b.bottom() || a.right() < b.left() || a.left() > b.right())
}
