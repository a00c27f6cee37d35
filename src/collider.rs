//! Axis-aligned rectangle used for actor overlap tests.
//!
//! A [`Collider`] is stored relative to its owning actor: `x`/`y` are an
//! offset from the actor position, `w`/`h` the extent. Use [`Collider::at`]
//! to get the world-space rectangle for a given actor position.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collider {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Collider {
    /// Create a collider with a given size and no offset.
    pub fn new(w: f32, h: f32) -> Self {
        Self { x: 0.0, y: 0.0, w, h }
    }

    /// Create a collider with a size and an offset.
    pub fn with_offset(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.w = size.x;
        self.h = size.y;
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Move the rectangle so its center lands on `center`.
    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    /// Smallest x. Handles negative widths.
    pub fn left(&self) -> f32 {
        self.x.min(self.x + self.w)
    }

    pub fn right(&self) -> f32 {
        self.x.max(self.x + self.w)
    }

    /// Smallest y (y grows downwards).
    pub fn top(&self) -> f32 {
        self.y.min(self.y + self.h)
    }

    pub fn bottom(&self) -> f32 {
        self.y.max(self.y + self.h)
    }

    /// World-space copy of this collider for an actor at `position`.
    pub fn at(&self, position: Vec2) -> Self {
        Self {
            x: self.x + position.x,
            y: self.y + position.y,
            ..*self
        }
    }

    /// AABB vs AABB overlap test. Touching edges do not count.
    pub fn overlaps(&self, other: &Collider) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, edges inclusive.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_rects() {
        let a = Collider::new(10.0, 10.0);
        let b = Collider::with_offset(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Collider::new(10.0, 10.0);
        let b = Collider::with_offset(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_vertically_separated() {
        let a = Collider::new(10.0, 10.0);
        let b = Collider::with_offset(0.0, 20.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_negative_size_is_normalized() {
        let a = Collider::with_offset(10.0, 10.0, -10.0, -10.0);
        assert_eq!(a.left(), 0.0);
        assert_eq!(a.right(), 10.0);
        assert_eq!(a.top(), 0.0);
        assert_eq!(a.bottom(), 10.0);
        assert!(a.overlaps(&Collider::with_offset(5.0, 5.0, 1.0, 1.0)));
    }

    #[test]
    fn test_at_translates_offset() {
        let c = Collider::with_offset(2.0, 3.0, 4.0, 5.0).at(Vec2::new(10.0, 20.0));
        assert_eq!(c, Collider::with_offset(12.0, 23.0, 4.0, 5.0));
    }

    #[test]
    fn test_center_roundtrip() {
        let mut c = Collider::new(4.0, 2.0);
        c.set_center(Vec2::new(10.0, 10.0));
        assert_eq!(c.position(), Vec2::new(8.0, 9.0));
        assert_eq!(c.center(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_contains_point() {
        let c = Collider::new(10.0, 10.0);
        assert!(c.contains_point(Vec2::new(10.0, 0.0)));
        assert!(!c.contains_point(Vec2::new(10.1, 0.0)));
    }
}
