//! Geometry primitives for OCR bounding boxes
//!
//! Boxes arrive in source-image pixel space and are mapped into display
//! space with a scale captured once per session from the first frame.

use serde::{Deserialize, Serialize};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a full display of the given size
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether the point lies inside, half-open on both axes: origin-side
    /// edges are inside, far edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Whether the two rectangles share a region of positive area.
    /// Edge-touching rectangles do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Scale origin and size by independent per-axis ratios
    pub fn scaled(&self, x_ratio: f32, y_ratio: f32) -> Rect {
        Rect::new(
            self.x * x_ratio,
            self.y * y_ratio,
            self.width * x_ratio,
            self.height * y_ratio,
        )
    }
}

/// Per-session scale from source-image pixel space into display space.
///
/// Derived from the first frame of a session; capture resolution is assumed
/// constant for the session's lifetime, so the ratios are reused for every
/// subsequent frame rather than re-derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScale {
    x_ratio: f32,
    y_ratio: f32,
}

impl FrameScale {
    /// The identity mapping, used until a reference image size is known
    pub const IDENTITY: FrameScale = FrameScale {
        x_ratio: 1.0,
        y_ratio: 1.0,
    };

    /// Scale that maps boxes from `image`-sized frames onto a `display`-sized
    /// surface
    pub fn between(image: Size, display: Size) -> Self {
        Self {
            x_ratio: display.width / image.width,
            y_ratio: display.height / image.height,
        }
    }

    /// Map a source-image box into display space
    pub fn map(&self, rect: Rect) -> Rect {
        rect.scaled(self.x_ratio, self.y_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);

        assert!(rect.contains(Point::new(10.0, 10.0)), "origin edge is inside");
        assert!(rect.contains(Point::new(29.9, 29.9)));
        assert!(!rect.contains(Point::new(30.0, 15.0)), "far edge is outside");
        assert!(!rect.contains(Point::new(15.0, 30.0)));
        assert!(!rect.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 5.0, 5.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersects_edge_touching_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_intersects_self() {
        let a = Rect::new(3.0, 4.0, 5.0, 6.0);
        assert!(a.intersects(&a));
    }

    #[test]
    fn test_frame_scale_between() {
        // 1920x1080 capture mapped onto a 960x540 display halves everything
        let scale = FrameScale::between(Size::new(1920.0, 1080.0), Size::new(960.0, 540.0));
        let mapped = scale.map(Rect::new(100.0, 200.0, 40.0, 20.0));

        assert_eq!(mapped, Rect::new(50.0, 100.0, 20.0, 10.0));
    }

    #[test]
    fn test_frame_scale_independent_axes() {
        let scale = FrameScale::between(Size::new(1000.0, 500.0), Size::new(500.0, 500.0));
        let mapped = scale.map(Rect::new(100.0, 100.0, 10.0, 10.0));

        assert_eq!(mapped, Rect::new(50.0, 100.0, 5.0, 10.0));
    }

    #[test]
    fn test_identity_scale() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(FrameScale::IDENTITY.map(rect), rect);
    }
}
