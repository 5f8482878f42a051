// Axis-aligned label boxes in canvas space.
//
// Text is anchored at its bottom-left corner (the baseline start), so a box
// built from an anchor keeps `top` at the anchor's y and `bottom` one text
// height above it on screen. Canvas y grows downward, which makes `bottom`
// numerically smaller than `top`. All comparisons go through the normalized
// min/max accessors so either corner order works.

use crate::text_metrics::TextSize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl LabelBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box of `size` whose bottom-left text anchor sits at `anchor`:
    /// `(x, y, x + width, y - height)`.
    pub fn from_anchor(anchor: Point, size: TextSize) -> Self {
        Self::new(
            anchor.x,
            anchor.y,
            anchor.x + size.width,
            anchor.y - size.height,
        )
    }

    pub fn min_x(&self) -> f32 {
        self.left.min(self.right)
    }

    pub fn max_x(&self) -> f32 {
        self.left.max(self.right)
    }

    pub fn min_y(&self) -> f32 {
        self.top.min(self.bottom)
    }

    pub fn max_y(&self) -> f32 {
        self.top.max(self.bottom)
    }

    pub fn width(&self) -> f32 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f32 {
        self.max_y() - self.min_y()
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Inclusive containment; points on the border count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }
}

/// Area shared by the interiors of two boxes. Touching edges share nothing.
pub fn overlap_area(a: &LabelBox, b: &LabelBox) -> f32 {
    let overlap_x = a.max_x().min(b.max_x()) - a.min_x().max(b.min_x());
    let overlap_y = a.max_y().min(b.max_y()) - a.min_y().max(b.min_y());
    if overlap_x > 0.0 && overlap_y > 0.0 {
        overlap_x * overlap_y
    } else {
        0.0
    }
}

/// True when the two boxes share interior area. Covers an edge poking
/// into the other box as well as full containment either way. Boxes
/// without area never intersect.
pub fn intersects(a: &LabelBox, b: &LabelBox) -> bool {
    overlap_area(a, b) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchored(x: f32, y: f32, w: f32, h: f32) -> LabelBox {
        LabelBox::from_anchor(Point::new(x, y), TextSize::new(w, h))
    }

    #[test]
    fn from_anchor_uses_bottom_left_convention() {
        let b = anchored(10.0, 50.0, 30.0, 30.0);
        assert_eq!(b, LabelBox::new(10.0, 50.0, 40.0, 20.0));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = anchored(0.0, 20.0, 10.0, 10.0);
        let b = anchored(30.0, 20.0, 10.0, 10.0);
        assert!(!intersects(&a, &b));
        let c = anchored(0.0, 60.0, 10.0, 10.0);
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn left_edge_inside_intersects() {
        let a = anchored(0.0, 20.0, 20.0, 10.0);
        let b = anchored(15.0, 25.0, 20.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn containment_intersects_both_ways() {
        let outer = anchored(0.0, 100.0, 100.0, 100.0);
        let inner = anchored(40.0, 60.0, 10.0, 10.0);
        assert!(intersects(&outer, &inner));
        assert!(intersects(&inner, &outer));
        assert_eq!(overlap_area(&outer, &inner), 100.0);
    }

    #[test]
    fn cross_shaped_overlap_intersects() {
        // Neither box has a corner inside the other.
        let wide = LabelBox::new(0.0, 30.0, 100.0, 20.0);
        let tall = LabelBox::new(40.0, 100.0, 50.0, 0.0);
        assert!(intersects(&wide, &tall));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = anchored(0.0, 20.0, 10.0, 10.0);
        let b = anchored(10.0, 20.0, 10.0, 10.0);
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn zero_sized_boxes_never_intersect() {
        let big = anchored(0.0, 100.0, 100.0, 100.0);
        let flat = anchored(10.0, 50.0, 20.0, 0.0);
        let thin = anchored(10.0, 50.0, 0.0, 20.0);
        assert!(flat.is_degenerate());
        assert!(!intersects(&big, &flat));
        assert!(!intersects(&thin, &big));
    }

    #[test]
    fn contains_is_inclusive() {
        let b = LabelBox::new(10.0, 50.0, 40.0, 20.0);
        assert!(b.contains(Point::new(20.0, 30.0)));
        assert!(b.contains(Point::new(10.0, 20.0)));
        assert!(b.contains(Point::new(40.0, 50.0)));
        assert!(!b.contains(Point::new(5.0, 30.0)));
        assert!(!b.contains(Point::new(41.0, 30.0)));
        assert!(!b.contains(Point::new(20.0, 51.0)));
    }
}
