//! Contour discovery: trace every boundary in a binary edge map.
//!
//! ## Why keep holes?
//!
//! A hand-drawn "B" or "8" produces an outer boundary *and* one inner
//! boundary per enclosed loop. Border following (Suzuki–Abe, as implemented
//! by `imageproc::contours`) reports all of them with their nesting
//! relationship. We keep every one as an independent [`Contour`]: the
//! fragment merger reunites them per grid cell later, so discarding inner
//! boundaries here would only lose information.
//!
//! ## Ordering
//!
//! Contours are returned by descending enclosed area. The sort is stable, so
//! equal areas keep the tracer's raster discovery order and two runs over the
//! same edge map always produce the same sequence.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Integer pixel coordinate.
pub type Point = imageproc::point::Point<i32>;

/// Axis-aligned bounding box in pixel coordinates.
///
/// `width`/`height` count pixels inclusively, so a box built from a single
/// point is 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, or `None` for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in iter {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Self::new(
            x0,
            y0,
            (x1 - x0) as u32 + 1,
            (y1 - y0) as u32 + 1,
        ))
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        BoundingBox::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Integer center, `(x + w/2, y + h/2)` with floor division.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with a `width x height` image rectangle anchored at the origin.
    pub fn clip_to(&self, width: u32, height: u32) -> BoundingBox {
        let x0 = self.x.clamp(0, width as i32);
        let y0 = self.y.clamp(0, height as i32);
        let x1 = self.right().clamp(0, width as i32);
        let y1 = self.bottom().clamp(0, height as i32);
        BoundingBox::new(x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32)
    }
}

/// A traced boundary curve.
///
/// Immutable once built; derived attributes are computed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    id: usize,
    points: Vec<Point>,
    area: f64,
    bbox: BoundingBox,
    is_hole: bool,
    parent: Option<usize>,
}

impl Contour {
    /// Build a contour from its traced points. Returns `None` for an empty
    /// point list, which has no bounding box.
    pub fn new(
        id: usize,
        points: Vec<Point>,
        is_hole: bool,
        parent: Option<usize>,
    ) -> Option<Self> {
        let bbox = BoundingBox::from_points(&points)?;
        let area = polygon_area(&points);
        Some(Self {
            id,
            points,
            area,
            bbox,
            is_hole,
            parent,
        })
    }

    /// Position in the tracer's discovery order.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Enclosed area (absolute shoelace area of the closed polygon).
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Whether this boundary is the inside edge of a hole.
    pub fn is_hole(&self) -> bool {
        self.is_hole
    }

    /// Discovery id of the enclosing boundary, if any.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

/// Shoelace area of the polygon closed from the last point back to the first.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    twice.abs() as f64 / 2.0
}

/// Trace every outer and hole boundary in `edges` (non-zero = foreground),
/// ordered by descending area with ties in discovery order.
pub fn extract_contours(edges: &GrayImage) -> Vec<Contour> {
    let mut contours: Vec<Contour> = find_contours::<i32>(edges)
        .into_iter()
        .enumerate()
        .filter_map(|(id, c)| {
            let is_hole = c.border_type == BorderType::Hole;
            Contour::new(id, c.points, is_hole, c.parent)
        })
        .collect();

    contours.sort_by(|a, b| b.area.total_cmp(&a.area));

    debug!(
        "Traced {} contours ({} holes)",
        contours.len(),
        contours.iter().filter(|c| c.is_hole).count()
    );
    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn bbox_from_single_point_is_one_pixel() {
        let b = BoundingBox::from_points(&[pt(4, 7)]).unwrap();
        assert_eq!(b, BoundingBox::new(4, 7, 1, 1));
        assert!(!b.is_degenerate());
    }

    #[test]
    fn bbox_from_empty_is_none() {
        assert!(BoundingBox::from_points(&[] as &[Point]).is_none());
    }

    #[test]
    fn bbox_union_covers_both() {
        let a = BoundingBox::new(10, 10, 5, 5);
        let b = BoundingBox::new(20, 2, 3, 4);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(10, 2, 13, 13));
    }

    #[test]
    fn bbox_center_uses_floor_division() {
        let b = BoundingBox::new(10, 20, 5, 4);
        assert_eq!(b.center(), (12, 22));
    }

    #[test]
    fn bbox_clip_outside_is_degenerate() {
        let b = BoundingBox::new(-10, -10, 5, 5);
        assert!(b.clip_to(100, 100).is_degenerate());
        let b = BoundingBox::new(90, 90, 20, 20);
        assert_eq!(b.clip_to(100, 100), BoundingBox::new(90, 90, 10, 10));
    }

    #[test]
    fn polygon_area_of_square() {
        let square = [pt(0, 0), pt(10, 0), pt(10, 10), pt(0, 10)];
        assert_eq!(polygon_area(&square), 100.0);
        // Orientation does not matter.
        let reversed: Vec<Point> = square.iter().rev().copied().collect();
        assert_eq!(polygon_area(&reversed), 100.0);
    }

    #[test]
    fn polygon_area_of_line_is_zero() {
        assert_eq!(polygon_area(&[pt(0, 0), pt(5, 5)]), 0.0);
    }

    #[test]
    fn extract_from_blank_map_is_empty() {
        let edges = GrayImage::new(32, 32);
        assert!(extract_contours(&edges).is_empty());
    }

    #[test]
    fn nested_rectangles_are_sorted_by_area() {
        let mut edges = GrayImage::new(100, 100);
        draw_hollow_rect_mut(&mut edges, Rect::at(40, 40).of_size(10, 10), Luma([255]));
        draw_hollow_rect_mut(&mut edges, Rect::at(10, 10).of_size(80, 80), Luma([255]));

        let contours = extract_contours(&edges);
        // Each 1-px ring yields an outer and a hole boundary.
        assert!(contours.len() >= 2);
        for pair in contours.windows(2) {
            assert!(pair[0].area() >= pair[1].area());
        }
        assert_eq!(contours[0].bounding_box(), BoundingBox::new(10, 10, 80, 80));
        assert!(!contours[0].is_hole());
        assert!(contours.iter().any(|c| c.is_hole()));
    }

    #[test]
    fn hole_has_parent() {
        let mut edges = GrayImage::new(40, 40);
        draw_hollow_rect_mut(&mut edges, Rect::at(5, 5).of_size(20, 20), Luma([255]));
        let contours = extract_contours(&edges);
        let hole = contours.iter().find(|c| c.is_hole()).expect("hole boundary");
        assert!(hole.parent().is_some());
    }
}
