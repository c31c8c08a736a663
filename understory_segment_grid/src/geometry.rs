// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateless geometric helpers used by the grid: segment intersection,
//! parametric interpolation, box-edge crossings, and clipping.
//!
//! Boxes are [`Rect`]s with `(x0, y0)` as the minimum corner and `(x1, y1)`
//! as the maximum corner. Unlike [`Rect::contains`], containment here is
//! inclusive on all four sides.

use kurbo::{Line, Point, Rect, Vec2};
use smallvec::SmallVec;

/// One crossing between a box side and a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxIntersection {
    /// The crossing point.
    pub point: Point,
    /// Column step to the cell on the other side of the crossed side.
    pub dx: i32,
    /// Row step to the cell on the other side of the crossed side.
    pub dy: i32,
}

/// Whether `p` lies inside `rect` or on its boundary.
#[inline]
pub fn contains_inclusive(rect: Rect, p: Point) -> bool {
    rect.x0 <= p.x && rect.y0 <= p.y && p.x <= rect.x1 && p.y <= rect.y1
}

/// Intersection point of two segments, endpoints included.
///
/// Parallel and collinear segments report no intersection.
pub fn segment_intersection(a: Line, b: Line) -> Option<Point> {
    let ab = a.p1 - a.p0;
    let cd = b.p1 - b.p0;
    let denom = ab.cross(cd);
    if denom == 0.0 {
        return None;
    }
    let ac = b.p0 - a.p0;
    let t = ac.cross(cd) / denom;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let u = ac.cross(ab) / denom;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(a.p0 + ab * t)
}

/// Returns `t` such that `p = a + t * (b - a)`, assuming `p` is on the line.
///
/// Interpolates along the axis with the larger delta (y on ties) so that
/// near-vertical and near-horizontal segments stay well conditioned. `a` and
/// `b` must differ.
#[inline]
pub fn unlerp(a: Point, b: Point, p: Point) -> f64 {
    if (b.x - a.x).abs() > (b.y - a.y).abs() {
        (p.x - a.x) / (b.x - a.x)
    } else {
        (p.y - a.y) / (b.y - a.y)
    }
}

/// All crossings between `segment` and the four sides of `rect`.
///
/// Sides are tested in bottom, right, top, left order, which is also the
/// order of the returned crossings. A segment through a corner reports one
/// crossing per side meeting at that corner.
pub fn box_segment_intersections(rect: Rect, segment: Line) -> SmallVec<[BoxIntersection; 4]> {
    padded_box_segment_intersections(rect, segment, Vec2::ZERO)
}

/// Like [`box_segment_intersections`], with each side of `rect` pushed
/// outwards by `pad` and lengthened by `pad` past both of its ends.
///
/// Because the sides overlap near the corners, a segment leaving through a
/// corner crosses at least one of them even after rounding.
pub fn padded_box_segment_intersections(
    rect: Rect,
    segment: Line,
    pad: Vec2,
) -> SmallVec<[BoxIntersection; 4]> {
    let (x0, y0) = (rect.x0 - pad.x, rect.y0 - pad.y);
    let (x1, y1) = (rect.x1 + pad.x, rect.y1 + pad.y);
    let sides = [
        (Line::new((x0 - pad.x, y0), (x1 + pad.x, y0)), 0, -1),
        (Line::new((x1, y0 - pad.y), (x1, y1 + pad.y)), 1, 0),
        (Line::new((x1 + pad.x, y1), (x0 - pad.x, y1)), 0, 1),
        (Line::new((x0, y1 + pad.y), (x0, y0 - pad.y)), -1, 0),
    ];
    sides
        .into_iter()
        .filter_map(|(side, dx, dy)| {
            segment_intersection(segment, side).map(|point| BoxIntersection { point, dx, dy })
        })
        .collect()
}

/// Clip `segment` to the portion lying inside `region`.
///
/// Returns `None` when the segment has no interior overlap with the region.
/// A degenerate segment is kept only if its point lies inside the region. A
/// segment that merely touches the region at one of its own endpoints is
/// discarded; one that grazes a corner elsewhere yields a degenerate
/// interior.
pub fn interior_segment(region: Rect, segment: Line) -> Option<Line> {
    let Line { p0: a, p1: b } = segment;

    if a == b {
        return contains_inclusive(region, a).then_some(segment);
    }

    let mut candidates: SmallVec<[Point; 6]> = box_segment_intersections(region, segment)
        .into_iter()
        .map(|i| i.point)
        .collect();
    if contains_inclusive(region, a) {
        candidates.push(a);
    }
    if contains_inclusive(region, b) {
        candidates.push(b);
    }

    let mut min: (f64, Option<Point>) = (1.0, None);
    let mut max: (f64, Option<Point>) = (0.0, None);
    for p in candidates {
        let t = unlerp(a, b, p);
        if t < min.0 {
            min = (t, Some(p));
        }
        if t > max.0 {
            max = (t, Some(p));
        }
    }

    match (min, max) {
        ((t0, Some(p0)), (t1, Some(p1))) if t0 < 1.0 && t1 > 0.0 => {
            debug_assert!(t0 <= t1, "clipped interval must be ordered");
            Some(Line::new(p0, p1))
        }
        _ => None,
    }
}
