// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid over a fixed region, bucketing segment keys by the cells the
//! segments pass through.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::cell;
use crate::error::GridError;
use crate::geometry::{interior_segment, padded_box_segment_intersections, unlerp};

/// Fraction of a cell's size by which cell boxes are padded when looking for
/// the side a segment leaves through.
const EDGE_SLACK: f64 = 1e-9;

/// Uniform grid range index for 2D line segments.
///
/// The grid covers a fixed region split into `columns × rows` equally sized
/// cells. Each inserted segment is clipped to the region and its key is
/// registered in every cell the clipped segment passes through. A range
/// query unions the buckets of all cells overlapped by the query box.
///
/// Query results are a conservative candidate set: callers re-check exact
/// geometry on the returned keys.
///
/// The intended usage is a bulk-build phase followed by read-only queries;
/// `&SegmentGrid` may be shared across threads once insertion is done.
#[derive(Clone)]
pub struct SegmentGrid<K> {
    region: Rect,
    cell_width: f64,
    cell_height: f64,
    columns: usize,
    rows: usize,
    // buckets[column + row * columns]
    buckets: Vec<Bucket<K>>,
}

#[derive(Clone)]
struct Bucket<K> {
    keys: SmallVec<[K; 4]>,
}

impl<K> Default for Bucket<K> {
    fn default() -> Self {
        Self {
            keys: SmallVec::new(),
        }
    }
}

impl<K> Debug for SegmentGrid<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let entries: usize = self.buckets.iter().map(|b| b.keys.len()).sum();
        let occupied = self.buckets.iter().filter(|b| !b.keys.is_empty()).count();
        f.debug_struct("SegmentGrid")
            .field("region", &self.region)
            .field("cell_width", &self.cell_width)
            .field("cell_height", &self.cell_height)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("entries", &entries)
            .field("occupied_cells", &occupied)
            .finish_non_exhaustive()
    }
}

impl<K> SegmentGrid<K> {
    /// Create an empty grid covering `region`.
    ///
    /// Cell sizes larger than the region are shrunk to the region's
    /// dimensions, so each axis has at least one cell. The column and row
    /// counts are the region extent divided by the cell size, rounded up.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if either cell size is not strictly positive,
    /// if the region does not have a finite, strictly positive width and
    /// height, or if the resulting cell table would be too large to address.
    pub fn new(region: Rect, cell_width: f64, cell_height: f64) -> Result<Self, GridError> {
        if cell_width.is_nan() || cell_width <= 0.0 {
            return Err(GridError::InvalidCellWidth(cell_width));
        }
        if cell_height.is_nan() || cell_height <= 0.0 {
            return Err(GridError::InvalidCellHeight(cell_height));
        }
        let region_width = region.width();
        if !region_width.is_finite() || region_width <= 0.0 {
            return Err(GridError::InvalidRegionWidth(region_width));
        }
        let region_height = region.height();
        if !region_height.is_finite() || region_height <= 0.0 {
            return Err(GridError::InvalidRegionHeight(region_height));
        }

        let cell_width = cell_width.min(region_width);
        let cell_height = cell_height.min(region_height);
        let columns = axis_len(region_width, cell_width);
        let rows = axis_len(region_height, cell_height);

        let too_large = GridError::TooManyCells { columns, rows };
        if i32::try_from(columns).is_err() || i32::try_from(rows).is_err() {
            return Err(too_large);
        }
        let cell_count = columns.checked_mul(rows).ok_or(too_large)?;

        let mut buckets = Vec::new();
        buckets.resize_with(cell_count, Bucket::default);

        tracing::debug!(
            columns,
            rows,
            cell_width,
            cell_height,
            "created segment grid"
        );

        Ok(Self {
            region,
            cell_width,
            cell_height,
            columns,
            rows,
            buckets,
        })
    }

    /// The region covered by the grid.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Effective cell width (after clamping to the region width).
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Effective cell height (after clamping to the region height).
    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Number of cell columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Map a point to its `(column, row)` grid coordinates.
    ///
    /// This is not bounds-checked: points on the region's maximum edges or
    /// outside the region map outside `0..columns` / `0..rows`. Use
    /// [`clamp_coordinates`][Self::clamp_coordinates] before addressing cells.
    pub fn grid_coordinates(&self, p: Point) -> (i32, i32) {
        (
            cell::cell_coord(p.x, self.region.x0, self.cell_width),
            cell::cell_coord(p.y, self.region.y0, self.cell_height),
        )
    }

    /// Clamp grid coordinates into the valid cell range.
    pub fn clamp_coordinates(&self, (col, row): (i32, i32)) -> (usize, usize) {
        (
            cell::clamp_index(col, self.columns),
            cell::clamp_index(row, self.rows),
        )
    }

    /// Bounding box of the cell at `(col, row)`.
    ///
    /// Coordinates outside the grid are allowed and describe the virtual
    /// cell at that position.
    ///
    /// Adjacent cells share their boundary coordinates exactly.
    pub fn cell_bounding_box(&self, col: i32, row: i32) -> Rect {
        let (col, row) = (f64::from(col), f64::from(row));
        Rect::new(
            self.column_edge(col),
            self.row_edge(row),
            self.column_edge(col + 1.0),
            self.row_edge(row + 1.0),
        )
    }

    /// Center of the cell at `(col, row)`.
    pub fn cell_center(&self, col: i32, row: i32) -> Point {
        Point::new(
            self.region.x0 + (f64::from(col) + 0.5) * self.cell_width,
            self.region.y0 + (f64::from(row) + 0.5) * self.cell_height,
        )
    }

    /// Keys registered in the cell at `(col, row)`, or `None` outside the grid.
    pub fn items_in_cell(&self, col: usize, row: usize) -> Option<&[K]> {
        if col >= self.columns || row >= self.rows {
            return None;
        }
        Some(&self.buckets[col + row * self.columns].keys)
    }

    /// Iterate over all cells as `((column, row), keys)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &[K])> + '_ {
        let columns = self.columns;
        self.buckets
            .iter()
            .enumerate()
            .map(move |(i, b)| ((i % columns, i / columns), b.keys.as_slice()))
    }

    fn column_edge(&self, col: f64) -> f64 {
        self.region.x0 + col * self.cell_width
    }

    fn row_edge(&self, row: f64) -> f64 {
        self.region.y0 + row * self.cell_height
    }

    /// Clamped cell whose bounding box contains `p`.
    ///
    /// [`grid_coordinates`][Self::grid_coordinates] divides while
    /// [`cell_bounding_box`][Self::cell_bounding_box] multiplies, and the two
    /// can round to different cells for points on a grid line. The floor
    /// mapping is stepped by one cell until it agrees with the boxes. When
    /// `p` lies on a boundary shared by two cells, the cell `heading` points
    /// into is preferred.
    fn locate(&self, p: Point, heading: Vec2) -> (i32, i32) {
        let (col, row) = self.grid_coordinates(p);
        let mut col = cell::clamp_coord(col, self.columns);
        let mut row = cell::clamp_coord(row, self.rows);
        let last_col = cell::last_coord(self.columns);
        let last_row = cell::last_coord(self.rows);
        while col > 0 && p.x < self.column_edge(f64::from(col)) {
            col -= 1;
        }
        while col < last_col && p.x > self.column_edge(f64::from(col) + 1.0) {
            col += 1;
        }
        while row > 0 && p.y < self.row_edge(f64::from(row)) {
            row -= 1;
        }
        while row < last_row && p.y > self.row_edge(f64::from(row) + 1.0) {
            row += 1;
        }

        if heading.x < 0.0 && col > 0 && p.x <= self.column_edge(f64::from(col)) {
            col -= 1;
        } else if heading.x > 0.0 && col < last_col && p.x >= self.column_edge(f64::from(col) + 1.0)
        {
            col += 1;
        }
        if heading.y < 0.0 && row > 0 && p.y <= self.row_edge(f64::from(row)) {
            row -= 1;
        } else if heading.y > 0.0 && row < last_row && p.y >= self.row_edge(f64::from(row) + 1.0)
        {
            row += 1;
        }
        (col, row)
    }

    fn bucket_mut(&mut self, col: i32, row: i32) -> &mut SmallVec<[K; 4]> {
        let col = cell::clamp_index(col, self.columns);
        let row = cell::clamp_index(row, self.rows);
        &mut self.buckets[col + row * self.columns].keys
    }

    /// Cell range covered by `rect`, clamped to the grid.
    fn clamped_range(&self, rect: Rect) -> ((usize, usize), (usize, usize)) {
        let (c0, r0) = self.clamp_coordinates(self.locate(rect.origin(), Vec2::ZERO));
        let (c1, r1) =
            self.clamp_coordinates(self.locate(Point::new(rect.x1, rect.y1), Vec2::ZERO));
        let cols = if c0 <= c1 { (c0, c1) } else { (c1, c0) };
        let rows = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
        (cols, rows)
    }
}

impl<K: Copy> SegmentGrid<K> {
    /// Register `key` in every cell the part of `segment` inside the region
    /// passes through.
    ///
    /// Segments with no interior overlap with the region are ignored. A
    /// degenerate segment inside the region is registered in the single cell
    /// containing its point.
    ///
    /// The walk starts in the cell containing the first interior point (on a
    /// grid line, the cell the segment heads into) and repeatedly steps through one of the current cell's sides crossed by
    /// the remaining segment, choosing the neighbour whose center is strictly
    /// closer to the interior end point. It stops when no neighbour is closer
    /// or the end point is reached. When several neighbours are equally
    /// close, the side tested first wins, in bottom, right, top, left order.
    pub fn insert(&mut self, key: K, segment: Line) {
        let Some(interior) = interior_segment(self.region, segment) else {
            tracing::trace!(?segment, "segment outside grid region, skipped");
            return;
        };
        let Line {
            p0: start,
            p1: end,
        } = interior;

        let (mut col, mut row) = self.locate(start, end - start);

        if start == end {
            self.bucket_mut(col, row).push(key);
            return;
        }

        let slack = Vec2::new(self.cell_width * EDGE_SLACK, self.cell_height * EDGE_SLACK);
        let mut current = start;
        let mut visited = 0_usize;
        while unlerp(start, end, current) < 1.0 {
            self.bucket_mut(col, row).push(key);
            visited += 1;

            let here = (end - self.cell_center(col, row)).hypot2();
            let mut best: Option<(f64, Point, i32, i32)> = None;
            let crossings = padded_box_segment_intersections(
                self.cell_bounding_box(col, row),
                Line::new(current, end),
                slack,
            );
            for crossing in crossings {
                let next_col = col + crossing.dx;
                let next_row = row + crossing.dy;
                if !cell::in_range(next_col, self.columns) || !cell::in_range(next_row, self.rows)
                {
                    continue;
                }
                let d = (end - self.cell_center(next_col, next_row)).hypot2();
                let best_d = best.map_or(here, |b| b.0);
                if d < best_d {
                    best = Some((d, crossing.point, next_col, next_row));
                }
            }

            let Some((_, point, next_col, next_row)) = best else {
                break;
            };
            // Crossings land on the padding; pull the position into the entered cell.
            let next_box = self.cell_bounding_box(next_col, next_row);
            current = Point::new(
                point.x.clamp(next_box.x0, next_box.x1),
                point.y.clamp(next_box.y0, next_box.y1),
            );
            col = next_col;
            row = next_row;
        }

        tracing::trace!(cells = visited, "indexed segment");
    }

    /// Visit every key registered in the cells overlapped by `rect`.
    ///
    /// The corners of `rect` are mapped to grid coordinates and clamped to the
    /// grid, so a box outside the region visits the nearest edge cells. Keys
    /// registered in several of the visited cells are reported once per cell.
    pub fn visit_rect<F: FnMut(K)>(&self, rect: Rect, mut f: F) {
        let ((c0, c1), (r0, r1)) = self.clamped_range(rect);
        for row in r0..=r1 {
            for bucket in &self.buckets[c0 + row * self.columns..=c1 + row * self.columns] {
                for &key in &bucket.keys {
                    f(key);
                }
            }
        }
    }
}

impl<K: Copy + Eq + Hash> SegmentGrid<K> {
    /// Create a grid and insert every `(key, segment)` pair.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`new`][Self::new].
    pub fn with_segments<I>(
        region: Rect,
        cell_width: f64,
        cell_height: f64,
        segments: I,
    ) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (K, Line)>,
    {
        let mut grid = Self::new(region, cell_width, cell_height)?;
        for (key, segment) in segments {
            grid.insert(key, segment);
        }
        Ok(grid)
    }

    /// Candidate keys whose segments may intersect `rect`.
    ///
    /// Returns the union of the buckets of every cell overlapped by `rect`
    /// (see [`visit_rect`][Self::visit_rect] for how the cell range is chosen).
    pub fn query(&self, rect: Rect) -> HashSet<K> {
        let mut out = HashSet::new();
        self.visit_rect(rect, |key| {
            out.insert(key);
        });
        out
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Cell counts are positive; oversized grids saturate and are rejected by the caller."
)]
fn axis_len(extent: f64, cell_size: f64) -> usize {
    ((extent / cell_size).ceil() as usize).max(1)
}
