// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_segment_grid --heading-base-level=0

//! Understory Segment Grid: a uniform grid range index for 2D line segments.
//!
//! The index covers a fixed region with equally sized cells and records, for
//! every inserted segment, the key of that segment in each cell the segment
//! passes through. A range query then unions the buckets of the cells
//! overlapped by a query box, yielding candidate keys without scanning every
//! segment. A typical use is snapping GPS samples to nearby road-network
//! edges.
//!
//! - Build once with [`SegmentGrid::new`] (or [`SegmentGrid::with_segments`]),
//!   then call [`SegmentGrid::insert`] for each `(key, segment)`.
//! - Query with [`SegmentGrid::query`] for a deduplicated set, or
//!   [`SegmentGrid::visit_rect`] to avoid allocating.
//! - Inspect individual cells with [`SegmentGrid::items_in_cell`],
//!   [`SegmentGrid::cell_bounding_box`], and [`SegmentGrid::cell_center`].
//!
//! Geometry comes from [`kurbo`]: segments are [`Line`][kurbo::Line]s, points
//! are [`Point`][kurbo::Point]s, and boxes are [`Rect`][kurbo::Rect]s with
//! `(x0, y0)` as the minimum corner.
//! The clipping and intersection helpers used by the grid are exposed in
//! [`geometry`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Line, Rect};
//! use understory_segment_grid::SegmentGrid;
//!
//! // A 10x10 region split into 2x2 cells.
//! let mut grid = SegmentGrid::new(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, 2.0).unwrap();
//! grid.insert(1_u32, Line::new((1.0, 1.0), (9.0, 9.0)));
//! grid.insert(2_u32, Line::new((1.0, 9.0), (3.0, 9.0)));
//!
//! let near_origin = grid.query(Rect::new(0.0, 0.0, 2.0, 2.0));
//! assert!(near_origin.contains(&1));
//! assert!(!near_origin.contains(&2));
//! ```
//!
//! ## Query semantics
//!
//! Results are *candidates*: a key is returned when its segment passes
//! through a cell touched by the query box, not only when the segment
//! intersects the box itself. Callers re-check exact geometry.
//!
//! The corners of the query box are clamped to the grid, so a box lying
//! entirely outside the region returns the keys of the nearest edge cells
//! rather than an empty set.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `kurbo/std` and `tracing/std`.
//! - `libm`: float functions for `no_std` builds via `kurbo/libm`.
//!
//! ### Float semantics
//!
//! Coordinates are assumed to be finite. Construction rejects NaN or
//! non-positive cell sizes and non-finite regions.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod error;
pub mod geometry;
mod grid;

pub use error::GridError;
pub use grid::SegmentGrid;
