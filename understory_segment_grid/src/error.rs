// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

use thiserror::Error;

/// Invalid arguments passed to [`SegmentGrid::new`][crate::SegmentGrid::new].
///
/// Construction is the only fallible operation on a grid; insertion and
/// queries are total.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GridError {
    /// The requested cell width is zero, negative, or NaN.
    #[error("invalid cell width {0} (require positive width)")]
    InvalidCellWidth(f64),
    /// The requested cell height is zero, negative, or NaN.
    #[error("invalid cell height {0} (require positive height)")]
    InvalidCellHeight(f64),
    /// The covering region has a zero, negative, or non-finite width.
    #[error("invalid bounding region width {0} (require positive width)")]
    InvalidRegionWidth(f64),
    /// The covering region has a zero, negative, or non-finite height.
    #[error("invalid bounding region height {0} (require positive height)")]
    InvalidRegionHeight(f64),
    /// The cell table would not be addressable.
    #[error("grid of {columns} x {rows} cells is too large")]
    TooManyCells {
        /// Requested column count.
        columns: usize,
        /// Requested row count.
        rows: usize,
    },
}
