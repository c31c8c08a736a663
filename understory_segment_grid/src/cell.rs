// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between coordinates and grid cells along one axis.

/// Map a coordinate to a grid coordinate along one axis.
///
/// Computes `floor((value - origin) / cell_size)`, saturating to the `i32`
/// range. The result is monotonic in `value` and is not bounds-checked.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn cell_coord(value: f64, origin: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "grid cell size must be strictly positive");
    let t = (value - origin) / cell_size;
    let coord = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

/// Largest valid coordinate on an axis of `len` cells.
#[inline]
pub(crate) fn last_coord(len: usize) -> i32 {
    i32::try_from(len.saturating_sub(1)).unwrap_or(i32::MAX)
}

/// Clamp a grid coordinate into `0..len`.
#[inline]
pub(crate) fn clamp_coord(coord: i32, len: usize) -> i32 {
    coord.clamp(0, last_coord(len))
}

/// Clamp a grid coordinate into `0..len` and convert it to a table index.
#[inline]
pub(crate) fn clamp_index(coord: i32, len: usize) -> usize {
    // The clamped value is never negative.
    usize::try_from(clamp_coord(coord, len)).unwrap_or(0)
}

/// Whether a grid coordinate falls inside `0..len`.
#[inline]
pub(crate) fn in_range(coord: i32, len: usize) -> bool {
    usize::try_from(coord).is_ok_and(|c| c < len)
}
