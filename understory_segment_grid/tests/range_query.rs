// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range query scenarios, mostly over a small 5x5 grid.

use kurbo::{Line, Rect};
use understory_segment_grid::{GridError, SegmentGrid};

fn five_by_five() -> SegmentGrid<char> {
    SegmentGrid::new(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, 2.0).expect("valid grid")
}

#[test]
fn construction_rejects_degenerate_inputs() {
    let region = Rect::new(0.0, 0.0, 10.0, 10.0);
    for (w, h) in [(0.0, 1.0), (-1.0, 1.0), (1.0, 0.0), (1.0, -3.0)] {
        assert!(
            SegmentGrid::<u32>::new(region, w, h).is_err(),
            "cell size {w}x{h} must be rejected"
        );
    }
    assert_eq!(
        SegmentGrid::<u32>::new(Rect::new(3.0, 0.0, 3.0, 10.0), 1.0, 1.0).unwrap_err(),
        GridError::InvalidRegionWidth(0.0)
    );
    assert_eq!(
        SegmentGrid::<u32>::new(Rect::new(0.0, 4.0, 10.0, 1.0), 1.0, 1.0).unwrap_err(),
        GridError::InvalidRegionHeight(-3.0)
    );
}

#[test]
fn diagonal_round_trip() {
    let mut grid = five_by_five();
    assert_eq!((grid.columns(), grid.rows()), (5, 5));
    grid.insert('A', Line::new((1.0, 1.0), (9.0, 9.0)));

    assert!(grid.query(Rect::new(0.0, 0.0, 2.0, 2.0)).contains(&'A'));
    assert!(grid.query(Rect::new(8.0, 8.0, 10.0, 10.0)).contains(&'A'));
    assert!(!grid.query(Rect::new(0.0, 8.0, 2.0, 10.0)).contains(&'A'));
}

#[test]
fn box_outside_region_returns_corner_cell() {
    let mut grid = five_by_five();
    grid.insert('A', Line::new((1.0, 1.0), (9.0, 9.0)));
    grid.insert('B', Line::new((9.5, 9.0), (9.5, 9.5)));
    grid.insert('C', Line::new((1.0, 1.0), (3.0, 1.0)));

    let corner = grid
        .items_in_cell(grid.columns() - 1, grid.rows() - 1)
        .expect("corner cell exists");
    let expected: std::collections::HashSet<char> = corner.iter().copied().collect();

    let hits: std::collections::HashSet<char> = grid
        .query(Rect::new(20.0, 20.0, 30.0, 30.0))
        .into_iter()
        .collect();
    assert_eq!(hits, expected);
    assert!(hits.contains(&'A'));
    assert!(hits.contains(&'B'));
    assert!(!hits.contains(&'C'));
}

#[test]
fn box_below_left_of_region_returns_origin_cell() {
    let mut grid = five_by_five();
    grid.insert('C', Line::new((1.0, 1.0), (1.5, 1.5)));
    grid.insert('D', Line::new((5.0, 5.0), (6.0, 5.0)));

    let hits = grid.query(Rect::new(-30.0, -30.0, -20.0, -20.0));
    assert_eq!(hits.len(), 1);
    assert!(hits.contains(&'C'));
}

#[test]
fn segments_leaving_a_grid_line_are_found_along_their_length() {
    let cell = 0.3;
    let mut grid = SegmentGrid::new(Rect::new(0.0, 0.0, 9.0, 9.0), cell, cell).expect("valid grid");
    let line = 7.0 * cell;
    let mid = 0.5 * cell;
    let far = 20.5 * cell;
    grid.insert('l', Line::new((line, mid), (mid, mid)));
    grid.insert('r', Line::new((line, mid), (far, mid)));
    grid.insert('d', Line::new((mid, line), (mid, mid)));
    grid.insert('u', Line::new((mid, line), (mid, far)));

    let center = |k: i32| (f64::from(k) + 0.5) * cell;
    let tiny_box = |x: f64, y: f64| Rect::new(x - 1e-6, y - 1e-6, x + 1e-6, y + 1e-6);
    for k in 0..7 {
        assert!(grid.query(tiny_box(center(k), mid)).contains(&'l'), "column {k}");
        assert!(grid.query(tiny_box(mid, center(k))).contains(&'d'), "row {k}");
    }
    for k in 7..21 {
        assert!(grid.query(tiny_box(center(k), mid)).contains(&'r'), "column {k}");
        assert!(grid.query(tiny_box(mid, center(k))).contains(&'u'), "row {k}");
    }
}

#[test]
fn full_region_query_returns_every_key() {
    let mut grid = five_by_five();
    let segments = [
        ('a', Line::new((0.5, 0.5), (9.5, 0.5))),
        ('b', Line::new((2.0, 7.0), (2.0, 7.0))),
        ('c', Line::new((-4.0, 5.0), (14.0, 6.0))),
        ('d', Line::new((9.9, 0.1), (0.1, 9.9))),
    ];
    for (key, segment) in segments {
        grid.insert(key, segment);
    }
    // Never inserted inside the region.
    grid.insert('z', Line::new((11.0, 11.0), (20.0, 15.0)));

    let hits = grid.query(grid.region());
    assert_eq!(hits.len(), 4);
    for (key, _) in segments {
        assert!(hits.contains(&key), "missing {key}");
    }
}

#[test]
fn repeated_queries_agree() {
    let mut grid = five_by_five();
    grid.insert('a', Line::new((0.5, 0.5), (9.5, 3.5)));
    grid.insert('b', Line::new((4.5, 9.0), (6.5, 1.0)));
    let rect = Rect::new(3.0, 1.0, 7.0, 4.0);
    let first = grid.query(rect);
    for _ in 0..3 {
        assert_eq!(grid.query(rect), first);
    }
}

#[test]
fn shared_between_threads_after_build() {
    let mut grid = five_by_five();
    grid.insert('a', Line::new((0.5, 0.5), (9.5, 9.5)));
    let grid = grid;

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4_i32)
            .map(|i| {
                let grid = &grid;
                s.spawn(move || {
                    let lo = f64::from(i) * 2.0;
                    grid.query(Rect::new(lo, lo, lo + 1.0, lo + 1.0))
                })
            })
            .collect();
        for handle in handles {
            let hits = handle.join().expect("query thread panicked");
            assert!(hits.contains(&'a'));
        }
    });
}
