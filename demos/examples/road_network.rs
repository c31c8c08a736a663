// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate road edges for GPS samples: grid broad phase + exact distance check.
//!
//! This example shows how to:
//! - bulk-build a `SegmentGrid` over a small road network,
//! - query candidate edges around each sample with a search box,
//! - filter candidates by exact point-to-segment distance.
//!
//! Run:
//! - `cargo run -p understory_segment_grid_demos --example road_network`

use kurbo::{Line, ParamCurveNearest, Point, Rect};
use tracing_subscriber::FmtSubscriber;
use understory_segment_grid::{GridError, SegmentGrid};

/// Identifier of a directed road edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct EdgeId(u32);

fn main() -> Result<(), GridError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default tracing subscriber failed");

    // A small street grid with one diagonal avenue and one edge leaving the map.
    let edges = [
        (EdgeId(0), Line::new((0.0, 100.0), (1000.0, 100.0))),
        (EdgeId(1), Line::new((0.0, 500.0), (1000.0, 500.0))),
        (EdgeId(2), Line::new((250.0, 0.0), (250.0, 1000.0))),
        (EdgeId(3), Line::new((750.0, 0.0), (750.0, 1000.0))),
        (EdgeId(4), Line::new((0.0, 0.0), (1000.0, 1000.0))),
        (EdgeId(5), Line::new((900.0, 900.0), (1400.0, 1200.0))),
    ];
    let lines: std::collections::HashMap<EdgeId, Line> = edges.iter().copied().collect();

    let region = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let grid = SegmentGrid::with_segments(region, 50.0, 50.0, edges)?;
    println!(
        "grid: {} x {} cells of {} x {}",
        grid.columns(),
        grid.rows(),
        grid.cell_width(),
        grid.cell_height()
    );

    let search_radius = 30.0;
    let samples = [
        Point::new(240.0, 110.0),
        Point::new(505.0, 490.0),
        Point::new(760.0, 940.0),
        Point::new(40.0, 960.0),
    ];

    for sample in samples {
        let search = Rect::from_center_size(sample, (2.0 * search_radius, 2.0 * search_radius));
        let candidates = grid.query(search);

        let mut matches: Vec<(EdgeId, f64)> = candidates
            .iter()
            .filter_map(|id| {
                let line = lines.get(id)?;
                let distance = line.nearest(sample, 1e-6).distance_sq.sqrt();
                (distance <= search_radius).then_some((*id, distance))
            })
            .collect();
        matches.sort_by(|a, b| a.1.total_cmp(&b.1));

        println!(
            "sample ({:.0}, {:.0}): {} candidates, {} within {search_radius}",
            sample.x,
            sample.y,
            candidates.len(),
            matches.len()
        );
        for (id, distance) in matches {
            println!("  edge {:?} at {distance:.1}", id);
        }
    }

    // Per-cell contents, e.g. for drawing a debug overlay.
    let busiest = grid
        .cells()
        .max_by_key(|(_, keys)| keys.len())
        .map(|((col, row), keys)| (col, row, keys.len()));
    if let Some((col, row, count)) = busiest {
        println!("busiest cell ({col}, {row}) holds {count} edges");
    }

    Ok(())
}
