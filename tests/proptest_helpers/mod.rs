#![allow(dead_code)]

use pagemask::pagexml::{Polygon, Vertex};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Vertices spread over three times the canvas extent, so many land off-canvas.
pub fn arb_vertex(extent: i32) -> impl Strategy<Value = Vertex> {
    (-extent..extent * 2, -extent..extent * 2).prop_map(|(x, y)| Vertex::new(x, y))
}

/// Polygons of any vertex count, degenerate ones included.
pub fn arb_polygon(extent: i32, max_vertices: usize) -> impl Strategy<Value = Polygon> {
    prop::collection::vec(arb_vertex(extent), 1..=max_vertices).prop_map(Polygon::new)
}

pub fn arb_polygons(extent: i32, max_polygons: usize) -> impl Strategy<Value = Vec<Polygon>> {
    prop::collection::vec(arb_polygon(extent, 8), 0..=max_polygons)
}

/// Format a polygon as a PAGE `points` attribute value.
pub fn points_attr(polygon: &Polygon) -> String {
    polygon
        .vertices()
        .iter()
        .map(|v| format!("{},{}", v.x, v.y))
        .collect::<Vec<_>>()
        .join(" ")
}
