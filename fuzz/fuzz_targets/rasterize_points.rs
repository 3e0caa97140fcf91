//! Fuzz target for coordinate parsing and mask rasterization.
//!
//! Treats the input as a `points` attribute value and draws the result on a
//! small canvas, checking that malformed or degenerate polygons never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pagemask::pagexml::parse_points;
use pagemask::raster::rasterize;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }

    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(polygon) = parse_points(raw) {
        let _ = rasterize(64, 48, &[polygon]);
    }
});
