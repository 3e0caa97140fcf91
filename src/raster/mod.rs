//! Text-line mask rasterization.
//!
//! Each polygon is filled white and then outlined with a black closed stroke,
//! polygon by polygon in document order. Later polygons paint over earlier
//! ones, so touching text lines stay separated by a dark seam.
//!
//! Filling is delegated to `imageproc`'s even-odd scanline fill, which clips
//! to the canvas. Its preconditions (non-empty input, first vertex distinct
//! from last) are enforced here, and polygons with fewer than three distinct
//! vertices are not filled; their stroke is still drawn.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::error::PageMaskError;
use crate::pagexml::{Polygon, Vertex};

/// Width of the boundary stroke in pixels.
pub const STROKE_THICKNESS: u32 = 4;

/// Interior colour.
pub const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Background and stroke colour.
pub const BORDER: Rgb<u8> = Rgb([0, 0, 0]);

/// Vertices are clamped to this magnitude before drawing. Anything that far
/// out is off-canvas for any realistic page and the clamp keeps edge
/// arithmetic inside `i32`.
const COORD_LIMIT: i32 = 1 << 24;

/// Render `polygons` into a fresh `width` x `height` RGB mask.
///
/// The canvas starts black. Dimensions must be positive, fit in `u32`, and
/// describe a buffer addressable in `usize`; polygon extents never change the
/// canvas size.
pub fn rasterize(width: i64, height: i64, polygons: &[Polygon]) -> Result<RgbImage, PageMaskError> {
    let (canvas_width, canvas_height) = validate_dimensions(width, height)?;
    let mut mask = RgbImage::new(canvas_width, canvas_height);

    for polygon in polygons {
        fill_polygon(&mut mask, polygon, FOREGROUND);
        stroke_polygon(&mut mask, polygon, BORDER, STROKE_THICKNESS);
    }

    Ok(mask)
}

/// Fill the interior of `polygon`.
///
/// No-op for polygons with fewer than three distinct vertices.
pub fn fill_polygon(canvas: &mut RgbImage, polygon: &Polygon, color: Rgb<u8>) {
    let mut points = to_points(polygon.vertices());
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    if points.len() < 3 {
        return;
    }

    draw_polygon_mut(canvas, &points, color);
}

/// Stroke the closed outline of `polygon` with a band `thickness` pixels wide.
///
/// Each edge becomes a filled quad offset half the thickness to either side,
/// with round joins at the vertices. A single-vertex polygon draws a dot.
pub fn stroke_polygon(canvas: &mut RgbImage, polygon: &Polygon, color: Rgb<u8>, thickness: u32) {
    let points = to_points(polygon.vertices());
    if points.is_empty() || thickness == 0 {
        return;
    }

    let half = thickness as f64 / 2.0;
    let radius = (thickness / 2).max(1) as i32;

    for point in &points {
        draw_filled_circle_mut(canvas, (point.x, point.y), radius, color);
    }

    if points.len() < 2 {
        return;
    }

    let closing = std::iter::once((points[points.len() - 1], points[0]));
    for (start, end) in points.windows(2).map(|w| (w[0], w[1])).chain(closing) {
        if let Some(quad) = edge_quad(start, end, half) {
            draw_polygon_mut(canvas, &quad, color);
        }
    }
}

fn validate_dimensions(width: i64, height: i64) -> Result<(u32, u32), PageMaskError> {
    let invalid = || PageMaskError::InvalidDimensions { width, height };
    if width <= 0 || height <= 0 {
        return Err(invalid());
    }
    let width = u32::try_from(width).map_err(|_| invalid())?;
    let height = u32::try_from(height).map_err(|_| invalid())?;

    // `RgbImage::new` panics when the 3-channel buffer length overflows usize.
    let bytes = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(invalid)?;
    usize::try_from(bytes).map_err(|_| invalid())?;

    Ok((width, height))
}

fn to_points(vertices: &[Vertex]) -> Vec<Point<i32>> {
    vertices
        .iter()
        .map(|v| {
            Point::new(
                v.x.clamp(-COORD_LIMIT, COORD_LIMIT),
                v.y.clamp(-COORD_LIMIT, COORD_LIMIT),
            )
        })
        .collect()
}

/// The band around one edge, or `None` for a zero-length edge.
fn edge_quad(start: Point<i32>, end: Point<i32>, half: f64) -> Option<[Point<i32>; 4]> {
    let dx = (end.x - start.x) as f64;
    let dy = (end.y - start.y) as f64;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }

    let nx = (-dy / length * half).round() as i32;
    let ny = (dx / length * half).round() as i32;

    // |normal| >= 1 after rounding, so the first and last corners differ.
    Some([
        Point::new(start.x + nx, start.y + ny),
        Point::new(end.x + nx, end.y + ny),
        Point::new(end.x - nx, end.y - ny),
        Point::new(start.x - nx, start.y - ny),
    ])
}
