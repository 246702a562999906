//! Overlay rendering for visual inspection of an evaluation.
//!
//! Draws both region sets and every match intersection into one image in
//! document pixel space: candidate regions blue, reference regions orange,
//! intersections green when the match clears its IoU threshold and red when
//! it does not.

use std::path::Path;

use geo::{BoundingRect, Polygon};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use tracing::instrument;

use crate::error::Result;
use crate::Evaluation;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const CANDIDATE: Rgb<u8> = Rgb([65, 105, 225]);
const REFERENCE: Rgb<u8> = Rgb([255, 127, 14]);
const GOOD: Rgb<u8> = Rgb([60, 160, 60]);
const BAD: Rgb<u8> = Rgb([190, 50, 50]);

const MARGIN: f64 = 10.0;

#[instrument(skip(evaluation), level = "debug")]
pub fn render_overlay(evaluation: &Evaluation, path: &Path) -> Result<()> {
    let (width, height) = canvas_size(evaluation);
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    for region in &evaluation.candidate_blocks {
        draw_region(&mut canvas, region, CANDIDATE);
    }
    for region in &evaluation.reference_blocks {
        draw_region(&mut canvas, region, REFERENCE);
    }
    for matched in evaluation
        .line_matches
        .iter()
        .chain(&evaluation.block_matches)
    {
        let color = if matched.is_good() { GOOD } else { BAD };
        for part in &matched.intersection.0 {
            draw_region(&mut canvas, part, color);
        }
    }

    canvas.save(path)?;
    log::debug!("overlay saved to {}", path.display());
    Ok(())
}

fn canvas_size(evaluation: &Evaluation) -> (u32, u32) {
    let all = evaluation
        .candidate_blocks
        .iter()
        .chain(&evaluation.reference_lines)
        .chain(&evaluation.reference_blocks);

    let mut max_x = 0.0_f64;
    let mut max_y = 0.0_f64;
    for region in all {
        if let Some(bounds) = region.bounding_rect() {
            max_x = max_x.max(bounds.max().x);
            max_y = max_y.max(bounds.max().y);
        }
    }
    (
        (max_x + MARGIN).ceil().max(1.0) as u32,
        (max_y + MARGIN).ceil().max(1.0) as u32,
    )
}

fn draw_region(canvas: &mut RgbImage, region: &Polygon<f64>, color: Rgb<u8>) {
    let ring = ring_points(region);
    if ring.len() >= 3 {
        draw_polygon_mut(canvas, &ring, color);
    }
    // Outline on top of the fill so thin regions stay visible.
    for line in region.exterior().lines() {
        draw_line_segment_mut(
            canvas,
            (line.start.x as f32, line.start.y as f32),
            (line.end.x as f32, line.end.y as f32),
            color,
        );
    }
}

/// Exterior ring as integer points with the closing vertex and any rounding
/// duplicates removed; `draw_polygon_mut` requires first != last.
fn ring_points(region: &Polygon<f64>) -> Vec<Point<i32>> {
    let mut ring: Vec<Point<i32>> = Vec::new();
    for coord in region.exterior().coords() {
        let point = Point::new(coord.x.round() as i32, coord.y.round() as i32);
        if ring.last() != Some(&point) {
            ring.push(point);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}
