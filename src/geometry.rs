//! Polygon construction, validity repair and geometric merging.
//!
//! All boolean operations go through the clipper backend, which works in
//! scaled integer space. `CLIP_FACTOR` sets that scaling: 1000.0 keeps
//! milli-pixel precision, plenty for layout coordinates.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Coord, LineString, MultiPolygon, Polygon};
use geo_clipper::Clipper;
use tracing::instrument;

use crate::error::{Error, Result};

pub(crate) const CLIP_FACTOR: f64 = 1000.0;

/// Builds a polygon from an ordered exterior ring. The ring is closed
/// implicitly; fewer than 3 points is not a ring.
pub fn polygon_from_points(points: &[Coord<f64>]) -> Result<Polygon<f64>> {
    if points.len() < 3 {
        return Err(Error::InvalidGeometry {
            count: points.len(),
        });
    }
    Ok(Polygon::new(LineString::from(points.to_vec()), vec![]))
}

/// A polygon is usable for area math when its exterior ring has positive area
/// and no two non-adjacent segments touch or cross.
pub fn is_valid(polygon: &Polygon<f64>) -> bool {
    let segments: Vec<_> = polygon.exterior().lines().collect();
    if segments.len() < 3 || polygon.unsigned_area() == 0.0 {
        return false;
    }
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let adjacent = j == i + 1 || (i == 0 && j == segments.len() - 1);
            if adjacent {
                continue;
            }
            if let Some(intersection) = line_intersection(segments[i], segments[j]) {
                match intersection {
                    LineIntersection::SinglePoint { .. } | LineIntersection::Collinear { .. } => {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Resolves self-intersections by self-union, the clipper equivalent of a
/// zero-width buffer. Valid input comes back unchanged as a single element;
/// degenerate input may dissolve into nothing.
pub fn repair(polygon: &Polygon<f64>) -> Vec<Polygon<f64>> {
    if is_valid(polygon) {
        return vec![polygon.clone()];
    }
    let noded = MultiPolygon::new(vec![polygon.clone()]);
    noded
        .union(&noded, CLIP_FACTOR)
        .0
        .into_iter()
        .filter(|part| part.unsigned_area() > 0.0)
        .collect()
}

/// Unions a whole collection in one clipper pass. A single pass over all
/// rings means the result cannot depend on input order.
pub fn unary_union(polygons: &[Polygon<f64>]) -> MultiPolygon<f64> {
    match polygons.split_first() {
        None => MultiPolygon::new(Vec::new()),
        Some((first, [])) => MultiPolygon::new(repair(first)),
        Some((first, rest)) => MultiPolygon::new(vec![first.clone()])
            .union(&MultiPolygon::new(rest.to_vec()), CLIP_FACTOR),
    }
}

/// Coalesces fragmented line regions into block regions by geometric union.
/// Each connected component of the union becomes one block polygon.
#[instrument(skip(polygons), level = "trace")]
pub fn merge(polygons: &[Polygon<f64>]) -> Vec<Polygon<f64>> {
    if polygons.is_empty() {
        return Vec::new();
    }
    let merged = unary_union(polygons)
        .0
        .into_iter()
        .flat_map(|part| repair(&part))
        .collect::<Vec<_>>();
    log::debug!("merged {} regions into {} blocks", polygons.len(), merged.len());
    merged
}

pub(crate) fn intersection_of(a: &Polygon<f64>, b: &Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![a.clone()]).intersection(&MultiPolygon::new(vec![b.clone()]), CLIP_FACTOR)
}

pub(crate) fn union_of(a: &Polygon<f64>, b: &Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![a.clone()]).union(&MultiPolygon::new(vec![b.clone()]), CLIP_FACTOR)
}

pub(crate) fn intersection_multi(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
) -> MultiPolygon<f64> {
    if a.0.is_empty() || b.0.is_empty() {
        return MultiPolygon::new(Vec::new());
    }
    a.intersection(b, CLIP_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon_from_points(&[
            Coord { x: x0, y: y0 },
            Coord { x: x1, y: y0 },
            Coord { x: x1, y: y1 },
            Coord { x: x0, y: y1 },
        ])
        .unwrap()
    }

    #[test]
    fn rejects_short_rings() {
        let err = polygon_from_points(&[Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { count: 2 }));
    }

    #[test]
    fn repair_is_identity_on_valid_input() {
        let square = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(repair(&square), vec![square.clone()]);
    }

    #[test]
    fn repair_resolves_self_intersection() {
        // Bowtie crossing itself at (5, 5); the two lobes cover 50 units.
        let bowtie = polygon_from_points(&[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 0.0, y: 10.0 },
        ])
        .unwrap();
        assert!(!is_valid(&bowtie));

        let parts = repair(&bowtie);
        assert!(!parts.is_empty());
        assert!(parts.iter().all(is_valid));
        let area: f64 = parts.iter().map(|p| p.unsigned_area()).sum();
        assert!((area - 50.0).abs() < 1e-3);
    }

    #[test]
    fn repair_drops_zero_area_rings() {
        let collinear = polygon_from_points(&[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 5.0, y: 5.0 },
            Coord { x: 10.0, y: 10.0 },
        ])
        .unwrap();
        assert!(repair(&collinear).is_empty());
    }

    #[test]
    fn merge_of_nothing_is_nothing() {
        assert!(merge(&[]).is_empty());
    }

    #[test]
    fn merge_separates_connected_components() {
        // Three overlapping strips form one chain, plus one far-away region.
        let chain = vec![
            rect(0.0, 0.0, 10.0, 2.0),
            rect(0.0, 1.5, 10.0, 3.5),
            rect(0.0, 3.0, 10.0, 5.0),
        ];
        let mut regions = chain;
        regions.push(rect(100.0, 100.0, 110.0, 102.0));

        let blocks = merge(&regions);
        assert_eq!(blocks.len(), 2);
        let area: f64 = blocks.iter().map(|b| b.unsigned_area()).sum();
        assert!((area - 70.0).abs() < 1e-3);
    }

    #[test]
    fn merge_is_order_independent() {
        let regions = [
            rect(0.0, 0.0, 10.0, 2.0),
            rect(0.0, 1.5, 10.0, 3.5),
            rect(50.0, 50.0, 60.0, 52.0),
        ];
        let permutations: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];

        let mut outcomes = permutations.iter().map(|order| {
            let shuffled: Vec<_> = order.iter().map(|&i| regions[i].clone()).collect();
            let mut areas: Vec<f64> = merge(&shuffled).iter().map(|b| b.unsigned_area()).collect();
            areas.sort_by(|a, b| a.total_cmp(b));
            areas
        });

        let baseline = outcomes.next().unwrap();
        for areas in outcomes {
            assert_eq!(areas.len(), baseline.len());
            for (a, b) in areas.iter().zip(&baseline) {
                assert!((a - b).abs() < 1e-3);
            }
        }
    }
}
