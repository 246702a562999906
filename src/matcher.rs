//! Pairwise matching of candidate regions against reference regions.

use geo::{Area, MultiPolygon, Polygon};
use tracing::instrument;

use crate::geometry;

/// One overlapping (candidate, reference) pair.
///
/// The threshold is advisory: it classifies a match as good or bad for
/// downstream consumers but never decides whether the pair is reported.
#[derive(Debug, Clone)]
pub struct RegionMatch {
    pub candidate: Polygon<f64>,
    pub reference: Polygon<f64>,
    pub intersection: MultiPolygon<f64>,
    pub iou: f64,
    pub iou_threshold: f64,
}

impl RegionMatch {
    pub fn is_good(&self) -> bool {
        self.iou >= self.iou_threshold
    }
}

/// Tests the full candidate × reference cross product and reports every pair
/// with a non-empty intersection, candidate-major then reference-minor.
///
/// IoU uses the area of the actual union, not the inclusion-exclusion
/// formula, so overlapping non-simple geometry is not double-counted. A
/// zero-area union scores 0.
#[instrument(skip(candidates, references), level = "debug")]
pub fn match_regions(
    candidates: &[Polygon<f64>],
    references: &[Polygon<f64>],
    iou_threshold: f64,
) -> Vec<RegionMatch> {
    let mut matches = Vec::new();
    for candidate in candidates {
        for reference in references {
            let intersection = geometry::intersection_of(candidate, reference);
            if intersection.0.is_empty() {
                continue;
            }
            let union_area = geometry::union_of(candidate, reference).unsigned_area();
            let iou = if union_area > 0.0 {
                intersection.unsigned_area() / union_area
            } else {
                0.0
            };
            matches.push(RegionMatch {
                candidate: candidate.clone(),
                reference: reference.clone(),
                intersection,
                iou,
                iou_threshold,
            });
        }
    }
    log::debug!(
        "{} of {} region pairs intersect",
        matches.len(),
        candidates.len() * references.len()
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use pretty_assertions::assert_eq;

    use crate::geometry::polygon_from_points;

    fn square(x0: f64, y0: f64, side: f64) -> Polygon<f64> {
        polygon_from_points(&[
            Coord { x: x0, y: y0 },
            Coord { x: x0 + side, y: y0 },
            Coord { x: x0 + side, y: y0 + side },
            Coord { x: x0, y: y0 + side },
        ])
        .unwrap()
    }

    #[test]
    fn disjoint_regions_never_match() {
        let matches = match_regions(&[square(0.0, 0.0, 10.0)], &[square(50.0, 50.0, 10.0)], 0.5);
        assert!(matches.is_empty());
    }

    #[test]
    fn overlapping_squares_score_the_expected_iou() {
        // 10x10 squares offset by 5: intersection 25, union 175.
        let matches = match_regions(&[square(0.0, 0.0, 10.0)], &[square(5.0, 5.0, 10.0)], 0.5);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].iou - 25.0 / 175.0).abs() < 1e-6);
        assert!(!matches[0].is_good());
    }

    #[test]
    fn iou_is_symmetric_in_the_arguments() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        let forward = match_regions(std::slice::from_ref(&a), std::slice::from_ref(&b), 0.5);
        let backward = match_regions(std::slice::from_ref(&b), std::slice::from_ref(&a), 0.5);
        assert!((forward[0].iou - backward[0].iou).abs() < 1e-9);
    }

    #[test]
    fn output_is_candidate_major() {
        let candidates = [square(0.0, 0.0, 10.0), square(2.0, 2.0, 10.0)];
        let references = [square(1.0, 1.0, 10.0), square(3.0, 3.0, 10.0)];
        let matches = match_regions(&candidates, &references, 0.5);
        assert_eq!(matches.len(), 4);
        assert_eq!(matches[0].candidate, candidates[0]);
        assert_eq!(matches[0].reference, references[0]);
        assert_eq!(matches[1].candidate, candidates[0]);
        assert_eq!(matches[1].reference, references[1]);
        assert_eq!(matches[2].candidate, candidates[1]);
        assert_eq!(matches[3].candidate, candidates[1]);
    }

    #[test]
    fn threshold_classifies_but_never_filters() {
        let candidates = [square(0.0, 0.0, 10.0)];
        let references = [square(5.0, 5.0, 10.0)];
        let strict = match_regions(&candidates, &references, 0.9);
        let lax = match_regions(&candidates, &references, 0.1);
        assert_eq!(strict.len(), lax.len());
        assert!(!strict[0].is_good());
        assert!(lax[0].is_good());
    }
}
