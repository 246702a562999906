//! Whole-set overlap scoring.
//!
//! Unlike the matcher, both collections are dissolved into single regions
//! before they are compared, so fragmentation inside either set does not
//! influence the score.

use geo::{Area, MultiPolygon, Polygon};
use tracing::instrument;

use crate::geometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub area_candidate: f64,
    pub area_reference: f64,
    pub area_intersection: f64,
    pub dice: f64,
}

impl ScoreResult {
    /// Fraction of the reference set covered by the candidate set, in
    /// percent. Asymmetric on purpose: it reports how much ground truth was
    /// recovered.
    pub fn intersection_pct(&self) -> f64 {
        if self.area_reference == 0.0 {
            0.0
        } else {
            100.0 * self.area_intersection / self.area_reference
        }
    }
}

/// Dice coefficient between two region collections.
///
/// Accepts anything that iterates as polygons; a single polygon can be passed
/// with [`std::slice::from_ref`]. Degenerate inputs (both sides empty or
/// zero-area) score 0 rather than erroring.
#[instrument(skip(candidates, references), level = "debug")]
pub fn dice_score<'a, A, B>(candidates: A, references: B) -> ScoreResult
where
    A: IntoIterator<Item = &'a Polygon<f64>>,
    B: IntoIterator<Item = &'a Polygon<f64>>,
{
    let candidates: Vec<_> = candidates.into_iter().cloned().collect();
    let references: Vec<_> = references.into_iter().cloned().collect();

    let union_candidate = MultiPolygon::new(geometry::merge(&candidates));
    let union_reference = MultiPolygon::new(geometry::merge(&references));
    let intersection = geometry::intersection_multi(&union_candidate, &union_reference);

    let area_candidate = union_candidate.unsigned_area();
    let area_reference = union_reference.unsigned_area();
    let area_intersection = intersection.unsigned_area();
    let dice = if area_candidate + area_reference == 0.0 {
        0.0
    } else {
        2.0 * area_intersection / (area_candidate + area_reference)
    };

    ScoreResult {
        area_candidate,
        area_reference,
        area_intersection,
        dice,
    }
}
