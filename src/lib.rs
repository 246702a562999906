//! Scores OCR layout segmentation against ground truth.
//!
//! The candidate document is an ALTO file (block polygons straight from the
//! segmenter), the reference document a PAGE file (line polygons, with blocks
//! reconstructed by geometric merging). The evaluator pairs regions by
//! spatial intersection at two granularities and computes whole-set Dice
//! overlap; everything it produces is plain immutable data for callers and
//! renderers to consume.

use std::path::Path;

use geo::Polygon;
use tracing::instrument;

mod error;
pub mod extract;
pub mod geometry;
mod matcher;
pub mod render;
mod score;

pub use error::{Error, Result};
pub use matcher::{match_regions, RegionMatch};
pub use score::{dice_score, ScoreResult};

pub struct EvaluatorBuilder {
    iou_threshold: f64,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advisory bound between good and bad matches. Matches below it are
    /// still reported, just classified differently.
    pub fn iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn build(self) -> Evaluator {
        Evaluator {
            iou_threshold: self.iou_threshold,
        }
    }
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self { iou_threshold: 0.5 }
    }
}

pub struct Evaluator {
    iou_threshold: f64,
}

impl Evaluator {
    /// Runs the whole pipeline over one candidate/reference document pair.
    #[instrument(skip(self))]
    pub fn evaluate(&self, candidate_alto: &Path, reference_page: &Path) -> Result<Evaluation> {
        let candidate_blocks = extract::parse_alto_blocks(candidate_alto)?;
        let reference_lines = extract::parse_page_lines(reference_page)?;
        let reference_blocks = extract::parse_page_blocks(reference_page)?;

        let line_matches =
            matcher::match_regions(&candidate_blocks, &reference_lines, self.iou_threshold);
        let block_matches =
            matcher::match_regions(&candidate_blocks, &reference_blocks, self.iou_threshold);
        let score = score::dice_score(&candidate_blocks, &reference_blocks);

        Ok(Evaluation {
            candidate_blocks,
            reference_lines,
            reference_blocks,
            line_matches,
            block_matches,
            score,
            iou_threshold: self.iou_threshold,
        })
    }
}

/// Everything one evaluation run computes.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub candidate_blocks: Vec<Polygon<f64>>,
    pub reference_lines: Vec<Polygon<f64>>,
    pub reference_blocks: Vec<Polygon<f64>>,
    /// Candidate blocks against reference lines.
    pub line_matches: Vec<RegionMatch>,
    /// Candidate blocks against reconstructed reference blocks.
    pub block_matches: Vec<RegionMatch>,
    pub score: ScoreResult,
    pub iou_threshold: f64,
}
