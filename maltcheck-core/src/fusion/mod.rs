pub mod align;
pub mod resolve;

use crate::analysis::bbox::Bbox;
use crate::consts::*;
use crate::detect::token::{DetectorId, Token, sort_reading_order};

/// Result of reconciling detections that refer to the same printed word.
///
/// Invariant: `confidence` is the maximum of the contributing tokens'
/// confidences.
#[derive(Clone, Debug, PartialEq)]
pub struct FusedToken {
    pub text: String,
    pub bbox: Bbox,
    pub confidence: f32,
    pub provenance: Provenance,
}

/// Which source(s) contributed to a fused token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Provenance {
    /// Both detectors reported the word; both normalized confidences are
    /// kept for downstream inspection.
    Fused { primary: f32, secondary: f32 },
    /// Seen by one detector only. Retained rather than discarded — the
    /// pipeline prefers over-inclusion here and defers rejection to
    /// verification.
    Single(DetectorId),
}

/// Tie-break when both detectors report equal confidence for conflicting
/// text. No accuracy history is available to prefer one engine per feature
/// type, so the preference is configured globally; the default arbitrarily
/// but deterministically favors the primary detector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    #[default]
    PreferPrimary,
    PreferSecondary,
}

/// Tunable thresholds for candidate pairing and arbitration.
#[derive(Clone, Debug)]
pub struct FusionConfig {
    /// Minimum bbox overlap ratio for two tokens to pair on geometry alone.
    pub min_overlap_ratio: f32,
    /// Minimum normalized text similarity for two tokens to pair on text.
    pub min_text_similarity: f64,
    /// Vertical distance within which text-similar tokens count as the same
    /// printed line.
    pub line_tolerance: f32,
    /// Preference between equally confident, conflicting readings.
    pub tie_break: TieBreak,
    /// Line tolerance used when sorting the fused output into reading order.
    pub reading_order_tolerance: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            min_overlap_ratio: PAIR_OVERLAP_RATIO,
            min_text_similarity: PAIR_TEXT_SIMILARITY,
            line_tolerance: PAIR_LINE_TOLERANCE,
            tie_break: TieBreak::default(),
            reading_order_tolerance: READING_ORDER_TOLERANCE,
        }
    }
}

/// Merges the two detectors' token sequences into one deduplicated,
/// higher-confidence sequence in reading order.
///
/// The two engines have uncorrelated error modes; where they agree (or where
/// confidence arbitrates a disagreement) the result is more reliable than
/// either input alone. An empty input on one side degrades to a pass-through
/// of the other side's tokens.
pub fn fuse(primary: &[Token], secondary: &[Token], config: &FusionConfig) -> Vec<FusedToken> {
    let alignment = align::pair_tokens(primary, secondary, config);
    let mut fused = resolve::resolve(alignment, config);

    sort_reading_order(
        &mut fused,
        |t| t.bbox.center(),
        config.reading_order_tolerance,
    );
    fused
}
