use glam::Vec2;
use regex::Regex;

use crate::analysis::cluster::clusters;
use crate::consts::{CLUSTER_EPS, CLUSTER_MIN_POINTS, UNIT_PROXIMITY};
use crate::fusion::FusedToken;

use super::report::FieldMatch;

/// U.S. standard-of-fill unit spellings accepted in a net-contents
/// statement.
const NET_UNITS: [&str; 14] = [
    "fl", "fl.", "oz", "oz.", "floz", "pint", "pt", "pt.", "quart", "qt", "qt.", "gallon", "gal",
    "gal.",
];

/// Tunables for text-block recovery and in-block format checks.
#[derive(Clone, Debug)]
pub struct SpatialConfig {
    /// Neighborhood radius (pixels) for clustering token centers into text
    /// blocks.
    pub cluster_eps: f32,
    /// Minimum neighborhood size for a clustering core point.
    pub cluster_min_points: usize,
    /// Maximum per-axis distance between a number and a unit for a
    /// net-contents statement to count as co-located.
    pub unit_proximity: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cluster_eps: CLUSTER_EPS,
            cluster_min_points: CLUSTER_MIN_POINTS,
            unit_proximity: UNIT_PROXIMITY,
        }
    }
}

/// Verifies label elements whose correct value is not in the application
/// record — alcohol content and the net-contents declaration — by first
/// recovering text-block structure, then applying the feature's formatting
/// rule inside each block.
///
/// These rules are about co-location, not co-occurrence: "4.8% ALC/VOL"
/// spread across opposite corners of the label is not a valid statement, so
/// a plain text search over the whole label would over-accept.
pub struct SpatialVerifier {
    config: SpatialConfig,
    alcohol: Regex,
    volume: Regex,
    percent: Regex,
    net_statement: Regex,
}

impl SpatialVerifier {
    pub fn new(config: SpatialConfig) -> Self {
        let alcohol = Regex::new(r"alc(ohol)?\.?").expect("valid pattern");
        let volume = Regex::new(r"vol(ume)?\.?").expect("valid pattern");
        let percent = Regex::new(r"\d+(\.\d+)?%").expect("valid pattern");
        let net_statement = Regex::new(
            r"(?i)\b\d+(\.\d+)?\s*(fl\.?\s*oz\.?|pt\.?|pint(s)?|qt\.?|quart(s)?|gal\.?|gallon(s)?)\b",
        )
        .expect("valid pattern");

        Self {
            config,
            alcohol,
            volume,
            percent,
            net_statement,
        }
    }

    /// Looks for a complete alcohol-content statement inside one text block:
    /// an alcohol marker, a volume marker, and percentage evidence (either a
    /// single `N%` token, or a numeric token alongside a `%`-bearing token).
    /// The first qualifying block wins.
    pub fn find_alcohol_content(&self, tokens: &[FusedToken]) -> Option<FieldMatch> {
        for block in self.blocks(tokens) {
            let mut alcohol_at = None;
            let mut volume_at = None;
            let mut percent_at = None;
            let mut numeric_at = None;
            let mut percent_sign_at = None;

            for &idx in &block {
                let word = tokens[idx].text.trim().to_lowercase();
                if alcohol_at.is_none() && self.alcohol.is_match(&word) {
                    alcohol_at = Some(idx);
                }
                if volume_at.is_none() && self.volume.is_match(&word) {
                    volume_at = Some(idx);
                }
                if percent_at.is_none() && self.percent.is_match(&word) {
                    percent_at = Some(idx);
                }
                if numeric_at.is_none() && word.chars().any(|c| c.is_ascii_digit()) {
                    numeric_at = Some(idx);
                }
                if percent_sign_at.is_none() && word.contains('%') {
                    percent_sign_at = Some(idx);
                }
            }

            let evidence: Vec<usize> = match (percent_at, numeric_at, percent_sign_at) {
                (Some(full), _, _) => vec![full],
                (None, Some(number), Some(sign)) => vec![number, sign],
                _ => continue,
            };

            if let (Some(alcohol), Some(volume)) = (alcohol_at, volume_at) {
                let mut contributing = evidence;
                contributing.push(alcohol);
                contributing.push(volume);
                return Some(field_match_from(tokens, contributing));
            }
        }

        None
    }

    /// Looks for a net-contents declaration inside one text block: a single
    /// number-with-unit token, a numeric token within reach of a unit token,
    /// or the full statement pattern across the block's joined text.
    pub fn find_net_contents(&self, tokens: &[FusedToken]) -> Option<FieldMatch> {
        for block in self.blocks(tokens) {
            // Single token carrying both number and unit, e.g. "12oz".
            for &idx in &block {
                let word = tokens[idx].text.to_lowercase();
                let has_number = word.chars().any(|c| c.is_ascii_digit());
                let has_unit = NET_UNITS.iter().any(|unit| word.contains(unit));
                if has_number && has_unit {
                    return Some(field_match_from(tokens, vec![idx]));
                }
            }

            // Number and unit as separate, co-located tokens.
            let numbers: Vec<usize> = block
                .iter()
                .copied()
                .filter(|&idx| tokens[idx].text.chars().any(|c| c.is_ascii_digit()))
                .collect();
            let units: Vec<usize> = block
                .iter()
                .copied()
                .filter(|&idx| {
                    let word = tokens[idx].text.to_lowercase();
                    NET_UNITS.iter().any(|unit| word.contains(unit))
                })
                .collect();

            for &number in &numbers {
                for &unit in &units {
                    let delta = tokens[number].bbox.center() - tokens[unit].bbox.center();
                    if delta.x.abs() < self.config.unit_proximity
                        && delta.y.abs() < self.config.unit_proximity
                    {
                        return Some(field_match_from(tokens, vec![number, unit]));
                    }
                }
            }

            // Tokenization may have split "12 FL OZ" arbitrarily; the joined
            // block text still shows the statement.
            let joined = block
                .iter()
                .map(|&idx| tokens[idx].text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(matched) = self.net_statement.find(&joined) {
                let bbox = union_of(tokens, &block);
                return Some(FieldMatch {
                    text: matched.as_str().to_string(),
                    bbox,
                });
            }
        }

        None
    }

    /// Recovers text blocks as clusters of token centers. If the minimum
    /// cluster size leaves nothing but noise, the whole label falls back to
    /// one block so sparse labels are still considered.
    fn blocks(&self, tokens: &[FusedToken]) -> Vec<Vec<usize>> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let centers: Vec<Vec2> = tokens.iter().map(|t| t.bbox.center()).collect();
        let blocks = clusters(
            &centers,
            self.config.cluster_eps,
            self.config.cluster_min_points,
        );

        if blocks.is_empty() {
            return vec![(0..tokens.len()).collect()];
        }
        blocks
    }
}

fn field_match_from(tokens: &[FusedToken], mut contributing: Vec<usize>) -> FieldMatch {
    contributing.sort_unstable();
    contributing.dedup();

    let bbox = union_of(tokens, &contributing);
    let text = contributing
        .iter()
        .map(|&idx| tokens[idx].text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    FieldMatch { text, bbox }
}

fn union_of(tokens: &[FusedToken], indices: &[usize]) -> crate::analysis::bbox::Bbox {
    indices
        .iter()
        .skip(1)
        .fold(tokens[indices[0]].bbox, |acc, &idx| {
            acc.union(&tokens[idx].bbox)
        })
}
