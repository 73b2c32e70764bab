use strsim::normalized_levenshtein;

use crate::consts::{ENTITY_SIMILARITY_THRESHOLD, ENTITY_WINDOW_SLACK};
use crate::fusion::FusedToken;

use super::report::FieldMatch;

/// Thresholds for fuzzy matching of application fields against the label.
#[derive(Clone, Debug)]
pub struct EntityMatchConfig {
    /// Minimum similarity for accepting a candidate span. Tuned
    /// conservatively: a miss sends the label to a reviewer, a false accept
    /// approves a bad label.
    pub min_similarity: f64,
    /// Allowed deviation, in tokens, between a candidate span's length and
    /// the expected phrase's length.
    pub window_slack: usize,
}

impl Default for EntityMatchConfig {
    fn default() -> Self {
        Self {
            min_similarity: ENTITY_SIMILARITY_THRESHOLD,
            window_slack: ENTITY_WINDOW_SLACK,
        }
    }
}

/// Strips a word down to lowercase alphanumerics for comparison, discarding
/// the punctuation OCR most often garbles.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Searches the reading-ordered fused tokens for a contiguous span that
/// reconstructs `expected` above the similarity threshold.
///
/// Every window close in length to the expected phrase is scored with
/// normalized Levenshtein similarity over normalized text; the best-scoring
/// window wins if it clears the threshold. The match region is the union of
/// the window tokens' regions. Returns `None` when nothing qualifies.
pub fn find_phrase(
    tokens: &[FusedToken],
    expected: &str,
    config: &EntityMatchConfig,
) -> Option<FieldMatch> {
    let expected_words: Vec<String> = expected
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();
    if expected_words.is_empty() || tokens.is_empty() {
        return None;
    }
    let expected_norm = expected_words.join(" ");

    let normalized: Vec<String> = tokens.iter().map(|t| normalize_word(&t.text)).collect();

    let target_len = expected_words.len();
    let min_len = target_len.saturating_sub(config.window_slack).max(1);
    let max_len = target_len + config.window_slack;

    let mut best: Option<(f64, usize, usize)> = None;
    for len in min_len..=max_len {
        if len > tokens.len() {
            break;
        }
        for start in 0..=(tokens.len() - len) {
            let candidate = normalized[start..start + len].join(" ");
            if candidate.trim().is_empty() {
                continue;
            }

            let similarity = normalized_levenshtein(&candidate, &expected_norm);
            if best.map(|(b, _, _)| similarity > b).unwrap_or(true) {
                best = Some((similarity, start, len));
            }
        }
    }

    let (similarity, start, len) = best?;
    if similarity < config.min_similarity {
        return None;
    }

    let window = &tokens[start..start + len];
    let bbox = window
        .iter()
        .skip(1)
        .fold(window[0].bbox, |acc, t| acc.union(&t.bbox));
    let text = window
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Some(FieldMatch { text, bbox })
}
