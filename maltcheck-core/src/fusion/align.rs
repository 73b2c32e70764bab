use strsim::normalized_levenshtein;

use crate::detect::token::Token;

use super::FusionConfig;

/// A primary and a secondary token judged to be the same printed word.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub primary: Token,
    pub secondary: Token,
    pub overlap: f32,
    pub similarity: f64,
}

/// Output of candidate pairing: matched pairs plus the tokens each detector
/// saw alone.
#[derive(Clone, Debug, Default)]
pub struct Alignment {
    pub matched: Vec<TokenPair>,
    pub unmatched_primary: Vec<Token>,
    pub unmatched_secondary: Vec<Token>,
}

/// Pairs tokens across the two detectors.
///
/// A secondary token is a candidate for a primary token when their regions
/// overlap above the configured ratio, or when their texts are similar and
/// they sit on the same printed line. Among candidates the highest combined
/// score wins; each secondary token pairs at most once.
pub fn pair_tokens(primary: &[Token], secondary: &[Token], config: &FusionConfig) -> Alignment {
    let mut alignment = Alignment::default();
    let mut used_secondary = vec![false; secondary.len()];

    for token in primary {
        let mut best: Option<(usize, f32, f64)> = None;

        for (idx, candidate) in secondary.iter().enumerate() {
            if used_secondary[idx] {
                continue;
            }

            let overlap = token.bbox.overlap_ratio(&candidate.bbox);
            let similarity = normalized_levenshtein(&token.text, &candidate.text);
            let same_line = (token.bbox.center().y - candidate.bbox.center().y).abs()
                <= config.line_tolerance;

            let geometry_match = overlap >= config.min_overlap_ratio;
            let text_match = similarity >= config.min_text_similarity && same_line;
            if !geometry_match && !text_match {
                continue;
            }

            let score = overlap as f64 + similarity;
            let improves = best
                .map(|(_, b_overlap, b_similarity)| score > b_overlap as f64 + b_similarity)
                .unwrap_or(true);
            if improves {
                best = Some((idx, overlap, similarity));
            }
        }

        match best {
            Some((idx, overlap, similarity)) => {
                used_secondary[idx] = true;
                alignment.matched.push(TokenPair {
                    primary: token.clone(),
                    secondary: secondary[idx].clone(),
                    overlap,
                    similarity,
                });
            }
            None => alignment.unmatched_primary.push(token.clone()),
        }
    }

    for (idx, token) in secondary.iter().enumerate() {
        if !used_secondary[idx] {
            alignment.unmatched_secondary.push(token.clone());
        }
    }

    alignment
}
