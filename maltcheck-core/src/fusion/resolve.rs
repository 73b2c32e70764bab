use crate::detect::token::Token;

use super::{FusedToken, FusionConfig, Provenance, TieBreak, align::Alignment, align::TokenPair};

/// Turns an alignment into the final fused sequence.
///
/// Matched pairs are arbitrated by confidence; tokens seen by only one
/// detector pass through as low-certainty singles.
pub fn resolve(alignment: Alignment, config: &FusionConfig) -> Vec<FusedToken> {
    let mut fused =
        Vec::with_capacity(alignment.matched.len() + alignment.unmatched_primary.len());

    for pair in alignment.matched {
        fused.push(resolve_pair(pair, config.tie_break));
    }
    for token in alignment.unmatched_primary {
        fused.push(pass_through(token));
    }
    for token in alignment.unmatched_secondary {
        fused.push(pass_through(token));
    }

    fused
}

fn resolve_pair(pair: TokenPair, tie_break: TieBreak) -> FusedToken {
    let TokenPair {
        primary, secondary, ..
    } = pair;

    let primary_wins = if primary.confidence == secondary.confidence {
        tie_break == TieBreak::PreferPrimary
    } else {
        primary.confidence > secondary.confidence
    };
    let winner = if primary_wins { &primary } else { &secondary };

    // When both engines read the same word, each region is an independent
    // estimate of the same word extent; their union approximates it better
    // than either alone. On disagreement only the winning reading's region
    // is trustworthy.
    let bbox = if primary.text == secondary.text {
        primary.bbox.union(&secondary.bbox)
    } else {
        winner.bbox
    };

    FusedToken {
        text: winner.text.clone(),
        bbox,
        confidence: primary.confidence.max(secondary.confidence),
        provenance: Provenance::Fused {
            primary: primary.confidence,
            secondary: secondary.confidence,
        },
    }
}

fn pass_through(token: Token) -> FusedToken {
    FusedToken {
        text: token.text,
        bbox: token.bbox,
        confidence: token.confidence,
        provenance: Provenance::Single(token.source),
    }
}
