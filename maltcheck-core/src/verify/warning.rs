use std::collections::HashMap;

use crate::fusion::FusedToken;

use super::report::FieldMatch;

/// The mandated government health-warning statement, word by word, with the
/// exact capitalization and punctuation the regulation requires. This is a
/// fixed legal template, not applicant-supplied text.
pub const WARNING_TEMPLATE: [&str; 43] = [
    "GOVERNMENT",
    "WARNING:",
    "(1)",
    "According",
    "to",
    "the",
    "Surgeon",
    "General,",
    "women",
    "should",
    "not",
    "drink",
    "alcoholic",
    "beverages",
    "during",
    "pregnancy",
    "because",
    "of",
    "the",
    "risk",
    "of",
    "birth",
    "defects.",
    "(2)",
    "Consumption",
    "of",
    "alcoholic",
    "beverages",
    "impairs",
    "your",
    "ability",
    "to",
    "drive",
    "a",
    "car",
    "or",
    "operate",
    "machinery,",
    "and",
    "may",
    "cause",
    "health",
    "problems.",
];

/// Verifies the government warning appears with exact required wording.
///
/// Unlike every other check in the pipeline this one is strict, not fuzzy: a
/// lowercase "government", a dropped comma, or a missing period each fail
/// the statement. Each template word must occur among the fused tokens at
/// least as many times as the template repeats it. Bold typography is not
/// observable from detector text output and is not checked.
pub fn verify_warning(tokens: &[FusedToken]) -> Option<FieldMatch> {
    let mut required: HashMap<&str, usize> = HashMap::new();
    for word in WARNING_TEMPLATE {
        *required.entry(word).or_insert(0) += 1;
    }

    let mut available: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *available.entry(token.text.as_str()).or_insert(0) += 1;
    }

    let complete = required
        .iter()
        .all(|(word, count)| available.get(word).copied().unwrap_or(0) >= *count);
    if !complete {
        return None;
    }

    // Containment passed, so the heading words exist; anchor the match on
    // them rather than on the full paragraph extent.
    let government = tokens.iter().find(|t| t.text == "GOVERNMENT")?;
    let bbox = tokens
        .iter()
        .find(|t| t.text == "WARNING:")
        .map(|warning| government.bbox.union(&warning.bbox))
        .unwrap_or(government.bbox);

    Some(FieldMatch {
        text: WARNING_TEMPLATE.join(" "),
        bbox,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::bbox::Bbox;
    use crate::detect::token::DetectorId;
    use crate::fusion::Provenance;
    use glam::Vec2;

    fn tokens_of(words: &[&str]) -> Vec<FusedToken> {
        words
            .iter()
            .enumerate()
            .map(|(i, word)| FusedToken {
                text: word.to_string(),
                bbox: Bbox::from_min_size(
                    Vec2::new((i % 10) as f32 * 50.0, (i / 10) as f32 * 25.0),
                    Vec2::new(45.0, 20.0),
                ),
                confidence: 0.9,
                provenance: Provenance::Single(DetectorId::Primary),
            })
            .collect()
    }

    #[test]
    fn test_exact_template_is_found() {
        let tokens = tokens_of(&WARNING_TEMPLATE);
        let found = verify_warning(&tokens).expect("exact template");
        assert!(found.text.starts_with("GOVERNMENT WARNING:"));
    }

    #[test]
    fn test_surrounding_text_does_not_interfere() {
        let mut words = vec!["GOLDEN", "HOUR", "LAGER"];
        words.extend_from_slice(&WARNING_TEMPLATE);
        words.push("12oz");
        assert!(verify_warning(&tokens_of(&words)).is_some());
    }

    #[test]
    fn test_missing_comma_fails() {
        let words: Vec<&str> = WARNING_TEMPLATE
            .iter()
            .map(|w| if *w == "General," { "General" } else { *w })
            .collect();
        assert!(verify_warning(&tokens_of(&words)).is_none());
    }

    #[test]
    fn test_capitalization_mismatch_fails() {
        let words: Vec<&str> = WARNING_TEMPLATE
            .iter()
            .map(|w| if *w == "GOVERNMENT" { "Government" } else { *w })
            .collect();
        assert!(verify_warning(&tokens_of(&words)).is_none());
    }

    #[test]
    fn test_omitted_word_fails() {
        let words: Vec<&str> = WARNING_TEMPLATE
            .iter()
            .filter(|w| **w != "pregnancy")
            .copied()
            .collect();
        assert!(verify_warning(&tokens_of(&words)).is_none());
    }

    #[test]
    fn test_repeated_words_must_repeat() {
        // "of" appears three times in the template; two occurrences are not
        // enough even though the word itself is present.
        let mut seen = 0;
        let words: Vec<&str> = WARNING_TEMPLATE
            .iter()
            .filter(|w| {
                if **w == "of" {
                    seen += 1;
                    seen != 3
                } else {
                    true
                }
            })
            .copied()
            .collect();
        assert!(verify_warning(&tokens_of(&words)).is_none());
    }

    #[test]
    fn test_anchor_region_covers_heading() {
        let tokens = tokens_of(&WARNING_TEMPLATE);
        let found = verify_warning(&tokens).unwrap();
        // GOVERNMENT at (0,0), WARNING: at (50,0): union spans both.
        assert_eq!(found.bbox.min, Vec2::new(0.0, 0.0));
        assert_eq!(found.bbox.max, Vec2::new(95.0, 20.0));
    }

    #[test]
    fn test_empty_tokens() {
        assert!(verify_warning(&[]).is_none());
    }
}
