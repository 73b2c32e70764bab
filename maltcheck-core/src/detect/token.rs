use serde::{Deserialize, Serialize};

use crate::analysis::bbox::Bbox;

/// Identity of one of the two text-detection engines feeding the pipeline.
///
/// Fusion and verification never dispatch on this — it exists for provenance
/// and for per-detector calibration at the adapter boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorId {
    Primary,
    Secondary,
}

impl DetectorId {
    pub const fn name(&self) -> &'static str {
        match self {
            DetectorId::Primary => "primary",
            DetectorId::Secondary => "secondary",
        }
    }
}

/// One raw detection as reported by an engine: text, bounding region, and a
/// confidence score in the engine's native scale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDetection {
    pub text: String,
    pub bbox: Bbox,
    pub confidence: f32,
}

/// A single unit of detected text on the common contract: cleaned word,
/// bounding region in image coordinates, confidence normalized to [0, 1],
/// and the detector it came from. Immutable once produced by an adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub text: String,
    pub bbox: Bbox,
    pub confidence: f32,
    pub source: DetectorId,
}

/// Sorts items into reading order: top-to-bottom, left-to-right.
///
/// Centers within `line_tolerance` vertical distance are treated as the same
/// printed line and ordered by X instead.
pub fn sort_reading_order<T>(
    items: &mut [T],
    center: impl Fn(&T) -> glam::Vec2,
    line_tolerance: f32,
) {
    items.sort_by(|a, b| {
        let a_center = center(a);
        let b_center = center(b);

        let y_diff = a_center.y - b_center.y;
        if y_diff.abs() <= line_tolerance {
            a_center
                .x
                .partial_cmp(&b_center.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_diff
                .partial_cmp(&0.0)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn token(text: &str, x: f32, y: f32) -> Token {
        Token {
            text: text.to_string(),
            bbox: Bbox::from_min_size(Vec2::new(x, y), Vec2::new(10.0, 10.0)),
            confidence: 0.9,
            source: DetectorId::Primary,
        }
    }

    #[test]
    fn test_reading_order_lines_then_columns() {
        let mut tokens = vec![
            token("third", 0.0, 100.0),
            token("second", 200.0, 3.0), // same line as "first", further right
            token("first", 0.0, 0.0),
        ];

        sort_reading_order(&mut tokens, |t| t.bbox.center(), 10.0);

        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_reading_order_strict_lines_without_tolerance() {
        let mut tokens = vec![token("b", 200.0, 5.0), token("a", 0.0, 0.0)];
        sort_reading_order(&mut tokens, |t| t.bbox.center(), 0.0);
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[1].text, "b");
    }
}
