use glam::Vec2;
use image::DynamicImage;
use regex::Regex;
use tracing::warn;

use crate::analysis::bbox::Bbox;
use crate::consts::READING_ORDER_TOLERANCE;

use super::{
    engine::TextDetector,
    token::{DetectorId, RawDetection, Token, sort_reading_order},
};

/// How an engine reports confidence natively.
///
/// Normalizing at the adapter boundary keeps the fusion logic
/// detector-agnostic: downstream code only ever sees [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfidenceScale {
    /// Already on [0, 1].
    Unit,
    /// Reported on [0, 100].
    Percent,
}

impl ConfidenceScale {
    pub fn normalize(&self, raw: f32) -> f32 {
        let scaled = match self {
            ConfidenceScale::Unit => raw,
            ConfidenceScale::Percent => raw / 100.0,
        };
        scaled.clamp(0.0, 1.0)
    }
}

/// Normalizes one engine's heterogeneous output onto the common [`Token`]
/// contract: calibrated confidence, cleaned word-level text, regions clamped
/// to the image, reading order.
///
/// Failure policy: an engine error or empty scan yields an empty token
/// sequence so the fusion step can still operate on the surviving detector's
/// output. Nothing here ever fails a label.
pub struct DetectorAdapter {
    id: DetectorId,
    scale: ConfidenceScale,
    engine: Box<dyn TextDetector>,
    spaced_letters: Regex,
}

impl DetectorAdapter {
    pub fn new(id: DetectorId, scale: ConfidenceScale, engine: Box<dyn TextDetector>) -> Self {
        // "C O M P A N Y" style output: one engine occasionally spaces out
        // the letters of a word it read as a unit. Such detections must not
        // be split into per-letter tokens.
        let spaced_letters = Regex::new(r"[A-Za-z] [A-Za-z] ").expect("valid pattern");

        Self {
            id,
            scale,
            engine,
            spaced_letters,
        }
    }

    pub fn id(&self) -> DetectorId {
        self.id
    }

    /// Runs the engine and returns normalized tokens, empty on any failure.
    pub fn scan(&self, image: &DynamicImage) -> Vec<Token> {
        let raw = match self.engine.detect(image) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    detector = self.id.name(),
                    engine = self.engine.name(),
                    %err,
                    "detector failed, degrading to empty scan"
                );
                return Vec::new();
            }
        };

        let bounds = Vec2::new(image.width() as f32, image.height() as f32);
        let mut tokens = Vec::with_capacity(raw.len());
        for detection in raw {
            self.normalize(detection, bounds, &mut tokens);
        }

        sort_reading_order(&mut tokens, |t| t.bbox.center(), READING_ORDER_TOLERANCE);
        tokens
    }

    fn normalize(&self, detection: RawDetection, bounds: Vec2, out: &mut Vec<Token>) {
        let text = detection.text.trim();
        if text.is_empty() {
            return;
        }

        let confidence = self.scale.normalize(detection.confidence);
        let bbox = detection.bbox.clamp(Vec2::ZERO, bounds);

        if !text.contains(char::is_whitespace) || self.spaced_letters.is_match(text) {
            out.push(Token {
                text: text.to_string(),
                bbox,
                confidence,
                source: self.id,
            });
            return;
        }

        // Multi-word detection: one token per word, the region divided
        // horizontally in proportion to word length.
        let words: Vec<&str> = text.split_whitespace().collect();
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        if total_chars == 0 {
            return;
        }

        let mut cursor = bbox.min.x;
        let width = bbox.width();
        for word in words {
            let share = word.chars().count() as f32 / total_chars as f32;
            let word_width = width * share;
            out.push(Token {
                text: word.to_string(),
                bbox: Bbox::new(
                    Vec2::new(cursor, bbox.min.y),
                    Vec2::new(cursor + word_width, bbox.max.y),
                ),
                confidence,
                source: self.id,
            });
            cursor += word_width;
        }
    }
}
