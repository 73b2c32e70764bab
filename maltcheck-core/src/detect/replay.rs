use std::path::PathBuf;

use image::DynamicImage;
use snafu::ResultExt;

use crate::error::{DetectorError, ScanFormatSnafu, ScanReadSnafu};

use super::{engine::TextDetector, token::RawDetection};

/// Serves a previously captured engine scan from disk.
///
/// A scan is a JSON array of [`RawDetection`]s in the engine's native
/// confidence scale. Replaying captures lets the pipeline, fixtures, and the
/// CLI run without the engine binaries installed; live bindings implement
/// [`TextDetector`] directly.
pub struct ReplayDetector {
    path: PathBuf,
}

impl ReplayDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextDetector for ReplayDetector {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn detect(&self, _image: &DynamicImage) -> Result<Vec<RawDetection>, DetectorError> {
        let path = self.path.to_string_lossy().to_string();
        let data = std::fs::read_to_string(&self.path).context(ScanReadSnafu { path: &path })?;

        serde_json::from_str(&data).context(ScanFormatSnafu { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::bbox::Bbox;
    use glam::Vec2;
    use std::io::Write;

    #[test]
    fn test_replays_recorded_scan() {
        let detections = vec![RawDetection {
            text: "LAGER".to_string(),
            bbox: Bbox::from_min_size(Vec2::new(10.0, 10.0), Vec2::new(60.0, 20.0)),
            confidence: 87.0,
        }];

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&detections).unwrap().as_bytes())
            .unwrap();

        let detector = ReplayDetector::new(file.path());
        let image = DynamicImage::new_rgb8(1, 1);
        let replayed = detector.detect(&image).unwrap();

        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[0].text, "LAGER");
        assert_eq!(replayed[0].confidence, 87.0);
    }

    #[test]
    fn test_missing_scan_is_an_engine_error() {
        let detector = ReplayDetector::new("/nonexistent/scan.json");
        let image = DynamicImage::new_rgb8(1, 1);
        assert!(detector.detect(&image).is_err());
    }
}
