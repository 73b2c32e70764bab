use image::DynamicImage;

use crate::error::DetectorError;

use super::token::RawDetection;

/// Capability interface over one underlying text-detection engine.
///
/// The pipeline owns two implementations with uncorrelated error modes and
/// depends only on this trait; concrete engine bindings (native OCR
/// libraries, ONNX sessions, remote services) live behind this seam. An
/// implementation reports detections in its own confidence scale — the
/// adapter, not the engine, is responsible for calibration.
pub trait TextDetector: Send + Sync {
    /// Human-readable engine name, used in logs when a scan degrades.
    fn name(&self) -> &'static str;

    /// Runs the engine over a decoded label image.
    ///
    /// Ordering of the returned detections is engine-defined and carries no
    /// meaning. Errors are recovered by the adapter, never propagated to the
    /// label verdict.
    fn detect(&self, image: &DynamicImage) -> Result<Vec<RawDetection>, DetectorError>;
}
