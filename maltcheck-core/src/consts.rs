/// Minimum overlap ratio for pairing tokens across the two detectors.
///
/// Overlap ratio (intersection over the smaller area) is more lenient than
/// IoU when the two engines draw boxes of different tightness around the
/// same printed word. Pairs below this ratio must instead qualify through
/// text similarity.
///
/// Typical range: 0.3 - 0.7
pub const PAIR_OVERLAP_RATIO: f32 = 0.5;

/// Minimum normalized text similarity for pairing tokens across detectors.
///
/// Applied when bounding regions do not overlap enough on their own. The
/// value mirrors the fuzz-ratio style cutoff the detectors were tuned
/// against: low enough to survive single-character OCR substitutions, high
/// enough that unrelated words on the same line do not pair.
pub const PAIR_TEXT_SIMILARITY: f64 = 0.6;

/// Vertical distance (pixels) within which two tokens count as the same
/// printed line during candidate pairing.
pub const PAIR_LINE_TOLERANCE: f32 = 25.0;

/// Vertical tolerance (pixels) for treating tokens as one line when sorting
/// into reading order.
pub const READING_ORDER_TOLERANCE: f32 = 10.0;

/// Minimum similarity for accepting a fuzzy match between a token span and
/// an application field.
///
/// Tuned conservatively: a false "found" approves a non-compliant label,
/// while a false "missing" only costs a reviewer a second look. Raise to
/// tighten, lower only with a labeled test set to back it up.
///
/// Typical range: 0.7 - 0.9
pub const ENTITY_SIMILARITY_THRESHOLD: f64 = 0.8;

/// How many tokens a candidate span may deviate from the expected phrase
/// length and still be scored. Absorbs detector over- and under-splitting.
pub const ENTITY_WINDOW_SLACK: usize = 1;

/// Neighborhood radius (pixels) for density clustering of token centers.
///
/// Tokens within this distance of each other end up in the same cluster,
/// which approximates a printed text block or paragraph. Larger values merge
/// neighboring blocks; smaller values fragment paragraphs into lines.
pub const CLUSTER_EPS: f32 = 100.0;

/// Minimum number of neighbors for a clustering core point. At 1 every token
/// joins some cluster; raise to shed isolated noise tokens.
pub const CLUSTER_MIN_POINTS: usize = 1;

/// Maximum distance (pixels) between a numeric token and a unit token for a
/// net-contents statement to count as co-located.
pub const UNIT_PROXIMITY: f32 = 60.0;

/// Per-detector wall-clock budget. A detector that has not answered within
/// this window degrades to an empty scan rather than stalling the label.
pub const DETECTOR_TIMEOUT_SECS: u64 = 30;

/// Bounded worker pool size for batch processing. Detector engines are
/// usually the memory-bound resource, so labels fan out only this wide.
pub const WORKER_LIMIT: usize = 4;

/// File extension label images are stored under, keyed by application number.
pub const LABEL_IMAGE_EXT: &str = "png";
