pub mod adapter;
pub mod engine;
pub mod replay;
pub mod token;

pub use adapter::{ConfidenceScale, DetectorAdapter};
pub use engine::TextDetector;
pub use replay::ReplayDetector;
pub use token::{DetectorId, RawDetection, Token};
