pub mod analysis;
pub mod consts;
pub mod detect;
pub mod error;
pub mod fusion;
pub mod pipeline;
pub mod store;
pub mod verify;

// Re-export commonly used types
pub use pipeline::{LabelJob, LabelOutcome, LabelPipeline, LabelReport, PipelineConfig};
pub use store::{ApplicationRecord, RecordStore};
pub use verify::report::{Feature, FeatureResult, FeatureStatus, LabelVerdict};
