pub mod entity;
pub mod report;
pub mod spatial;
pub mod warning;

pub use entity::{EntityMatchConfig, find_phrase};
pub use report::{Feature, FeatureResult, FeatureStatus, FieldMatch, LabelVerdict};
pub use spatial::{SpatialConfig, SpatialVerifier};
pub use warning::verify_warning;
