use serde::{Deserialize, Serialize};

use crate::analysis::bbox::Bbox;

/// The closed set of label elements required for a malt-beverage label to
/// comply. Exactly one [`FeatureResult`] per variant makes up a verdict;
/// keeping this an enum lets the aggregation step prove completeness at
/// compile time instead of tracking free-form strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    BrandName,
    ClassType,
    FancifulName,
    BottlerName,
    BottlerAddress,
    AlcoholContent,
    NetContents,
    GovernmentWarning,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::BrandName,
        Feature::ClassType,
        Feature::FancifulName,
        Feature::BottlerName,
        Feature::BottlerAddress,
        Feature::AlcoholContent,
        Feature::NetContents,
        Feature::GovernmentWarning,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Feature::BrandName => "brand name",
            Feature::ClassType => "class",
            Feature::FancifulName => "fanciful name",
            Feature::BottlerName => "bottler name",
            Feature::BottlerAddress => "bottler address",
            Feature::AlcoholContent => "alcohol content",
            Feature::NetContents => "net content",
            Feature::GovernmentWarning => "government warning",
        }
    }
}

/// Verified text and where it sits on the label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub text: String,
    pub bbox: Bbox,
}

/// Outcome of one feature check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    /// Present, correctly formatted, and located.
    Found(FieldMatch),
    /// Could not be matched or verified. The normal negative outcome, not an
    /// error.
    Missing,
    /// The applicant did not submit this field, so there is nothing to
    /// verify. Only the fanciful name can resolve this way.
    NotRequired,
}

/// Verification outcome for one required label feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureResult {
    pub feature: Feature,
    pub status: FeatureStatus,
}

impl FeatureResult {
    pub fn is_missing(&self) -> bool {
        self.status == FeatureStatus::Missing
    }
}

/// Aggregate verdict for one label: exactly eight feature results, one per
/// [`Feature`] variant in declaration order. Compliant iff nothing is
/// missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelVerdict {
    pub application_num: String,
    pub results: Vec<FeatureResult>,
}

impl LabelVerdict {
    /// Builds a verdict by resolving every feature through `status_for`.
    ///
    /// Iterating [`Feature::ALL`] guarantees each of the eight features is
    /// reported exactly once; a feature absent from the candidate sets shows
    /// up as `Missing` rather than being dropped.
    pub fn from_statuses(
        application_num: impl Into<String>,
        mut status_for: impl FnMut(Feature) -> FeatureStatus,
    ) -> Self {
        let results = Feature::ALL
            .iter()
            .map(|&feature| FeatureResult {
                feature,
                status: status_for(feature),
            })
            .collect();

        Self {
            application_num: application_num.into(),
            results,
        }
    }

    pub fn is_compliant(&self) -> bool {
        !self.results.iter().any(FeatureResult::is_missing)
    }

    /// Features that failed verification, in declaration order.
    pub fn failures(&self) -> Vec<Feature> {
        self.results
            .iter()
            .filter(|r| r.is_missing())
            .map(|r| r.feature)
            .collect()
    }

    pub fn result(&self, feature: Feature) -> Option<&FeatureResult> {
        self.results.iter().find(|r| r.feature == feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn found() -> FeatureStatus {
        FeatureStatus::Found(FieldMatch {
            text: "x".to_string(),
            bbox: Bbox::from_min_size(Vec2::ZERO, Vec2::ONE),
        })
    }

    #[test]
    fn test_verdict_reports_all_eight_features() {
        let verdict = LabelVerdict::from_statuses("24001", |_| FeatureStatus::Missing);
        assert_eq!(verdict.results.len(), 8);
        assert_eq!(verdict.failures().len(), 8);
        assert!(!verdict.is_compliant());
    }

    #[test]
    fn test_compliant_iff_nothing_missing() {
        let verdict = LabelVerdict::from_statuses("24001", |_| found());
        assert!(verdict.is_compliant());
        assert!(verdict.failures().is_empty());

        let verdict = LabelVerdict::from_statuses("24001", |f| match f {
            Feature::GovernmentWarning => FeatureStatus::Missing,
            _ => found(),
        });
        assert!(!verdict.is_compliant());
        assert_eq!(verdict.failures(), vec![Feature::GovernmentWarning]);
    }

    #[test]
    fn test_not_required_does_not_fail_the_label() {
        let verdict = LabelVerdict::from_statuses("24001", |f| match f {
            Feature::FancifulName => FeatureStatus::NotRequired,
            _ => found(),
        });
        assert!(verdict.is_compliant());
    }

    #[test]
    fn test_verdict_round_trips_through_json() {
        let verdict = LabelVerdict::from_statuses("24001", |_| found());
        let json = serde_json::to_string(&verdict).unwrap();
        let back: LabelVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, verdict);
    }
}
