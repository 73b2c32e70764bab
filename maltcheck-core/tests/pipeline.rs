//! End-to-end pipeline scenarios: two static detectors over a synthetic
//! label, through fusion and verification to the batch entry point.

use std::path::{Path, PathBuf};

use glam::Vec2;
use image::DynamicImage;

use maltcheck_core::analysis::bbox::Bbox;
use maltcheck_core::detect::{
    ConfidenceScale, DetectorAdapter, DetectorId, RawDetection, TextDetector,
};
use maltcheck_core::error::DetectorError;
use maltcheck_core::pipeline::{LabelJob, LabelOutcome, LabelPipeline};
use maltcheck_core::store::ApplicationRecord;
use maltcheck_core::verify::report::{Feature, FeatureStatus};
use maltcheck_core::verify::warning::WARNING_TEMPLATE;

struct StaticEngine {
    detections: Vec<RawDetection>,
    confidence: f32,
}

impl TextDetector for StaticEngine {
    fn name(&self) -> &'static str {
        "static"
    }

    fn detect(&self, _image: &DynamicImage) -> Result<Vec<RawDetection>, DetectorError> {
        Ok(self
            .detections
            .iter()
            .map(|d| RawDetection {
                confidence: self.confidence,
                ..d.clone()
            })
            .collect())
    }
}

/// Lays words out in rows, eight per row, far enough apart that adjacent
/// tokens cluster but distinct areas of the label do not merge by accident.
fn spread(words: &[&str], origin: Vec2, x_step: f32) -> Vec<RawDetection> {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let col = (i % 8) as f32;
            let row = (i / 8) as f32;
            RawDetection {
                text: word.to_string(),
                bbox: Bbox::from_min_size(
                    origin + Vec2::new(col * x_step, row * 25.0),
                    Vec2::new(55.0, 18.0),
                ),
                confidence: 0.0,
            }
        })
        .collect()
}

/// Every detection a well-formed, fully compliant label produces.
fn compliant_label() -> Vec<RawDetection> {
    let mut detections = Vec::new();
    detections.extend(spread(&["GOLDEN", "HOUR"], Vec2::new(200.0, 20.0), 65.0));
    detections.extend(spread(&["LAGER"], Vec2::new(250.0, 60.0), 65.0));
    detections.extend(spread(&["SUNSET", "POUR"], Vec2::new(200.0, 90.0), 65.0));
    detections.extend(spread(
        &["GOLDEN", "HOUR", "BREWING", "COMPANY"],
        Vec2::new(100.0, 140.0),
        65.0,
    ));
    detections.extend(spread(&["PORTLAND,", "OR"], Vec2::new(150.0, 170.0), 65.0));
    detections.extend(spread(&["4.8%", "ALC/VOL"], Vec2::new(40.0, 220.0), 65.0));
    detections.extend(spread(&["12", "FL.", "OZ."], Vec2::new(400.0, 220.0), 45.0));
    detections.extend(spread(&WARNING_TEMPLATE, Vec2::new(40.0, 300.0), 65.0));
    detections
}

fn record(application_num: &str) -> ApplicationRecord {
    ApplicationRecord {
        application_num: application_num.to_string(),
        brand_name: "Golden Hour".to_string(),
        class_type: "Lager".to_string(),
        fanciful_name: Some("Sunset Pour".to_string()),
        bottler_name: "Golden Hour Brewing Company".to_string(),
        bottler_address: "Portland, OR".to_string(),
        verdict: None,
    }
}

fn pipeline_over(detections: Vec<RawDetection>) -> LabelPipeline {
    let primary = DetectorAdapter::new(
        DetectorId::Primary,
        ConfidenceScale::Percent,
        Box::new(StaticEngine {
            detections: detections.clone(),
            confidence: 90.0,
        }),
    );
    let secondary = DetectorAdapter::new(
        DetectorId::Secondary,
        ConfidenceScale::Unit,
        Box::new(StaticEngine {
            detections,
            confidence: 0.85,
        }),
    );
    LabelPipeline::new(primary, secondary)
}

fn write_label_image(dir: &Path, application_num: &str) -> PathBuf {
    let path = dir.join(format!("{application_num}.png"));
    image::RgbImage::new(640, 480).save(&path).unwrap();
    path
}

#[tokio::test]
async fn test_compliant_label_passes_all_eight_checks() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_label_image(dir.path(), "24001");

    let pipeline = pipeline_over(compliant_label());
    let reports = pipeline
        .verify_batch(vec![LabelJob {
            application_num: "24001".to_string(),
            image,
            record: Some(record("24001")),
        }])
        .await;

    assert_eq!(reports.len(), 1);
    let LabelOutcome::Verdict(verdict) = &reports[0].outcome else {
        panic!("expected a verdict, got {:?}", reports[0].outcome);
    };

    assert!(verdict.is_compliant(), "failures: {:?}", verdict.failures());
    assert_eq!(verdict.results.len(), 8);
    for result in &verdict.results {
        assert!(
            matches!(result.status, FeatureStatus::Found(_)),
            "{} not found",
            result.feature.name()
        );
    }
}

#[tokio::test]
async fn test_label_without_warning_fails_exactly_that_feature() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_label_image(dir.path(), "24001");

    let detections: Vec<RawDetection> = compliant_label()
        .into_iter()
        .filter(|d| !WARNING_TEMPLATE.contains(&d.text.as_str()))
        .collect();

    let pipeline = pipeline_over(detections);
    let reports = pipeline
        .verify_batch(vec![LabelJob {
            application_num: "24001".to_string(),
            image,
            record: Some(record("24001")),
        }])
        .await;

    let LabelOutcome::Verdict(verdict) = &reports[0].outcome else {
        panic!("expected a verdict");
    };

    assert!(!verdict.is_compliant());
    assert_eq!(verdict.failures(), vec![Feature::GovernmentWarning]);
}

#[tokio::test]
async fn test_missing_record_is_unprocessable_not_noncompliant() {
    let dir = tempfile::tempdir().unwrap();
    let known = write_label_image(dir.path(), "24001");
    let unknown = write_label_image(dir.path(), "24099");

    let pipeline = pipeline_over(compliant_label());
    let reports = pipeline
        .verify_batch(vec![
            LabelJob {
                application_num: "24099".to_string(),
                image: unknown,
                record: None,
            },
            LabelJob {
                application_num: "24001".to_string(),
                image: known,
                record: Some(record("24001")),
            },
        ])
        .await;

    // One bad label never fails the batch; reports come back in job order.
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].application_num, "24099");
    assert!(matches!(reports[0].outcome, LabelOutcome::Unprocessable(_)));
    assert!(matches!(reports[1].outcome, LabelOutcome::Verdict(_)));
}

#[tokio::test]
async fn test_reruns_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_label_image(dir.path(), "24001");

    let pipeline = pipeline_over(compliant_label());

    let job = || LabelJob {
        application_num: "24001".to_string(),
        image: image.clone(),
        record: Some(record("24001")),
    };
    let first = pipeline.verify_batch(vec![job()]).await;
    let second = pipeline.verify_batch(vec![job()]).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_fanciful_name_not_required_when_unsubmitted() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_label_image(dir.path(), "24002");

    // Label prints no fanciful name and the application carries none.
    let detections: Vec<RawDetection> = compliant_label()
        .into_iter()
        .filter(|d| d.text != "SUNSET" && d.text != "POUR")
        .collect();

    let mut record = record("24002");
    record.fanciful_name = None;

    let pipeline = pipeline_over(detections);
    let reports = pipeline
        .verify_batch(vec![LabelJob {
            application_num: "24002".to_string(),
            image,
            record: Some(record),
        }])
        .await;

    let LabelOutcome::Verdict(verdict) = &reports[0].outcome else {
        panic!("expected a verdict");
    };

    assert!(verdict.is_compliant());
    assert_eq!(
        verdict.result(Feature::FancifulName).unwrap().status,
        FeatureStatus::NotRequired
    );
}
