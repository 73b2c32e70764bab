use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, future, stream};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tokio::{task, time};
use tracing::{debug, info, warn};

use crate::consts::{DETECTOR_TIMEOUT_SECS, WORKER_LIMIT};
use crate::detect::{adapter::DetectorAdapter, token::Token};
use crate::error::{ImageDecodeSnafu, MaltcheckError};
use crate::fusion::{self, FusedToken, FusionConfig};
use crate::store::ApplicationRecord;
use crate::verify::entity::{self, EntityMatchConfig};
use crate::verify::report::{Feature, FeatureStatus, FieldMatch, LabelVerdict};
use crate::verify::spatial::{SpatialConfig, SpatialVerifier};
use crate::verify::warning;

/// Tunables for the whole per-label pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub fusion: FusionConfig,
    pub entity: EntityMatchConfig,
    pub spatial: SpatialConfig,
    /// Wall-clock budget per detector invocation; a slow detector degrades
    /// to an empty scan instead of stalling the label.
    pub detector_timeout: Duration,
    /// Bounded worker pool size for batch processing.
    pub worker_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fusion: FusionConfig::default(),
            entity: EntityMatchConfig::default(),
            spatial: SpatialConfig::default(),
            detector_timeout: Duration::from_secs(DETECTOR_TIMEOUT_SECS),
            worker_limit: WORKER_LIMIT,
        }
    }
}

/// One unit of batch work: an application number, the path to its label
/// image, and the looked-up record (None when the store had no entry).
#[derive(Debug)]
pub struct LabelJob {
    pub application_num: String,
    pub image: PathBuf,
    pub record: Option<ApplicationRecord>,
}

/// Why a label could not be processed at all. Distinct from a non-compliant
/// verdict: these are data precondition failures, not compliance failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnprocessableReason {
    RecordNotFound,
    ImageUnreadable { detail: String },
}

/// Per-label outcome: a full verdict, or an unprocessable marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOutcome {
    Verdict(LabelVerdict),
    Unprocessable(UnprocessableReason),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelReport {
    pub application_num: String,
    pub outcome: LabelOutcome,
}

/// The verification pipeline for one pair of detectors.
///
/// Per label the flow is synchronous and stage-by-stage — scan, fuse,
/// verify, aggregate — with no shared mutable state between stages. Only the
/// two detector invocations run concurrently, and across labels the batch
/// entry point fans out up to the worker limit.
pub struct LabelPipeline {
    primary: Arc<DetectorAdapter>,
    secondary: Arc<DetectorAdapter>,
    spatial: SpatialVerifier,
    config: PipelineConfig,
}

impl LabelPipeline {
    pub fn new(primary: DetectorAdapter, secondary: DetectorAdapter) -> Self {
        Self::with_config(primary, secondary, PipelineConfig::default())
    }

    pub fn with_config(
        primary: DetectorAdapter,
        secondary: DetectorAdapter,
        config: PipelineConfig,
    ) -> Self {
        let spatial = SpatialVerifier::new(config.spatial.clone());
        Self {
            primary: Arc::new(primary),
            secondary: Arc::new(secondary),
            spatial,
            config,
        }
    }

    /// Runs both detectors over one image concurrently, each under the
    /// configured timeout. Neither blocks the other; either may degrade to
    /// an empty scan.
    pub async fn scan(&self, image: &DynamicImage) -> (Vec<Token>, Vec<Token>) {
        future::join(
            self.run_detector(Arc::clone(&self.primary), image.clone()),
            self.run_detector(Arc::clone(&self.secondary), image.clone()),
        )
        .await
    }

    async fn run_detector(&self, adapter: Arc<DetectorAdapter>, image: DynamicImage) -> Vec<Token> {
        let id = adapter.id();
        let handle = task::spawn_blocking(move || adapter.scan(&image));

        match time::timeout(self.config.detector_timeout, handle).await {
            Ok(Ok(tokens)) => tokens,
            Ok(Err(join_err)) => {
                warn!(detector = id.name(), %join_err, "detector task failed, degrading to empty scan");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    detector = id.name(),
                    timeout_ms = self.config.detector_timeout.as_millis() as u64,
                    "detector timed out, degrading to empty scan"
                );
                Vec::new()
            }
        }
    }

    /// Verifies one decoded label image against its application record and
    /// returns the eight-feature verdict.
    pub async fn verify_label(
        &self,
        application_num: &str,
        image: &DynamicImage,
        record: &ApplicationRecord,
    ) -> LabelVerdict {
        let (primary, secondary) = self.scan(image).await;
        debug!(
            primary = primary.len(),
            secondary = secondary.len(),
            "detector scans complete"
        );

        let fused = fusion::fuse(&primary, &secondary, &self.config.fusion);
        debug!(fused = fused.len(), "fusion complete");

        let verdict = LabelVerdict::from_statuses(application_num, |feature| {
            self.feature_status(feature, &fused, record)
        });

        info!(
            %application_num,
            compliant = verdict.is_compliant(),
            "label verified"
        );
        verdict
    }

    fn feature_status(
        &self,
        feature: Feature,
        fused: &[FusedToken],
        record: &ApplicationRecord,
    ) -> FeatureStatus {
        let entity = &self.config.entity;
        match feature {
            Feature::BrandName => entity_status(fused, &record.brand_name, entity),
            Feature::ClassType => entity_status(fused, &record.class_type, entity),
            Feature::FancifulName => match &record.fanciful_name {
                Some(name) => entity_status(fused, name, entity),
                None => FeatureStatus::NotRequired,
            },
            Feature::BottlerName => entity_status(fused, &record.bottler_name, entity),
            Feature::BottlerAddress => entity_status(fused, &record.bottler_address, entity),
            Feature::AlcoholContent => to_status(self.spatial.find_alcohol_content(fused)),
            Feature::NetContents => to_status(self.spatial.find_net_contents(fused)),
            Feature::GovernmentWarning => to_status(warning::verify_warning(fused)),
        }
    }

    /// Processes one batch job end to end. A missing record or unreadable
    /// image marks the label unprocessable; it never aborts the batch.
    pub async fn process_job(&self, job: LabelJob) -> LabelReport {
        let LabelJob {
            application_num,
            image,
            record,
        } = job;

        let Some(record) = record else {
            warn!(%application_num, "no application record, label unprocessable");
            return LabelReport {
                application_num,
                outcome: LabelOutcome::Unprocessable(UnprocessableReason::RecordNotFound),
            };
        };

        let image = match load_image(&image) {
            Ok(image) => image,
            Err(err) => {
                warn!(%application_num, %err, "label image unreadable");
                return LabelReport {
                    application_num,
                    outcome: LabelOutcome::Unprocessable(UnprocessableReason::ImageUnreadable {
                        detail: err.to_string(),
                    }),
                };
            }
        };

        let verdict = self
            .verify_label(&application_num, &image, &record)
            .await;
        LabelReport {
            application_num,
            outcome: LabelOutcome::Verdict(verdict),
        }
    }

    /// Batch entry point: verifies each job with a bounded worker pool and
    /// returns one report per job, in job order.
    pub async fn verify_batch(&self, jobs: Vec<LabelJob>) -> Vec<LabelReport> {
        info!(
            labels = jobs.len(),
            workers = self.config.worker_limit,
            "batch verification started"
        );

        stream::iter(jobs)
            .map(|job| self.process_job(job))
            .buffered(self.config.worker_limit.max(1))
            .collect()
            .await
    }
}

fn entity_status(
    fused: &[FusedToken],
    expected: &str,
    config: &EntityMatchConfig,
) -> FeatureStatus {
    to_status(entity::find_phrase(fused, expected, config))
}

fn to_status(matched: Option<FieldMatch>) -> FeatureStatus {
    matched.map(FeatureStatus::Found).unwrap_or(FeatureStatus::Missing)
}

fn load_image(path: &Path) -> Result<DynamicImage, MaltcheckError> {
    image::open(path).context(ImageDecodeSnafu {
        path: path.to_string_lossy().to_string(),
    })
}
