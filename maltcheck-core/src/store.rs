use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::debug;

use crate::consts::LABEL_IMAGE_EXT;
use crate::error::{MaltcheckError, StoreFormatSnafu, StoreReadSnafu, StoreWriteSnafu};
use crate::verify::report::LabelVerdict;

/// Ground-truth metadata the applicant submitted for one label.
///
/// Read-only to the verification core apart from the attached verdict. The
/// serde names match the store's JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_num: String,
    pub brand_name: String,
    #[serde(rename = "class")]
    pub class_type: String,
    /// Optional: an applicant only submits a fanciful name when the brand
    /// name does not describe the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fanciful_name: Option<String>,
    pub bottler_name: String,
    pub bottler_address: String,
    #[serde(
        rename = "processing_result",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verdict: Option<LabelVerdict>,
}

/// Application record store backed by one JSON file (an array of records),
/// keyed by application number.
///
/// The core needs three operations from whatever persists applications:
/// read a record by key, attach or clear a verdict, and list which
/// applications have a label image available.
pub struct RecordStore {
    path: PathBuf,
    records: Vec<ApplicationRecord>,
}

impl RecordStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MaltcheckError> {
        let path = path.into();
        let display = path.to_string_lossy().to_string();

        let data = std::fs::read_to_string(&path).context(StoreReadSnafu { path: &display })?;
        let records: Vec<ApplicationRecord> =
            serde_json::from_str(&data).context(StoreFormatSnafu { path: display })?;

        debug!(records = records.len(), path = %path.display(), "record store loaded");
        Ok(Self { path, records })
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, application_num: &str) -> Option<&ApplicationRecord> {
        self.records
            .iter()
            .find(|r| r.application_num == application_num)
    }

    /// Attaches a verdict to its record, keyed by the verdict's application
    /// number. Fails with `RecordNotFound` when no such record exists.
    pub fn attach_verdict(&mut self, verdict: LabelVerdict) -> Result<(), MaltcheckError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.application_num == verdict.application_num)
            .ok_or_else(|| MaltcheckError::RecordNotFound {
                application_num: verdict.application_num.clone(),
            })?;

        record.verdict = Some(verdict);
        Ok(())
    }

    /// Removes every stored verdict, leaving the application data intact.
    pub fn clear_verdicts(&mut self) {
        for record in &mut self.records {
            record.verdict = None;
        }
    }

    pub fn save(&self) -> Result<(), MaltcheckError> {
        let display = self.path.to_string_lossy().to_string();
        let data = serde_json::to_string_pretty(&self.records)
            .context(StoreFormatSnafu { path: &display })?;

        std::fs::write(&self.path, data).context(StoreWriteSnafu { path: display })
    }

    /// Application numbers that both exist in the store and have a label
    /// image in one of the given directories, in store order.
    pub fn applications_with_images(&self, image_dirs: &[PathBuf]) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| find_label_image(image_dirs, &r.application_num).is_some())
            .map(|r| r.application_num.clone())
            .collect()
    }
}

/// Maps an application number to its label image (`<application_num>.png`)
/// in the first directory that has one.
pub fn find_label_image(image_dirs: &[PathBuf], application_num: &str) -> Option<PathBuf> {
    image_dirs
        .iter()
        .map(|dir| dir.join(format!("{application_num}.{LABEL_IMAGE_EXT}")))
        .find(|path| path.exists())
}
