use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MaltcheckError {
    #[snafu(display("Image `{}` could not be decoded: {}", path, source))]
    ImageDecode {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("No application record for `{}`", application_num))]
    RecordNotFound { application_num: String },
    #[snafu(display("Read record store `{}` error: {}", path, source))]
    StoreRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Write record store `{}` error: {}", path, source))]
    StoreWrite {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Record store `{}` is not valid JSON: {}", path, source))]
    StoreFormat {
        source: serde_json::Error,
        path: String,
    },
}

/// Failures local to one text-detection engine.
///
/// These never escape the adapter boundary: the adapter logs the failure and
/// degrades to an empty token sequence so the surviving detector still
/// contributes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DetectorError {
    #[snafu(display("Engine `{}` failed: {}", detector, message))]
    Engine { detector: String, message: String },
    #[snafu(display("Read scan `{}` error: {}", path, source))]
    ScanRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Scan `{}` is not valid JSON: {}", path, source))]
    ScanFormat {
        source: serde_json::Error,
        path: String,
    },
}
