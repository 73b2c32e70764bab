use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use maltcheck_core::detect::{ConfidenceScale, DetectorAdapter, DetectorId, ReplayDetector};
use maltcheck_core::pipeline::{LabelJob, LabelOutcome, LabelPipeline};
use maltcheck_core::store::{RecordStore, find_label_image};

#[derive(Parser)]
#[command(name = "verify")]
#[command(about = "Malt-beverage label compliance verifier")]
struct Args {
    #[arg(help = "Application numbers to process (default: every record with a label image)")]
    applications: Vec<String>,

    #[arg(short, long, default_value = "data.json", help = "Application record store (JSON)")]
    data: String,

    #[arg(
        short,
        long,
        default_value = "labels",
        help = "Label image directory (repeatable)"
    )]
    labels: Vec<String>,

    #[arg(
        short,
        long,
        default_value = "scans",
        help = "Directory of recorded detector scans (<app>.primary.json / <app>.secondary.json)"
    )]
    scans: String,

    #[arg(long, help = "Write verdicts back to the record store")]
    write: bool,

    #[arg(long, help = "Clear stored verdicts and exit")]
    reset: bool,
}

/// Builds a pipeline whose detectors replay this label's recorded scans.
///
/// The primary engine reports confidence on 0-100, the secondary on 0-1;
/// the adapters calibrate both onto the common scale.
fn pipeline_for(scans: &Path, application_num: &str) -> LabelPipeline {
    let primary = DetectorAdapter::new(
        DetectorId::Primary,
        ConfidenceScale::Percent,
        Box::new(ReplayDetector::new(
            scans.join(format!("{application_num}.primary.json")),
        )),
    );
    let secondary = DetectorAdapter::new(
        DetectorId::Secondary,
        ConfidenceScale::Unit,
        Box::new(ReplayDetector::new(
            scans.join(format!("{application_num}.secondary.json")),
        )),
    );

    LabelPipeline::new(primary, secondary)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut store = RecordStore::open(&args.data)?;

    if args.reset {
        store.clear_verdicts();
        store.save()?;
        info!("stored verdicts cleared");
        return Ok(());
    }

    let label_dirs: Vec<PathBuf> = args.labels.iter().map(PathBuf::from).collect();
    let scans = PathBuf::from(&args.scans);

    let applications = if args.applications.is_empty() {
        store.applications_with_images(&label_dirs)
    } else {
        args.applications.clone()
    };
    info!(labels = applications.len(), "processing labels");

    for application_num in applications {
        let record = store.get(&application_num).cloned();
        let image = match find_label_image(&label_dirs, &application_num) {
            Some(path) => path,
            None => {
                warn!(%application_num, "no label image found, skipping");
                continue;
            }
        };

        let pipeline = pipeline_for(&scans, &application_num);
        let report = pipeline
            .process_job(LabelJob {
                application_num: application_num.clone(),
                image,
                record,
            })
            .await;

        println!("{}", serde_json::to_string(&report)?);

        if args.write {
            if let LabelOutcome::Verdict(verdict) = report.outcome {
                store.attach_verdict(verdict)?;
            }
        }
    }

    if args.write {
        store.save()?;
        info!(path = %args.data, "verdicts written to record store");
    }

    Ok(())
}
