//! Slide planning and `.pptx` rendering for per-sample summary decks

pub mod package;
pub mod planner;
pub mod render;
pub mod templates;
pub mod xml;

use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::models::{SummaryConfig, DEFAULT_OUTPUT_NAME};
use crate::sample::scan_directory;

pub use planner::{plan_slide, plan_slides};
pub use render::{build_presentation, render_presentation, RenderReport};

/// What a summary run produced
#[derive(Debug)]
pub struct SummaryOutcome {
    pub output: PathBuf,
    pub samples: usize,
    /// Samples with at least one missing channel
    pub incomplete: usize,
    pub report: RenderReport,
}

/// Default deck location inside a source folder
pub fn default_output(source_dir: &Path) -> PathBuf {
    source_dir.join(DEFAULT_OUTPUT_NAME)
}

/// Scan every source folder, then write one deck with all their samples
///
/// Folders keep their argument order; samples within a folder are sorted by key.
/// Every folder is scanned before anything is written, so a bad folder leaves no
/// output behind.
pub fn build_summary(
    sources: &[PathBuf],
    output: &Path,
    config: &SummaryConfig,
) -> Result<SummaryOutcome> {
    if sources.is_empty() {
        return Err(Error::Config("no source folder given".to_string()));
    }

    let mut plans = Vec::new();
    for dir in sources {
        let samples = scan_directory(dir, config)?;
        info!(
            "{}: {} samples from {} images",
            dir.display(),
            samples.len(),
            samples.file_count()
        );
        plans.extend(plan_slides(&samples, config));
    }

    let incomplete = plans.iter().filter(|plan| !plan.is_complete()).count();
    let report = render_presentation(&plans, &config.geometry, output)?;

    Ok(SummaryOutcome {
        output: output.to_path_buf(),
        samples: plans.len(),
        incomplete,
        report,
    })
}
