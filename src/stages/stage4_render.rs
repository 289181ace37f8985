use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::io::StatsReport;

/// Configuration for Stage 4 rendering
#[derive(Debug, Clone)]
pub struct Stage4Config {
    /// Whether to write the JSON report
    pub generate_json: bool,
    /// Whether to write the text report
    pub generate_text: bool,
}

impl Default for Stage4Config {
    fn default() -> Self {
        Self {
            generate_json: true,
            generate_text: true,
        }
    }
}

/// Result of Stage 4 rendering
#[derive(Debug, Default)]
pub struct Stage4Result {
    pub json_path: Option<PathBuf>,
    pub text_path: Option<PathBuf>,
}

/// Execute Stage 4: write the statistics report into `output_dir`
///
/// Both files share the report's file stem, so a case number and policy
/// tag identify them.
pub fn execute_stage4(
    report: &StatsReport,
    output_dir: &Path,
    config: &Stage4Config,
) -> Result<Stage4Result> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let stem = report.file_stem();
    let mut result = Stage4Result::default();

    if config.generate_text {
        let path = output_dir.join(format!("{}.txt", stem));
        info!("Writing text report to {:?}", path);
        report.write_text(&path)?;
        result.text_path = Some(path);
    }

    if config.generate_json {
        let path = output_dir.join(format!("{}.json", stem));
        info!("Writing JSON report to {:?}", path);
        report.write_json(&path)?;
        result.json_path = Some(path);
    }

    Ok(result)
}
