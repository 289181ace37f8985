use tracing::info;

use crate::heuristics::{EscalationPolicy, HeuristicsConfig};
use crate::llm::QuestionClassifier;
use crate::models::DefaultExaminerKey;
use crate::stages::{
    analyze_ranges, merge_analyses, partition_by_witness, resolve_default_examiners,
    resolve_pending, skip_pending, LineRange, MergedAnalysis, Stage2Config, Stage3Config,
    Stage3Result,
};

/// Settings for a full analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub heuristics: HeuristicsConfig,
    pub policy: EscalationPolicy,
    pub classification: Stage3Config,
}

impl AnalysisConfig {
    fn stage2(&self) -> Stage2Config {
        Stage2Config {
            heuristics: self.heuristics.clone(),
            policy: self.policy,
        }
    }
}

/// Heuristic pass over a transcript, before any external classification
#[derive(Debug, Clone)]
pub struct HeuristicAnalysis {
    pub defaults: DefaultExaminerKey,
    pub ranges: Vec<LineRange>,
    pub merged: MergedAnalysis,
}

/// Complete outcome of a run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub defaults: DefaultExaminerKey,
    pub ranges: Vec<LineRange>,
    pub merged: MergedAnalysis,
    pub classification: Stage3Result,
}

/// Stages 0 to 2 plus the merge: everything that needs no network
pub fn analyze_lines(lines: &[String], config: &AnalysisConfig) -> HeuristicAnalysis {
    let defaults = resolve_default_examiners(lines, &config.heuristics);

    let ranges = partition_by_witness(lines);
    info!("Stage 1: {} ranges", ranges.len());

    let parts = analyze_ranges(lines, &ranges, &defaults, &config.stage2());
    let merged = merge_analyses(parts);
    info!(
        "Stage 2: {} questions across {} witnesses, {} pending classification",
        merged.stats.total_questions(),
        merged.stats.witness_count(),
        merged.pending.len()
    );

    HeuristicAnalysis {
        defaults,
        ranges,
        merged,
    }
}

/// Run the whole analysis.
///
/// Without a classifier, questions that would have been escalated are
/// counted as unresolved.
pub async fn run_analysis(
    lines: &[String],
    config: &AnalysisConfig,
    classifier: Option<&dyn QuestionClassifier>,
) -> AnalysisOutcome {
    let HeuristicAnalysis {
        defaults,
        ranges,
        mut merged,
    } = analyze_lines(lines, config);

    let classification = match classifier {
        Some(classifier) => resolve_pending(classifier, &mut merged, &config.classification).await,
        None => {
            info!("Skipping external classification (--heuristics-only)");
            skip_pending(&mut merged)
        }
    };

    AnalysisOutcome {
        defaults,
        ranges,
        merged,
        classification,
    }
}
