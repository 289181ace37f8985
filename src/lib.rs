pub mod heuristics;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use heuristics::{EscalationPolicy, HeuristicsConfig};
pub use io::{load_transcript_dir, report_id, ReportMetadata, StatsReport};
pub use llm::{AnthropicClient, AnthropicConfig, ClassifierError, QuestionClassifier};
pub use models::{DefaultExaminerKey, Transcript, WitnessExaminerStats};
pub use pipeline::{analyze_lines, run_analysis, AnalysisConfig, AnalysisOutcome};
pub use stages::{execute_stage4, Stage3Config, Stage4Config};
