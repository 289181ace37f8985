use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use testimony::heuristics::{classify_line, LineRole};
use testimony::{
    analyze_lines, execute_stage4, load_transcript_dir, report_id, run_analysis, AnalysisConfig,
    AnthropicClient, AnthropicConfig, EscalationPolicy, HeuristicsConfig, QuestionClassifier,
    ReportMetadata, Stage3Config, Stage4Config, StatsReport,
};

#[derive(Parser)]
#[command(name = "testimony")]
#[command(author, version, about = "Yes/no question statistics for courtroom transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transcript and write the statistics report
    Analyze {
        /// Directory of extracted transcript text (.txt files, read in name order)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the text and JSON reports
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Send every question not settled by the heuristic to the classifier
        #[arg(long)]
        thorough: bool,

        /// Skip the external classifier; escalated questions are left unresolved
        #[arg(long)]
        heuristics_only: bool,

        /// Maximum classifier requests in flight
        #[arg(long, default_value = "5")]
        max_concurrent: usize,

        /// Lines searched backwards for a question without a marker
        #[arg(long, default_value = "10")]
        question_lookback: usize,

        /// Lines read forward when gathering an answer
        #[arg(long, default_value = "10")]
        answer_lookahead: usize,

        /// Lines after a witness searched for their direct examiner
        #[arg(long, default_value = "200")]
        default_examiner_window: usize,

        /// Answers with a yes/no token under this many words are yes/no
        #[arg(long, default_value = "8")]
        short_answer_words: usize,

        /// Answers without a yes/no token under this many words are ambiguous
        #[arg(long, default_value = "5")]
        terse_answer_words: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report transcript structure without classifying anything
    Inspect {
        /// Directory of extracted transcript text
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output_dir,
            thorough,
            heuristics_only,
            max_concurrent,
            question_lookback,
            answer_lookahead,
            default_examiner_window,
            short_answer_words,
            terse_answer_words,
            verbose,
        } => {
            setup_logging(verbose);
            let config = AnalysisConfig {
                heuristics: HeuristicsConfig {
                    question_lookback_lines: question_lookback,
                    answer_lookahead_lines: answer_lookahead,
                    default_examiner_window,
                    short_answer_words,
                    terse_answer_words,
                    ..Default::default()
                },
                policy: if thorough {
                    EscalationPolicy::Thorough
                } else {
                    EscalationPolicy::Economical
                },
                classification: Stage3Config { max_concurrent },
            };
            analyze_transcript(input, output_dir, config, heuristics_only).await
        }
        Commands::Inspect { input, verbose } => {
            setup_logging(verbose);
            inspect_transcript(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn analyze_transcript(
    input: PathBuf,
    output_dir: PathBuf,
    config: AnalysisConfig,
    heuristics_only: bool,
) -> Result<()> {
    // Credentials are checked before any work is done
    let client = if heuristics_only {
        None
    } else {
        let api_config = AnthropicConfig::from_env()?;
        info!("Using classifier model {}", api_config.model);
        Some(AnthropicClient::new(api_config))
    };

    info!("Loading transcript from {:?}", input);
    let transcript = load_transcript_dir(&input).context("Failed to load transcript")?;

    let classifier = client.as_ref().map(|c| c as &dyn QuestionClassifier);
    let outcome = run_analysis(&transcript.lines, &config, classifier).await;

    let metadata = ReportMetadata {
        total_lines: transcript.len(),
        source_files: transcript.sources.len(),
        ranges_analyzed: outcome.ranges.len(),
        default_examiners: outcome.defaults.clone(),
        classifier_queries: outcome.classification.pending_questions,
        classifier_requests: outcome.classification.requests_sent,
        unresolved_questions: outcome.classification.unresolved,
        unattributed_answers: outcome.merged.unattributed_answers,
        heuristics_only,
    };
    let report = StatsReport::new(
        report_id(&transcript.lines),
        config.policy,
        &outcome.merged.stats,
        metadata,
    );

    info!("Stage 4: Rendering report...");
    let rendered = execute_stage4(&report, &output_dir, &Stage4Config::default())?;
    if let Some(path) = rendered.text_path {
        info!("Text report written to {:?}", path);
    }
    if let Some(path) = rendered.json_path {
        info!("JSON report written to {:?}", path);
    }

    let queried = outcome.classification.pending_questions;
    let ratio = if transcript.is_empty() {
        0.0
    } else {
        queried as f64 / transcript.len() as f64
    };
    println!(
        "Finished transcript. Answers needing classification: {} out of {} lines ({:.2})",
        queried,
        transcript.len(),
        ratio
    );
    println!(
        "{} questions across {} witnesses, {} yes/no",
        outcome.merged.stats.total_questions(),
        outcome.merged.stats.witness_count(),
        outcome.merged.stats.total_yes_no()
    );

    Ok(())
}

fn inspect_transcript(input: PathBuf) -> Result<()> {
    info!("Inspecting transcript from {:?}", input);
    let transcript = load_transcript_dir(&input).context("Failed to load transcript")?;
    let lines = &transcript.lines;

    println!("Transcript Structure");
    println!("====================");
    println!("Files: {}", transcript.sources.len());
    println!("Lines: {}", lines.len());
    println!("Report id: {}", report_id(lines));
    println!();

    let mut witnesses = 0;
    let mut headers = 0;
    let mut examiners = 0;
    let mut questions = 0;
    let mut answers = 0;
    for i in 0..lines.len() {
        match classify_line(lines, i, "") {
            LineRole::WitnessIdentifier => witnesses += 1,
            LineRole::ExaminationHeader => headers += 1,
            LineRole::ExaminerIdentifier => examiners += 1,
            LineRole::QuestionStart => questions += 1,
            LineRole::AnswerStart => answers += 1,
            LineRole::Other => {}
        }
    }

    println!("Line Roles");
    println!("----------");
    println!("Witness identifiers: {}", witnesses);
    println!("Examination headers: {}", headers);
    println!("Examiner identifiers: {}", examiners);
    println!("Question markers: {}", questions);
    println!("Answer markers: {}", answers);
    println!();

    let analysis = analyze_lines(lines, &AnalysisConfig::default());

    println!("Default Examiners");
    println!("-----------------");
    println!(
        "People: {}",
        analysis.defaults.people.as_deref().unwrap_or("<none>")
    );
    println!(
        "Defense: {}",
        analysis.defaults.defense.as_deref().unwrap_or("<none>")
    );
    println!();

    println!("Witness Ranges");
    println!("--------------");
    for range in &analysis.ranges {
        let witness = range
            .witness_line
            .map(|w| lines[w].trim().to_string())
            .unwrap_or_else(|| "(preamble)".to_string());
        println!("{:>6}..{:<6} {}", range.start, range.end, witness);
    }
    println!();

    println!("Pairs");
    println!("-----");
    for (witness, examiner, stats) in analysis.merged.stats.pairs() {
        println!(
            "{} / {}: {} questions, {} yes/no by heuristic, {} inferred examiner, {} reconstructed",
            witness,
            examiner,
            stats.total_questions,
            stats.yes_no_questions,
            stats.inferred_examiner,
            stats.reconstructed_questions
        );
    }
    println!(
        "Would escalate (economical policy): {}",
        analysis.merged.pending.len()
    );
    if analysis.merged.unattributed_answers > 0 {
        println!(
            "Answers before any witness: {}",
            analysis.merged.unattributed_answers
        );
    }

    Ok(())
}
