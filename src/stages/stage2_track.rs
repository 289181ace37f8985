use rayon::prelude::*;
use tracing::debug;

use crate::heuristics::{
    append_line, classify_answer, classify_line, clean_simple_line, extract_examiner_name,
    find_interruption, gather_answer, infer_side, is_countable_question, normalize_question,
    reconstruct_question, EscalationPolicy, HeuristicsConfig, Interrupter, LineRole,
};
use crate::models::{
    is_court, AnswerVerdict, Classification, DefaultExaminerKey, ExaminationPhase, ExaminerSource,
    PendingQuestion, QuestionAnswerEvent, QuestionSource, SpeakerContext, WitnessExaminerStats,
    COURT,
};

use super::LineRange;

/// Configuration for Stage 2
#[derive(Debug, Clone, Default)]
pub struct Stage2Config {
    pub heuristics: HeuristicsConfig,
    pub policy: EscalationPolicy,
}

/// Result of analysing one line range
#[derive(Debug, Clone, Default)]
pub struct RangeAnalysis {
    pub stats: WitnessExaminerStats,
    /// Questions queued for the external classifier
    pub pending: Vec<PendingQuestion>,
    /// Every counted question/answer pair, in line order
    pub events: Vec<QuestionAnswerEvent>,
    /// Answers seen before any witness was identified
    pub unattributed_answers: usize,
}

/// Execute Stage 2 on one range: walk the lines, tracking who is speaking
///
/// The context starts empty at the range start. Lines outside the range
/// are only read for look-ahead and look-behind.
pub fn analyze_range(
    lines: &[String],
    range: &LineRange,
    defaults: &DefaultExaminerKey,
    config: &Stage2Config,
) -> RangeAnalysis {
    let mut ctx = SpeakerContext::new();
    let mut result = RangeAnalysis::default();
    let end = range.end.min(lines.len());

    for i in range.start..end {
        let line = &lines[i];
        match classify_line(lines, i, &ctx.current_examiner) {
            LineRole::WitnessIdentifier => {
                let side = infer_side(lines, i, config.heuristics.side_scan_lines);
                let witness = clean_simple_line(line);
                debug!("Line {}: witness {} ({:?})", i, witness, side);
                ctx.enter_witness(witness, side);
            }
            LineRole::ExaminationHeader => {
                ctx.enter_examination(ExaminationPhase::from_header(&clean_simple_line(line)));
            }
            LineRole::ExaminerIdentifier => {
                ctx.set_examiner(extract_examiner_name(line), ExaminerSource::Identified);
            }
            LineRole::QuestionStart => {
                ctx.active_question.clear();
                append_line(&mut ctx.active_question, line);
            }
            LineRole::AnswerStart => {
                finalize_answer(lines, i, &mut ctx, defaults, config, &mut result);
                ctx.active_question.clear();
            }
            LineRole::Other => {
                if !ctx.active_question.is_empty() {
                    append_line(&mut ctx.active_question, line);
                }
            }
        }
    }

    result
}

/// Analyse every range in parallel; results come back in range order
pub fn analyze_ranges(
    lines: &[String],
    ranges: &[LineRange],
    defaults: &DefaultExaminerKey,
    config: &Stage2Config,
) -> Vec<RangeAnalysis> {
    ranges
        .par_iter()
        .map(|range| analyze_range(lines, range, defaults, config))
        .collect()
}

/// Close the question/answer pair whose answer starts at line `i`
fn finalize_answer(
    lines: &[String],
    i: usize,
    ctx: &mut SpeakerContext,
    defaults: &DefaultExaminerKey,
    config: &Stage2Config,
    result: &mut RangeAnalysis,
) {
    let heuristics = &config.heuristics;

    if !ctx.has_witness() {
        debug!("Line {}: answer before any witness, not attributed", i);
        result.unattributed_answers += 1;
        return;
    }

    if ctx.current_examiner.is_empty() {
        ctx.repair_examiner(defaults);
        debug!(
            "Line {}: examiner missing, using {} ({:?})",
            i, ctx.current_examiner, ctx.examiner_source
        );
    }

    if let Some(interruption) =
        find_interruption(lines, i, &ctx.current_examiner, heuristics.answer_lookahead_lines)
    {
        let interrupter = match &interruption.interrupter {
            Interrupter::Court => COURT,
            Interrupter::Examiner => ctx.current_examiner.as_str(),
            Interrupter::Counsel(name) => name.as_str(),
        };
        result
            .stats
            .record_interruption(&ctx.current_witness, interrupter, interruption.line_index);
    }

    let (raw_question, question_source) = if ctx.active_question.is_empty() {
        (
            reconstruct_question(lines, i, heuristics.question_lookback_lines),
            QuestionSource::Reconstructed,
        )
    } else {
        (ctx.active_question.clone(), QuestionSource::Marked)
    };

    let question_text = normalize_question(&raw_question);
    if !is_countable_question(&question_text) {
        return;
    }

    let answer = gather_answer(
        lines,
        i,
        &ctx.current_examiner,
        heuristics.answer_lookahead_lines,
    );
    let verdict = classify_answer(&answer, heuristics);
    let classification = match verdict {
        AnswerVerdict::YesNo => Classification::YesNo,
        _ if is_court(&ctx.current_examiner) => Classification::NotYesNo,
        v if config.policy.should_escalate(v) => Classification::Pending,
        _ => Classification::NotYesNo,
    };

    let event = QuestionAnswerEvent {
        line_index: i,
        witness: ctx.current_witness.clone(),
        examiner: ctx.current_examiner.clone(),
        examiner_source: ctx.examiner_source,
        question_text,
        question_source,
        verdict,
        classification,
    };

    result
        .stats
        .record_event(&event, classification == Classification::YesNo);
    if classification == Classification::Pending {
        result.pending.push(PendingQuestion::new(&event));
    }
    result.events.push(event);
}
