use std::collections::{BTreeMap, HashMap};

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::llm::{ClassifierError, QuestionClassifier};
use crate::models::{Classification, PendingQuestion, QuestionAnswerEvent, WitnessExaminerStats};

use super::RangeAnalysis;

/// Configuration for Stage 3
#[derive(Debug, Clone)]
pub struct Stage3Config {
    /// Maximum classifier requests in flight
    pub max_concurrent: usize,
}

impl Default for Stage3Config {
    fn default() -> Self {
        Self { max_concurrent: 5 }
    }
}

/// All range results combined
#[derive(Debug, Clone, Default)]
pub struct MergedAnalysis {
    pub stats: WitnessExaminerStats,
    pub pending: Vec<PendingQuestion>,
    pub events: Vec<QuestionAnswerEvent>,
    pub unattributed_answers: usize,
}

/// Result of Stage 3 classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage3Result {
    /// Pending questions across all ranges
    pub pending_questions: usize,
    /// Distinct question texts sent to the classifier
    pub requests_sent: usize,
    /// Pending questions judged yes/no
    pub classified_yes_no: usize,
    /// Pending questions left unresolved
    pub unresolved: usize,
}

/// Combine per-range results by summing counts per (witness, examiner)
pub fn merge_analyses(parts: Vec<RangeAnalysis>) -> MergedAnalysis {
    let mut merged = MergedAnalysis::default();
    for part in parts {
        merged.stats.merge(&part.stats);
        merged.pending.extend(part.pending);
        merged.events.extend(part.events);
        merged.unattributed_answers += part.unattributed_answers;
    }
    merged.events.sort_by_key(|e| e.line_index);
    merged.pending.sort_by_key(|p| p.line_index);
    merged
}

/// Execute Stage 3: ask the classifier about every pending question
///
/// Identical question texts are sent once. Requests run concurrently up to
/// `max_concurrent`; a failed request marks its questions unresolved and
/// never counts them as yes/no. Nothing is retried.
pub async fn resolve_pending(
    classifier: &dyn QuestionClassifier,
    merged: &mut MergedAnalysis,
    config: &Stage3Config,
) -> Stage3Result {
    let pending = std::mem::take(&mut merged.pending);

    let mut by_question: BTreeMap<String, Vec<PendingQuestion>> = BTreeMap::new();
    for question in pending.iter().cloned() {
        by_question
            .entry(question.question.clone())
            .or_default()
            .push(question);
    }

    info!(
        "Stage 3: classifying {} pending questions ({} distinct)",
        pending.len(),
        by_question.len()
    );

    let outcomes: Vec<(String, Result<bool, ClassifierError>)> =
        stream::iter(by_question.keys().cloned())
            .map(|question| async move {
                let outcome = classifier.classify_yes_no(&question).await;
                (question, outcome)
            })
            .buffer_unordered(config.max_concurrent.max(1))
            .collect()
            .await;

    let mut result = Stage3Result {
        pending_questions: pending.len(),
        requests_sent: outcomes.len(),
        ..Default::default()
    };
    let mut classifications: HashMap<usize, Classification> = HashMap::new();

    for (question, outcome) in outcomes {
        let Some(origins) = by_question.get(&question) else {
            continue;
        };
        for origin in origins {
            let classification = match &outcome {
                Ok(true) => {
                    merged
                        .stats
                        .add_yes_no(&origin.witness, &origin.examiner, origin.line_index);
                    result.classified_yes_no += 1;
                    Classification::YesNo
                }
                Ok(false) => Classification::NotYesNo,
                Err(e) => {
                    warn!("Line {}: classification failed: {}", origin.line_index, e);
                    merged
                        .stats
                        .add_unresolved(&origin.witness, &origin.examiner, origin.line_index);
                    result.unresolved += 1;
                    Classification::Unresolved
                }
            };
            classifications.insert(origin.line_index, classification);
        }
    }

    apply_classifications(&mut merged.events, &classifications);

    info!(
        "Stage 3: {} yes/no, {} unresolved",
        result.classified_yes_no, result.unresolved
    );

    result
}

/// Leave every pending question unresolved without contacting a classifier
pub fn skip_pending(merged: &mut MergedAnalysis) -> Stage3Result {
    let pending = std::mem::take(&mut merged.pending);
    let mut classifications = HashMap::new();
    for origin in &pending {
        merged
            .stats
            .add_unresolved(&origin.witness, &origin.examiner, origin.line_index);
        classifications.insert(origin.line_index, Classification::Unresolved);
    }
    apply_classifications(&mut merged.events, &classifications);

    Stage3Result {
        pending_questions: pending.len(),
        unresolved: pending.len(),
        ..Default::default()
    }
}

fn apply_classifications(
    events: &mut [QuestionAnswerEvent],
    classifications: &HashMap<usize, Classification>,
) {
    for event in events.iter_mut() {
        if let Some(&classification) = classifications.get(&event.line_index) {
            event.classification = classification;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::models::{AnswerVerdict, ExaminerSource, QuestionSource};

    /// Judges questions starting with DID as yes/no and fails on anything with FAIL
    struct ScriptedClassifier {
        calls: AtomicUsize,
    }

    impl ScriptedClassifier {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuestionClassifier for ScriptedClassifier {
        async fn classify_yes_no(&self, question: &str) -> Result<bool, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if question.contains("FAIL") {
                return Err(ClassifierError::Request("connection refused".to_string()));
            }
            Ok(question.starts_with("DID"))
        }
    }

    fn pending_event(line: usize, examiner: &str, question: &str) -> QuestionAnswerEvent {
        QuestionAnswerEvent {
            line_index: line,
            witness: "JANE DOE".to_string(),
            examiner: examiner.to_string(),
            examiner_source: ExaminerSource::Identified,
            question_text: question.to_string(),
            question_source: QuestionSource::Marked,
            verdict: AnswerVerdict::Ambiguous,
            classification: Classification::Pending,
        }
    }

    fn part(events: Vec<QuestionAnswerEvent>) -> RangeAnalysis {
        let mut analysis = RangeAnalysis::default();
        for event in events {
            analysis.stats.record_event(&event, false);
            analysis.pending.push(PendingQuestion::new(&event));
            analysis.events.push(event);
        }
        analysis
    }

    #[tokio::test]
    async fn test_resolve_folds_results() {
        let merged_parts = vec![
            part(vec![
                pending_event(10, "SMITH", "DID YOU SEE IT?"),
                pending_event(20, "SMITH", "WHERE WERE YOU?"),
            ]),
            part(vec![
                pending_event(30, "DOE", "DID YOU SEE IT?"),
                pending_event(40, "DOE", "FAIL THIS ONE?"),
            ]),
        ];
        let mut merged = merge_analyses(merged_parts);
        let classifier = ScriptedClassifier::new();

        let result = resolve_pending(&classifier, &mut merged, &Stage3Config::default()).await;

        assert_eq!(result.pending_questions, 4);
        assert_eq!(result.requests_sent, 3);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.classified_yes_no, 2);
        assert_eq!(result.unresolved, 1);

        let smith = merged.stats.get("JANE DOE", "SMITH").unwrap();
        assert_eq!(smith.total_questions, 2);
        assert_eq!(smith.yes_no_questions, 1);

        let doe = merged.stats.get("JANE DOE", "DOE").unwrap();
        assert_eq!(doe.yes_no_questions, 1);
        assert_eq!(doe.unresolved, 1);

        let states: Vec<Classification> = merged.events.iter().map(|e| e.classification).collect();
        assert_eq!(
            states,
            vec![
                Classification::YesNo,
                Classification::NotYesNo,
                Classification::YesNo,
                Classification::Unresolved
            ]
        );
        assert!(merged.pending.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_nothing_pending() {
        let mut merged = MergedAnalysis::default();
        let classifier = ScriptedClassifier::new();
        let result = resolve_pending(&classifier, &mut merged, &Stage3Config::default()).await;
        assert_eq!(result, Stage3Result::default());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_skip_pending_marks_unresolved() {
        let mut merged = merge_analyses(vec![part(vec![pending_event(5, "SMITH", "WHY?")])]);
        let result = skip_pending(&mut merged);
        assert_eq!(result.unresolved, 1);
        let smith = merged.stats.get("JANE DOE", "SMITH").unwrap();
        assert_eq!(smith.unresolved, 1);
        assert_eq!(smith.yes_no_questions, 0);
        assert_eq!(merged.events[0].classification, Classification::Unresolved);
    }

    #[test]
    fn test_merge_orders_events() {
        let merged = merge_analyses(vec![
            part(vec![pending_event(30, "DOE", "B?")]),
            part(vec![pending_event(10, "SMITH", "A?")]),
        ]);
        let lines: Vec<usize> = merged.events.iter().map(|e| e.line_index).collect();
        assert_eq!(lines, vec![10, 30]);
        assert_eq!(merged.pending[0].line_index, 10);
    }
}
