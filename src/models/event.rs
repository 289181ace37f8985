use serde::{Deserialize, Serialize};

use super::{ExaminerSource, QuestionSource};

/// Tier 1 judgement made from the answer text alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerVerdict {
    /// Short answer containing an affirmative/negative token
    YesNo,
    /// Can't tell from the answer; worth asking the classifier
    Ambiguous,
    /// Looks like an open-ended answer
    Open,
}

/// Final state of an event's yes/no classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    YesNo,
    NotYesNo,
    /// Queued for the external classifier
    Pending,
    /// The external classifier failed or was not consulted
    Unresolved,
}

/// One counted question/answer pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswerEvent {
    /// Index of the answer line
    pub line_index: usize,
    pub witness: String,
    pub examiner: String,
    pub examiner_source: ExaminerSource,
    /// Normalized, uppercased question text
    pub question_text: String,
    pub question_source: QuestionSource,
    pub verdict: AnswerVerdict,
    pub classification: Classification,
}

/// A question waiting on the external classifier, tagged with its origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub id: String,
    pub witness: String,
    pub examiner: String,
    pub question: String,
    pub line_index: usize,
}

impl PendingQuestion {
    pub fn new(event: &QuestionAnswerEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            witness: event.witness.clone(),
            examiner: event.examiner.clone(),
            question: event.question_text.clone(),
            line_index: event.line_index,
        }
    }
}
