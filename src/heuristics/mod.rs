pub mod answers;
pub mod interruptions;
pub mod lines;
pub mod questions;

pub use answers::*;
pub use interruptions::*;
pub use lines::*;
pub use questions::*;

/// Configuration for all line heuristics
#[derive(Debug, Clone)]
pub struct HeuristicsConfig {
    /// How far back to look for a question whose "Q." marker was lost
    pub question_lookback_lines: usize,
    /// Maximum lines (answer line included) gathered as one answer
    pub answer_lookahead_lines: usize,
    /// Lines after a witness identifier searched for the calling side
    pub side_scan_lines: usize,
    /// Lines after a witness identifier searched for their first direct examiner
    pub default_examiner_window: usize,
    /// Answers with a yes/no token and fewer words than this are direct yes/no answers
    pub short_answer_words: usize,
    /// Answers without a yes/no token and fewer words than this are ambiguous
    pub terse_answer_words: usize,
    /// NOT within this many leading words marks a negative answer
    pub negation_window: usize,
    /// Affirmative/negative tokens, uppercase
    pub yes_no_tokens: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            question_lookback_lines: 10,
            answer_lookahead_lines: 10,
            side_scan_lines: 4,
            default_examiner_window: 200,
            short_answer_words: 8,
            terse_answer_words: 5,
            negation_window: 3,
            yes_no_tokens: [
                "YES", "YEAH", "YEP", "NO", "NOPE", "UHHUH", "UHUH", "UMHUM", "UMUM",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
        }
    }
}

/// Structural role of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    WitnessIdentifier,
    ExaminationHeader,
    ExaminerIdentifier,
    QuestionStart,
    AnswerStart,
    Other,
}

impl LineRole {
    /// Witness, examination and examiner lines redefine the speaker context
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            LineRole::WitnessIdentifier | LineRole::ExaminationHeader | LineRole::ExaminerIdentifier
        )
    }
}

/// Classify a line, checking predicates in precedence order.
///
/// Context changes (witness, examination, examiner) win over question and
/// answer markers, and question markers win over answer markers.
pub fn classify_line(lines: &[String], i: usize, current_examiner: &str) -> LineRole {
    let line = &lines[i];
    if is_witness_identifier(lines, i) {
        LineRole::WitnessIdentifier
    } else if is_examination_header(lines, i) {
        LineRole::ExaminationHeader
    } else if is_examiner_identifier(line) {
        LineRole::ExaminerIdentifier
    } else if is_question_start(line, current_examiner) {
        LineRole::QuestionStart
    } else if is_answer_start(line) {
        LineRole::AnswerStart
    } else {
        LineRole::Other
    }
}

/// True for witness, examination or examiner lines
pub fn is_structural_line(lines: &[String], i: usize) -> bool {
    is_witness_identifier(lines, i)
        || is_examination_header(lines, i)
        || is_examiner_identifier(&lines[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_precedence() {
        let transcript = lines(&[
            "JANE DOE",
            "called as a witness by the People,",
            "DIRECT EXAMINATION",
            "BY MR. SMITH:",
            "Q. Where were you? A. Home.",
            "A. Home.",
            "at the time.",
        ]);

        assert_eq!(classify_line(&transcript, 0, ""), LineRole::WitnessIdentifier);
        assert_eq!(classify_line(&transcript, 2, ""), LineRole::ExaminationHeader);
        assert_eq!(classify_line(&transcript, 3, ""), LineRole::ExaminerIdentifier);
        // question marker wins when a line carries both
        assert_eq!(classify_line(&transcript, 4, "SMITH"), LineRole::QuestionStart);
        assert_eq!(classify_line(&transcript, 5, "SMITH"), LineRole::AnswerStart);
        assert_eq!(classify_line(&transcript, 6, "SMITH"), LineRole::Other);
    }

    #[test]
    fn test_structural_roles() {
        assert!(LineRole::ExaminerIdentifier.is_structural());
        assert!(!LineRole::AnswerStart.is_structural());
    }

    #[test]
    fn test_config_default() {
        let config = HeuristicsConfig::default();
        assert_eq!(config.short_answer_words, 8);
        assert_eq!(config.terse_answer_words, 5);
        assert_eq!(config.question_lookback_lines, 10);
        assert_eq!(config.default_examiner_window, 200);
        assert!(config.yes_no_tokens.contains(&"UHHUH".to_string()));
    }
}
