use serde::{Deserialize, Serialize};

use crate::models::AnswerVerdict;

use super::lines::{
    append_line, ends_with_terminal_punctuation, is_answer_start, is_question_start, speaker_label,
};
use super::{HeuristicsConfig, is_structural_line};

/// When an answer's question is sent to the external classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// Every answer not settled as yes/no by the heuristic
    Thorough,
    /// Only answers the heuristic marks ambiguous
    #[default]
    Economical,
}

impl EscalationPolicy {
    pub fn should_escalate(self, verdict: AnswerVerdict) -> bool {
        match (self, verdict) {
            (_, AnswerVerdict::YesNo) => false,
            (EscalationPolicy::Thorough, _) => true,
            (EscalationPolicy::Economical, AnswerVerdict::Ambiguous) => true,
            (EscalationPolicy::Economical, AnswerVerdict::Open) => false,
        }
    }

    /// Tag used in report names
    pub fn tag(self) -> &'static str {
        match self {
            EscalationPolicy::Thorough => "thorough",
            EscalationPolicy::Economical => "economical",
        }
    }
}

/// Gather an answer and its continuation lines into one string.
///
/// Stops once the text ends a sentence, or before the next answer, question,
/// colloquy or context line, reading at most `max_lines` lines.
pub fn gather_answer(
    lines: &[String],
    answer_line: usize,
    current_examiner: &str,
    max_lines: usize,
) -> String {
    let mut answer = String::new();
    append_line(&mut answer, &lines[answer_line]);

    let mut next = answer_line + 1;
    while next < lines.len()
        && next - answer_line < max_lines
        && !ends_with_terminal_punctuation(&answer)
    {
        let line = &lines[next];
        if is_answer_start(line)
            || is_question_start(line, current_examiner)
            || speaker_label(line).is_some()
            || is_structural_line(lines, next)
        {
            break;
        }
        append_line(&mut answer, line);
        next += 1;
    }
    answer
}

/// Judge from the answer alone whether its question was yes/no
pub fn classify_answer(answer: &str, config: &HeuristicsConfig) -> AnswerVerdict {
    let cleaned = answer
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let has_token = words
        .iter()
        .any(|w| config.yes_no_tokens.iter().any(|t| t == w));
    let negated = words
        .iter()
        .take(config.negation_window)
        .any(|w| *w == "NOT");

    if has_token || negated {
        if words.len() < config.short_answer_words {
            AnswerVerdict::YesNo
        } else {
            AnswerVerdict::Ambiguous
        }
    } else if words.len() < config.terse_answer_words {
        AnswerVerdict::Ambiguous
    } else {
        AnswerVerdict::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_affirmative_is_yes_no() {
        let config = HeuristicsConfig::default();
        assert_eq!(classify_answer("A. Yes.", &config), AnswerVerdict::YesNo);
        assert_eq!(classify_answer("A. Uh-huh.", &config), AnswerVerdict::YesNo);
        assert_eq!(classify_answer("A. Not that I recall.", &config), AnswerVerdict::YesNo);
    }

    #[test]
    fn test_long_answer_with_token_is_ambiguous() {
        let config = HeuristicsConfig::default();
        let answer = "A. Well I told him there was no way I was going to drive that night";
        assert_eq!(answer.split_whitespace().count(), 16);
        assert_eq!(classify_answer(answer, &config), AnswerVerdict::Ambiguous);
    }

    #[test]
    fn test_open_and_terse_answers() {
        let config = HeuristicsConfig::default();
        assert_eq!(classify_answer("A. Home.", &config), AnswerVerdict::Ambiguous);
        assert_eq!(
            classify_answer("A. I drove to the store on Main Street.", &config),
            AnswerVerdict::Open
        );
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let config = HeuristicsConfig {
            short_answer_words: 3,
            ..Default::default()
        };
        assert_eq!(classify_answer("A. Yes, I did.", &config), AnswerVerdict::Ambiguous);
    }

    #[test]
    fn test_gather_answer_continuation() {
        let transcript = lines(&[
            "A. Yes, I saw",
            "12 the car",
            "pull away.",
            "Q. And then?",
        ]);
        assert_eq!(gather_answer(&transcript, 0, "SMITH", 10), "A. Yes, I saw the car pull away.");
    }

    #[test]
    fn test_gather_answer_stops_at_question() {
        let transcript = lines(&["A. I think", "Q. Go on?"]);
        assert_eq!(gather_answer(&transcript, 0, "", 10), "A. I think");
    }

    #[test]
    fn test_gather_answer_stops_at_colloquy() {
        let transcript = lines(&["A. He was --", "THE COURT: Let's take a recess."]);
        assert_eq!(gather_answer(&transcript, 0, "SMITH", 10), "A. He was --");
    }

    #[test]
    fn test_gather_answer_respects_cap() {
        let transcript = lines(&["A. one", "two", "three", "four"]);
        assert_eq!(gather_answer(&transcript, 0, "", 2), "A. one two");
    }

    #[test]
    fn test_escalation_policy() {
        assert!(EscalationPolicy::Thorough.should_escalate(AnswerVerdict::Open));
        assert!(EscalationPolicy::Thorough.should_escalate(AnswerVerdict::Ambiguous));
        assert!(!EscalationPolicy::Thorough.should_escalate(AnswerVerdict::YesNo));
        assert!(EscalationPolicy::Economical.should_escalate(AnswerVerdict::Ambiguous));
        assert!(!EscalationPolicy::Economical.should_escalate(AnswerVerdict::Open));
        assert_eq!(EscalationPolicy::default(), EscalationPolicy::Economical);
    }
}
