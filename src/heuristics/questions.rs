use std::sync::LazyLock;

use regex::Regex;

use super::lines::{append_line, ends_with_terminal_punctuation, is_answer_start, strip_line_number};
use super::is_structural_line;

static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)Q\s?[.•](?:\s|$)").expect("valid question marker pattern"));

/// Rebuild a question whose opening marker was lost.
///
/// Takes the line right before the answer, then walks back through at most
/// `lookback` lines in total, stopping before a line that ends a sentence,
/// opens an answer, or changes the speaker context.
pub fn reconstruct_question(lines: &[String], answer_line: usize, lookback: usize) -> String {
    if answer_line == 0 || lookback == 0 || answer_line > lines.len() {
        return String::new();
    }

    let first = answer_line - 1;
    if is_answer_start(&lines[first]) || is_structural_line(lines, first) {
        return String::new();
    }

    let mut parts = vec![lines[first].as_str()];
    let earliest = answer_line.saturating_sub(lookback);
    let mut j = first;
    while j > earliest {
        j -= 1;
        let prev = &lines[j];
        if ends_with_terminal_punctuation(prev) || is_answer_start(prev) || is_structural_line(lines, j)
        {
            break;
        }
        parts.push(prev.as_str());
    }
    parts.reverse();

    let mut question = String::new();
    for part in parts {
        append_line(&mut question, part);
    }
    question
}

/// Collapse whitespace, drop line-number and "Q." residue, uppercase
pub fn normalize_question(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_number = strip_line_number(&collapsed);
    let without_markers = QUESTION_MARKER.replace_all(without_number, " ");
    without_markers
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Courtesies like "Q. Good morning." never carry a question mark
pub fn is_countable_question(normalized: &str) -> bool {
    normalized.contains('?')
}
