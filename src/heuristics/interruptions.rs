use super::is_structural_line;
use super::lines::{
    clean_simple_line, ends_with_terminal_punctuation, is_answer_start, is_examiner_identifier, is_question_start,
    speaker_label,
};

/// Who cut the witness off
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupter {
    Court,
    Examiner,
    /// Another attorney speaking under their own label, e.g. an objection
    Counsel(String),
}

/// An answer left mid-utterance and taken over by another speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interruption {
    /// Line that ends with the dash
    pub line_index: usize,
    pub interrupter: Interrupter,
}

fn ends_with_dash(line: &str) -> bool {
    line.trim_end().ends_with(['-', '—', '–'])
}

/// Classify the line after a cut-off answer line
fn interrupting_speaker(line: &str, current_examiner: &str) -> Option<Interrupter> {
    match speaker_label(line).as_deref() {
        Some("THE COURT") => return Some(Interrupter::Court),
        Some("THE WITNESS") | Some("THE CLERK") | Some("THE BAILIFF") => return None,
        Some(label) => return Some(counsel(label, current_examiner)),
        None => {}
    }
    if is_question_start(line, current_examiner) || is_examiner_identifier(line) {
        Some(Interrupter::Examiner)
    } else {
        None
    }
}

/// "MR. JONES" is the examiner when the name matches, otherwise other counsel
fn counsel(label: &str, current_examiner: &str) -> Interrupter {
    let name = label
        .split_once('.')
        .map(|(_, name)| clean_simple_line(name))
        .unwrap_or_default();
    if name.is_empty() || name == current_examiner {
        Interrupter::Examiner
    } else {
        Interrupter::Counsel(name)
    }
}

/// Look for an interruption inside the answer starting at `answer_line`
pub fn find_interruption(
    lines: &[String],
    answer_line: usize,
    current_examiner: &str,
    max_lines: usize,
) -> Option<Interruption> {
    let mut j = answer_line;
    while j < lines.len() && j - answer_line < max_lines {
        let line = &lines[j];
        if j > answer_line
            && (is_answer_start(line)
                || is_question_start(line, current_examiner)
                || speaker_label(line).is_some()
                || is_structural_line(lines, j))
        {
            return None;
        }

        if ends_with_dash(line) {
            return lines
                .get(j + 1)
                .and_then(|next| interrupting_speaker(next, current_examiner))
                .map(|interrupter| Interruption {
                    line_index: j,
                    interrupter,
                });
        }
        if ends_with_terminal_punctuation(line) {
            return None;
        }
        j += 1;
    }
    None
}
