use std::sync::LazyLock;

use regex::Regex;

use crate::models::ExaminationSide;

/// Markers that open a question, including OCR variants where a bullet
/// replaces the period
const QUESTION_MARKERS: [&str; 4] = ["Q. ", "Q . ", "Q• ", "Q • "];

static LEADING_LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s+").expect("valid line number pattern"));

static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^A\.\s?M(?:\.|\s|$)").expect("valid time pattern"));

static SPEAKER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:\d+\s+)?(THE COURT|THE WITNESS|THE CLERK|THE BAILIFF|(?:MR|MS|MRS|DR)\.\s*[A-Z][A-Z'\-]*)\s*:",
    )
    .expect("valid speaker label pattern")
});

/// Letters and whitespace only, uppercased and trimmed
pub fn clean_simple_line(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
        .trim()
        .to_string()
}

/// Drop a leading transcript line number ("12  Q. Where ...")
pub fn strip_line_number(line: &str) -> &str {
    match LEADING_LINE_NUMBER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Append a line to accumulated text, dropping its line number
pub fn append_line(acc: &mut String, line: &str) {
    let text = strip_line_number(line).trim();
    if text.is_empty() {
        return;
    }
    if !acc.is_empty() {
        acc.push(' ');
    }
    acc.push_str(text);
}

pub fn ends_with_terminal_punctuation(line: &str) -> bool {
    line.trim_end().ends_with(['.', '!', '?'])
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A short line followed by a swearing-in line ("..., called as a witness")
pub fn is_witness_identifier(lines: &[String], i: usize) -> bool {
    let Some(next) = lines.get(i + 1) else {
        return false;
    };
    let cleaned = clean_simple_line(&lines[i]);
    !cleaned.is_empty()
        && word_count(&cleaned) < 6
        && next.to_lowercase().contains("as a witness")
}

/// "DIRECT EXAMINATION" / "CROSS-EXAMINATION", confirmed by the line after it
pub fn is_examination_header(lines: &[String], i: usize) -> bool {
    let Some(next) = lines.get(i + 1) else {
        return false;
    };
    let cleaned = clean_simple_line(&lines[i]);
    if word_count(&cleaned) >= 4
        || !cleaned.contains("EXAMINATION")
        || !(cleaned.contains("CROSS") || cleaned.contains("DIRECT"))
    {
        return false;
    }
    let next_text = strip_line_number(next).trim_start();
    is_examiner_identifier(next) || next_text.starts_with("Q.") || next_text.starts_with("A.")
}

/// "BY MR. SMITH:"
pub fn is_examiner_identifier(line: &str) -> bool {
    let stripped: String = line.chars().filter(|c| !c.is_ascii_digit()).collect();
    let stripped = stripped.trim();
    !stripped.is_empty()
        && word_count(stripped) < 6
        && stripped.to_lowercase().starts_with("by")
        && stripped.ends_with(':')
}

/// Pull the examiner's name out of an examiner line
///
/// "BY MR. SMITH:" gives "SMITH"; "BY COUNSEL:" gives "COUNSEL".
pub fn extract_examiner_name(line: &str) -> String {
    if let Some(dot) = line.find('.') {
        if let Some(colon) = line[dot..].find(':') {
            let name = clean_simple_line(&line[dot..dot + colon]);
            if !name.is_empty() {
                return name;
            }
        }
    }

    if let Some(token) = line.split_whitespace().find(|w| w.contains(':')) {
        let name = clean_simple_line(token);
        if !name.is_empty() && name != "BY" {
            return name;
        }
    }

    let cleaned = clean_simple_line(line);
    cleaned
        .strip_prefix("BY")
        .map(|rest| rest.trim().to_string())
        .unwrap_or(cleaned)
}

/// Answer lines open with "A." once the noise is stripped
pub fn is_answer_start(line: &str) -> bool {
    let kept: String = line
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '.' || *c == ' ')
        .collect();
    let kept = kept.trim();

    if TIME_OF_DAY.is_match(kept) {
        return false;
    }
    if kept == "A." || kept.starts_with("A. ") || kept.starts_with("A . ") {
        return true;
    }

    // Compacted form where OCR swallowed the space: "A.Yes"
    let bytes = kept.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'A'
        && bytes[1] == b'.'
        && bytes[2].is_ascii_uppercase()
        && bytes.get(3) != Some(&b'.')
}

/// A question opens with a "Q." marker or the examiner's own label
pub fn is_question_start(line: &str, current_examiner: &str) -> bool {
    if QUESTION_MARKERS.iter().any(|m| line.contains(m)) {
        return true;
    }
    !current_examiner.is_empty() && line.contains(&format!("{}:", current_examiner))
}

/// Who called the witness, from the few lines after the identifier
pub fn infer_side(lines: &[String], witness_line: usize, scan_lines: usize) -> ExaminationSide {
    let end = (witness_line + 1 + scan_lines).min(lines.len());
    for line in lines.iter().take(end).skip(witness_line + 1) {
        let lower = line.to_lowercase();
        if lower.contains("people") {
            return ExaminationSide::People;
        }
        if lower.contains("defense") || lower.contains("defendant") {
            return ExaminationSide::Defense;
        }
    }
    ExaminationSide::Unknown
}

/// Colloquy label such as "THE COURT:" or "MR. SMITH:"
pub fn speaker_label(line: &str) -> Option<String> {
    SPEAKER_LABEL
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
