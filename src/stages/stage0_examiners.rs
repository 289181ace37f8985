use tracing::{debug, info};

use crate::heuristics::{
    clean_simple_line, extract_examiner_name, infer_side, is_examination_header,
    is_examiner_identifier, is_witness_identifier, HeuristicsConfig,
};
use crate::models::{DefaultExaminerKey, ExaminationPhase, ExaminationSide};

/// Perform Stage 0: find a fallback examiner for each side
///
/// Some examiner lines are lost in extraction. For each side, the attorney
/// who conducts the first direct examination of one of its witnesses is a
/// good guess, so one pass over the transcript records that attorney.
pub fn resolve_default_examiners(lines: &[String], config: &HeuristicsConfig) -> DefaultExaminerKey {
    let mut key = DefaultExaminerKey::default();

    for i in 0..lines.len() {
        if key.is_complete() {
            break;
        }
        if !is_witness_identifier(lines, i) {
            continue;
        }

        let side = infer_side(lines, i, config.side_scan_lines);
        if side == ExaminationSide::Unknown || key.has(side) {
            continue;
        }

        if let Some(examiner) = find_direct_examiner(lines, i, config.default_examiner_window) {
            debug!("Line {}: default {:?} examiner is {}", i, side, examiner);
            key.set(side, examiner);
        }
    }

    info!(
        "Default examiners: people={}, defense={}",
        key.people.as_deref().unwrap_or("<none>"),
        key.defense.as_deref().unwrap_or("<none>")
    );

    key
}

/// First examiner named under a direct examination header within the window
fn find_direct_examiner(lines: &[String], start: usize, window: usize) -> Option<String> {
    let end = (start + window).min(lines.len());
    let mut in_direct = false;

    for j in start..end {
        if is_examination_header(lines, j) {
            in_direct =
                ExaminationPhase::from_header(&clean_simple_line(&lines[j])) == ExaminationPhase::Direct;
            continue;
        }
        if in_direct && is_examiner_identifier(&lines[j]) {
            return Some(extract_examiner_name(&lines[j]));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_both_sides() {
        let transcript = lines(&[
            "OFFICER BROWN,",
            "called as a witness on behalf of the People,",
            "DIRECT EXAMINATION",
            "BY MR. SMITH:",
            "Q. Were you on duty?",
            "A. Yes.",
            "CROSS-EXAMINATION",
            "BY MS. DOE:",
            "Q. You were tired?",
            "A. No.",
            "JOHN ROE,",
            "called as a witness on behalf of the Defendant,",
            "DIRECT EXAMINATION",
            "BY MS. DOE:",
            "Q. Where do you live?",
            "A. Oakland.",
        ]);

        let key = resolve_default_examiners(&transcript, &HeuristicsConfig::default());
        assert_eq!(key.people.as_deref(), Some("SMITH"));
        assert_eq!(key.defense.as_deref(), Some("DOE"));
    }

    #[test]
    fn test_cross_examiner_is_not_a_default() {
        let transcript = lines(&[
            "JANE ROE",
            "called as a witness by the People,",
            "CROSS-EXAMINATION",
            "BY MS. DOE:",
            "Q. You were tired?",
            "A. No.",
        ]);

        let key = resolve_default_examiners(&transcript, &HeuristicsConfig::default());
        assert_eq!(key.people, None);
        assert_eq!(key.defense, None);
    }

    #[test]
    fn test_window_limits_search() {
        let transcript = lines(&[
            "JANE ROE",
            "called as a witness by the People,",
            "filler",
            "DIRECT EXAMINATION",
            "BY MR. SMITH:",
        ]);
        let config = HeuristicsConfig {
            default_examiner_window: 3,
            ..Default::default()
        };
        assert_eq!(resolve_default_examiners(&transcript, &config).people, None);
        assert_eq!(
            resolve_default_examiners(&transcript, &HeuristicsConfig::default())
                .people
                .as_deref(),
            Some("SMITH")
        );
    }

    #[test]
    fn test_empty_transcript() {
        let key = resolve_default_examiners(&[], &HeuristicsConfig::default());
        assert_eq!(key, DefaultExaminerKey::default());
    }
}
