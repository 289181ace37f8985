use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::heuristics::EscalationPolicy;
use crate::models::{is_court, DefaultExaminerKey, PairStats, WitnessExaminerStats};

/// Header lines searched for a case number
const CASE_NUMBER_SCAN_LINES: usize = 30;

/// Machine-readable statistics report
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub report_id: String,
    pub policy: EscalationPolicy,
    /// RFC 3339 local time
    pub generated_at: String,
    pub records: Vec<PairRecord>,
    pub metadata: ReportMetadata,
}

/// One (witness, examiner) row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PairRecord {
    pub witness: String,
    pub examiner: String,
    /// `None` for the Court, whose interjections are not counted as questioning
    pub yes_no_questions: Option<u32>,
    pub total_questions: Option<u32>,
    /// `None` when there are no questions, or for the Court
    pub yes_no_percentage: Option<f64>,
    pub interruptions: u32,
    pub inferred_examiner: u32,
    pub reconstructed_questions: u32,
    pub unresolved: u32,
}

impl PairRecord {
    pub fn new(witness: &str, examiner: &str, stats: &PairStats) -> Self {
        let court = is_court(examiner);
        Self {
            witness: witness.to_string(),
            examiner: examiner.to_string(),
            yes_no_questions: (!court).then_some(stats.yes_no_questions),
            total_questions: (!court).then_some(stats.total_questions),
            yes_no_percentage: if court {
                None
            } else {
                stats.yes_no_percentage()
            },
            interruptions: stats.interruptions,
            inferred_examiner: stats.inferred_examiner,
            reconstructed_questions: stats.reconstructed_questions,
            unresolved: stats.unresolved,
        }
    }
}

/// Run-level figures shown alongside the records
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportMetadata {
    pub total_lines: usize,
    pub source_files: usize,
    pub ranges_analyzed: usize,
    pub default_examiners: DefaultExaminerKey,
    /// Answers whose question went to the external classifier
    pub classifier_queries: usize,
    pub classifier_requests: usize,
    pub unresolved_questions: usize,
    pub unattributed_answers: usize,
    pub heuristics_only: bool,
}

impl StatsReport {
    pub fn new(
        report_id: String,
        policy: EscalationPolicy,
        stats: &WitnessExaminerStats,
        metadata: ReportMetadata,
    ) -> Self {
        let records = stats
            .pairs()
            .into_iter()
            .map(|(witness, examiner, s)| PairRecord::new(witness, examiner, s))
            .collect();
        Self {
            report_id,
            policy,
            generated_at: Local::now().to_rfc3339(),
            records,
            metadata,
        }
    }

    /// Base file name shared by the text and JSON reports
    pub fn file_stem(&self) -> String {
        format!("yn_transcript_output_{}_{}", self.report_id, self.policy.tag())
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    /// Format the report as indented text grouped by witness
    pub fn format_text(&self) -> String {
        let mut output = String::from("Witness Yes/No Question Statistics\n");
        output.push_str("***WARNING: these numbers are rough estimates***\n\n");

        let mut current_witness: Option<&str> = None;
        for record in &self.records {
            if current_witness != Some(record.witness.as_str()) {
                if current_witness.is_some() {
                    output.push('\n');
                }
                output.push_str(&format!("Witness: {}\n", record.witness));
                current_witness = Some(record.witness.as_str());
            }
            output.push_str(&format!("\tExaminer: {}\n", record.examiner));
            output.push_str(&format!(
                "\t\tYes/no questions: {}\n",
                or_na(record.yes_no_questions)
            ));
            output.push_str(&format!(
                "\t\tTotal questions: {}\n",
                or_na(record.total_questions)
            ));
            let percentage = record
                .yes_no_percentage
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "N/A".to_string());
            output.push_str(&format!("\t\tYes/no percentage: {}\n", percentage));
            output.push_str(&format!("\t\tInterruptions: {}\n", record.interruptions));
            if record.unresolved > 0 {
                output.push_str(&format!("\t\tUnresolved: {}\n", record.unresolved));
            }
        }
        if !self.records.is_empty() {
            output.push('\n');
        }

        let meta = &self.metadata;
        output.push_str(&format!(
            "Lines analyzed: {} ({} files, {} ranges)\n",
            meta.total_lines, meta.source_files, meta.ranges_analyzed
        ));
        output.push_str(&format!(
            "Classifier queries: {} ({} requests, {} unresolved)\n",
            meta.classifier_queries, meta.classifier_requests, meta.unresolved_questions
        ));
        if meta.unattributed_answers > 0 {
            output.push_str(&format!(
                "Answers before any witness: {}\n",
                meta.unattributed_answers
            ));
        }
        output
    }

    /// Write the text report
    pub fn write_text(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format_text())?;
        Ok(())
    }
}

fn or_na(value: Option<u32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Case number from the transcript header, or the current local time
pub fn report_id(lines: &[String]) -> String {
    lines
        .iter()
        .take(CASE_NUMBER_SCAN_LINES)
        .find_map(|line| case_number(line))
        .map(|case| format!("case-{}", case))
        .unwrap_or_else(|| Local::now().format("date-%Y-%m-%d_%H-%M").to_string())
}

fn case_number(line: &str) -> Option<String> {
    let (_, rest) = line.split_once("NO. ")?;
    let case: String = rest
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    (!case.is_empty()).then_some(case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnswerVerdict, Classification, ExaminerSource, QuestionAnswerEvent, QuestionSource, COURT,
    };

    fn stats() -> WitnessExaminerStats {
        let mut stats = WitnessExaminerStats::new();
        for (line, yes_no) in [(10, true), (12, false), (14, true)] {
            let event = QuestionAnswerEvent {
                line_index: line,
                witness: "JANE DOE".to_string(),
                examiner: "SMITH".to_string(),
                examiner_source: ExaminerSource::Identified,
                question_text: "DID YOU?".to_string(),
                question_source: QuestionSource::Marked,
                verdict: AnswerVerdict::YesNo,
                classification: Classification::YesNo,
            };
            stats.record_event(&event, yes_no);
        }
        stats.record_interruption("JANE DOE", COURT, 20);
        stats
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_court_reports_na() {
        let report = StatsReport::new(
            "case-1".to_string(),
            EscalationPolicy::Economical,
            &stats(),
            ReportMetadata::default(),
        );
        assert_eq!(report.records.len(), 2);

        let smith = &report.records[0];
        assert_eq!(smith.total_questions, Some(3));
        assert_eq!(smith.yes_no_percentage, Some(66.67));

        let court = &report.records[1];
        assert_eq!(court.examiner, COURT);
        assert_eq!(court.total_questions, None);
        assert_eq!(court.interruptions, 1);

        let text = report.format_text();
        assert!(text.contains("Yes/no percentage: 66.67%"));
        assert!(text.contains("Total questions: N/A"));
        assert!(text.contains("Yes/no percentage: N/A"));
    }

    #[test]
    fn test_report_id_from_case_number() {
        let header = lines(&["SUPERIOR COURT", "CASE NO. BA123456", "PEOPLE v. ROE"]);
        assert_eq!(report_id(&header), "case-BA123456");
    }

    #[test]
    fn test_report_id_falls_back_to_date() {
        let header = lines(&["SUPERIOR COURT"]);
        assert!(report_id(&header).starts_with("date-"));
    }

    #[test]
    fn test_file_stem_includes_policy() {
        let report = StatsReport::new(
            "case-9".to_string(),
            EscalationPolicy::Thorough,
            &WitnessExaminerStats::new(),
            ReportMetadata::default(),
        );
        assert_eq!(report.file_stem(), "yn_transcript_output_case-9_thorough");
    }

    #[test]
    fn test_write_reports() {
        let dir = tempfile::tempdir().unwrap();
        let report = StatsReport::new(
            "case-1".to_string(),
            EscalationPolicy::Economical,
            &stats(),
            ReportMetadata::default(),
        );
        let json_path = dir.path().join("report.json");
        let text_path = dir.path().join("report.txt");
        report.write_json(&json_path).unwrap();
        report.write_text(&text_path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["records"][0]["witness"], "JANE DOE");
        assert!(json["records"][1]["total_questions"].is_null());
        assert!(std::fs::read_to_string(&text_path).unwrap().starts_with("Witness Yes/No"));
    }
}
