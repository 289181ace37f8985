use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{COURT, ExaminerSource, QuestionAnswerEvent, QuestionSource};

/// Counters for one (witness, examiner) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStats {
    pub total_questions: u32,
    pub yes_no_questions: u32,
    pub interruptions: u32,
    /// Questions whose examiner came from the default key or is unknown
    pub inferred_examiner: u32,
    /// Questions rebuilt without a "Q." marker
    pub reconstructed_questions: u32,
    /// Questions the external classifier failed to answer
    pub unresolved: u32,
    /// First transcript line attributed to this pair
    pub first_line: usize,
}

impl PairStats {
    fn new(first_line: usize) -> Self {
        Self {
            first_line,
            ..Default::default()
        }
    }

    /// Yes/no share of all questions, in percent. `None` when there are no questions.
    pub fn yes_no_percentage(&self) -> Option<f64> {
        if self.total_questions == 0 {
            return None;
        }
        let pct = self.yes_no_questions as f64 / self.total_questions as f64 * 100.0;
        Some((pct * 100.0).round() / 100.0)
    }

    fn absorb(&mut self, other: &PairStats) {
        self.total_questions += other.total_questions;
        self.yes_no_questions += other.yes_no_questions;
        self.interruptions += other.interruptions;
        self.inferred_examiner += other.inferred_examiner;
        self.reconstructed_questions += other.reconstructed_questions;
        self.unresolved += other.unresolved;
        self.first_line = self.first_line.min(other.first_line);
    }
}

/// Statistics keyed by witness, then examiner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessExaminerStats {
    pairs: BTreeMap<String, BTreeMap<String, PairStats>>,
}

impl WitnessExaminerStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, witness: &str, examiner: &str, line: usize) -> &mut PairStats {
        let stats = self
            .pairs
            .entry(witness.to_string())
            .or_default()
            .entry(examiner.to_string())
            .or_insert_with(|| PairStats::new(line));
        stats.first_line = stats.first_line.min(line);
        stats
    }

    pub fn get(&self, witness: &str, examiner: &str) -> Option<&PairStats> {
        self.pairs.get(witness).and_then(|e| e.get(examiner))
    }

    /// Count a question/answer event, and its yes/no outcome if Tier 1 settled it
    pub fn record_event(&mut self, event: &QuestionAnswerEvent, is_yes_no: bool) {
        let stats = self.entry(&event.witness, &event.examiner, event.line_index);
        stats.total_questions += 1;
        if is_yes_no {
            stats.yes_no_questions += 1;
        }
        if event.examiner_source != ExaminerSource::Identified {
            stats.inferred_examiner += 1;
        }
        if event.question_source == QuestionSource::Reconstructed {
            stats.reconstructed_questions += 1;
        }
    }

    pub fn record_interruption(&mut self, witness: &str, examiner: &str, line: usize) {
        self.entry(witness, examiner, line).interruptions += 1;
    }

    /// Fold in an external yes/no judgement for an already counted question
    pub fn add_yes_no(&mut self, witness: &str, examiner: &str, line: usize) {
        let stats = self.entry(witness, examiner, line);
        if stats.yes_no_questions < stats.total_questions {
            stats.yes_no_questions += 1;
        }
    }

    pub fn add_unresolved(&mut self, witness: &str, examiner: &str, line: usize) {
        self.entry(witness, examiner, line).unresolved += 1;
    }

    /// Sum another accumulator into this one
    pub fn merge(&mut self, other: &WitnessExaminerStats) {
        for (witness, examiners) in &other.pairs {
            for (examiner, stats) in examiners {
                let target = self
                    .pairs
                    .entry(witness.clone())
                    .or_default()
                    .entry(examiner.clone())
                    .or_insert_with(|| PairStats::new(stats.first_line));
                target.absorb(stats);
            }
        }
    }

    /// All pairs, ordered by where they first appear in the transcript
    pub fn pairs(&self) -> Vec<(&str, &str, &PairStats)> {
        let mut out: Vec<(&str, &str, &PairStats)> = self
            .pairs
            .iter()
            .flat_map(|(w, examiners)| {
                examiners
                    .iter()
                    .map(move |(e, s)| (w.as_str(), e.as_str(), s))
            })
            .collect();
        out.sort_by(|a, b| {
            witness_first_line(&self.pairs, a.0)
                .cmp(&witness_first_line(&self.pairs, b.0))
                .then(a.2.first_line.cmp(&b.2.first_line))
                .then(a.1.cmp(b.1))
        });
        out
    }

    pub fn witness_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn total_questions(&self) -> u32 {
        self.pairs().iter().map(|(_, _, s)| s.total_questions).sum()
    }

    pub fn total_yes_no(&self) -> u32 {
        self.pairs().iter().map(|(_, _, s)| s.yes_no_questions).sum()
    }
}

fn witness_first_line(pairs: &BTreeMap<String, BTreeMap<String, PairStats>>, witness: &str) -> usize {
    pairs
        .get(witness)
        .and_then(|e| e.values().map(|s| s.first_line).min())
        .unwrap_or(usize::MAX)
}

/// Court interjections are not substantive questioning
pub fn is_court(examiner: &str) -> bool {
    examiner == COURT
}
