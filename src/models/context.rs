use serde::{Deserialize, Serialize};

/// Marker recorded when no examiner can be identified or inferred
pub const UNKNOWN_EXAMINER: &str = "UNKNOWN EXAMINER";

/// Examiner name the court is recorded under
pub const COURT: &str = "COURT";

/// Which party called the current witness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExaminationSide {
    People,
    Defense,
    Unknown,
}

impl ExaminationSide {
    /// The party that cross-examines a witness called by this side
    pub fn opposing(self) -> Self {
        match self {
            ExaminationSide::People => ExaminationSide::Defense,
            ExaminationSide::Defense => ExaminationSide::People,
            ExaminationSide::Unknown => ExaminationSide::Unknown,
        }
    }
}

/// Examination phase, taken from the nearest examination header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExaminationPhase {
    Direct,
    Cross,
    Unknown,
}

impl ExaminationPhase {
    /// Derive the phase from a cleaned examination header.
    ///
    /// REDIRECT reads as direct and RECROSS as cross since the header text
    /// carries the base word.
    pub fn from_header(cleaned: &str) -> Self {
        if cleaned.contains("DIRECT") {
            ExaminationPhase::Direct
        } else if cleaned.contains("CROSS") {
            ExaminationPhase::Cross
        } else {
            ExaminationPhase::Unknown
        }
    }
}

/// How the examiner of a question was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExaminerSource {
    /// Read from a "BY MR. SMITH:" line
    Identified,
    /// Filled in from the default examiner key
    Inferred,
    /// Nothing to go on; recorded under [`UNKNOWN_EXAMINER`]
    Unresolved,
}

/// How the text of a question was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    /// Opened by a "Q." marker or the examiner's label
    Marked,
    /// Rebuilt by scanning back from the answer
    Reconstructed,
}

/// Per-side fallback examiners, built once per transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultExaminerKey {
    pub people: Option<String>,
    pub defense: Option<String>,
}

impl DefaultExaminerKey {
    pub fn get(&self, side: ExaminationSide) -> Option<&str> {
        match side {
            ExaminationSide::People => self.people.as_deref(),
            ExaminationSide::Defense => self.defense.as_deref(),
            ExaminationSide::Unknown => None,
        }
    }

    /// Record a default for a side; returns false if the side already had one
    pub fn set(&mut self, side: ExaminationSide, examiner: String) -> bool {
        let slot = match side {
            ExaminationSide::People => &mut self.people,
            ExaminationSide::Defense => &mut self.defense,
            ExaminationSide::Unknown => return false,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(examiner);
        true
    }

    pub fn has(&self, side: ExaminationSide) -> bool {
        self.get(side).is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.people.is_some() && self.defense.is_some()
    }

    /// Guess the examiner for a side and phase.
    ///
    /// Direct examination is conducted by the calling side, cross by the
    /// opposing side. Returns `None` when either is unknown or no default
    /// was found for the side in question.
    pub fn resolve(&self, side: ExaminationSide, phase: ExaminationPhase) -> Option<&str> {
        match phase {
            ExaminationPhase::Direct => self.get(side),
            ExaminationPhase::Cross => self.get(side.opposing()),
            ExaminationPhase::Unknown => None,
        }
    }
}

/// Mutable speaker context for one processing range
#[derive(Debug, Clone)]
pub struct SpeakerContext {
    pub current_witness: String,
    pub current_side: ExaminationSide,
    pub current_phase: ExaminationPhase,
    /// Empty when the examiner has not been seen since the last header
    pub current_examiner: String,
    pub examiner_source: ExaminerSource,
    /// Accumulated question text, empty when no question is open
    pub active_question: String,
}

impl SpeakerContext {
    pub fn new() -> Self {
        Self {
            current_witness: String::new(),
            current_side: ExaminationSide::Unknown,
            current_phase: ExaminationPhase::Unknown,
            current_examiner: String::new(),
            examiner_source: ExaminerSource::Unresolved,
            active_question: String::new(),
        }
    }

    pub fn enter_witness(&mut self, witness: String, side: ExaminationSide) {
        self.current_witness = witness;
        self.current_side = side;
        self.active_question.clear();
    }

    pub fn enter_examination(&mut self, phase: ExaminationPhase) {
        self.current_examiner.clear();
        self.current_phase = phase;
        self.active_question.clear();
    }

    pub fn set_examiner(&mut self, examiner: String, source: ExaminerSource) {
        self.current_examiner = examiner;
        self.examiner_source = source;
        self.active_question.clear();
    }

    pub fn has_witness(&self) -> bool {
        !self.current_witness.is_empty()
    }

    /// Fill in a missing examiner from the default key.
    ///
    /// The guess stays in place until the next examination header or
    /// examiner line.
    pub fn repair_examiner(&mut self, defaults: &DefaultExaminerKey) {
        if !self.current_examiner.is_empty() {
            return;
        }
        match defaults.resolve(self.current_side, self.current_phase) {
            Some(name) => {
                self.current_examiner = name.to_string();
                self.examiner_source = ExaminerSource::Inferred;
            }
            None => {
                self.current_examiner = UNKNOWN_EXAMINER.to_string();
                self.examiner_source = ExaminerSource::Unresolved;
            }
        }
    }
}

impl Default for SpeakerContext {
    fn default() -> Self {
        Self::new()
    }
}
