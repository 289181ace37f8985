use std::path::PathBuf;

/// Ordered transcript lines, with page/line-number noise already dropped
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub lines: Vec<String>,
    /// Files the lines were read from, in order
    pub sources: Vec<PathBuf>,
}

impl Transcript {
    /// Build from raw extracted text, dropping lines that are only digits or whitespace
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .filter(|line| !is_numbering_noise(line))
            .map(|line| line.to_string())
            .collect();
        Self {
            lines,
            sources: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Page and line numbers come through as lines of bare digits
fn is_numbering_noise(line: &str) -> bool {
    line.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
}
