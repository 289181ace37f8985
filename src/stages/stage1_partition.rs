use serde::Serialize;

use crate::heuristics::is_witness_identifier;

/// A contiguous range of transcript lines analysed on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    /// First line (inclusive)
    pub start: usize,
    /// One past the last line
    pub end: usize,
    /// Witness identifier line opening this range, if any
    pub witness_line: Option<usize>,
}

impl LineRange {
    /// The whole transcript as one range
    pub fn whole(len: usize) -> Self {
        Self {
            start: 0,
            end: len,
            witness_line: None,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Perform Stage 1: split the transcript at witness boundaries
///
/// Each witness's range runs from their identifier line up to the line
/// before the next witness's identifier, so the previous witness's last
/// answer stays with them. Lines ahead of the first witness form a preamble
/// range. Ranges are contiguous and cover every line exactly once.
pub fn partition_by_witness(lines: &[String]) -> Vec<LineRange> {
    let witness_lines: Vec<usize> = (0..lines.len())
        .filter(|&i| is_witness_identifier(lines, i))
        .collect();

    let mut starts: Vec<(usize, Option<usize>)> = Vec::with_capacity(witness_lines.len() + 1);
    starts.push((0, None));
    for &w in &witness_lines {
        match starts.last_mut() {
            // A witness on the first line takes over the empty preamble
            Some(last) if w <= last.0 => last.1 = last.1.or(Some(w)),
            _ => starts.push((w, Some(w))),
        }
    }

    let mut ranges = Vec::with_capacity(starts.len());
    for (k, &(start, witness_line)) in starts.iter().enumerate() {
        let end = starts.get(k + 1).map(|s| s.0).unwrap_or(lines.len());
        let range = LineRange {
            start,
            end,
            witness_line,
        };
        if !range.is_empty() {
            ranges.push(range);
        }
    }
    ranges
}
