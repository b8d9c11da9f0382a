use crate::models::{ContestantSummary, Contestants, ProblemDescriptor};
use crate::scraper::cleaner::problem_id;
use std::collections::HashMap;

/// Leading columns before the first problem: rank, party, score, penalty.
pub const PROBLEM_COLUMN_OFFSET: usize = 4;

/// Problem identifier for a data column, or `None` for the leading columns
/// and for columns past the last problem header.
pub fn problem_for_column(problems: &[ProblemDescriptor], column: usize) -> Option<&str> {
    let idx = column.checked_sub(PROBLEM_COLUMN_OFFSET)?;
    problems.get(idx).map(|p| problem_id(&p.name))
}

/// Per-contestant accepted problems for one extraction call.
///
/// Contestants keep first-seen order; each set keeps insertion order and
/// never holds the same problem twice.
#[derive(Debug, Default)]
pub struct AcceptedSets {
    order: Vec<String>,
    sets: HashMap<String, Vec<String>>,
}

impl AcceptedSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `problem` to every contestant of one row.
    pub fn credit(&mut self, contestants: &[String], problem: &str) {
        for handle in contestants {
            if !self.sets.contains_key(handle) {
                self.order.push(handle.clone());
            }
            let set = self.sets.entry(handle.clone()).or_default();
            if !set.iter().any(|p| p == problem) {
                set.push(problem.to_string());
            }
        }
    }

    pub fn accepted(&self, handle: &str) -> Option<&[String]> {
        self.sets.get(handle).map(|s| s.as_slice())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Join every set with `-`; entries are finalized independently.
    pub fn finalize(mut self) -> Contestants {
        let entries = self
            .order
            .into_iter()
            .map(|handle| {
                let ac = self.sets.remove(&handle).unwrap_or_default().join("-");
                (handle, ContestantSummary { ac })
            })
            .collect();
        Contestants(entries)
    }
}
