use crate::report::DetectionReport;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded log of completed analyses, oldest evicted first. Owned by the
/// calling collaborator; wrap in a mutex if appended from multiple threads.
#[derive(Debug)]
pub struct AnalysisHistory {
    entries: VecDeque<DetectionReport>,
    capacity: usize,
}

impl Default for AnalysisHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, report: DetectionReport) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(report);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectionReport> {
        self.entries.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries.iter().collect::<Vec<_>>())
    }
}
