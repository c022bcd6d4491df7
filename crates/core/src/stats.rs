//! Aggregate task statistics.

use serde::Serialize;

/// Task counts per status. Every key is always present; absent statuses
/// report zero.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}

/// Task counts per priority. Every key is always present.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

/// Whole-table statistics over live (non-deleted) tasks.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub status_counts: StatusCounts,
    pub priority_counts: PriorityCounts,
}

impl TaskStats {
    /// Sum of all status buckets; equals the live task count.
    pub fn total(&self) -> i64 {
        self.status_counts.pending + self.status_counts.in_progress + self.status_counts.completed
    }
}
