//! Per-stage execution records collected during a run.

use super::StageStatus;
use crate::stages::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened when one stage ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage that ran.
    pub step: Step,
    /// Outcome of the stage.
    pub status: StageStatus,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
    /// Context length before the stage ran.
    pub context_before: usize,
    /// Context length after the stage ran.
    pub context_after: usize,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageRecord {
    /// Creates a record for a stage that completed.
    #[must_use]
    pub fn completed(
        step: Step,
        started_at: DateTime<Utc>,
        context_before: usize,
        context_after: usize,
    ) -> Self {
        Self {
            step,
            status: StageStatus::Ok,
            started_at,
            ended_at: Utc::now(),
            context_before,
            context_after,
            error: None,
        }
    }

    /// Creates a record for a stage that failed.
    #[must_use]
    pub fn failed(
        step: Step,
        started_at: DateTime<Utc>,
        context_before: usize,
        context_after: usize,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step,
            status: StageStatus::Failed,
            started_at,
            ended_at: Utc::now(),
            context_before,
            context_after,
            error: Some(error.into()),
        }
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }

    /// Number of context entries this stage appended.
    #[must_use]
    pub const fn appended(&self) -> usize {
        self.context_after.saturating_sub(self.context_before)
    }

    /// Returns true if the stage succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_record() {
        let record = StageRecord::completed(Step::Retrieve, Utc::now(), 0, 3);

        assert_eq!(record.step, Step::Retrieve);
        assert!(record.is_success());
        assert_eq!(record.appended(), 3);
        assert!(record.error.is_none());
        assert!(record.duration_ms() >= 0);
    }

    #[test]
    fn test_failed_record() {
        let record = StageRecord::failed(Step::WebSearch, Utc::now(), 2, 2, "rate limited");

        assert!(!record.is_success());
        assert_eq!(record.status, StageStatus::Failed);
        assert_eq!(record.appended(), 0);
        assert_eq!(record.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_record_serialization() {
        let record = StageRecord::completed(Step::GenerateAnswer, Utc::now(), 1, 1);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["step"], "generate_answer");
        assert_eq!(json["status"], "ok");
        assert!(json.get("error").is_none());

        let back: StageRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
