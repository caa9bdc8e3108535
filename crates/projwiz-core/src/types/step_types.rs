//! Pipeline step outcome types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Callback invoked as each step is recorded
pub type StepCallback = Arc<dyn Fn(&StepRecord) + Send + Sync>;

/// Outcome of a single pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step completed
    Ok,
    /// Step failed but the run continued
    Degraded,
    /// Step was not attempted
    Skipped,
    /// Step failed and ended the run
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Ok => "ok",
            StepStatus::Degraded => "degraded",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A recorded step with its outcome and a human-readable detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: String,
    pub status: StepStatus,
    pub detail: String,
}

impl StepRecord {
    pub fn new(step: impl Into<String>, status: StepStatus, detail: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            status,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "[{}] {}", self.status, self.step)
        } else {
            write!(f, "[{}] {}: {}", self.status, self.step, self.detail)
        }
    }
}

/// Ordered log of step records
///
/// An optional callback sees every record as it is appended, which lets
/// front-ends show progress while a run is still going.
#[derive(Clone, Default)]
pub struct StepLog {
    records: Vec<StepRecord>,
    callback: Option<StepCallback>,
}

impl fmt::Debug for StepLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepLog")
            .field("records", &self.records)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that reports each record to `callback`
    pub fn with_callback(callback: Option<StepCallback>) -> Self {
        Self {
            records: Vec::new(),
            callback,
        }
    }

    /// Append a record
    pub fn record(&mut self, step: impl Into<String>, status: StepStatus, detail: impl Into<String>) {
        self.push(StepRecord::new(step, status, detail));
    }

    /// Append an already built record
    pub fn push(&mut self, record: StepRecord) {
        if let Some(callback) = &self.callback {
            callback(&record);
        }
        self.records.push(record);
    }

    /// Append every record of another log
    pub fn extend(&mut self, records: impl IntoIterator<Item = StepRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// Append records that were already reported to the callback
    pub fn append_reported(&mut self, records: impl IntoIterator<Item = StepRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }

    /// Rendered text lines, one per record
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(ToString::to_string).collect()
    }

    /// Whether any record has the given status
    pub fn any(&self, status: StepStatus) -> bool {
        self.records.iter().any(|r| r.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_record_display() {
        let record = StepRecord::new("clone", StepStatus::Ok, "acme/tmpl@main");
        assert_eq!(record.to_string(), "[ok] clone: acme/tmpl@main");

        let bare = StepRecord::new("tag", StepStatus::Skipped, "");
        assert_eq!(bare.to_string(), "[skipped] tag");
    }

    #[test]
    fn test_step_log_order_and_lines() {
        let mut log = StepLog::new();
        log.record("validate", StepStatus::Ok, "");
        log.record("push", StepStatus::Degraded, "rejected");

        assert_eq!(log.records().len(), 2);
        assert_eq!(log.lines(), vec!["[ok] validate", "[degraded] push: rejected"]);
        assert!(log.any(StepStatus::Degraded));
        assert!(!log.any(StepStatus::Failed));
    }

    #[test]
    fn test_callback_sees_each_record() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut log = StepLog::with_callback(Some(Arc::new(move |r: &StepRecord| {
            sink.lock().unwrap().push(r.step.clone());
        })));

        log.record("clone", StepStatus::Ok, "");
        log.extend(vec![StepRecord::new("rewrite", StepStatus::Ok, "3 files")]);

        assert_eq!(*seen.lock().unwrap(), vec!["clone", "rewrite"]);
        assert_eq!(log.records().len(), 2);

        log.append_reported(vec![StepRecord::new("backend:project", StepStatus::Ok, "")]);
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(log.records().len(), 3);
    }

    #[test]
    fn test_step_status_serializes_lowercase() {
        let json = serde_json::to_string(&StepStatus::Degraded).unwrap();
        assert_eq!(json, "\"degraded\"");
    }
}
