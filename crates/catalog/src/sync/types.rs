use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared key-value status record external readers poll (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    SyncingMaster,
    ProcessingSuppliers,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatusMessage {
    pub state: SyncState,
    pub task_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub progress_current: u32,
    pub progress_total: u32,
}

impl SyncStatusMessage {
    pub fn is_syncing(&self) -> bool {
        self.state != SyncState::Idle
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.progress_total == 0 {
            0.0
        } else {
            (self.progress_current as f64 / self.progress_total as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Success,
    PartialSuccess,
    Error,
}

/// Summary message reported on sync completion (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterSyncResult {
    pub suppliers_created: u32,
    pub suppliers_updated: u32,
    pub suppliers_deactivated: u32,
    pub suppliers_skipped: u32,
    pub errors: Vec<String>,
    pub duration_seconds: f64,
}

impl MasterSyncResult {
    pub fn new() -> Self {
        Self {
            suppliers_created: 0,
            suppliers_updated: 0,
            suppliers_deactivated: 0,
            suppliers_skipped: 0,
            errors: Vec::new(),
            duration_seconds: 0.0,
        }
    }

    pub fn total_processed(&self) -> u32 {
        self.suppliers_created + self.suppliers_updated + self.suppliers_deactivated
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// `partial_success` iff at least one row was skipped but at least one
    /// supplier was otherwise processed (spec §4.7).
    pub fn status(&self) -> SyncOutcome {
        if self.suppliers_skipped > 0 && self.total_processed() > 0 {
            SyncOutcome::PartialSuccess
        } else if self.suppliers_skipped > 0 && self.total_processed() == 0 {
            SyncOutcome::Error
        } else {
            SyncOutcome::Success
        }
    }
}

impl Default for MasterSyncResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_success_requires_both_skips_and_processed() {
        let mut result = MasterSyncResult::new();
        result.suppliers_skipped = 1;
        result.suppliers_created = 2;
        assert_eq!(result.status(), SyncOutcome::PartialSuccess);
    }

    #[test]
    fn all_skipped_is_error() {
        let mut result = MasterSyncResult::new();
        result.suppliers_skipped = 3;
        assert_eq!(result.status(), SyncOutcome::Error);
    }

    #[test]
    fn no_skips_is_success() {
        let mut result = MasterSyncResult::new();
        result.suppliers_created = 2;
        assert_eq!(result.status(), SyncOutcome::Success);
    }
}
