//! Master-sync orchestrator (spec §4.7): reconciles the supplier registry
//! and fans out per-supplier parse tasks while publishing progress.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{MasterSyncOrchestrator, ParseTaskDispatcher, SyncStatusStore};
pub use types::{MasterSyncResult, SyncOutcome, SyncState, SyncStatusMessage};
