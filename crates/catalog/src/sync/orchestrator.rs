//! Master-sync orchestrator (spec §4.7): reconciles the supplier registry
//! from an external sheet and fans out per-supplier parse tasks.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::types::{MasterSyncResult, SyncState, SyncStatusMessage};
use crate::error::Result;
use crate::supplier::{SourceType, SupplierConfigRow, SupplierRepository};

/// Publishes orchestrator progress and enforces the single-flight guarantee
/// (spec §5 "Only one orchestrator loop runs at a time").
#[async_trait]
pub trait SyncStatusStore: Send + Sync {
    async fn get(&self) -> Result<SyncStatusMessage>;
    async fn set(&self, status: SyncStatusMessage) -> Result<()>;
}

/// Dispatches a `parse_task` for an active supplier (spec §4.7). Kept as a
/// trait so the orchestrator stays independent of the concrete queue.
#[async_trait]
pub trait ParseTaskDispatcher: Send + Sync {
    async fn dispatch(&self, supplier_id: Uuid, supplier_name: &str, source_type: SourceType, source_url: &str) -> Result<()>;
}

pub struct MasterSyncOrchestrator {
    pub suppliers: std::sync::Arc<dyn SupplierRepository>,
    pub status: std::sync::Arc<dyn SyncStatusStore>,
    pub dispatcher: std::sync::Arc<dyn ParseTaskDispatcher>,
}

impl MasterSyncOrchestrator {
    /// Runs one full reconciliation pass. Rejects the call outright if a
    /// sync is already in flight (spec §5).
    pub async fn run(&self, task_id: &str, rows: Vec<SupplierConfigRow>) -> Result<MasterSyncResult> {
        let current = self.status.get().await?;
        if current.is_syncing() {
            return Err(catalog_core::Error::sync_in_progress().into());
        }

        let started_at = Utc::now();
        self.status
            .set(SyncStatusMessage {
                state: SyncState::SyncingMaster,
                task_id: Some(task_id.to_string()),
                started_at: Some(started_at),
                progress_current: 0,
                progress_total: rows.len() as u32,
            })
            .await?;

        let mut result = MasterSyncResult::new();
        let mut active_suppliers: Vec<(Uuid, String, SourceType, String)> = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            match self.reconcile_row(row).await {
                Ok((Reconciled::Created(id), source_type)) => {
                    result.suppliers_created += 1;
                    if row.is_active {
                        active_suppliers.push((id, row.supplier_name.clone(), source_type, row.source_url.clone()));
                    }
                }
                Ok((Reconciled::Updated(id), source_type)) => {
                    result.suppliers_updated += 1;
                    if row.is_active {
                        active_suppliers.push((id, row.supplier_name.clone(), source_type, row.source_url.clone()));
                    } else {
                        result.suppliers_deactivated += 1;
                    }
                }
                Err(err) => {
                    warn!(supplier_name = %row.supplier_name, error = %err, "skipped master-sheet row");
                    result.suppliers_skipped += 1;
                    result.errors.push(format!("{}: {err}", row.supplier_name));
                }
            }

            self.status
                .set(SyncStatusMessage {
                    state: SyncState::SyncingMaster,
                    task_id: Some(task_id.to_string()),
                    started_at: Some(started_at),
                    progress_current: (idx + 1) as u32,
                    progress_total: rows.len() as u32,
                })
                .await?;
        }

        self.status
            .set(SyncStatusMessage {
                state: SyncState::ProcessingSuppliers,
                task_id: Some(task_id.to_string()),
                started_at: Some(started_at),
                progress_current: 0,
                progress_total: active_suppliers.len() as u32,
            })
            .await?;

        for (idx, (id, name, source_type, url)) in active_suppliers.iter().enumerate() {
            if let Err(err) = self.dispatcher.dispatch(*id, name, *source_type, url).await {
                warn!(supplier_name = %name, error = %err, "failed to dispatch parse task");
                result.errors.push(format!("{name}: dispatch failed: {err}"));
            }
            self.status
                .set(SyncStatusMessage {
                    state: SyncState::ProcessingSuppliers,
                    task_id: Some(task_id.to_string()),
                    started_at: Some(started_at),
                    progress_current: (idx + 1) as u32,
                    progress_total: active_suppliers.len() as u32,
                })
                .await?;
        }

        result.duration_seconds = (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;
        self.status.set(SyncStatusMessage::default()).await?;

        info!(
            task_id,
            created = result.suppliers_created,
            updated = result.suppliers_updated,
            deactivated = result.suppliers_deactivated,
            skipped = result.suppliers_skipped,
            "master sync complete"
        );

        Ok(result)
    }

    async fn reconcile_row(&self, row: &crate::supplier::SupplierConfigRow) -> Result<(Reconciled, SourceType)> {
        row.validate()?;
        let source_type = row.source_type()?;
        let (supplier, created) = self
            .suppliers
            .upsert_by_name(&row.supplier_name, source_type, &row.source_url, row.is_active, row.notes.as_deref())
            .await?;
        let reconciled = if created { Reconciled::Created(supplier.id) } else { Reconciled::Updated(supplier.id) };
        Ok((reconciled, source_type))
    }
}

enum Reconciled {
    Created(Uuid),
    Updated(Uuid),
}
