use async_trait::async_trait;
use catalog_core::DatabasePool;
use sqlx::Row;

use super::model::ParsingLog;
use crate::error::Result;

const SELECT_COLUMNS: &str = "id, task_id, supplier_id, error_type, error_message, \
    row_number, row_data, chunk_id, extraction_phase, created_at";

#[async_trait]
pub trait ParsingLogRepository: Send + Sync {
    async fn record(&self, log: &ParsingLog) -> Result<()>;
    async fn list_for_task(&self, task_id: &str) -> Result<Vec<ParsingLog>>;
}

pub struct PostgresParsingLogRepository {
    db: DatabasePool,
}

impl PostgresParsingLogRepository {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::PgPool {
        &self.db.pool
    }

    fn row_to_log(row: sqlx::postgres::PgRow) -> ParsingLog {
        ParsingLog {
            id: row.get("id"),
            task_id: row.get("task_id"),
            supplier_id: row.get("supplier_id"),
            error_type: row.get("error_type"),
            error_message: row.get("error_message"),
            row_number: row.get("row_number"),
            row_data: row.get("row_data"),
            chunk_id: row.get("chunk_id"),
            extraction_phase: row.get("extraction_phase"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ParsingLogRepository for PostgresParsingLogRepository {
    async fn record(&self, log: &ParsingLog) -> Result<()> {
        let query = format!(
            r#"
            INSERT INTO parsing_logs
                (id, task_id, supplier_id, error_type, error_message, row_number, row_data, chunk_id, extraction_phase, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#
        );
        sqlx::query(&query)
            .bind(log.id)
            .bind(&log.task_id)
            .bind(log.supplier_id)
            .bind(&log.error_type)
            .bind(&log.error_message)
            .bind(log.row_number)
            .bind(&log.row_data)
            .bind(&log.chunk_id)
            .bind(&log.extraction_phase)
            .bind(log.created_at)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn list_for_task(&self, task_id: &str) -> Result<Vec<ParsingLog>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM parsing_logs WHERE task_id = $1 ORDER BY created_at ASC");
        let rows = sqlx::query(&query).bind(task_id).fetch_all(self.pool()).await?;
        Ok(rows.into_iter().map(Self::row_to_log).collect())
    }
}
