use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParsingLog {
    pub id: Uuid,
    pub task_id: String,
    pub supplier_id: Option<Uuid>,
    pub error_type: String,
    pub error_message: String,
    pub row_number: Option<i64>,
    pub row_data: Option<JsonValue>,
    pub chunk_id: Option<String>,
    pub extraction_phase: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ParsingLog {
    pub fn new(task_id: impl Into<String>, supplier_id: Option<Uuid>, error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task_id.into(),
            supplier_id,
            error_type: error_type.into(),
            error_message: error_message.into(),
            row_number: None,
            row_data: None,
            chunk_id: None,
            extraction_phase: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_row(mut self, row_number: i64, row_data: JsonValue) -> Self {
        self.row_number = Some(row_number);
        self.row_data = Some(row_data);
        self
    }
}
