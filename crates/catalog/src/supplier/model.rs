//! Supplier data model: an external source of supplier price-list data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::CatalogError;

/// Source format for a supplier's price-list feed (spec §3 check constraint
/// `source_type IN ('google_sheets', 'csv', 'excel')`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "source_type", rename_all = "snake_case")]
pub enum SourceType {
    GoogleSheets,
    Csv,
    Excel,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleSheets => "google_sheets",
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }

    /// The master-sheet schema (spec §7) also recognizes `pdf`, which is
    /// accepted on the row but has no registered parser; such rows are
    /// upserted as suppliers but never produce a `parse_task`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "google_sheets" => Some(Self::GoogleSheets),
            "csv" => Some(Self::Csv),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// A supplier: an external data source owning a stream of `SupplierItem`s.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub source_type: SourceType,
    pub contact_email: Option<String>,
    pub meta: JsonValue,
    pub is_active: bool,
    pub use_semantic_etl: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source_type,
            contact_email: None,
            meta: JsonValue::Object(Default::default()),
            is_active: true,
            use_semantic_etl: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "supplier name cannot be empty"));
        }
        if let Some(email) = &self.contact_email {
            if !catalog_core::validate_email(email) {
                return Err(CatalogError::validation(
                    "contact_email",
                    format!("'{email}' is not a valid email address"),
                ));
            }
        }
        Ok(())
    }
}

/// A single row of the master supplier directory (spec §4.7/§6). `format`
/// is kept as the raw header string because the sheet also recognizes
/// `pdf` (spec §6) which has no `SourceType` counterpart; such rows fail
/// validation and are counted as skipped rather than upserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierConfigRow {
    pub supplier_name: String,
    pub source_url: String,
    pub format: String,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl SupplierConfigRow {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.supplier_name.trim().is_empty() || self.supplier_name.len() > 255 {
            return Err(CatalogError::validation("supplier_name", "must be 1-255 characters"));
        }
        if !self.source_url.starts_with("http://") && !self.source_url.starts_with("https://") {
            return Err(CatalogError::validation("source_url", "must be a valid HTTP/HTTPS URL"));
        }
        Ok(())
    }

    pub fn source_type(&self) -> Result<SourceType, CatalogError> {
        SourceType::parse(&self.format)
            .ok_or_else(|| CatalogError::validation("format", format!("unsupported source format '{}'", self.format)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_supplier_defaults_active_non_semantic() {
        let s = Supplier::new("Acme Wholesale", SourceType::Csv);
        assert!(s.is_active);
        assert!(!s.use_semantic_etl);
        assert_eq!(s.meta, JsonValue::Object(Default::default()));
    }

    #[test]
    fn rejects_blank_name() {
        let mut s = Supplier::new("  ", SourceType::Csv);
        s.name = "  ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_malformed_contact_email() {
        let mut s = Supplier::new("Acme", SourceType::Csv);
        s.contact_email = Some("not-an-email".to_string());
        assert!(s.validate().is_err());
    }

    #[test]
    fn source_type_round_trips_through_str() {
        for variant in [SourceType::GoogleSheets, SourceType::Csv, SourceType::Excel] {
            assert_eq!(SourceType::parse(variant.as_str()), Some(variant));
        }
        assert_eq!(SourceType::parse("pdf"), None);
    }
}
