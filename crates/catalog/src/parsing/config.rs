//! Source configuration for file- and sheet-based parsers (spec §4.2),
//! grounded in the distillation's `FileParserConfig`/`GoogleSheetsConfig`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CatalogError;

const VALID_MAPPING_KEYS: [&str; 3] = ["sku", "name", "price"];

fn validate_column_mapping(mapping: &Option<HashMap<String, String>>) -> Result<(), CatalogError> {
    let Some(mapping) = mapping else { return Ok(()) };
    for key in mapping.keys() {
        if !VALID_MAPPING_KEYS.contains(&key.as_str()) {
            return Err(CatalogError::validation(
                "column_mapping",
                format!("key '{key}' must be one of {VALID_MAPPING_KEYS:?}"),
            ));
        }
    }
    Ok(())
}

fn validate_header_rows(
    header_row: u32,
    header_row_end: Option<u32>,
    data_start_row: u32,
    min_data_start_row: u32,
) -> Result<(), CatalogError> {
    if header_row < 1 {
        return Err(CatalogError::validation("header_row", "must be >= 1"));
    }
    if let Some(end) = header_row_end {
        if end < header_row {
            return Err(CatalogError::validation(
                "header_row_end",
                format!("must be >= header_row ({header_row})"),
            ));
        }
    }
    let last_header_row = header_row_end.unwrap_or(header_row);
    if data_start_row <= last_header_row {
        return Err(CatalogError::validation(
            "data_start_row",
            format!("must be > last header row ({last_header_row})"),
        ));
    }
    if data_start_row < min_data_start_row {
        return Err(CatalogError::validation(
            "data_start_row",
            format!("must be >= {min_data_start_row}"),
        ));
    }
    Ok(())
}

/// Base configuration shared by CSV and Excel parsers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileParserConfig {
    pub file_path: String,
    pub original_filename: Option<String>,
    pub column_mapping: Option<HashMap<String, String>>,
    pub characteristic_columns: Option<Vec<String>>,
    #[serde(default = "default_header_row")]
    pub header_row: u32,
    pub header_row_end: Option<u32>,
    #[serde(default = "default_data_start_row")]
    pub data_start_row: u32,
}

fn default_header_row() -> u32 {
    1
}

fn default_data_start_row() -> u32 {
    2
}

impl FileParserConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.file_path.trim().is_empty() {
            return Err(CatalogError::validation("file_path", "must not be empty"));
        }
        if !catalog_core::is_safe_relative_path(&self.file_path) && !self.file_path.starts_with('/') {
            // Absolute paths are accepted (uploads are stored under a fixed
            // directory known to the worker); traversal segments never are.
            return Err(CatalogError::security(format!(
                "file_path '{}' contains a path traversal segment",
                self.file_path
            )));
        }
        validate_column_mapping(&self.column_mapping)?;
        validate_header_rows(self.header_row, self.header_row_end, self.data_start_row, 2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvParserConfig {
    #[serde(flatten)]
    pub base: FileParserConfig,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl CsvParserConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.base.validate()?;
        if self.delimiter.is_empty() || self.delimiter.len() > 5 {
            return Err(CatalogError::validation("delimiter", "must be 1-5 characters"));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcelParserConfig {
    #[serde(flatten)]
    pub base: FileParserConfig,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

impl ExcelParserConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.base.validate()?;
        if self.sheet_name.trim().is_empty() {
            return Err(CatalogError::validation("sheet_name", "must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSheetsConfig {
    pub sheet_url: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    pub column_mapping: Option<HashMap<String, String>>,
    pub characteristic_columns: Option<Vec<String>>,
    #[serde(default = "default_header_row")]
    pub header_row: u32,
    pub header_row_end: Option<u32>,
    #[serde(default = "default_data_start_row")]
    pub data_start_row: u32,
}

impl GoogleSheetsConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.sheet_url.starts_with("http://") && !self.sheet_url.starts_with("https://") {
            return Err(CatalogError::validation("sheet_url", "must be a valid HTTP/HTTPS URL"));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(CatalogError::validation("sheet_name", "must not be empty"));
        }
        validate_column_mapping(&self.column_mapping)?;
        // Google Sheets config requires data_start_row >= 2 regardless of header rows.
        validate_header_rows(self.header_row, self.header_row_end, self.data_start_row, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(file_path: &str) -> FileParserConfig {
        FileParserConfig {
            file_path: file_path.to_string(),
            original_filename: None,
            column_mapping: None,
            characteristic_columns: None,
            header_row: 1,
            header_row_end: None,
            data_start_row: 2,
        }
    }

    #[test]
    fn rejects_path_traversal() {
        let cfg = base("../../etc/passwd");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn accepts_relative_upload_path() {
        let cfg = base("uploads/acme/list.csv");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_data_start_row_before_header() {
        let mut cfg = base("uploads/list.csv");
        cfg.data_start_row = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_header_row_end_before_header_row() {
        let mut cfg = base("uploads/list.csv");
        cfg.header_row = 3;
        cfg.header_row_end = Some(2);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unknown_column_mapping_key() {
        let mut cfg = base("uploads/list.csv");
        cfg.column_mapping = Some(HashMap::from([("barcode".to_string(), "EAN".to_string())]));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn google_sheets_requires_http_url() {
        let cfg = GoogleSheetsConfig {
            sheet_url: "not-a-url".to_string(),
            sheet_name: "Sheet1".to_string(),
            column_mapping: None,
            characteristic_columns: None,
            header_row: 1,
            header_row_end: None,
            data_start_row: 2,
        };
        assert!(cfg.validate().is_err());
    }
}
