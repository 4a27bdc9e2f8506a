//! Google Sheets parser: fetches the sheet's CSV export over HTTP and
//! applies the same row-mapping rules as the CSV parser (spec §4.2).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::str::FromStr;

use super::config::GoogleSheetsConfig;
use super::item::ParsedSupplierItem;
use super::registry::ParserInterface;
use crate::error::{CatalogError, Result};

pub struct GoogleSheetsParser;

impl GoogleSheetsParser {
    /// Rewrites a Google Sheets UI url into its CSV export endpoint.
    fn export_url(sheet_url: &str) -> String {
        if let Some(idx) = sheet_url.find("/edit") {
            format!("{}/export?format=csv", &sheet_url[..idx])
        } else if sheet_url.ends_with('/') {
            format!("{sheet_url}export?format=csv")
        } else {
            format!("{sheet_url}/export?format=csv")
        }
    }

    fn parse_csv_body(&self, body: &str, config: &GoogleSheetsConfig) -> Result<Vec<ParsedSupplierItem>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(body.as_bytes());

        let header_row_idx = (config.header_row - 1) as usize;
        let data_start_idx = (config.data_start_row - 1) as usize;
        let mapping = config.column_mapping.clone().unwrap_or_default();
        let characteristic_columns = config.characteristic_columns.clone().unwrap_or_default();

        let mut headers: Vec<String> = Vec::new();
        let mut items = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CatalogError::parser(format!("malformed sheet row {idx}: {e}")))?;
            if idx == header_row_idx {
                headers = record.iter().map(|s| s.trim().to_string()).collect();
                continue;
            }
            if idx < data_start_idx {
                continue;
            }
            if headers.is_empty() {
                return Err(CatalogError::parser("data rows encountered before header row"));
            }

            let find = |field: &str| {
                let header_name = mapping.get(field).map(String::as_str).unwrap_or(field);
                headers.iter().position(|h| h.eq_ignore_ascii_case(header_name))
            };
            let (Some(sku_idx), Some(name_idx), Some(price_idx)) = (find("sku"), find("name"), find("price")) else {
                return Err(CatalogError::parser("could not resolve sku/name/price columns from header row"));
            };

            let sku = record.get(sku_idx).unwrap_or("").trim().to_string();
            let name = record.get(name_idx).unwrap_or("").trim().to_string();
            let price_raw = record.get(price_idx).unwrap_or("0").trim();
            let price = match Decimal::from_str(price_raw) {
                Ok(price) => price,
                Err(_) => {
                    tracing::warn!(row = idx, price_raw, "skipping row with unparseable price");
                    continue;
                }
            };

            let mut characteristics = HashMap::new();
            for col in &characteristic_columns {
                if let Some(i) = headers.iter().position(|h| h.eq_ignore_ascii_case(col)) {
                    if let Some(value) = record.get(i) {
                        characteristics.insert(col.clone(), json!(value.trim()));
                    }
                }
            }

            items.push(ParsedSupplierItem { supplier_sku: sku, name, price, characteristics, in_stock: None });
        }

        Ok(items)
    }
}

#[async_trait]
impl ParserInterface for GoogleSheetsParser {
    async fn parse(&self, config: &JsonValue) -> Result<Vec<ParsedSupplierItem>> {
        let config: GoogleSheetsConfig = serde_json::from_value(config.clone())?;
        config.validate()?;

        let url = Self::export_url(&config.sheet_url);
        let body = reqwest::get(&url)
            .await
            .map_err(|e| CatalogError::parser(format!("failed to fetch '{url}': {e}")))?
            .text()
            .await
            .map_err(|e| CatalogError::parser(format!("failed to read response body: {e}")))?;

        self.parse_csv_body(&body, &config)
    }

    fn validate_config(&self, config: &JsonValue) -> Result<()> {
        let config: GoogleSheetsConfig = serde_json::from_value(config.clone())?;
        config.validate()
    }

    fn name(&self) -> &'static str {
        "google_sheets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_url_strips_edit_suffix() {
        let url = "https://docs.google.com/spreadsheets/d/abc123/edit#gid=0";
        assert_eq!(
            GoogleSheetsParser::export_url(url),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv"
        );
    }

    #[test]
    fn export_url_handles_bare_sheet_url() {
        let url = "https://docs.google.com/spreadsheets/d/abc123";
        assert_eq!(
            GoogleSheetsParser::export_url(url),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv"
        );
    }
}
