//! CSV parser: reads a delimited file per `CsvParserConfig`, applying the
//! configured column mapping and header/data row offsets (spec §4.2).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::str::FromStr;

use super::config::CsvParserConfig;
use super::item::ParsedSupplierItem;
use super::registry::ParserInterface;
use crate::error::{CatalogError, Result};

pub struct CsvParser;

fn resolve_column<'a>(mapping: &'a HashMap<String, String>, field: &str, headers: &[String]) -> Option<usize> {
    let header_name = mapping.get(field).map(String::as_str).unwrap_or(field);
    headers.iter().position(|h| h.eq_ignore_ascii_case(header_name))
}

impl CsvParser {
    fn parse_sync(&self, config: &CsvParserConfig) -> Result<Vec<ParsedSupplierItem>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter_byte())
            .has_headers(false)
            .from_path(&config.base.file_path)
            .map_err(|e| CatalogError::parser(format!("failed to open '{}': {e}", config.base.file_path)))?;

        let header_row_idx = (config.base.header_row - 1) as usize;
        let data_start_idx = (config.base.data_start_row - 1) as usize;
        let mapping = config.base.column_mapping.clone().unwrap_or_default();
        let characteristic_columns = config.base.characteristic_columns.clone().unwrap_or_default();

        let mut headers: Vec<String> = Vec::new();
        let mut items = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CatalogError::parser(format!("malformed CSV row {idx}: {e}")))?;
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

            let sku_idx = resolve_column(&mapping, "sku", &headers);
            let name_idx = resolve_column(&mapping, "name", &headers);
            let price_idx = resolve_column(&mapping, "price", &headers);

            let (Some(sku_idx), Some(name_idx), Some(price_idx)) = (sku_idx, name_idx, price_idx) else {
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
impl ParserInterface for CsvParser {
    async fn parse(&self, config: &JsonValue) -> Result<Vec<ParsedSupplierItem>> {
        let config: CsvParserConfig = serde_json::from_value(config.clone())?;
        config.validate()?;
        let parser = CsvParser;
        tokio::task::spawn_blocking(move || parser.parse_sync(&config))
            .await
            .map_err(|e| CatalogError::parser(format!("csv parse task panicked: {e}")))?
    }

    fn validate_config(&self, config: &JsonValue) -> Result<()> {
        let config: CsvParserConfig = serde_json::from_value(config.clone())?;
        config.validate()
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
