//! Excel parser: reads a named worksheet per `ExcelParserConfig` using
//! `calamine` (spec §4.2).

use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

use super::config::ExcelParserConfig;
use super::item::ParsedSupplierItem;
use super::registry::ParserInterface;
use crate::error::{CatalogError, Result};

pub struct ExcelParser;

fn cell_to_string(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_to_decimal(data: &Data) -> Option<Decimal> {
    match data {
        Data::Float(f) => Decimal::try_from(*f).ok(),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl ExcelParser {
    fn parse_sync(&self, config: &ExcelParserConfig) -> Result<Vec<ParsedSupplierItem>> {
        let mut workbook = open_workbook_auto(&config.base.file_path)
            .map_err(|e| CatalogError::parser(format!("failed to open '{}': {e}", config.base.file_path)))?;

        let range = workbook
            .worksheet_range(&config.sheet_name)
            .map_err(|e| CatalogError::parser(format!("sheet '{}' not found: {e}", config.sheet_name)))?;

        let header_row_idx = (config.base.header_row - 1) as usize;
        let data_start_idx = (config.base.data_start_row - 1) as usize;
        let mapping = config.base.column_mapping.clone().unwrap_or_default();
        let characteristic_columns = config.base.characteristic_columns.clone().unwrap_or_default();

        let Some(header_row) = range.rows().nth(header_row_idx) else {
            return Err(CatalogError::parser("header row out of range"));
        };
        let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

        let sku_header = mapping.get("sku").map(String::as_str).unwrap_or("sku");
        let name_header = mapping.get("name").map(String::as_str).unwrap_or("name");
        let price_header = mapping.get("price").map(String::as_str).unwrap_or("price");

        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let (Some(sku_idx), Some(name_idx), Some(price_idx)) = (find(sku_header), find(name_header), find(price_header))
        else {
            return Err(CatalogError::parser("could not resolve sku/name/price columns from header row"));
        };

        let mut items = Vec::new();
        for row in range.rows().skip(data_start_idx) {
            let sku = row.get(sku_idx).map(cell_to_string).unwrap_or_default();
            let name = row.get(name_idx).map(cell_to_string).unwrap_or_default();
            if sku.is_empty() && name.is_empty() {
                continue;
            }
            let Some(price) = row.get(price_idx).and_then(cell_to_decimal) else {
                tracing::warn!(sku, "skipping row with invalid or missing price");
                continue;
            };

            let mut characteristics = HashMap::new();
            for col in &characteristic_columns {
                if let Some(i) = headers.iter().position(|h| h.eq_ignore_ascii_case(col)) {
                    if let Some(cell) = row.get(i) {
                        characteristics.insert(col.clone(), json!(cell_to_string(cell)));
                    }
                }
            }

            items.push(ParsedSupplierItem { supplier_sku: sku, name, price, characteristics, in_stock: None });
        }

        Ok(items)
    }
}

#[async_trait]
impl ParserInterface for ExcelParser {
    async fn parse(&self, config: &JsonValue) -> Result<Vec<ParsedSupplierItem>> {
        let config: ExcelParserConfig = serde_json::from_value(config.clone())?;
        config.validate()?;
        let parser = ExcelParser;
        tokio::task::spawn_blocking(move || parser.parse_sync(&config))
            .await
            .map_err(|e| CatalogError::parser(format!("excel parse task panicked: {e}")))?
    }

    fn validate_config(&self, config: &JsonValue) -> Result<()> {
        let config: ExcelParserConfig = serde_json::from_value(config.clone())?;
        config.validate()
    }

    fn name(&self) -> &'static str {
        "excel"
    }
}
