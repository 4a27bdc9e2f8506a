//! Parsed-item contract and parser registry (spec §4.2).
//!
//! Parsers are pure with respect to the supplier catalog: they read a
//! source and return `ParsedSupplierItem`s without touching the database.

pub mod config;
pub mod item;
pub mod registry;

pub mod csv_parser;
pub mod excel_parser;
pub mod google_sheets_parser;
pub mod stub_parser;

pub use config::FileParserConfig;
pub use item::ParsedSupplierItem;
pub use registry::{ParserInterface, ParserRegistry};

use std::sync::Arc;

/// Registers the built-in parsers. Called once at worker startup; a second
/// call is a no-op error that the caller should ignore (spec §9).
pub fn register_default_parsers() {
    let _ = ParserRegistry::register(Arc::new(stub_parser::StubParser));
    let _ = ParserRegistry::register(Arc::new(csv_parser::CsvParser));
    let _ = ParserRegistry::register(Arc::new(excel_parser::ExcelParser));
    let _ = ParserRegistry::register(Arc::new(google_sheets_parser::GoogleSheetsParser));
}
