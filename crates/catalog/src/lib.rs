//! Catalog pipeline: ingestion, matching and aggregation for supplier price lists.
//!
//! Parsed supplier rows flow in through `parsing`, are persisted as
//! `supplier`/`product` entities, classified and linked by `matching`, enriched
//! by `extraction`, kept consistent by `aggregation`, and reconciled against an
//! external supplier directory by `sync`. Items the matcher cannot confidently
//! place land in `review` until a human or a TTL resolves them.

pub mod aggregation;
pub mod category;
pub mod error;
pub mod extraction;
pub mod matching;
pub mod parsing;
pub mod parsing_log;
pub mod product;
pub mod review;
pub mod supplier;
pub mod supplier_item;
pub mod sync;
pub mod types;
pub mod utils;

pub use category::{Category, CategoryRepository};
pub use error::{CatalogError, Result};
pub use product::{Product, ProductRepository, ProductStatus};
pub use supplier::{SourceType, Supplier, SupplierRepository};
pub use supplier_item::{MatchStatus, SupplierItem, SupplierItemRepository};
pub use types::*;
