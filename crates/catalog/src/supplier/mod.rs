//! Supplier entity: an external data source for price-list ingestion.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{SourceType, Supplier, SupplierConfigRow};
pub use repository::{PostgresSupplierRepository, SupplierRepository};
pub use service::{DefaultSupplierService, SupplierService};
