//! Product entity: the canonical unified catalog row.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{Product, ProductStatus};
pub use repository::{PostgresProductRepository, ProductRepository};
pub use service::{DefaultProductService, ProductService};
