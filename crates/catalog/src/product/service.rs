//! Product service: create-new-product policy for the matching pipeline.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::model::Product;
use super::repository::ProductRepository;
use crate::error::Result;
use crate::utils::generate_internal_sku;

#[async_trait]
pub trait ProductService: Send + Sync {
    /// Create a product for a supplier item the matcher scored below the
    /// review threshold (spec §4.6 step 6): retries on `internal_sku`
    /// collision since the suffix is random.
    async fn create_new(&self, name: &str, category_id: Option<Uuid>) -> Result<Product>;
}

pub struct DefaultProductService {
    repository: Arc<dyn ProductRepository>,
    sku_prefix: String,
}

impl DefaultProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, sku_prefix: impl Into<String>) -> Self {
        Self {
            repository,
            sku_prefix: sku_prefix.into(),
        }
    }
}

const MAX_SKU_COLLISION_RETRIES: u32 = 5;

#[async_trait]
impl ProductService for DefaultProductService {
    async fn create_new(&self, name: &str, category_id: Option<Uuid>) -> Result<Product> {
        let mut last_err = None;
        for _ in 0..MAX_SKU_COLLISION_RETRIES {
            let sku = generate_internal_sku(&self.sku_prefix);
            let mut product = Product::new(sku, name, category_id);
            product.activate();
            product.validate()?;
            match self.repository.create(&product).await {
                Ok(created) => return Ok(created),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.expect("loop runs at least once"))
    }
}
