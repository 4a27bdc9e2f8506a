//! Supplier service: validated create/update on top of the repository.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{SourceType, Supplier};
use super::repository::SupplierRepository;
use crate::error::Result;

#[async_trait]
pub trait SupplierService: Send + Sync {
    async fn register(&self, name: &str, source_type: SourceType) -> Result<Supplier>;
    async fn get(&self, id: Uuid) -> Result<Option<Supplier>>;
    async fn deactivate(&self, id: Uuid) -> Result<Supplier>;
}

pub struct DefaultSupplierService {
    repository: Arc<dyn SupplierRepository>,
}

impl DefaultSupplierService {
    pub fn new(repository: Arc<dyn SupplierRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SupplierService for DefaultSupplierService {
    async fn register(&self, name: &str, source_type: SourceType) -> Result<Supplier> {
        let supplier = Supplier::new(name, source_type);
        supplier.validate()?;
        self.repository.create(&supplier).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Supplier>> {
        self.repository.get_by_id(id).await
    }

    async fn deactivate(&self, id: Uuid) -> Result<Supplier> {
        let mut supplier = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| crate::error::CatalogError::not_found(format!("supplier {id} not found")))?;
        supplier.is_active = false;
        self.repository.update(&supplier).await
    }
}
