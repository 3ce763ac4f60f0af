use async_trait::async_trait;

use super::domain::{NewProductRecord, Product, ProductFilter};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};

/// Repository abstraction for product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_name(&self, name: &str, exclude_id: Option<i32>) -> Result<Option<Product>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    /// Any one product owned by the company.
    async fn find_by_company_id(&self, company_id: i32) -> Result<Option<Product>, ServiceError>;
    async fn find_by_registration_number(&self, registration_number: i32) -> Result<Option<Product>, ServiceError>;
    async fn add(&self, record: NewProductRecord) -> Result<Product, ServiceError>;
    /// Returns `None` when the row vanished.
    async fn update(&self, product: Product) -> Result<Option<Product>, ServiceError>;
    async fn remove(&self, id: i32) -> Result<bool, ServiceError>;
    /// Filtered page ordered by id.
    async fn find_paged(&self, filter: &ProductFilter, page: PageRequest) -> Result<Paged<Product>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use std::collections::HashSet;

    use super::*;
    use crate::pagination::{contains_ci, text_filter};
    use crate::storage::MemoryTable;

    #[derive(Default)]
    pub struct MockProductRepository {
        table: MemoryTable<Product>,
    }

    fn unique_conflict(existing: &Product, new: &Product) -> Option<ServiceError> {
        if existing.name == new.name {
            return Some(ServiceError::duplicate("product", "name"));
        }
        if existing.registration_number == new.registration_number {
            return Some(ServiceError::duplicate("product", "registration_number"));
        }
        None
    }

    impl MockProductRepository {
        /// Ids of products whose name contains the lower-cased needle.
        pub async fn ids_matching_name(&self, needle: &str) -> HashSet<i32> {
            self.table.filter(|p| contains_ci(&p.name, needle)).await.into_iter().map(|p| p.id).collect()
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn find_by_name(&self, name: &str, exclude_id: Option<i32>) -> Result<Option<Product>, ServiceError> {
            Ok(self.table.find(|p| p.name == name && Some(p.id) != exclude_id).await)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.table.get(id).await)
        }

        async fn find_by_company_id(&self, company_id: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.table.find(|p| p.company_id == company_id).await)
        }

        async fn find_by_registration_number(&self, registration_number: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.table.find(|p| p.registration_number == registration_number).await)
        }

        async fn add(&self, record: NewProductRecord) -> Result<Product, ServiceError> {
            self.table.insert(Product::from(record), unique_conflict).await
        }

        async fn update(&self, product: Product) -> Result<Option<Product>, ServiceError> {
            self.table.update(product, unique_conflict).await
        }

        async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.table.remove(id).await)
        }

        async fn find_paged(&self, filter: &ProductFilter, page: PageRequest) -> Result<Paged<Product>, ServiceError> {
            let name = text_filter(filter.name.as_deref());
            let rows = self
                .table
                .filter(|p| {
                    filter.company_id.map_or(true, |c| p.company_id == c)
                        && name.as_deref().map_or(true, |n| contains_ci(&p.name, n))
                })
                .await;
            Ok(page.window(rows))
        }
    }
}
