use async_trait::async_trait;

use super::domain::{ProductSale, ProductSaleFilter, ProductSaleInput};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};

/// Repository abstraction for product sale persistence.
#[async_trait]
pub trait ProductSaleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductSale>, ServiceError>;
    /// Any one sale of the product.
    async fn find_by_product_id(&self, product_id: i32) -> Result<Option<ProductSale>, ServiceError>;
    async fn add(&self, input: ProductSaleInput) -> Result<ProductSale, ServiceError>;
    /// Returns `None` when the row vanished.
    async fn update(&self, sale: ProductSale) -> Result<Option<ProductSale>, ServiceError>;
    async fn remove(&self, id: i32) -> Result<bool, ServiceError>;
    /// Filtered page ordered by id.
    async fn find_paged(&self, filter: &ProductSaleFilter, page: PageRequest) -> Result<Paged<ProductSale>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use std::sync::Arc;

    use super::*;
    use crate::pagination::text_filter;
    use crate::product::repository::mock::MockProductRepository;
    use crate::storage::MemoryTable;

    /// Reads product names from the sibling mock for the name filter.
    pub struct MockProductSaleRepository {
        table: MemoryTable<ProductSale>,
        products: Arc<MockProductRepository>,
    }

    impl MockProductSaleRepository {
        pub fn new(products: Arc<MockProductRepository>) -> Self {
            Self { table: MemoryTable::new(), products }
        }
    }

    fn no_conflict(_: &ProductSale, _: &ProductSale) -> Option<ServiceError> { None }

    #[async_trait]
    impl ProductSaleRepository for MockProductSaleRepository {
        async fn find_by_id(&self, id: i32) -> Result<Option<ProductSale>, ServiceError> {
            Ok(self.table.get(id).await)
        }

        async fn find_by_product_id(&self, product_id: i32) -> Result<Option<ProductSale>, ServiceError> {
            Ok(self.table.find(|s| s.product_id == product_id).await)
        }

        async fn add(&self, input: ProductSaleInput) -> Result<ProductSale, ServiceError> {
            self.table.insert(ProductSale::with_input(0, input), no_conflict).await
        }

        async fn update(&self, sale: ProductSale) -> Result<Option<ProductSale>, ServiceError> {
            self.table.update(sale, no_conflict).await
        }

        async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.table.remove(id).await)
        }

        async fn find_paged(&self, filter: &ProductSaleFilter, page: PageRequest) -> Result<Paged<ProductSale>, ServiceError> {
            let named = match text_filter(filter.product_name.as_deref()) {
                Some(needle) => Some(self.products.ids_matching_name(&needle).await),
                None => None,
            };
            let rows = self
                .table
                .filter(|s| {
                    filter.product_id.map_or(true, |p| s.product_id == p)
                        && named.as_ref().map_or(true, |ids| ids.contains(&s.product_id))
                        && filter.matches_date(s.date)
                })
                .await;
            Ok(page.window(rows))
        }
    }
}
