use async_trait::async_trait;

use super::domain::{Company, CompanyFilter, CompanyInput};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};

/// Repository abstraction for company persistence.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Any company sharing name, address or phone with `candidate`, ignoring
    /// `exclude_id`. When several rows collide, the one matching the earliest
    /// of (name, address, phone) is returned.
    async fn find_by_unique_candidates(&self, candidate: &CompanyInput, exclude_id: Option<i32>) -> Result<Option<Company>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError>;
    async fn add(&self, input: CompanyInput) -> Result<Company, ServiceError>;
    /// Returns `None` when the row vanished.
    async fn update(&self, company: Company) -> Result<Option<Company>, ServiceError>;
    async fn remove(&self, id: i32) -> Result<bool, ServiceError>;
    /// Filtered page ordered by id.
    async fn find_paged(&self, filter: &CompanyFilter, page: PageRequest) -> Result<Paged<Company>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::pagination::{contains_ci, text_filter};
    use crate::storage::MemoryTable;
    use crate::uniqueness::{earliest_collision, first_collision};

    #[derive(Default)]
    pub struct MockCompanyRepository {
        table: MemoryTable<Company>,
    }

    fn unique_conflict(existing: &Company, new: &Company) -> Option<ServiceError> {
        first_collision(new, existing).map(|field| ServiceError::duplicate("company", field))
    }

    #[async_trait]
    impl CompanyRepository for MockCompanyRepository {
        async fn find_by_unique_candidates(&self, candidate: &CompanyInput, exclude_id: Option<i32>) -> Result<Option<Company>, ServiceError> {
            let rows = self.table.filter(|c| Some(c.id) != exclude_id).await;
            Ok(earliest_collision(candidate, rows))
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError> {
            Ok(self.table.get(id).await)
        }

        async fn add(&self, input: CompanyInput) -> Result<Company, ServiceError> {
            self.table.insert(Company::with_input(0, input), unique_conflict).await
        }

        async fn update(&self, company: Company) -> Result<Option<Company>, ServiceError> {
            self.table.update(company, unique_conflict).await
        }

        async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.table.remove(id).await)
        }

        async fn find_paged(&self, filter: &CompanyFilter, page: PageRequest) -> Result<Paged<Company>, ServiceError> {
            let name = text_filter(filter.name.as_deref());
            let rows = self
                .table
                .filter(|c| name.as_deref().map_or(true, |n| contains_ci(&c.name, n)))
                .await;
            Ok(page.window(rows))
        }
    }
}
