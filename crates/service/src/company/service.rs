use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{Company, CompanyFilter, CompanyInput};
use super::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};
use crate::product::ProductRepository;
use crate::uniqueness::first_collision;

/// Company business service independent of web framework
pub struct CompanyService<C: CompanyRepository + ?Sized, P: ProductRepository + ?Sized> {
    companies: Arc<C>,
    products: Arc<P>,
}

impl<C, P> CompanyService<C, P>
where
    C: CompanyRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    pub fn new(companies: Arc<C>, products: Arc<P>) -> Self { Self { companies, products } }

    /// Create a company whose name, address and phone are all unused.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::company::{CompanyInput, CompanyService};
    /// use service::company::repository::mock::MockCompanyRepository;
    /// use service::product::repository::mock::MockProductRepository;
    /// let svc = CompanyService::new(Arc::new(MockCompanyRepository::default()), Arc::new(MockProductRepository::default()));
    /// let input = CompanyInput { name: "Acme".into(), address: "1 Main St".into(), phone: "555-0100".into() };
    /// let created = tokio_test::block_on(svc.add(input.clone())).unwrap();
    /// assert_eq!(created.name, "Acme");
    /// assert!(tokio_test::block_on(svc.add(input)).is_err());
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add(&self, input: CompanyInput) -> Result<Company, ServiceError> {
        models::company::validate(&input.name, &input.address, &input.phone)?;
        self.ensure_unique(&input, None).await?;
        let created = self.companies.add(input).await?;
        info!(company_id = created.id, "company_created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Company, ServiceError> {
        self.companies.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("company", id))
    }

    pub async fn get_all_paged(&self, filter: &CompanyFilter, page: PageRequest) -> Result<Paged<Company>, ServiceError> {
        self.companies.find_paged(filter, page).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: i32, input: CompanyInput) -> Result<Company, ServiceError> {
        models::company::validate(&input.name, &input.address, &input.phone)?;
        self.get_by_id(id).await?;
        self.ensure_unique(&input, Some(id)).await?;
        let updated = self
            .companies
            .update(Company::with_input(id, input))
            .await?
            .ok_or_else(|| ServiceError::not_found("company", id))?;
        info!(company_id = id, "company_updated");
        Ok(updated)
    }

    /// Delete a company that owns no products.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        self.get_by_id(id).await?;
        if self.products.find_by_company_id(id).await?.is_some() {
            return Err(ServiceError::has_dependents("company", "products"));
        }
        if !self.companies.remove(id).await? {
            return Err(ServiceError::not_found("company", id));
        }
        info!(company_id = id, "company_removed");
        Ok(())
    }

    async fn ensure_unique(&self, input: &CompanyInput, exclude_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(existing) = self.companies.find_by_unique_candidates(input, exclude_id).await? {
            if let Some(field) = first_collision(input, &existing) {
                return Err(ServiceError::duplicate("company", field));
            }
        }
        Ok(())
    }
}
