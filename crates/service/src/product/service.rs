use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{NewProductRecord, Product, ProductFilter, ProductInput};
use super::registration::RegistrationNumberSource;
use super::repository::ProductRepository;
use crate::company::CompanyRepository;
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};
use crate::product_sale::ProductSaleRepository;

/// Product business service independent of web framework
pub struct ProductService<P, C, S>
where
    P: ProductRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    S: ProductSaleRepository + ?Sized,
{
    products: Arc<P>,
    companies: Arc<C>,
    sales: Arc<S>,
    numbers: Arc<dyn RegistrationNumberSource>,
    max_attempts: u32,
}

impl<P, C, S> ProductService<P, C, S>
where
    P: ProductRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    S: ProductSaleRepository + ?Sized,
{
    pub fn new(
        products: Arc<P>,
        companies: Arc<C>,
        sales: Arc<S>,
        numbers: Arc<dyn RegistrationNumberSource>,
        max_attempts: u32,
    ) -> Self {
        Self { products, companies, sales, numbers, max_attempts: max_attempts.max(1) }
    }

    /// Create a product for an existing company and assign it a fresh
    /// registration number.
    #[instrument(skip(self, input), fields(name = %input.name, company_id = input.company_id))]
    pub async fn add(&self, input: ProductInput) -> Result<Product, ServiceError> {
        models::product::validate(&input.name, input.price)?;
        self.ensure_company(input.company_id).await?;
        self.ensure_unique_name(&input.name, None).await?;
        let registration_number = self.next_registration_number().await?;
        let created = self
            .products
            .add(NewProductRecord { registration_number, name: input.name, company_id: input.company_id, price: input.price })
            .await?;
        info!(product_id = created.id, registration_number, "product_created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError> {
        self.products.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product", id))
    }

    pub async fn get_all_paged(&self, filter: &ProductFilter, page: PageRequest) -> Result<Paged<Product>, ServiceError> {
        self.products.find_paged(filter, page).await
    }

    /// Update name, owner and price; the registration number is preserved.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: i32, input: ProductInput) -> Result<Product, ServiceError> {
        models::product::validate(&input.name, input.price)?;
        let existing = self.get_by_id(id).await?;
        if existing.company_id != input.company_id {
            self.ensure_company(input.company_id).await?;
        }
        self.ensure_unique_name(&input.name, Some(id)).await?;
        let updated = self
            .products
            .update(Product {
                id,
                registration_number: existing.registration_number,
                name: input.name,
                company_id: input.company_id,
                price: input.price,
            })
            .await?
            .ok_or_else(|| ServiceError::not_found("product", id))?;
        info!(product_id = id, "product_updated");
        Ok(updated)
    }

    /// Delete a product no sale refers to.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        self.get_by_id(id).await?;
        if self.sales.find_by_product_id(id).await?.is_some() {
            return Err(ServiceError::has_dependents("product", "product sales"));
        }
        if !self.products.remove(id).await? {
            return Err(ServiceError::not_found("product", id));
        }
        info!(product_id = id, "product_removed");
        Ok(())
    }

    async fn ensure_company(&self, company_id: i32) -> Result<(), ServiceError> {
        match self.companies.find_by_id(company_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("company", company_id)),
        }
    }

    async fn ensure_unique_name(&self, name: &str, exclude_id: Option<i32>) -> Result<(), ServiceError> {
        if self.products.find_by_name(name, exclude_id).await?.is_some() {
            return Err(ServiceError::duplicate("product", "name"));
        }
        Ok(())
    }

    /// Draw candidates until one is unused, giving up after `max_attempts`.
    async fn next_registration_number(&self) -> Result<i32, ServiceError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.numbers.next_candidate();
            if self.products.find_by_registration_number(candidate).await?.is_none() {
                debug!(attempt, "registration_number_drawn");
                return Ok(candidate);
            }
        }
        warn!(attempts = self.max_attempts, "registration_numbers_exhausted");
        Err(ServiceError::Unexpected(format!(
            "no free registration number after {} attempts",
            self.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::company::repository::mock::MockCompanyRepository;
    use crate::company::CompanyInput;
    use crate::product::RandomRegistrationNumbers;
    use crate::product::repository::mock::MockProductRepository;
    use crate::product_sale::repository::mock::MockProductSaleRepository;
    use crate::product_sale::ProductSaleInput;

    /// Hands out a fixed sequence, repeating the last value.
    struct Scripted(Mutex<VecDeque<i32>>);

    impl Scripted {
        fn new(values: &[i32]) -> Arc<Self> { Arc::new(Self(Mutex::new(values.iter().copied().collect()))) }
    }

    impl RegistrationNumberSource for Scripted {
        fn next_candidate(&self) -> i32 {
            let mut q = self.0.lock().unwrap();
            if q.len() > 1 { q.pop_front().unwrap() } else { *q.front().unwrap() }
        }
    }

    struct Fixture {
        svc: ProductService<MockProductRepository, MockCompanyRepository, MockProductSaleRepository>,
        companies: Arc<MockCompanyRepository>,
        sales: Arc<MockProductSaleRepository>,
    }

    fn fixture(numbers: Arc<dyn RegistrationNumberSource>, max_attempts: u32) -> Fixture {
        let products = Arc::new(MockProductRepository::default());
        let companies = Arc::new(MockCompanyRepository::default());
        let sales = Arc::new(MockProductSaleRepository::new(products.clone()));
        let svc = ProductService::new(products, companies.clone(), sales.clone(), numbers, max_attempts);
        Fixture { svc, companies, sales }
    }

    async fn company(f: &Fixture, name: &str) -> i32 {
        f.companies
            .add(CompanyInput { name: name.into(), address: format!("{name} street"), phone: format!("{name}-phone") })
            .await
            .unwrap()
            .id
    }

    fn input(name: &str, company_id: i32) -> ProductInput {
        ProductInput { name: name.into(), company_id, price: Decimal::new(1999, 2) }
    }

    #[tokio::test]
    async fn creation_assigns_seven_digit_number() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c = company(&f, "acme").await;
        let p = f.svc.add(input("Widget", c)).await.unwrap();
        assert!((1_000_000..=9_999_999).contains(&p.registration_number));
        assert_eq!(f.svc.get_by_id(p.id).await.unwrap(), p);
    }

    #[tokio::test]
    async fn taken_numbers_are_redrawn() {
        let f = fixture(Scripted::new(&[1_111_111, 1_111_111, 2_222_222]), 10);
        let c = company(&f, "acme").await;
        let first = f.svc.add(input("A", c)).await.unwrap();
        let second = f.svc.add(input("B", c)).await.unwrap();
        assert_eq!(first.registration_number, 1_111_111);
        assert_eq!(second.registration_number, 2_222_222);
    }

    #[tokio::test]
    async fn exhausted_numbers_fail_unexpected() {
        let f = fixture(Scripted::new(&[1_234_567]), 3);
        let c = company(&f, "acme").await;
        f.svc.add(input("A", c)).await.unwrap();
        let err = f.svc.add(input("B", c)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unexpected(_)));
    }

    #[tokio::test]
    async fn missing_company_is_not_found() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let err = f.svc.add(input("Widget", 42)).await.unwrap_err();
        assert_eq!(err.to_string(), "not found: company 42 not found");
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c = company(&f, "acme").await;
        f.svc.add(input("Widget", c)).await.unwrap();
        let err = f.svc.add(input("Widget", c)).await.unwrap_err();
        assert_eq!(err.to_string(), "conflict: product with the same name already exists");
    }

    #[tokio::test]
    async fn update_keeps_registration_number() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c1 = company(&f, "acme").await;
        let c2 = company(&f, "globex").await;
        let p = f.svc.add(input("Widget", c1)).await.unwrap();

        let moved = f
            .svc
            .update(p.id, ProductInput { name: "Widget".into(), company_id: c2, price: Decimal::new(2500, 2) })
            .await
            .unwrap();
        assert_eq!(moved.registration_number, p.registration_number);
        assert_eq!(moved.company_id, c2);
        assert_eq!(moved.price, Decimal::new(2500, 2));

        let err = f.svc.update(p.id, input("Widget", 777)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_positive_price_rejected() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c = company(&f, "acme").await;
        let err = f.svc.add(ProductInput { name: "Free".into(), company_id: c, price: Decimal::ZERO }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn sub_cent_price_rejected() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c = company(&f, "acme").await;
        for price in [Decimal::new(4, 3), Decimal::new(10005, 3)] {
            let err = f.svc.add(ProductInput { name: "Dust".into(), company_id: c, price }).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{price}");
        }
        let p = f.svc.add(ProductInput { name: "Dust".into(), company_id: c, price: Decimal::new(1001, 2) }).await.unwrap();
        assert_eq!(f.svc.get_by_id(p.id).await.unwrap().price, Decimal::new(1001, 2));
    }

    #[tokio::test]
    async fn remove_blocked_while_sales_exist() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c = company(&f, "acme").await;
        let p = f.svc.add(input("Widget", c)).await.unwrap();
        let sale = f
            .sales
            .add(ProductSaleInput { product_id: p.id, amount: 2, price_per_unit: p.price, date: Utc::now() })
            .await
            .unwrap();

        let err = f.svc.remove(p.id).await.unwrap_err();
        assert_eq!(err.to_string(), "conflict: product still has product sales; remove them first");

        f.sales.remove(sale.id).await.unwrap();
        f.svc.remove(p.id).await.unwrap();
        assert!(matches!(f.svc.get_by_id(p.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn listing_filters_by_company_and_name() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c1 = company(&f, "acme").await;
        let c2 = company(&f, "globex").await;
        f.svc.add(input("Red Widget", c1)).await.unwrap();
        f.svc.add(input("Blue Widget", c2)).await.unwrap();
        f.svc.add(input("Gadget", c1)).await.unwrap();

        let filter = ProductFilter { name: Some("WIDGET".into()), company_id: Some(c1) };
        let page = f.svc.get_all_paged(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name, "Red Widget");
    }

    #[tokio::test]
    async fn last_page_and_beyond() {
        let f = fixture(Arc::new(RandomRegistrationNumbers::new(7)), 1000);
        let c = company(&f, "acme").await;
        let other = company(&f, "globex").await;
        f.svc.add(input("Elsewhere", other)).await.unwrap();
        for i in 1..=5 {
            f.svc.add(input(&format!("P{i}"), c)).await.unwrap();
        }
        let filter = ProductFilter { name: None, company_id: Some(c) };

        let page = f.svc.get_all_paged(&filter, PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.items.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["P5"]);

        let beyond = f.svc.get_all_paged(&filter, PageRequest::new(7, 2)).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_count, 5);
    }
}
