use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, instrument};

use super::domain::{NewProductSale, ProductSale, ProductSaleFilter, ProductSaleInput};
use super::repository::ProductSaleRepository;
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};
use crate::product::{Product, ProductRepository};

/// Product sale business service independent of web framework
pub struct ProductSaleService<S: ProductSaleRepository + ?Sized, P: ProductRepository + ?Sized> {
    sales: Arc<S>,
    products: Arc<P>,
}

// Storage keeps microseconds.
fn stored_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(6)
}

impl<S, P> ProductSaleService<S, P>
where
    S: ProductSaleRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    pub fn new(sales: Arc<S>, products: Arc<P>) -> Self { Self { sales, products } }

    /// Record a sale of an existing product. An omitted unit price is copied
    /// from the product and an omitted date is the current time.
    #[instrument(skip(self, input), fields(product_id = input.product_id, amount = input.amount))]
    pub async fn add(&self, input: NewProductSale) -> Result<ProductSale, ServiceError> {
        models::product_sale::validate_amount(input.amount)?;
        if let Some(price) = input.price_per_unit {
            models::product_sale::validate_price_per_unit(price)?;
        }
        let product = self.product(input.product_id).await?;
        let resolved = ProductSaleInput {
            product_id: product.id,
            amount: input.amount,
            price_per_unit: input.price_per_unit.unwrap_or(product.price),
            date: stored_precision(input.date.unwrap_or_else(Utc::now)),
        };
        let created = self.sales.add(resolved).await?;
        info!(sale_id = created.id, "product_sale_created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ProductSale, ServiceError> {
        self.sales.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product sale", id))
    }

    pub async fn get_all_paged(&self, filter: &ProductSaleFilter, page: PageRequest) -> Result<Paged<ProductSale>, ServiceError> {
        self.sales.find_paged(filter, page).await
    }

    #[instrument(skip(self, input), fields(product_id = input.product_id))]
    pub async fn update(&self, id: i32, input: ProductSaleInput) -> Result<ProductSale, ServiceError> {
        models::product_sale::validate_amount(input.amount)?;
        models::product_sale::validate_price_per_unit(input.price_per_unit)?;
        let existing = self.get_by_id(id).await?;
        if existing.product_id != input.product_id {
            self.product(input.product_id).await?;
        }
        let sale = ProductSale::with_input(id, ProductSaleInput { date: stored_precision(input.date), ..input });
        let updated = self.sales.update(sale).await?.ok_or_else(|| ServiceError::not_found("product sale", id))?;
        info!(sale_id = id, "product_sale_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        if !self.sales.remove(id).await? {
            return Err(ServiceError::not_found("product sale", id));
        }
        info!(sale_id = id, "product_sale_removed");
        Ok(())
    }

    async fn product(&self, id: i32) -> Result<Product, ServiceError> {
        self.products.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product", id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    use super::*;
    use crate::product::repository::mock::MockProductRepository;
    use crate::product::NewProductRecord;
    use crate::product_sale::repository::mock::MockProductSaleRepository;

    struct Fixture {
        svc: ProductSaleService<MockProductSaleRepository, MockProductRepository>,
        products: Arc<MockProductRepository>,
    }

    fn fixture() -> Fixture {
        let products = Arc::new(MockProductRepository::default());
        let sales = Arc::new(MockProductSaleRepository::new(products.clone()));
        Fixture { svc: ProductSaleService::new(sales, products.clone()), products }
    }

    async fn product(f: &Fixture, name: &str, reg: i32, price: Decimal) -> Product {
        f.products
            .add(NewProductRecord { registration_number: reg, name: name.into(), company_id: 1, price })
            .await
            .unwrap()
    }

    fn sale(product_id: i32) -> NewProductSale {
        NewProductSale { product_id, amount: 3, price_per_unit: None, date: None }
    }

    #[tokio::test]
    async fn defaults_copy_product_price_and_now() {
        let f = fixture();
        let p = product(&f, "Widget", 1_000_001, Decimal::new(1050, 2)).await;
        let before = Utc::now() - Duration::seconds(1);
        let s = f.svc.add(sale(p.id)).await.unwrap();
        assert_eq!(s.price_per_unit, Decimal::new(1050, 2));
        assert!(s.date >= before && s.date <= Utc::now());
    }

    #[tokio::test]
    async fn explicit_values_are_kept() {
        let f = fixture();
        let p = product(&f, "Widget", 1_000_001, Decimal::new(1050, 2)).await;
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let s = f
            .svc
            .add(NewProductSale { product_id: p.id, amount: 1, price_per_unit: Some(Decimal::new(900, 2)), date: Some(date) })
            .await
            .unwrap();
        assert_eq!(s.price_per_unit, Decimal::new(900, 2));
        assert_eq!(s.date, date);
        assert_eq!(f.svc.get_by_id(s.id).await.unwrap(), s);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let f = fixture();
        let err = f.svc.add(sale(5)).await.unwrap_err();
        assert_eq!(err.to_string(), "not found: product 5 not found");
    }

    #[tokio::test]
    async fn non_positive_amount_rejected() {
        let f = fixture();
        let p = product(&f, "Widget", 1_000_001, Decimal::ONE).await;
        let err = f.svc.add(NewProductSale { amount: 0, ..sale(p.id) }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_and_remove() {
        let f = fixture();
        let p1 = product(&f, "Widget", 1_000_001, Decimal::ONE).await;
        let p2 = product(&f, "Gadget", 1_000_002, Decimal::TWO).await;
        let s = f.svc.add(sale(p1.id)).await.unwrap();

        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let updated = f
            .svc
            .update(s.id, ProductSaleInput { product_id: p2.id, amount: 7, price_per_unit: Decimal::TEN, date })
            .await
            .unwrap();
        assert_eq!((updated.product_id, updated.amount, updated.date), (p2.id, 7, date));

        let err = f
            .svc
            .update(s.id, ProductSaleInput { product_id: 99, amount: 1, price_per_unit: Decimal::ONE, date })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        f.svc.remove(s.id).await.unwrap();
        assert!(matches!(f.svc.remove(s.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn listing_filters_by_product_name_and_dates() {
        let f = fixture();
        let w = product(&f, "Red Widget", 1_000_001, Decimal::ONE).await;
        let g = product(&f, "Gadget", 1_000_002, Decimal::ONE).await;
        let day = |d| Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap();
        for (pid, d) in [(w.id, 1), (w.id, 10), (g.id, 10), (w.id, 20)] {
            f.svc.add(NewProductSale { date: Some(day(d)), ..sale(pid) }).await.unwrap();
        }

        let filter = ProductSaleFilter { product_name: Some("widget".into()), from: Some(day(5)), to: Some(day(20)), ..Default::default() };
        let page = f.svc.get_all_paged(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert!(page.items.iter().all(|s| s.product_id == w.id));

        let by_id = ProductSaleFilter { product_id: Some(g.id), ..Default::default() };
        assert_eq!(f.svc.get_all_paged(&by_id, PageRequest::default()).await.unwrap().total_count, 1);
    }
}
