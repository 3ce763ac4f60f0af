use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

use super::domain::{ProductSale, ProductSaleFilter, ProductSaleInput};
use super::repository::ProductSaleRepository;
use crate::errors::ServiceError;
use crate::pagination::{lower_contains, text_filter, PageRequest, Paged};
use models::{product, product_sale};

pub struct SeaOrmProductSaleRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductSaleRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

impl From<product_sale::Model> for ProductSale {
    fn from(m: product_sale::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            amount: m.amount,
            price_per_unit: m.price_per_unit,
            date: m.date.with_timezone(&Utc),
        }
    }
}

#[async_trait::async_trait]
impl ProductSaleRepository for SeaOrmProductSaleRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductSale>, ServiceError> {
        let res = product_sale::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.map(ProductSale::from))
    }

    async fn find_by_product_id(&self, product_id: i32) -> Result<Option<ProductSale>, ServiceError> {
        let res = product_sale::Entity::find()
            .filter(product_sale::Column::ProductId.eq(product_id))
            .order_by_asc(product_sale::Column::Id)
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(res.map(ProductSale::from))
    }

    async fn add(&self, input: ProductSaleInput) -> Result<ProductSale, ServiceError> {
        let am = product_sale::ActiveModel {
            product_id: Set(input.product_id),
            amount: Set(input.amount),
            price_per_unit: Set(input.price_per_unit),
            date: Set(input.date.into()),
            ..Default::default()
        };
        let created = am.insert(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(created.into())
    }

    async fn update(&self, sale: ProductSale) -> Result<Option<ProductSale>, ServiceError> {
        let Some(existing) = product_sale::Entity::find_by_id(sale.id).one(&self.db).await.map_err(ServiceError::from_db)? else {
            return Ok(None);
        };
        let mut am: product_sale::ActiveModel = existing.into();
        am.product_id = Set(sale.product_id);
        am.amount = Set(sale.amount);
        am.price_per_unit = Set(sale.price_per_unit);
        am.date = Set(sale.date.into());
        let updated = am.update(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(Some(updated.into()))
    }

    async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
        let res = product_sale::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_paged(&self, filter: &ProductSaleFilter, page: PageRequest) -> Result<Paged<ProductSale>, ServiceError> {
        let page = page.normalize();
        let mut query = product_sale::Entity::find();
        if let Some(product_id) = filter.product_id {
            query = query.filter(product_sale::Column::ProductId.eq(product_id));
        }
        if let Some(name) = text_filter(filter.product_name.as_deref()) {
            query = query
                .join(JoinType::InnerJoin, product_sale::Relation::Product.def())
                .filter(lower_contains(Expr::col((product::Entity, product::Column::Name)), &name));
        }
        if let Some(from) = filter.from {
            query = query.filter(product_sale::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(product_sale::Column::Date.lte(to));
        }
        let paginator = query.order_by_asc(product_sale::Column::Id).paginate(&self.db, page.page_size);
        let total_count = paginator.num_items().await.map_err(ServiceError::from_db)?;
        if !page.starts_within(total_count) {
            return Ok(Paged::empty(page, total_count));
        }
        let items = paginator.fetch_page(page.page_index).await.map_err(ServiceError::from_db)?;
        Ok(Paged {
            items: items.into_iter().map(ProductSale::from).collect(),
            total_count,
            page_index: page.page_index,
            page_size: page.page_size,
        })
    }
}
