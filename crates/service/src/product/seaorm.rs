use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use super::domain::{NewProductRecord, Product, ProductFilter};
use super::repository::ProductRepository;
use crate::errors::ServiceError;
use crate::pagination::{lower_contains, text_filter, PageRequest, Paged};
use models::product;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn first_where(&self, cond: sea_orm::sea_query::SimpleExpr) -> Result<Option<Product>, ServiceError> {
        let res = product::Entity::find()
            .filter(cond)
            .order_by_asc(product::Column::Id)
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(res.map(Product::from))
    }
}

impl From<product::Model> for Product {
    fn from(m: product::Model) -> Self {
        Self { id: m.id, registration_number: m.registration_number, name: m.name, company_id: m.company_id, price: m.price }
    }
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_by_name(&self, name: &str, exclude_id: Option<i32>) -> Result<Option<Product>, ServiceError> {
        let mut query = product::Entity::find().filter(product::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(product::Column::Id.ne(id));
        }
        let res = query.one(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.map(Product::from))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        let res = product::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.map(Product::from))
    }

    async fn find_by_company_id(&self, company_id: i32) -> Result<Option<Product>, ServiceError> {
        self.first_where(product::Column::CompanyId.eq(company_id)).await
    }

    async fn find_by_registration_number(&self, registration_number: i32) -> Result<Option<Product>, ServiceError> {
        self.first_where(product::Column::RegistrationNumber.eq(registration_number)).await
    }

    async fn add(&self, record: NewProductRecord) -> Result<Product, ServiceError> {
        let now = Utc::now().into();
        let am = product::ActiveModel {
            registration_number: Set(record.registration_number),
            name: Set(record.name),
            company_id: Set(record.company_id),
            price: Set(record.price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = am.insert(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(created.into())
    }

    async fn update(&self, p: Product) -> Result<Option<Product>, ServiceError> {
        let Some(existing) = product::Entity::find_by_id(p.id).one(&self.db).await.map_err(ServiceError::from_db)? else {
            return Ok(None);
        };
        // registration_number is left untouched
        let mut am: product::ActiveModel = existing.into();
        am.name = Set(p.name);
        am.company_id = Set(p.company_id);
        am.price = Set(p.price);
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(Some(updated.into()))
    }

    async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
        let res = product::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_paged(&self, filter: &ProductFilter, page: PageRequest) -> Result<Paged<Product>, ServiceError> {
        let page = page.normalize();
        let mut query = product::Entity::find();
        if let Some(company_id) = filter.company_id {
            query = query.filter(product::Column::CompanyId.eq(company_id));
        }
        if let Some(name) = text_filter(filter.name.as_deref()) {
            query = query.filter(lower_contains(Expr::col(product::Column::Name), &name));
        }
        let paginator = query.order_by_asc(product::Column::Id).paginate(&self.db, page.page_size);
        let total_count = paginator.num_items().await.map_err(ServiceError::from_db)?;
        if !page.starts_within(total_count) {
            return Ok(Paged::empty(page, total_count));
        }
        let items = paginator.fetch_page(page.page_index).await.map_err(ServiceError::from_db)?;
        Ok(Paged {
            items: items.into_iter().map(Product::from).collect(),
            total_count,
            page_index: page.page_index,
            page_size: page.page_size,
        })
    }
}
