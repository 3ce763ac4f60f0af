use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::domain::{Company, CompanyFilter, CompanyInput};
use super::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::pagination::{lower_contains, text_filter, PageRequest, Paged};
use crate::uniqueness::earliest_collision;
use models::company;

pub struct SeaOrmCompanyRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

impl From<company::Model> for Company {
    fn from(m: company::Model) -> Self {
        Self { id: m.id, name: m.name, address: m.address, phone: m.phone }
    }
}

#[async_trait::async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn find_by_unique_candidates(&self, candidate: &CompanyInput, exclude_id: Option<i32>) -> Result<Option<Company>, ServiceError> {
        let mut query = company::Entity::find().filter(
            Condition::any()
                .add(company::Column::Name.eq(candidate.name.as_str()))
                .add(company::Column::Address.eq(candidate.address.as_str()))
                .add(company::Column::Phone.eq(candidate.phone.as_str())),
        );
        if let Some(id) = exclude_id {
            query = query.filter(company::Column::Id.ne(id));
        }
        let rows = query.all(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(earliest_collision(candidate, rows.into_iter().map(Company::from).collect()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError> {
        let res = company::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.map(Company::from))
    }

    async fn add(&self, input: CompanyInput) -> Result<Company, ServiceError> {
        let now = Utc::now().into();
        let am = company::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            phone: Set(input.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = am.insert(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(created.into())
    }

    async fn update(&self, c: Company) -> Result<Option<Company>, ServiceError> {
        let Some(existing) = company::Entity::find_by_id(c.id).one(&self.db).await.map_err(ServiceError::from_db)? else {
            return Ok(None);
        };
        let mut am: company::ActiveModel = existing.into();
        am.name = Set(c.name);
        am.address = Set(c.address);
        am.phone = Set(c.phone);
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(Some(updated.into()))
    }

    async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
        let res = company::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_paged(&self, filter: &CompanyFilter, page: PageRequest) -> Result<Paged<Company>, ServiceError> {
        let page = page.normalize();
        let mut query = company::Entity::find();
        if let Some(name) = text_filter(filter.name.as_deref()) {
            query = query.filter(lower_contains(Expr::col(company::Column::Name), &name));
        }
        let paginator = query.order_by_asc(company::Column::Id).paginate(&self.db, page.page_size);
        let total_count = paginator.num_items().await.map_err(ServiceError::from_db)?;
        if !page.starts_within(total_count) {
            return Ok(Paged::empty(page, total_count));
        }
        let items = paginator.fetch_page(page.page_index).await.map_err(ServiceError::from_db)?;
        Ok(Paged {
            items: items.into_iter().map(Company::from).collect(),
            total_count,
            page_index: page.page_index,
            page_size: page.page_size,
        })
    }
}
