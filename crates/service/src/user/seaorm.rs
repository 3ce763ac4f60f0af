use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use super::domain::{NewUserRecord, User, UserFilter, UserIdentity};
use super::repository::UserRepository;
use crate::errors::ServiceError;
use crate::pagination::{lower_contains, text_filter, PageRequest, Paged};
use crate::role::Role;
use crate::uniqueness::earliest_collision;
use models::{user, user_credentials};

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: user::Model) -> Result<User, ServiceError> {
    let role = Role::from_id(m.role_id)
        .ok_or_else(|| ServiceError::Unexpected(format!("user {} has unknown role {}", m.id, m.role_id)))?;
    Ok(User { id: m.id, username: m.username, email: m.email, first_name: m.first_name, last_name: m.last_name, role })
}

fn full_name_expr() -> SimpleExpr {
    Func::cust(Alias::new("CONCAT_WS"))
        .args([Expr::val(" ").into(), Expr::col(user::Column::FirstName).into(), Expr::col(user::Column::LastName).into()])
        .into()
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_unique_candidates(&self, candidate: &UserIdentity, exclude_id: Option<i32>) -> Result<Option<User>, ServiceError> {
        let mut query = user::Entity::find().filter(
            Condition::any()
                .add(user::Column::Username.eq(candidate.username.as_str()))
                .add(user::Column::Email.eq(candidate.email.as_str())),
        );
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }
        let rows = query.all(&self.db).await.map_err(ServiceError::from_db)?;
        let users = rows.into_iter().map(to_domain).collect::<Result<Vec<_>, _>>()?;
        Ok(earliest_collision(candidate, users))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        let res = user::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)?;
        res.map(to_domain).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        let res = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        res.map(to_domain).transpose()
    }

    async fn add(&self, record: NewUserRecord) -> Result<User, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::from_db)?;
        let now = Utc::now().into();
        let am = user::ActiveModel {
            username: Set(record.username),
            email: Set(record.email),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            role_id: Set(record.role.id()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = am.insert(&txn).await.map_err(ServiceError::from_db)?;
        user_credentials::upsert_password(&txn, created.id, record.password_hash, &record.password_algorithm).await?;
        txn.commit().await.map_err(ServiceError::from_db)?;
        to_domain(created)
    }

    async fn update(&self, u: User) -> Result<Option<User>, ServiceError> {
        let Some(existing) = user::Entity::find_by_id(u.id).one(&self.db).await.map_err(ServiceError::from_db)? else {
            return Ok(None);
        };
        let mut am: user::ActiveModel = existing.into();
        am.username = Set(u.username);
        am.email = Set(u.email);
        am.first_name = Set(u.first_name);
        am.last_name = Set(u.last_name);
        am.role_id = Set(u.role.id());
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(ServiceError::from_db)?;
        to_domain(updated).map(Some)
    }

    async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
        // credentials go with the user (ON DELETE CASCADE)
        let res = user::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_paged(&self, filter: &UserFilter, page: PageRequest) -> Result<Paged<User>, ServiceError> {
        let page = page.normalize();
        let mut query = user::Entity::find();
        if let Some(role_id) = filter.role_id {
            query = query.filter(user::Column::RoleId.eq(role_id));
        }
        if let Some(name) = text_filter(filter.full_name.as_deref()) {
            query = query.filter(lower_contains(full_name_expr(), &name));
        }
        if let Some(username) = text_filter(filter.username.as_deref()) {
            query = query.filter(lower_contains(Expr::col(user::Column::Username), &username));
        }
        let paginator = query.order_by_asc(user::Column::Id).paginate(&self.db, page.page_size);
        let total_count = paginator.num_items().await.map_err(ServiceError::from_db)?;
        if !page.starts_within(total_count) {
            return Ok(Paged::empty(page, total_count));
        }
        let rows = paginator.fetch_page(page.page_index).await.map_err(ServiceError::from_db)?;
        Ok(Paged {
            items: rows.into_iter().map(to_domain).collect::<Result<Vec<_>, _>>()?,
            total_count,
            page_index: page.page_index,
            page_size: page.page_size,
        })
    }

    async fn password_hash(&self, user_id: i32) -> Result<Option<String>, ServiceError> {
        let res = user_credentials::Entity::find()
            .filter(user_credentials::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(res.map(|c| c.password_hash))
    }

    async fn set_password_hash(&self, user_id: i32, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError> {
        user_credentials::upsert_password(&self.db, user_id, password_hash, password_algorithm).await?;
        Ok(())
    }
}
