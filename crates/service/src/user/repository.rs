use async_trait::async_trait;

use super::domain::{NewUserRecord, User, UserFilter, UserIdentity};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};

/// Repository abstraction for users and their credentials.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Any user sharing username or email with `candidate`, ignoring
    /// `exclude_id`; a username match is preferred.
    async fn find_by_unique_candidates(&self, candidate: &UserIdentity, exclude_id: Option<i32>) -> Result<Option<User>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError>;
    /// Insert the user and its credentials atomically.
    async fn add(&self, record: NewUserRecord) -> Result<User, ServiceError>;
    /// Returns `None` when the row vanished.
    async fn update(&self, user: User) -> Result<Option<User>, ServiceError>;
    async fn remove(&self, id: i32) -> Result<bool, ServiceError>;
    /// Filtered page ordered by id.
    async fn find_paged(&self, filter: &UserFilter, page: PageRequest) -> Result<Paged<User>, ServiceError>;

    async fn password_hash(&self, user_id: i32) -> Result<Option<String>, ServiceError>;
    async fn set_password_hash(&self, user_id: i32, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;
    use crate::pagination::{contains_ci, text_filter};
    use crate::storage::MemoryTable;
    use crate::uniqueness::{earliest_collision, first_collision};

    #[derive(Default)]
    pub struct MockUserRepository {
        table: MemoryTable<User>,
        creds: RwLock<HashMap<i32, (String, String)>>, // user_id -> (hash, algorithm)
    }

    fn unique_conflict(existing: &User, new: &User) -> Option<ServiceError> {
        first_collision(new, existing).map(|field| ServiceError::duplicate("user", field))
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_unique_candidates(&self, candidate: &UserIdentity, exclude_id: Option<i32>) -> Result<Option<User>, ServiceError> {
            let rows = self.table.filter(|u| Some(u.id) != exclude_id).await;
            Ok(earliest_collision(candidate, rows))
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
            Ok(self.table.get(id).await)
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
            Ok(self.table.find(|u| u.username == username).await)
        }

        async fn add(&self, record: NewUserRecord) -> Result<User, ServiceError> {
            let user = User {
                id: 0,
                username: record.username,
                email: record.email,
                first_name: record.first_name,
                last_name: record.last_name,
                role: record.role,
            };
            let created = self.table.insert(user, unique_conflict).await?;
            self.creds.write().await.insert(created.id, (record.password_hash, record.password_algorithm));
            Ok(created)
        }

        async fn update(&self, user: User) -> Result<Option<User>, ServiceError> {
            self.table.update(user, unique_conflict).await
        }

        async fn remove(&self, id: i32) -> Result<bool, ServiceError> {
            self.creds.write().await.remove(&id);
            Ok(self.table.remove(id).await)
        }

        async fn find_paged(&self, filter: &UserFilter, page: PageRequest) -> Result<Paged<User>, ServiceError> {
            let full_name = text_filter(filter.full_name.as_deref());
            let username = text_filter(filter.username.as_deref());
            let rows = self
                .table
                .filter(|u| {
                    filter.role_id.map_or(true, |r| u.role.id() == r)
                        && full_name.as_deref().map_or(true, |n| contains_ci(&u.full_name(), n))
                        && username.as_deref().map_or(true, |n| contains_ci(&u.username, n))
                })
                .await;
            Ok(page.window(rows))
        }

        async fn password_hash(&self, user_id: i32) -> Result<Option<String>, ServiceError> {
            Ok(self.creds.read().await.get(&user_id).map(|(hash, _)| hash.clone()))
        }

        async fn set_password_hash(&self, user_id: i32, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError> {
            if self.table.get(user_id).await.is_none() {
                return Err(ServiceError::not_found("user", user_id));
            }
            self.creds.write().await.insert(user_id, (password_hash, password_algorithm.to_string()));
            Ok(())
        }
    }
}
