//! Role reference data.
//!
//! The role table is seeded by migration and never written at runtime, so the
//! set of roles is a closed enum; the table only backs listing and the
//! existence check performed when users are created or reassigned.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::ServiceError;
use models::role as role_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Employee];

    pub fn id(self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::Manager => 2,
            Role::Employee => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }

    /// Admins and managers may edit companies and products.
    pub fn can_manage_catalog(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ServiceError::Validation(format!("unknown role: {s}")))
    }
}

/// A row of the role table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: i32,
    pub name: String,
}

impl From<Role> for RoleRecord {
    fn from(role: Role) -> Self {
        Self { id: role.id(), name: role.as_str().to_string() }
    }
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<RoleRecord>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<RoleRecord>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;

    /// Holds the same rows the migration seeds.
    pub struct MockRoleRepository {
        rows: Vec<RoleRecord>,
    }

    impl Default for MockRoleRepository {
        fn default() -> Self {
            Self { rows: Role::ALL.into_iter().map(RoleRecord::from).collect() }
        }
    }

    #[async_trait]
    impl RoleRepository for MockRoleRepository {
        async fn list(&self) -> Result<Vec<RoleRecord>, ServiceError> {
            Ok(self.rows.clone())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<RoleRecord>, ServiceError> {
            Ok(self.rows.iter().find(|r| r.id == id).cloned())
        }
    }
}

pub struct SeaOrmRoleRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl RoleRepository for SeaOrmRoleRepository {
    async fn list(&self) -> Result<Vec<RoleRecord>, ServiceError> {
        let rows = role_entity::Entity::find()
            .order_by_asc(role_entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(rows.into_iter().map(|m| RoleRecord { id: m.id, name: m.name }).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<RoleRecord>, ServiceError> {
        let row = role_entity::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::from_db)?;
        Ok(row.map(|m| RoleRecord { id: m.id, name: m.name }))
    }
}

pub struct RoleService<R: RoleRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RoleRepository + ?Sized> RoleService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<RoleRecord>, ServiceError> {
        self.repo.list().await
    }

    /// Resolve a role id that must exist in the role table.
    #[instrument(skip(self))]
    pub async fn resolve(&self, id: i32) -> Result<Role, ServiceError> {
        resolve_role(self.repo.as_ref(), id).await
    }
}

pub(crate) async fn resolve_role<R: RoleRepository + ?Sized>(repo: &R, id: i32) -> Result<Role, ServiceError> {
    let record = repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("role", id))?;
    Role::from_id(record.id).ok_or_else(|| ServiceError::Unexpected(format!("role {} is not a known role", record.name)))
}

#[cfg(test)]
mod tests {
    use super::mock::MockRoleRepository;
    use super::*;

    #[test]
    fn role_ids_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!("manager".parse::<Role>().ok(), Some(Role::Manager));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn catalog_rights() {
        assert!(Role::Admin.can_manage_catalog());
        assert!(Role::Manager.can_manage_catalog());
        assert!(!Role::Employee.can_manage_catalog());
    }

    #[tokio::test]
    async fn resolve_unknown_role_is_not_found() {
        let svc = RoleService::new(Arc::new(MockRoleRepository::default()));
        assert_eq!(svc.list().await.unwrap().len(), 3);
        assert_eq!(svc.resolve(2).await.unwrap(), Role::Manager);
        assert!(matches!(svc.resolve(99).await, Err(ServiceError::NotFound(_))));
    }
}
