use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{AdminUserUpdate, NewUser, NewUserRecord, ProfileUpdate, User, UserFilter, UserIdentity};
use super::repository::UserRepository;
use crate::auth::password::{check_password_policy, CredentialHasher};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, Paged};
use crate::role::{resolve_role, RoleRepository};
use crate::uniqueness::first_collision;

/// User business service independent of web framework
pub struct UserService<U: UserRepository + ?Sized, R: RoleRepository + ?Sized> {
    users: Arc<U>,
    roles: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
    min_password_length: usize,
}

fn validate_identity(username: &str, email: &str) -> Result<(), ServiceError> {
    models::user::validate_username(username)?;
    models::user::validate_email(email)?;
    Ok(())
}

impl<U, R> UserService<U, R>
where
    U: UserRepository + ?Sized,
    R: RoleRepository + ?Sized,
{
    pub fn new(users: Arc<U>, roles: Arc<R>, hasher: Arc<dyn CredentialHasher>, min_password_length: usize) -> Self {
        Self { users, roles, hasher, min_password_length }
    }

    /// Create a user with a hashed password and an existing role.
    #[instrument(skip(self, input), fields(username = %input.username, role_id = input.role_id))]
    pub async fn add(&self, input: NewUser) -> Result<User, ServiceError> {
        validate_identity(&input.username, &input.email)?;
        models::user::validate_name(&input.first_name, &input.last_name)?;
        check_password_policy(&input.password, self.min_password_length)?;
        let role = resolve_role(self.roles.as_ref(), input.role_id).await?;
        let identity = UserIdentity { username: input.username.clone(), email: input.email.clone() };
        self.ensure_unique(&identity, None).await?;

        let password_hash = self.hasher.hash(&input.password)?;
        let created = self
            .users
            .add(NewUserRecord {
                username: input.username,
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                role,
                password_hash,
                password_algorithm: self.hasher.algorithm().to_string(),
            })
            .await?;
        info!(user_id = created.id, role = %created.role, "user_created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<User, ServiceError> {
        self.users.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("user", id))
    }

    pub async fn get_all_paged(&self, filter: &UserFilter, page: PageRequest) -> Result<Paged<User>, ServiceError> {
        self.users.find_paged(filter, page).await
    }

    /// Self-service update of username and email.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn update_profile(&self, id: i32, input: ProfileUpdate) -> Result<User, ServiceError> {
        validate_identity(&input.username, &input.email)?;
        let existing = self.get_by_id(id).await?;
        let identity = UserIdentity { username: input.username, email: input.email };
        self.ensure_unique(&identity, Some(id)).await?;
        let updated = self.save(User { username: identity.username, email: identity.email, ..existing }).await?;
        info!(user_id = id, "user_profile_updated");
        Ok(updated)
    }

    /// Administrative update; may also reassign the role.
    #[instrument(skip(self, input), fields(username = %input.username, role_id = input.role_id))]
    pub async fn update(&self, id: i32, input: AdminUserUpdate) -> Result<User, ServiceError> {
        validate_identity(&input.username, &input.email)?;
        let existing = self.get_by_id(id).await?;
        let role = resolve_role(self.roles.as_ref(), input.role_id).await?;
        let identity = UserIdentity { username: input.username, email: input.email };
        self.ensure_unique(&identity, Some(id)).await?;
        let updated = self
            .save(User { username: identity.username, email: identity.email, role, ..existing })
            .await?;
        info!(user_id = id, role = %updated.role, "user_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        if !self.users.remove(id).await? {
            return Err(ServiceError::not_found("user", id));
        }
        info!(user_id = id, "user_removed");
        Ok(())
    }

    async fn save(&self, user: User) -> Result<User, ServiceError> {
        let id = user.id;
        self.users.update(user).await?.ok_or_else(|| ServiceError::not_found("user", id))
    }

    async fn ensure_unique(&self, identity: &UserIdentity, exclude_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(existing) = self.users.find_by_unique_candidates(identity, exclude_id).await? {
            if let Some(field) = first_collision(identity, &existing) {
                return Err(ServiceError::duplicate("user", field));
            }
        }
        Ok(())
    }
}
