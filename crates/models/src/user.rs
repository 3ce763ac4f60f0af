use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};
use crate::role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Role,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Role => Entity::belongs_to(role::Entity).from(Column::RoleId).to(role::Column::Id).into() }
    }
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef { Relation::Role.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const USERNAME_MAX_LEN: usize = 64;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PERSON_NAME_MAX_LEN: usize = 128;

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    require_text("email", email, EMAIL_MAX_LEN)?;
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    require_text("username", username, USERNAME_MAX_LEN)?;
    if username.chars().any(char::is_whitespace) {
        return Err(errors::ModelError::Validation("username must not contain whitespace".into()));
    }
    Ok(())
}

pub fn validate_name(first_name: &str, last_name: &str) -> Result<(), errors::ModelError> {
    require_text("first_name", first_name, PERSON_NAME_MAX_LEN)?;
    require_text("last_name", last_name, PERSON_NAME_MAX_LEN)
}
