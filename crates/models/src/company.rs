use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_text};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Product => Entity::has_many(crate::product::Entity).into() }
    }
}

impl Related<crate::product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MAX_LEN: usize = 128;
pub const ADDRESS_MAX_LEN: usize = 256;
pub const PHONE_MAX_LEN: usize = 32;

pub fn validate(name: &str, address: &str, phone: &str) -> Result<(), errors::ModelError> {
    require_text("name", name, NAME_MAX_LEN)?;
    require_text("address", address, ADDRESS_MAX_LEN)?;
    require_text("phone", phone, PHONE_MAX_LEN)?;
    Ok(())
}
