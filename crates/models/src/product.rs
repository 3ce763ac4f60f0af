use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{self, require_money, require_text};
use crate::company;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub registration_number: i32,
    pub name: String,
    pub company_id: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Company,
    ProductSale,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(company::Entity)
                .from(Column::CompanyId)
                .to(company::Column::Id)
                .into(),
            Relation::ProductSale => Entity::has_many(crate::product_sale::Entity).into(),
        }
    }
}

impl Related<company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl Related<crate::product_sale::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProductSale.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MAX_LEN: usize = 128;

pub fn validate_price(price: Decimal) -> Result<(), errors::ModelError> {
    require_money("price", price)
}

pub fn validate(name: &str, price: Decimal) -> Result<(), errors::ModelError> {
    require_text("name", name, NAME_MAX_LEN)?;
    validate_price(price)
}
