use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::product;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_sale")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub amount: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price_per_unit: Decimal,
    pub date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_amount(amount: i32) -> Result<(), errors::ModelError> {
    if amount <= 0 {
        return Err(errors::ModelError::Validation("amount must be positive".into()));
    }
    Ok(())
}

pub fn validate_price_per_unit(price: Decimal) -> Result<(), errors::ModelError> {
    errors::require_money("price_per_unit", price)
}
