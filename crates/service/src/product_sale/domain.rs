use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSale {
    pub id: i32,
    pub product_id: i32,
    pub amount: i32,
    pub price_per_unit: Decimal,
    pub date: DateTime<Utc>,
}

/// Creation request; omitted price and date are filled in by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductSale {
    pub product_id: i32,
    pub amount: i32,
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Fully resolved sale values, used for inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSaleInput {
    pub product_id: i32,
    pub amount: i32,
    pub price_per_unit: Decimal,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductSaleFilter {
    pub product_id: Option<i32>,
    /// Case-insensitive substring of the sold product's name.
    pub product_name: Option<String>,
    /// Inclusive lower bound on the sale date.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the sale date.
    pub to: Option<DateTime<Utc>>,
}

impl ProductSaleFilter {
    pub fn matches_date(&self, date: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

impl Record for ProductSale {
    fn id(&self) -> i32 { self.id }
    fn set_id(&mut self, id: i32) { self.id = id; }
}

impl ProductSale {
    pub fn with_input(id: i32, input: ProductSaleInput) -> Self {
        Self { id, product_id: input.product_id, amount: input.amount, price_per_unit: input.price_per_unit, date: input.date }
    }
}
