use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::Record;
use crate::uniqueness::UniqueFields;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    /// Assigned once at creation and never changed.
    pub registration_number: i32,
    pub name: String,
    pub company_id: i32,
    pub price: Decimal,
}

/// Caller-supplied product values; the registration number is never an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub company_id: i32,
    pub price: Decimal,
}

/// A product ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductRecord {
    pub registration_number: i32,
    pub name: String,
    pub company_id: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub company_id: Option<i32>,
}

impl UniqueFields for Product {
    fn unique_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str())]
    }
}

impl Record for Product {
    fn id(&self) -> i32 { self.id }
    fn set_id(&mut self, id: i32) { self.id = id; }
}

impl From<NewProductRecord> for Product {
    fn from(r: NewProductRecord) -> Self {
        Self { id: 0, registration_number: r.registration_number, name: r.name, company_id: r.company_id, price: r.price }
    }
}
