use serde::{Deserialize, Serialize};

use crate::storage::Record;
use crate::uniqueness::UniqueFields;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Values supplied when creating or updating a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

impl UniqueFields for Company {
    fn unique_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("address", self.address.as_str()), ("phone", self.phone.as_str())]
    }
}

impl UniqueFields for CompanyInput {
    fn unique_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("address", self.address.as_str()), ("phone", self.phone.as_str())]
    }
}

impl Record for Company {
    fn id(&self) -> i32 { self.id }
    fn set_id(&mut self, id: i32) { self.id = id; }
}

impl Company {
    pub fn with_input(id: i32, input: CompanyInput) -> Self {
        Self { id, name: input.name, address: input.address, phone: input.phone }
    }
}
