//! Storage abstractions for service layer
//!
//! Contains the in-memory table backing the mock repositories used by tests,
//! doc examples and the database-free server mode.

pub mod memory_table;

pub use memory_table::{MemoryTable, Record};
