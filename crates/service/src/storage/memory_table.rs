use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::errors::ServiceError;

/// A row with an integer identity assigned on insert.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
}

struct TableState<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

/// Generic in-memory table keyed by auto-incremented id.
///
/// Rows are kept in id order. Writers pass a conflict check that runs under
/// the write lock against every other row, which is how the table enforces
/// unique fields atomically.
pub struct MemoryTable<T> {
    inner: RwLock<TableState<T>>,
}

impl<T: Record> Default for MemoryTable<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Record> MemoryTable<T> {
    pub fn new() -> Self {
        Self { inner: RwLock::new(TableState { rows: BTreeMap::new(), next_id: 1 }) }
    }

    /// Get row by id.
    pub async fn get(&self, id: i32) -> Option<T> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    /// First row (in id order) matching the predicate.
    pub async fn find<F>(&self, pred: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.inner.read().await.rows.values().find(|r| pred(r)).cloned()
    }

    /// All rows matching the predicate, in id order.
    pub async fn filter<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.inner.read().await.rows.values().filter(|r| pred(r)).cloned().collect()
    }

    /// Assign the next id and insert, unless `conflict` objects to an existing row.
    pub async fn insert<F>(&self, mut row: T, conflict: F) -> Result<T, ServiceError>
    where
        F: Fn(&T, &T) -> Option<ServiceError>,
    {
        let mut state = self.inner.write().await;
        if let Some(err) = state.rows.values().find_map(|existing| conflict(existing, &row)) {
            return Err(err);
        }
        let id = state.next_id;
        state.next_id += 1;
        row.set_id(id);
        state.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Replace the row with the same id; `conflict` sees every other row.
    pub async fn update<F>(&self, row: T, conflict: F) -> Result<Option<T>, ServiceError>
    where
        F: Fn(&T, &T) -> Option<ServiceError>,
    {
        let mut state = self.inner.write().await;
        if !state.rows.contains_key(&row.id()) {
            return Ok(None);
        }
        if let Some(err) = state
            .rows
            .values()
            .filter(|existing| existing.id() != row.id())
            .find_map(|existing| conflict(existing, &row))
        {
            return Err(err);
        }
        state.rows.insert(row.id(), row.clone());
        Ok(Some(row))
    }

    /// Remove a row; returns whether it existed.
    pub async fn remove(&self, id: i32) -> bool {
        self.inner.write().await.rows.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}
