//! In-memory player store
//!
//! Backs `STORE_PROVIDER=memory` and the dispatcher tests. Thread-safe via
//! `Arc<Mutex<>>`; clones share the same records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use postback_common::RepositoryError;
use rust_decimal::Decimal;

use super::{StoreResult, UserStore};
use crate::domain::entities::{NewUserRecord, UserRecord};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, UserRecord>,
    operations: usize,
    unavailable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, as if the database went away
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.unavailable = unavailable;
        }
    }

    /// Number of store operations attempted so far
    pub fn operation_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.operations).unwrap_or(0)
    }

    /// Snapshot of a record, bypassing the operation counter
    pub fn get(&self, game_id: &str) -> Option<UserRecord> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.records.get(game_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.records.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| RepositoryError::Unavailable(format!("store lock poisoned: {e}")))?;
        inner.operations += 1;
        if inner.unavailable {
            return Err(RepositoryError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(inner)
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_game_id(&self, game_id: &str) -> StoreResult<Option<UserRecord>> {
        let inner = self.begin()?;
        Ok(inner.records.get(game_id).cloned())
    }

    async fn create(&self, record: NewUserRecord) -> StoreResult<UserRecord> {
        let mut inner = self.begin()?;
        if inner.records.contains_key(&record.game_id) {
            return Err(RepositoryError::AlreadyExists);
        }

        let created = record.into_record(Utc::now());
        inner
            .records
            .insert(created.game_id.clone(), created.clone());
        Ok(created)
    }

    async fn set_deposit_amount(
        &self,
        game_id: &str,
        amount: Decimal,
    ) -> StoreResult<Option<UserRecord>> {
        let mut inner = self.begin()?;
        Ok(inner.records.get_mut(game_id).map(|record| {
            record.deposit_amount = amount;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }
}
