//! Player record storage
//!
//! The dispatcher only depends on the [`UserStore`] trait; the Postgres store
//! serves production and the in-memory store serves tests and local runs.

pub mod memory;
pub mod postgres;

use postback_common::RepositoryError;
use rust_decimal::Decimal;

use crate::domain::entities::{NewUserRecord, UserRecord};

pub use memory::InMemoryUserStore;
pub use postgres::{run_migrations, PgUserStore};

pub type StoreResult<T> = std::result::Result<T, RepositoryError>;

/// Keyed access to player records
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Find a record by its game id
    async fn find_by_game_id(&self, game_id: &str) -> StoreResult<Option<UserRecord>>;

    /// Create a record, failing with `AlreadyExists` if the game id is taken
    async fn create(&self, record: NewUserRecord) -> StoreResult<UserRecord>;

    /// Create a record unless one exists, as a single atomic step.
    ///
    /// Returns `None` when the game id was already taken.
    async fn insert_if_absent(&self, record: NewUserRecord) -> StoreResult<Option<UserRecord>> {
        match self.create(record).await {
            Ok(created) => Ok(Some(created)),
            Err(RepositoryError::AlreadyExists) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the deposit amount of an existing record.
    ///
    /// Returns `None` without creating anything when the game id is unknown.
    async fn set_deposit_amount(
        &self,
        game_id: &str,
        amount: Decimal,
    ) -> StoreResult<Option<UserRecord>>;
}
