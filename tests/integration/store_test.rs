//! Postgres player store tests
//!
//! Require a reachable Postgres (TEST_DATABASE_URL or DATABASE_URL).

mod common;

use postback_common::RepositoryError;
use postback_players::{NewUserRecord, PgUserStore, UserStore};
use rust_decimal::Decimal;

use crate::common::{connect, count_players, unique_game_id};

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_create_and_find_player() {
    let pool = connect().await.unwrap();
    let store = PgUserStore::new(pool);
    let game_id = unique_game_id("store-create");

    let created = store
        .create(NewUserRecord::new(game_id.as_str(), Some("partner-1")))
        .await
        .unwrap();

    assert_eq!(created.game_id, game_id);
    assert_eq!(created.referred_by, "partner-1");
    assert_eq!(created.deposit_amount, Decimal::ZERO);

    let found = store.find_by_game_id(&game_id).await.unwrap().unwrap();
    assert_eq!(found.game_id, created.game_id);
    assert!(store
        .find_by_game_id(&unique_game_id("missing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_duplicate_create_is_already_exists() {
    let pool = connect().await.unwrap();
    let store = PgUserStore::new(pool.clone());
    let game_id = unique_game_id("store-dup");

    store
        .create(NewUserRecord::new(game_id.as_str(), None))
        .await
        .unwrap();
    let err = store
        .create(NewUserRecord::new(game_id.as_str(), Some("other")))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::AlreadyExists));
    assert_eq!(count_players(&pool, &game_id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_insert_if_absent_is_atomic_under_concurrency() {
    let pool = connect().await.unwrap();
    let store = PgUserStore::new(pool.clone());
    let game_id = unique_game_id("store-race");

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            let game_id = game_id.clone();
            tokio::spawn(async move {
                store
                    .insert_if_absent(NewUserRecord::new(game_id, None))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap().is_some() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(count_players(&pool, &game_id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_set_deposit_amount_overwrites_and_never_creates() {
    let pool = connect().await.unwrap();
    let store = PgUserStore::new(pool.clone());
    let game_id = unique_game_id("store-deposit");

    store
        .create(NewUserRecord::new(game_id.as_str(), None))
        .await
        .unwrap();
    store
        .set_deposit_amount(&game_id, Decimal::from(50))
        .await
        .unwrap();
    let updated = store
        .set_deposit_amount(&game_id, Decimal::new(7550, 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.deposit_amount, Decimal::new(7550, 2));

    let ghost = unique_game_id("store-ghost");
    let missing = store
        .set_deposit_amount(&ghost, Decimal::from(10))
        .await
        .unwrap();
    assert!(missing.is_none());
    assert_eq!(count_players(&pool, &ghost).await.unwrap(), 0);
}
