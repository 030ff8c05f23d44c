//! End-to-end postback flows against Postgres
//!
//! Require a reachable Postgres (TEST_DATABASE_URL or DATABASE_URL).

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use postback_notify::{telegram, Notifiers};
use postback_players::{PgUserStore, PlayersState, UserStore};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{connect, count_players, post_webhook, unique_game_id, TestApp};

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_registration_then_deposits() {
    let app = TestApp::new().await.unwrap();
    let game_id = unique_game_id("flow");

    let status = post_webhook(
        &app.router,
        json!({ "gameId": game_id, "eventType": "registration", "referredBy": "aff-9" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let replay = post_webhook(
        &app.router,
        json!({ "gameId": game_id, "eventType": "registration", "referredBy": "aff-10" }),
    )
    .await;
    assert_eq!(replay, StatusCode::OK);
    assert_eq!(count_players(&app.pool, &game_id).await.unwrap(), 1);
    assert_eq!(app.registration.attempt_count(), 1);

    for amount in [50, 75] {
        let status = post_webhook(
            &app.router,
            json!({ "gameId": game_id, "eventType": "first_deposit", "depositAmount": amount }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let status = post_webhook(
        &app.router,
        json!({ "gameId": game_id, "eventType": "deposit", "depositAmount": 20 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let record = app.store.find_by_game_id(&game_id).await.unwrap().unwrap();
    assert_eq!(record.referred_by, "aff-9");
    assert_eq!(record.deposit_amount, Decimal::from(75));
    assert_eq!(app.first_deposit.attempt_count(), 2);
    assert_eq!(app.deposit.attempt_count(), 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_concurrent_registrations_store_one_row() {
    let app = TestApp::new().await.unwrap();
    let game_id = unique_game_id("flow-race");

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let router = app.router.clone();
            let body = json!({ "gameId": game_id, "eventType": "registration" });
            tokio::spawn(async move { post_webhook(&router, body).await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(count_players(&app.pool, &game_id).await.unwrap(), 1);
    assert_eq!(app.registration.attempt_count(), 1);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_telegram_delivery_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botreg-token/sendMessage"))
        .and(body_partial_json(json!({ "chat_id": "-100777" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The first-deposit bot is rejected by the Bot API; the postback still succeeds.
    Mock::given(method("POST"))
        .and(path("/botfd-token/sendMessage"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "description": "Unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pool = connect().await.unwrap();
    let http = telegram::build_http_client(Duration::from_secs(2)).unwrap();
    let bot = |token: &str| {
        Arc::new(telegram::TelegramNotifier::new(
            http.clone(),
            &server.uri(),
            token,
        ))
    };
    let state = PlayersState {
        store: Arc::new(PgUserStore::new(pool.clone())),
        notifiers: Notifiers {
            registration: bot("reg-token"),
            first_deposit: bot("fd-token"),
            deposit: bot("dep-token"),
            destination: "-100777".to_string(),
            send_timeout: Duration::from_secs(2),
        },
    };
    let router = postback_app::create_app(state);
    let game_id = unique_game_id("flow-telegram");

    let registration = post_webhook(
        &router,
        json!({ "gameId": game_id, "eventType": "registration" }),
    )
    .await;
    let first_deposit = post_webhook(
        &router,
        json!({ "gameId": game_id, "eventType": "first_deposit", "depositAmount": 30 }),
    )
    .await;

    assert_eq!(registration, StatusCode::OK);
    assert_eq!(first_deposit, StatusCode::OK);
    assert_eq!(count_players(&pool, &game_id).await.unwrap(), 1);
}
