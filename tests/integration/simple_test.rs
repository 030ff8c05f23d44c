//! Simple integration test to verify basic infrastructure works

#[tokio::test]
async fn test_config_loading() {
    use crate::common::TestConfig;

    let config = TestConfig::from_env();
    assert!(!config.database_url.is_empty());
}

#[test]
fn test_unique_game_ids_differ() {
    let first = common::unique_game_id("it");
    let second = common::unique_game_id("it");
    assert_ne!(first, second);
    assert!(first.starts_with("it-"));
}

mod common;
