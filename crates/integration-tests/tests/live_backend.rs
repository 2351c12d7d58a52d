//! Read-only checks against a running lessons backend.
//!
//! These tests require:
//! - A reachable backend at `LESSON_SHOP_API_BASE` (defaults to the public one)
//!
//! Run with: cargo test -p lesson-shop-integration-tests -- --ignored
//!
//! Nothing here places orders or changes spaces.

use lesson_shop_storefront::{HttpLessonsApi, LessonsApi, ShopConfig};

/// Client for the configured backend (env var, stored preference or default).
fn live_client() -> HttpLessonsApi {
    let config = ShopConfig::from_env(None).expect("Failed to load configuration");
    HttpLessonsApi::new(&config).expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires a running lessons backend"]
async fn test_live_list_lessons() {
    let lessons = live_client()
        .list_lessons()
        .await
        .expect("Failed to list lessons");

    for lesson in &lessons {
        assert!(!lesson.id.as_str().is_empty());
        assert!(!lesson.subject.is_empty());
    }
}

#[tokio::test]
#[ignore = "Requires a running lessons backend"]
async fn test_live_search_subset_of_catalog() {
    let api = live_client();
    let all = api.list_lessons().await.expect("Failed to list lessons");
    let Some(first) = all.first() else {
        return;
    };

    let found = api
        .search_lessons(&first.subject)
        .await
        .expect("Failed to search lessons");

    assert!(found.iter().all(|lesson| all.iter().any(|l| l.id == lesson.id)));
    assert!(found.iter().any(|lesson| lesson.id == first.id));
}
