//! Integration tests for Lesson Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP client tests against a mock backend
//! cargo test -p lesson-shop-integration-tests
//!
//! # Against a real backend
//! LESSON_SHOP_API_BASE=http://localhost:3000 \
//!     cargo test -p lesson-shop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `http_client` - `HttpLessonsApi` and checkout against a `wiremock` server
//! - `live_backend` - Read-only checks against a running backend

use serde_json::{Value, json};

/// A lesson document as the backend returns it.
#[must_use]
pub fn lesson_json(id: &str, subject: &str, location: &str, price: f64, spaces: u32) -> Value {
    json!({
        "_id": id,
        "subject": subject,
        "location": location,
        "price": price,
        "spaces": spaces,
        "image": format!("{}.png", subject.to_lowercase()),
    })
}
