//! Lessons backend API.
//!
//! # Architecture
//!
//! - The backend is the source of truth for lessons and orders - no local
//!   persistence, direct REST calls
//! - [`LessonsApi`] is the seam the storefront logic is written against;
//!   [`HttpLessonsApi`] is the `reqwest` implementation
//! - No caching: the stale-id recovery path needs a fresh catalog
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | List catalog | GET | `/lessons` |
//! | Search catalog | GET | `/search?q=<query>` |
//! | Create order | POST | `/orders` |
//! | Update spaces | PUT | `/lessons/{id}` |

mod client;

pub use client::HttpLessonsApi;

use std::future::Future;

use lesson_shop_core::{Lesson, LessonId, Order};
use thiserror::Error;

/// Errors that can occur when talking to the lessons backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found (a 404 from the backend).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether the backend said the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Operations the storefront needs from the lessons backend.
pub trait LessonsApi {
    /// Fetch the full catalog.
    fn list_lessons(&self) -> impl Future<Output = Result<Vec<Lesson>, ApiError>> + Send;

    /// Fetch the lessons matching a free-text query.
    fn search_lessons(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Lesson>, ApiError>> + Send;

    /// Create an order. Any 2xx counts as success.
    fn create_order(&self, order: &Order) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Overwrite a lesson's remaining spaces.
    ///
    /// Returns [`ApiError::NotFound`] when `id` no longer exists remotely.
    fn update_spaces(
        &self,
        id: &LessonId,
        spaces: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Fetch what the catalog should show for `query`: the full list when the
/// query is empty, the backend's search results otherwise.
///
/// # Errors
///
/// Returns the underlying [`ApiError`] if the request fails.
pub async fn fetch_catalog<A: LessonsApi>(api: &A, query: &str) -> Result<Vec<Lesson>, ApiError> {
    if query.is_empty() {
        api.list_lessons().await
    } else {
        api.search_lessons(query).await
    }
}
