//! `reqwest` implementation of [`LessonsApi`].

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use lesson_shop_core::{Lesson, LessonId, Order, SpacesUpdate};

use super::{ApiError, LessonsApi};
use crate::config::ShopConfig;

/// How much of an error body to keep for logs and error messages.
const ERROR_BODY_LIMIT: usize = 500;

/// HTTP client for the lessons backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpLessonsApi {
    client: reqwest::Client,
    config: ShopConfig,
}

impl HttpLessonsApi {
    /// Create a new lessons API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ShopConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// The backend this client talks to.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.config.api_base.as_str()
    }

    /// GET a URL that returns a JSON array of lessons.
    async fn get_lessons(&self, url: &str) -> Result<Vec<Lesson>, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse lessons response"
            );
            ApiError::Parse(e.to_string())
        })
    }
}

impl LessonsApi for HttpLessonsApi {
    #[instrument(skip(self))]
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        let lessons = self.get_lessons(&self.config.endpoint("/lessons")).await?;
        debug!(count = lessons.len(), "Fetched lessons");
        Ok(lessons)
    }

    #[instrument(skip(self))]
    async fn search_lessons(&self, query: &str) -> Result<Vec<Lesson>, ApiError> {
        let url = format!(
            "{}?q={}",
            self.config.endpoint("/search"),
            urlencoding::encode(query)
        );
        let lessons = self.get_lessons(&url).await?;
        debug!(count = lessons.len(), "Fetched search results");
        Ok(lessons)
    }

    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn create_order(&self, order: &Order) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.config.endpoint("/orders"))
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(lesson_id = %id))]
    async fn update_spaces(&self, id: &LessonId, spaces: u32) -> Result<(), ApiError> {
        let url = self.config.endpoint(&format!(
            "/lessons/{}",
            urlencoding::encode(id.as_str())
        ));

        let response = self
            .client
            .put(url)
            .json(&SpacesUpdate { spaces })
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("lesson {id}")));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(())
    }
}

fn api_error(status: StatusCode, body: &str) -> ApiError {
    tracing::error!(
        status = %status,
        body = %truncate(body),
        "Lessons API returned non-success status"
    );
    ApiError::Api {
        status: status.as_u16(),
        message: truncate(body),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
