//! Unified error handling.
//!
//! Provides a unified `ShopError` for front ends that drive the storefront
//! and want one error type for every fallible step.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lessons backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Checkout input was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Lesson id not present in the catalog.
    #[error("Unknown lesson: {0}")]
    UnknownLesson(String),

    /// Lesson has fewer spaces than requested.
    #[error("Only {available} space(s) left for lesson {lesson_id}")]
    NotEnoughSpaces { lesson_id: String, available: u32 },

    /// The backend rejected the order.
    #[error("Order failed")]
    OrderFailed,

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShopError {
    /// Message safe to show the shopper.
    ///
    /// Backend details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(_) => "The lessons service is unavailable. Please try again.".to_string(),
            Self::Config(_) => "Configuration problem, see logs for details".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `ShopError`.
pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use lesson_shop_core::CustomerNameError;

    use super::*;

    #[test]
    fn test_shop_error_display() {
        let err = ShopError::UnknownLesson("65a1".to_string());
        assert_eq!(err.to_string(), "Unknown lesson: 65a1");

        let err = ShopError::NotEnoughSpaces {
            lesson_id: "A".to_string(),
            available: 2,
        };
        assert_eq!(err.to_string(), "Only 2 space(s) left for lesson A");

        let err = ShopError::from(CheckoutError::InvalidName(
            CustomerNameError::InvalidCharacter('1'),
        ));
        assert_eq!(
            err.to_string(),
            "Checkout error: Invalid name: name may only contain letters and spaces (found '1')"
        );
    }

    #[test]
    fn test_user_message_hides_backend_details() {
        let err = ShopError::from(ApiError::Api {
            status: 500,
            message: "stack trace".to_string(),
        });
        assert!(!err.user_message().contains("stack trace"));

        let err = ShopError::from(CheckoutError::EmptyCart);
        assert_eq!(err.user_message(), "Checkout error: Cart is empty");
    }
}
