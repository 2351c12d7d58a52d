//! Lesson Shop Storefront library.
//!
//! Holds everything between the terminal front end and the lessons backend:
//! the cart and its space reservations, checkout with post-order space
//! reconciliation, catalog filtering and sorting, the debounced live search,
//! and the HTTP client for the backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use lesson_shop_storefront::{HttpLessonsApi, ShopConfig, Storefront};
//!
//! let config = ShopConfig::from_env(None)?;
//! let mut store = Storefront::new(HttpLessonsApi::new(&config)?);
//! store.load().await?;
//!
//! store.add_to_cart(&lesson_id);
//! store.set_checkout("John Doe", "5551234");
//! let outcome = store.submit_order().await?;
//! println!("{}", outcome.message);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod debounce;
pub mod error;
pub mod store;

pub use api::{ApiError, HttpLessonsApi, LessonsApi};
pub use cart::{Cart, CartLine};
pub use catalog::{SortDirection, SortKey, SortOrder};
pub use checkout::{CheckoutError, CheckoutForm, OrderOutcome, OrderStatus, ReconciliationGap};
pub use config::{ConfigError, Preferences, ShopConfig};
pub use debounce::SearchDebouncer;
pub use error::{Result, ShopError};
pub use store::{FetchTicket, Storefront, StorefrontView};
