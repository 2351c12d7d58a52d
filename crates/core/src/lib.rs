//! Lesson Shop Core - Shared types library.
//!
//! This crate provides the domain types used across all Lesson Shop components:
//! - `storefront` - Catalog, cart and checkout logic plus the lessons API client
//! - `cli` - Terminal front end for browsing and ordering
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wire
//! shapes of the lessons backend live here so that the client and the tests
//! agree on them.
//!
//! # Modules
//!
//! - [`types`] - Lesson ids, prices, lessons, orders and validated customer fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
