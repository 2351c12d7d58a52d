//! Core types for Lesson Shop.
//!
//! This module provides type-safe wrappers for the lessons domain.

pub mod customer;
pub mod id;
pub mod lesson;
pub mod order;
pub mod price;

pub use customer::{CustomerName, CustomerNameError, PhoneNumber, PhoneNumberError};
pub use id::*;
pub use lesson::Lesson;
pub use order::{Order, OrderItem, SpacesUpdate};
pub use price::Price;
