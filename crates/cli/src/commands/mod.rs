//! Subcommand implementations.

pub mod config;
pub mod lessons;
pub mod order;
pub mod shop;
