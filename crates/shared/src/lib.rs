//! Shared types, errors, and configuration for the Seashore ledger.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes and fixed decimal precision rules
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig};
pub use error::{AppError, AppResult};
