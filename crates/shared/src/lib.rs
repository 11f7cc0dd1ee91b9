//! Shared types, errors, and configuration for Ledgerbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed integer IDs for type-safe entity references
//! - Accounting periods and posting-date normalization
//! - Balance tolerance helpers for decimal amounts
//! - Caller identity handed over by the session service
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{Actor, Role};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
