//! Shared types, errors, and configuration for Gescom.
//!
//! This crate provides common types used across all other crates:
//! - Currencies and their decimal precision
//! - Typed IDs for type-safe references to taxes, documents and entries
//! - Application-wide error types
//! - Tenant configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use config::TenantConfig;
pub use error::{AppError, AppResult};
