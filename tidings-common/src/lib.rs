//! Common types and utilities shared across Tidings crates.
//!
//! This crate defines the shared error type and the observability helpers used
//! throughout the Tidings workspace. It is intentionally lightweight so that
//! every crate, including the pure extraction core, can depend on it.
//!
//! # Overview
//!
//! - [`TidingsError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! Surfacing a validation failure:
//!
//! ```rust
//! use tidings_common::TidingsError;
//!
//! let err = TidingsError::Validation("months_back must be a non-negative integer".into());
//! assert!(err.is_validation());
//! assert_eq!(
//!     err.to_string(),
//!     "Validation error: months_back must be a non-negative integer"
//! );
//! ```

pub mod observability;

/// Error types used across the Tidings system.
///
/// Only the fatal part of the taxonomy lives here. Unparseable dates, missing
/// DOM nodes and failed image downloads degrade in place and never become a
/// `TidingsError`.
#[derive(thiserror::Error, Debug)]
pub enum TidingsError {
    /// A run parameter was missing or had the wrong shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A driver (browser, network, etc.) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the work item or writing an artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON payload could not be decoded or encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The export table could not be persisted.
    #[error("Export error: {0}")]
    Export(String),
}

impl TidingsError {
    /// `true` for errors caused by caller-supplied parameters.
    pub fn is_validation(&self) -> bool {
        matches!(self, TidingsError::Validation(_))
    }
}

/// Convenient alias for results that use [`TidingsError`].
pub type Result<T> = std::result::Result<T, TidingsError>;
