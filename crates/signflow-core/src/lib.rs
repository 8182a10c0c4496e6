//! # Signflow Core
//!
//! Core types and utilities shared by every Signflow crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`serde`]: Custom serde helpers for query strings and form payloads
//!
//! # Example
//!
//! ```ignore
//! use signflow_core::errors::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Role not found"));
//! let error = AppError::field("code", "Code is required");
//! ```

pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse, FieldErrors, field_errors_from};
