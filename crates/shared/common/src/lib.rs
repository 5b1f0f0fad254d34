//! Common utilities shared across services.
//!
//! This crate provides:
//! - HTTP error handling on top of the domain error taxonomy
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, ErrorBody, ErrorResponse};
