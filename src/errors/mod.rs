//! Centralized error handling for cineproxy
//!
//! # Error Categories
//!
//! - **Resolution Errors**: cross-reference lookup, stream provider transport,
//!   upstream status and empty stream lists
//! - **Proxy Errors**: malformed proxy parameters and origin replay failures
//! - **Application Errors**: config file and client construction at startup
//!
//! # Usage
//!
//! ```rust
//! use cineproxy::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Outcome of one playback resolution
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Convenience type alias for proxy handler Results
pub type ProxyResult<T> = Result<T, ProxyError>;
