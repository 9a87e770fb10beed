//! Common utilities and shared infrastructure
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - API error/response envelope
//! - Logging setup

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult};
