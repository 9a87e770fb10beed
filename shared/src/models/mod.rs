//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are UTC millis.

pub mod role;
pub mod section_permission;
pub mod user;
pub mod user_role;

// Re-exports
pub use role::*;
pub use section_permission::*;
pub use user::*;
pub use user_role::*;
