//! Shared data models for the dashboard backend.
//!
//! Row types and API projections live here so that the server and any future
//! consumers (CLI tooling, sync clients) agree on one schema. Database row
//! types derive `sqlx::FromRow` behind the `db` feature.

pub mod models;
pub mod util;
