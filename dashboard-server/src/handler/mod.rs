//! HTTP request handlers
//!
//! - [`auth`] - login, registration, current user
//! - [`user`] - user administration and role assignment
//! - [`role`] - role CRUD
//! - [`section_permission`] - per-(role, section) grant management
//! - [`sections`] - section access probe for gated areas
//! - [`health`] - liveness

pub mod auth;
pub mod health;
pub mod role;
pub mod section_permission;
pub mod sections;
pub mod user;
