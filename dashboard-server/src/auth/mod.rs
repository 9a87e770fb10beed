//! Authentication and authorization module
//!
//! - [`JwtService`] - signed session token issuance and verification
//! - [`password`] - Argon2 password hashing
//! - [`CurrentUser`] - resolved principal with eagerly loaded roles
//! - [`middleware`] - authentication and admin-gate middleware
//! - [`permissions`] - section view/edit permission resolution

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod session;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use permissions::PermissionAction;
pub use session::CurrentUser;
