//! JWT Token Service
//!
//! Handles session token generation, validation, and parsing. Tokens are
//! self-contained and never stored server-side; validity is purely a
//! function of signature and expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT Configuration
///
/// Passed explicitly into [`JwtService`]; there is no process-wide signing
/// state, so tests can run isolated services with distinct secrets.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key (should be at least 32 bytes)
    pub secret: String,
    /// Signing algorithm
    pub algorithm: Algorithm,
    /// Token expiration time in minutes
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set! Using insecure default key. DO NOT USE IN PRODUCTION!"
                );
                "dev-secret-key-change-in-production-min-32-chars-long".to_string()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("FATAL: JWT_SECRET environment variable is not set!");
            }
        });

        Self {
            secret,
            algorithm: std::env::var("JWT_ALGORITHM")
                .ok()
                .and_then(|s| parse_algorithm(&s))
                .unwrap_or(Algorithm::HS256),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Parse a configured algorithm identifier. Only the HMAC family is
/// supported because the signing key is a shared secret.
fn parse_algorithm(s: &str) -> Option<Algorithm> {
    match s {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => {
            tracing::warn!(algorithm = s, "Unknown JWT_ALGORITHM, falling back to HS256");
            None
        }
    }
}

/// Claims stored in the token
///
/// The subject is the principal id rendered as a string; session resolution
/// parses it back to `i64` and treats a non-numeric subject as an invalid
/// token rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id
    pub sub: String,
    /// Principal email
    pub email: String,
    /// Expiration timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
}

/// JWT Errors
///
/// The variants exist for logging; the API boundary collapses all of them
/// into one invalid-token outcome so callers only branch on valid/invalid.
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT Token Service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service with default config
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Create a new JWT service with custom config
    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// Generate a token for a principal using the configured TTL
    pub fn generate_token(&self, user_id: i64, email: &str) -> Result<String, JwtError> {
        self.generate_token_with_ttl(user_id, email, None)
    }

    /// Generate a token with an explicit TTL in minutes
    pub fn generate_token_with_ttl(
        &self,
        user_id: i64,
        email: &str,
        ttl_minutes: Option<i64>,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let ttl = ttl_minutes.unwrap_or(self.config.expiration_minutes);
        let expiration = now + Duration::minutes(ttl);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_required_spec_claims(&["sub", "exp"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Extract token from Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(secret: &str) -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expiration_minutes: 30,
        })
    }

    #[test]
    fn generate_and_validate_token() {
        let service = test_service("test-secret-key-that-is-long-enough");

        let token = service.generate_token(42, "jane@example.com").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.sub.parse::<i64>().unwrap(), 42);
        assert_eq!(claims.email, "jane@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_invalid() {
        let service = test_service("test-secret-key-that-is-long-enough");

        let token = service
            .generate_token_with_ttl(42, "jane@example.com", Some(-60))
            .unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_invalid() {
        let service = test_service("test-secret-key-that-is-long-enough");
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let first = test_service("secret-one-for-testing-purposes-xx");
        let second = test_service("secret-two-for-testing-purposes-xx");

        let token = first.generate_token(1, "a@b.c").unwrap();
        assert!(second.validate_token(&token).is_err());
    }

    #[test]
    fn extract_from_header_strips_bearer_prefix() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
