use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::error::AppError;

/// Environment variable holding the HS256 session secret.
pub const JWT_SECRET_ENV: &str = "GATE_JWT_SECRET";

/// Signing configuration shared by the session resolver and token minting.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared secret for signing and verifying session tokens
    jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secret.
    ///
    /// An empty secret is a configuration error: every token would verify
    /// against a key an attacker can guess.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Result<Self, AppError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.is_empty() {
            return Err(AppError::configuration_missing(JWT_SECRET_ENV));
        }
        Ok(Self {
            jwt_secret,
            algorithm: Algorithm::HS256,
        })
    }

    /// Read the secret from `GATE_JWT_SECRET`.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var(JWT_SECRET_ENV)
            .map_err(|_| AppError::configuration_missing(JWT_SECRET_ENV))?;
        Self::new(secret.trim().as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.jwt_secret)
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.jwt_secret)
    }

    /// Fixed secret for unit and integration tests.
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: b"test_secret_key_for_testing_purposes_only".to_vec(),
            algorithm: Algorithm::HS256,
        }
    }
}

// Never print the secret.
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
