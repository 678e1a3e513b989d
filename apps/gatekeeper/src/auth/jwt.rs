use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use thiserror::Error;

use crate::auth::claims::{Role, SessionClaims};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Session lifetime used when the caller does not pick one (30 days).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Why a presented token was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
}

impl TokenError {
    /// Stable label used in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Expired => "token_expired",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Malformed => "malformed_token",
            TokenError::UnsupportedScheme => "unsupported_scheme",
        }
    }
}

/// Who a freshly minted session token describes.
#[derive(Debug, Clone, Default)]
pub struct SessionSubject {
    pub sub: String,
    pub role: Option<Role>,
    pub legacy_admin: Option<bool>,
    pub email: Option<String>,
}

impl SessionSubject {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_legacy_admin(mut self, flag: bool) -> Self {
        self.legacy_admin = Some(flag);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Mint an HS256 session token valid for `ttl` from `now`.
pub fn mint_session_token(
    subject: &SessionSubject,
    now: SystemTime,
    ttl: Duration,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|since_epoch| i64::try_from(since_epoch.as_secs()).ok())
        .ok_or_else(|| AppError::internal("Failed to get current time"))?;
    let exp = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|ttl_secs| iat.checked_add(ttl_secs))
        .ok_or_else(|| {
            AppError::config(format!("session TTL of {}s is out of range", ttl.as_secs()))
        })?;

    let claims = SessionClaims {
        sub: subject.sub.clone(),
        role: subject.role.map(|r| r.as_str().to_string()),
        is_admin: subject.legacy_admin,
        email: subject.email.clone(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &security.encoding_key(),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
}

/// Verify a session token and return its claims.
///
/// Expiry is always checked; the algorithm is pinned to the configured one.
pub fn verify_session_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = true;

    decode::<SessionClaims>(token, &security.decoding_key(), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })
}
