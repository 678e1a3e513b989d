pub mod claims;
pub mod jwt;
pub mod session;

pub use claims::{Identity, Role, SessionClaims};
pub use jwt::{
    mint_session_token, verify_session_token, SessionSubject, TokenError, DEFAULT_SESSION_TTL,
};
pub use session::SessionResolver;
