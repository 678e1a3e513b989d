//! Session token fixtures for tests

use std::time::{Duration, SystemTime};

use actix_web::cookie::Cookie;
use gatekeeper::auth::claims::Role;
use gatekeeper::auth::jwt::{mint_session_token, SessionSubject, DEFAULT_SESSION_TTL};
use gatekeeper::state::security_config::SecurityConfig;
use gatekeeper_test_support::unique_sub;

pub const SESSION_COOKIE: &str = "next-auth.session-token";

pub fn mint_token(subject: &SessionSubject, sec: &SecurityConfig) -> String {
    mint_session_token(subject, SystemTime::now(), DEFAULT_SESSION_TTL, sec)
        .expect("should mint token successfully")
}

/// Token whose expiry is an hour in the past.
pub fn mint_expired_token(subject: &SessionSubject, sec: &SecurityConfig) -> String {
    let two_hours_ago = SystemTime::now()
        .checked_sub(Duration::from_secs(7200))
        .unwrap();
    mint_session_token(subject, two_hours_ago, Duration::from_secs(3600), sec)
        .expect("should mint expired token successfully")
}

pub fn member() -> SessionSubject {
    SessionSubject::new(unique_sub("member")).with_role(Role::User)
}

pub fn admin() -> SessionSubject {
    SessionSubject::new(unique_sub("admin")).with_role(Role::Admin)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE, token)
}

pub fn bearer_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
