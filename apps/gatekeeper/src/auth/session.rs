//! Session resolution: locate the session token on a request and verify it.
//!
//! The resolver owns the signing configuration it was built with and reads
//! nothing else from the process. A missing token is a normal outcome
//! (`Ok(None)`); only a token that is present but unusable is an error.

use actix_web::http::header::{self, HeaderValue};
use actix_web::HttpRequest;

use crate::auth::claims::Identity;
use crate::auth::jwt::{verify_session_token, TokenError};
use crate::logging::security;
use crate::state::security_config::SecurityConfig;

/// Cookie names NextAuth-style front ends store the session token under.
pub const DEFAULT_SESSION_COOKIES: [&str; 2] =
    ["__Secure-next-auth.session-token", "next-auth.session-token"];

#[derive(Debug, Clone)]
pub struct SessionResolver {
    security: SecurityConfig,
    cookie_names: Vec<String>,
}

impl SessionResolver {
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            security,
            cookie_names: DEFAULT_SESSION_COOKIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    /// Replace the cookie names searched, in priority order.
    pub fn with_cookie_names(mut self, names: Vec<String>) -> Self {
        self.cookie_names = names;
        self
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// Resolve the identity carried by `req`.
    ///
    /// Returns `Ok(None)` when no token is present and `Err` when a token is
    /// present but cannot be trusted.
    pub fn resolve(&self, req: &HttpRequest) -> Result<Option<Identity>, TokenError> {
        let token = match self.locate_token(req)? {
            Some(token) => token,
            None => return Ok(None),
        };

        let claims = verify_session_token(&token, &self.security)?;
        Ok(Some(Identity::from(claims)))
    }

    /// Resolve the identity, folding every rejection into "no identity".
    pub fn resolve_or_anonymous(&self, req: &HttpRequest) -> Option<Identity> {
        match self.resolve(req) {
            Ok(identity) => identity,
            Err(err) => {
                security::token_rejected(err.reason());
                None
            }
        }
    }

    fn locate_token(&self, req: &HttpRequest) -> Result<Option<String>, TokenError> {
        for name in &self.cookie_names {
            if let Some(cookie) = req.cookie(name) {
                let value = cookie.value().trim();
                if !value.is_empty() {
                    return Ok(Some(value.to_string()));
                }
            }
        }

        extract_bearer_from_header(req.headers().get(header::AUTHORIZATION))
    }
}

fn extract_bearer_from_header(
    header_value: Option<&HeaderValue>,
) -> Result<Option<String>, TokenError> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = auth_value.to_str().map_err(|_| TokenError::Malformed)?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok(None),
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(Some(token.to_string())),
        [scheme, ..] if scheme.eq_ignore_ascii_case("bearer") => Err(TokenError::Malformed),
        _ => Err(TokenError::UnsupportedScheme),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    use super::*;
    use crate::auth::claims::Role;
    use crate::auth::jwt::{mint_session_token, SessionSubject, DEFAULT_SESSION_TTL};

    fn token_for(subject: SessionSubject, security: &SecurityConfig) -> String {
        mint_session_token(&subject, SystemTime::now(), DEFAULT_SESSION_TTL, security).unwrap()
    }

    #[test]
    fn test_missing_token_is_absent_not_error() {
        let resolver = SessionResolver::new(SecurityConfig::for_tests());
        let req = TestRequest::default().to_http_request();
        assert_eq!(resolver.resolve(&req), Ok(None));
    }

    #[test]
    fn test_cookie_token_resolves() {
        let security = SecurityConfig::for_tests();
        let resolver = SessionResolver::new(security.clone());
        let token = token_for(SessionSubject::new("u-1").with_role(Role::Admin), &security);

        let req = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", token))
            .to_http_request();

        let identity = resolver.resolve(&req).unwrap().unwrap();
        assert_eq!(identity.sub, "u-1");
        assert!(identity.is_admin);
    }

    #[test]
    fn test_secure_cookie_takes_priority() {
        let security = SecurityConfig::for_tests();
        let resolver = SessionResolver::new(security.clone());
        let secure = token_for(SessionSubject::new("secure"), &security);
        let plain = token_for(SessionSubject::new("plain"), &security);

        let req = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", plain))
            .cookie(Cookie::new("__Secure-next-auth.session-token", secure))
            .to_http_request();

        assert_eq!(resolver.resolve(&req).unwrap().unwrap().sub, "secure");
    }

    #[test]
    fn test_bearer_header_resolves() {
        let security = SecurityConfig::for_tests();
        let resolver = SessionResolver::new(security.clone());
        let token = token_for(SessionSubject::new("api-user"), &security);

        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();

        assert_eq!(resolver.resolve(&req).unwrap().unwrap().sub, "api-user");
    }

    #[test]
    fn test_custom_cookie_names() {
        let security = SecurityConfig::for_tests();
        let resolver = SessionResolver::new(security.clone())
            .with_cookie_names(vec!["sid".to_string()]);
        let token = token_for(SessionSubject::new("custom"), &security);

        let ignored = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", token.clone()))
            .to_http_request();
        assert_eq!(resolver.resolve(&ignored), Ok(None));

        let req = TestRequest::default()
            .cookie(Cookie::new("sid", token))
            .to_http_request();
        assert_eq!(resolver.resolve(&req).unwrap().unwrap().sub, "custom");
    }

    #[test]
    fn test_invalid_tokens_are_errors_but_resolve_to_anonymous() {
        let resolver = SessionResolver::new(SecurityConfig::for_tests());
        let other = SecurityConfig::new("someone-else").unwrap();
        let forged = token_for(SessionSubject::new("forged").with_role(Role::Admin), &other);
        let expired = mint_session_token(
            &SessionSubject::new("old"),
            SystemTime::now() - Duration::from_secs(7200),
            Duration::from_secs(60),
            resolver.security(),
        )
        .unwrap();

        for (token, expected) in [
            (forged, TokenError::InvalidSignature),
            (expired, TokenError::Expired),
            ("garbage".to_string(), TokenError::Malformed),
        ] {
            let req = TestRequest::default()
                .cookie(Cookie::new("next-auth.session-token", token))
                .to_http_request();
            assert_eq!(resolver.resolve(&req), Err(expected));
            assert_eq!(resolver.resolve_or_anonymous(&req), None);
        }
    }

    #[test]
    fn test_service_request_resolves_through_inner_request() {
        let security = SecurityConfig::for_tests();
        let resolver = SessionResolver::new(security.clone());
        let token = token_for(SessionSubject::new("middleware-user"), &security);

        let req = TestRequest::default()
            .cookie(Cookie::new("next-auth.session-token", token))
            .to_srv_request();

        let identity = resolver.resolve_or_anonymous(req.request());
        assert_eq!(identity.map(|i| i.sub), Some("middleware-user".to_string()));
    }

    #[test]
    fn test_authorization_header_shapes() {
        let ok = HeaderValue::from_static("Bearer abc");
        assert_eq!(
            extract_bearer_from_header(Some(&ok)),
            Ok(Some("abc".to_string()))
        );

        let basic = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        assert_eq!(
            extract_bearer_from_header(Some(&basic)),
            Err(TokenError::UnsupportedScheme)
        );

        let empty_bearer = HeaderValue::from_static("Bearer");
        assert_eq!(
            extract_bearer_from_header(Some(&empty_bearer)),
            Err(TokenError::Malformed)
        );

        let extra = HeaderValue::from_static("Bearer a b");
        assert_eq!(
            extract_bearer_from_header(Some(&extra)),
            Err(TokenError::Malformed)
        );

        assert_eq!(extract_bearer_from_header(None), Ok(None));
    }
}
