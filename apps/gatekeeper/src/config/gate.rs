//! Route and redirect configuration for the access gate.
//!
//! Every list is a comma-separated environment variable. Unset variables fall
//! back to the defaults below; a set-but-empty list is honoured as empty.

use std::env;

use tracing::info;

use crate::auth::session::DEFAULT_SESSION_COOKIES;

pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["/"];
pub const DEFAULT_AUTH_ROUTES: &[&str] = &["/auth/signin", "/auth/signup", "/auth/error"];
pub const DEFAULT_ADMIN_PREFIX: &str = "/admin";
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "/api",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
    "/public",
];
pub const DEFAULT_SIGNIN_PATH: &str = "/auth/signin";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Exact-match paths reachable without a session
    pub public_routes: Vec<String>,
    /// Sign-in / sign-up entry points, matched by prefix
    pub auth_routes: Vec<String>,
    /// Everything under this prefix needs administrator privilege
    pub admin_prefix: String,
    /// Paths the gate never looks at
    pub excluded_prefixes: Vec<String>,
    pub signin_path: String,
    pub unauthorized_path: String,
    /// Session cookie names, highest priority first
    pub session_cookies: Vec<String>,
    /// Origin used for `callbackUrl`; `None` trusts the request's host
    pub public_origin: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_routes: owned(DEFAULT_PUBLIC_ROUTES),
            auth_routes: owned(DEFAULT_AUTH_ROUTES),
            admin_prefix: DEFAULT_ADMIN_PREFIX.to_string(),
            excluded_prefixes: owned(DEFAULT_EXCLUDED_PREFIXES),
            signin_path: DEFAULT_SIGNIN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
            session_cookies: owned(&DEFAULT_SESSION_COOKIES),
            public_origin: None,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            public_routes: list_var("GATE_PUBLIC_ROUTES", defaults.public_routes),
            auth_routes: list_var("GATE_AUTH_ROUTES", defaults.auth_routes),
            admin_prefix: string_var("GATE_ADMIN_PREFIX", defaults.admin_prefix),
            excluded_prefixes: list_var("GATE_EXCLUDED_PREFIXES", defaults.excluded_prefixes),
            signin_path: string_var("GATE_SIGNIN_PATH", defaults.signin_path),
            unauthorized_path: string_var("GATE_UNAUTHORIZED_PATH", defaults.unauthorized_path),
            session_cookies: list_var("GATE_SESSION_COOKIES", defaults.session_cookies),
            public_origin: optional_var("GATE_PUBLIC_ORIGIN"),
        }
    }

    pub fn with_public_routes(mut self, routes: &[&str]) -> Self {
        self.public_routes = owned(routes);
        self
    }

    pub fn with_auth_routes(mut self, routes: &[&str]) -> Self {
        self.auth_routes = owned(routes);
        self
    }

    pub fn with_admin_prefix(mut self, prefix: &str) -> Self {
        self.admin_prefix = prefix.to_string();
        self
    }

    pub fn with_public_origin(mut self, origin: &str) -> Self {
        self.public_origin = Some(origin.to_string());
        self
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_var(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn list_var(key: &str, default: Vec<String>) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => parse_list(&raw),
        Err(_) => {
            info!("{key} not set, using default: {}", default.join(","));
            default
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
