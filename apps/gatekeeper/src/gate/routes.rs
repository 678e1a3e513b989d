//! Route classification.
//!
//! Precedence is fixed and checked in order: public (exact), auth entry
//! points (prefix), admin prefix, then everything else needs a session.
//! Specificity never reorders these checks.

use std::borrow::Cow;

use crate::config::gate::GateConfig;
use crate::error::AppError;

/// Ordered from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouteClass {
    Public,
    AuthRequired,
    AdminRequired,
}

/// Route table compiled once at startup.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    public_routes: Vec<String>,
    auth_routes: Vec<String>,
    admin_prefix: String,
    excluded_prefixes: Vec<String>,
}

impl RouteClassifier {
    pub fn compile(config: &GateConfig) -> Result<Self, AppError> {
        let public_routes = normalize_all("GATE_PUBLIC_ROUTES", &config.public_routes)?;
        let auth_routes = normalize_all("GATE_AUTH_ROUTES", &config.auth_routes)?;
        let excluded_prefixes = normalize_all("GATE_EXCLUDED_PREFIXES", &config.excluded_prefixes)?;

        let admin_prefix = normalize_configured("GATE_ADMIN_PREFIX", &config.admin_prefix)?;
        if admin_prefix == "/" {
            return Err(AppError::config(
                "GATE_ADMIN_PREFIX must not be '/': every route would require admin",
            ));
        }

        Ok(Self {
            public_routes,
            auth_routes,
            admin_prefix,
            excluded_prefixes,
        })
    }

    /// Paths the gate never evaluates (API, static assets, favicon, ...).
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| segment_prefix_match(path, prefix))
    }

    /// Classify an already normalised path.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.public_routes.iter().any(|route| route == path) {
            return RouteClass::Public;
        }

        if self
            .auth_routes
            .iter()
            .any(|route| segment_prefix_match(path, route))
        {
            return RouteClass::Public;
        }

        // Plain string prefix: `/admin-tools` is admin too. Ambiguity falls
        // toward the stricter class.
        if path.starts_with(&self.admin_prefix) {
            return RouteClass::AdminRequired;
        }

        RouteClass::AuthRequired
    }
}

/// `prefix` matches `path` itself or any path below it, never a sibling
/// that merely shares leading characters (`/api` does not match `/apiary`).
fn segment_prefix_match(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn normalize_all(key: &str, routes: &[String]) -> Result<Vec<String>, AppError> {
    routes
        .iter()
        .map(|route| normalize_configured(key, route))
        .collect()
}

fn normalize_configured(key: &str, route: &str) -> Result<String, AppError> {
    if !route.starts_with('/') {
        return Err(AppError::config(format!(
            "{key}: route '{route}' must start with '/'"
        )));
    }
    Ok(normalize_path(route))
}

/// Canonical form of a request path for matching.
///
/// Percent-decodes, collapses repeated slashes, drops `.` segments, resolves
/// `..` (never above the root) and strips the trailing slash.
pub fn normalize_path(raw: &str) -> String {
    let decoded: Cow<'_, str> = match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(raw.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut normalized = String::with_capacity(decoded.len());
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RouteClassifier {
        RouteClassifier::compile(&GateConfig::default()).unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//feed//"), "/feed");
        assert_eq!(normalize_path("/feed/./posts/"), "/feed/posts");
        assert_eq!(normalize_path("/api/../admin/members"), "/admin/members");
        assert_eq!(normalize_path("/../../admin"), "/admin");
        assert_eq!(normalize_path("/%61dmin/members"), "/admin/members");
        assert_eq!(normalize_path("/api%2F..%2Fadmin"), "/admin");
        assert_eq!(normalize_path("/api\\..\\admin"), "/admin");
    }

    #[test]
    fn test_default_classification() {
        let c = classifier();
        assert_eq!(c.classify("/"), RouteClass::Public);
        assert_eq!(c.classify("/auth/signin"), RouteClass::Public);
        assert_eq!(c.classify("/auth/signup/step-2"), RouteClass::Public);
        assert_eq!(c.classify("/feed"), RouteClass::AuthRequired);
        assert_eq!(c.classify("/profile/42"), RouteClass::AuthRequired);
        assert_eq!(c.classify("/admin"), RouteClass::AdminRequired);
        assert_eq!(c.classify("/admin/members"), RouteClass::AdminRequired);
        assert_eq!(c.classify("/admin-tools"), RouteClass::AdminRequired);
    }

    #[test]
    fn test_public_routes_are_exact() {
        let c = RouteClassifier::compile(&GateConfig::default().with_public_routes(&["/", "/about"]))
            .unwrap();
        assert_eq!(c.classify("/about"), RouteClass::Public);
        assert_eq!(c.classify("/about/team"), RouteClass::AuthRequired);
    }

    #[test]
    fn test_auth_routes_match_on_segment_boundary() {
        let c = classifier();
        assert_eq!(c.classify("/auth/signinx"), RouteClass::AuthRequired);
        assert_eq!(c.classify("/auth"), RouteClass::AuthRequired);
    }

    #[test]
    fn test_public_beats_admin_prefix() {
        let c = RouteClassifier::compile(
            &GateConfig::default().with_public_routes(&["/", "/admin/status"]),
        )
        .unwrap();
        assert_eq!(c.classify("/admin/status"), RouteClass::Public);
        assert_eq!(c.classify("/admin/members"), RouteClass::AdminRequired);
    }

    #[test]
    fn test_auth_route_beats_admin_prefix() {
        let c = RouteClassifier::compile(
            &GateConfig::default().with_auth_routes(&["/admin/signin"]),
        )
        .unwrap();
        assert_eq!(c.classify("/admin/signin"), RouteClass::Public);
    }

    #[test]
    fn test_route_class_order() {
        assert!(RouteClass::Public < RouteClass::AuthRequired);
        assert!(RouteClass::AuthRequired < RouteClass::AdminRequired);
    }

    #[test]
    fn test_exclusions() {
        let c = classifier();
        assert!(c.is_excluded("/api"));
        assert!(c.is_excluded("/api/session"));
        assert!(c.is_excluded("/_next/static/chunks/main.js"));
        assert!(c.is_excluded("/_next/image"));
        assert!(c.is_excluded("/favicon.ico"));
        assert!(c.is_excluded("/public/logo.svg"));
        assert!(!c.is_excluded("/apiary"));
        assert!(!c.is_excluded("/_next/data/build/feed.json"));
        assert!(!c.is_excluded("/"));
    }

    #[test]
    fn test_compile_rejects_bad_config() {
        assert!(RouteClassifier::compile(&GateConfig::default().with_admin_prefix("/")).is_err());
        assert!(RouteClassifier::compile(&GateConfig::default().with_admin_prefix("admin")).is_err());
        assert!(
            RouteClassifier::compile(&GateConfig::default().with_public_routes(&["feed"])).is_err()
        );
    }

    #[test]
    fn test_configured_routes_are_normalized() {
        let c = RouteClassifier::compile(
            &GateConfig::default()
                .with_public_routes(&["/landing/"])
                .with_admin_prefix("/staff//"),
        )
        .unwrap();
        assert_eq!(c.classify("/landing"), RouteClass::Public);
        assert_eq!(c.classify("/staff/reports"), RouteClass::AdminRequired);
    }
}
