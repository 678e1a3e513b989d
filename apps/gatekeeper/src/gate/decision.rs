//! The access decision table and the redirect targets it produces.

use crate::auth::claims::Identity;
use crate::gate::routes::RouteClass;

pub const UNAUTHORIZED_FLAG: &str = "unauthorized=true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No usable session: send the user to sign in.
    SignIn,
    /// Signed in but not an administrator.
    Unauthorized,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::SignIn => "signin",
            Decision::Unauthorized => "unauthorized",
        }
    }
}

/// Pure function of route class and identity.
pub fn decide(class: RouteClass, identity: Option<&Identity>) -> Decision {
    match (class, identity) {
        (RouteClass::Public, _) => Decision::Allow,
        (RouteClass::AuthRequired, None) => Decision::SignIn,
        (RouteClass::AuthRequired, Some(_)) => Decision::Allow,
        (RouteClass::AdminRequired, None) => Decision::SignIn,
        (RouteClass::AdminRequired, Some(identity)) if identity.has_admin_privilege() => {
            Decision::Allow
        }
        (RouteClass::AdminRequired, Some(_)) => Decision::Unauthorized,
    }
}

/// Where denied requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTargets {
    signin_path: String,
    unauthorized_path: String,
}

impl RedirectTargets {
    pub fn new(signin_path: impl Into<String>, unauthorized_path: impl Into<String>) -> Self {
        Self {
            signin_path: signin_path.into(),
            unauthorized_path: unauthorized_path.into(),
        }
    }

    pub fn signin_path(&self) -> &str {
        &self.signin_path
    }

    /// Sign-in location carrying the original URL as `callbackUrl`.
    pub fn signin_location(&self, original_url: &str) -> String {
        format!(
            "{}{}callbackUrl={}",
            self.signin_path,
            query_joiner(&self.signin_path),
            urlencoding::encode(original_url)
        )
    }

    pub fn unauthorized_location(&self) -> String {
        format!(
            "{}{}{}",
            self.unauthorized_path,
            query_joiner(&self.unauthorized_path),
            UNAUTHORIZED_FLAG
        )
    }

    /// Redirect location for a deny decision; `None` for `Allow`.
    pub fn location_for(&self, decision: Decision, original_url: &str) -> Option<String> {
        match decision {
            Decision::Allow => None,
            Decision::SignIn => Some(self.signin_location(original_url)),
            Decision::Unauthorized => Some(self.unauthorized_location()),
        }
    }
}

fn query_joiner(path: &str) -> char {
    if path.contains('?') {
        '&'
    } else {
        '?'
    }
}
