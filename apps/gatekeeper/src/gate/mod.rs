//! The request access gate: exclusion, classification, decision.

pub mod decision;
pub mod routes;

use crate::auth::claims::Identity;
use crate::config::gate::GateConfig;
use crate::error::AppError;

pub use decision::{decide, Decision, RedirectTargets};
pub use routes::{normalize_path, RouteClass, RouteClassifier};

/// Result of running one request through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    /// `None` when the path is excluded from the gate entirely.
    pub class: Option<RouteClass>,
    pub decision: Decision,
    /// Redirect target for deny decisions.
    pub location: Option<String>,
    /// The resolved identity, if the session was consulted and valid.
    pub identity: Option<Identity>,
}

impl GateOutcome {
    pub fn is_allowed(&self) -> bool {
        self.decision == Decision::Allow
    }
}

/// Compiled gate policy shared by every request.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    classifier: RouteClassifier,
    targets: RedirectTargets,
    public_origin: Option<String>,
}

impl AccessPolicy {
    pub fn compile(config: &GateConfig) -> Result<Self, AppError> {
        let classifier = RouteClassifier::compile(config)?;

        for (key, path) in [
            ("GATE_SIGNIN_PATH", &config.signin_path),
            ("GATE_UNAUTHORIZED_PATH", &config.unauthorized_path),
        ] {
            if !path.starts_with('/') || path.starts_with("//") {
                return Err(AppError::config(format!(
                    "{key}: '{path}' must be a local path starting with '/'"
                )));
            }
        }

        // The sign-in page must itself be reachable without a session,
        // otherwise every anonymous request loops.
        let signin = normalize_path(&config.signin_path);
        if !classifier.is_excluded(&signin) && classifier.classify(&signin) != RouteClass::Public {
            return Err(AppError::config(format!(
                "GATE_SIGNIN_PATH '{}' is not a public route",
                config.signin_path
            )));
        }

        // Non-admins are sent here; an admin-only page would bounce them forever.
        let unauthorized = config
            .unauthorized_path
            .split('?')
            .next()
            .unwrap_or_default();
        let unauthorized = normalize_path(unauthorized);
        if !classifier.is_excluded(&unauthorized)
            && classifier.classify(&unauthorized) == RouteClass::AdminRequired
        {
            return Err(AppError::config(format!(
                "GATE_UNAUTHORIZED_PATH '{}' is under the admin prefix",
                config.unauthorized_path
            )));
        }

        let public_origin = match &config.public_origin {
            Some(origin) => Some(validate_origin(origin)?),
            None => None,
        };

        Ok(Self {
            classifier,
            targets: RedirectTargets::new(&config.signin_path, &config.unauthorized_path),
            public_origin,
        })
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn targets(&self) -> &RedirectTargets {
        &self.targets
    }

    /// Configured `scheme://host` for callback URLs, without trailing slash.
    pub fn public_origin(&self) -> Option<&str> {
        self.public_origin.as_deref()
    }

    /// Evaluate a request.
    ///
    /// The router matches the path as sent while the classifier also sees
    /// its normalised form; both are classified and the stricter class
    /// wins. A path is excluded only when both forms are excluded.
    ///
    /// `resolve` is only invoked for routes that need an identity, so public
    /// and excluded paths never pay for token verification.
    pub fn evaluate<F>(&self, raw_path: &str, original_url: &str, resolve: F) -> GateOutcome
    where
        F: FnOnce() -> Option<Identity>,
    {
        let path = normalize_path(raw_path);

        if self.classifier.is_excluded(raw_path) && self.classifier.is_excluded(&path) {
            return GateOutcome {
                class: None,
                decision: Decision::Allow,
                location: None,
                identity: None,
            };
        }

        let class = self
            .classifier
            .classify(raw_path)
            .max(self.classifier.classify(&path));
        let identity = match class {
            RouteClass::Public => None,
            RouteClass::AuthRequired | RouteClass::AdminRequired => resolve(),
        };

        let decision = decide(class, identity.as_ref());
        GateOutcome {
            class: Some(class),
            decision,
            location: self.targets.location_for(decision, original_url),
            identity,
        }
    }
}

fn validate_origin(origin: &str) -> Result<String, AppError> {
    let origin = origin.trim_end_matches('/');
    let host = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .unwrap_or_default();
    if host.is_empty() || host.contains(['/', '?', '#']) {
        return Err(AppError::config(format!(
            "GATE_PUBLIC_ORIGIN '{origin}' must look like https://host[:port]"
        )));
    }
    Ok(origin.to_string())
}
