use crate::auth::session::SessionResolver;
use crate::gate::AccessPolicy;

/// Immutable state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Verifies session tokens with the configured secret
    pub resolver: SessionResolver,
    /// Compiled route table and redirect targets
    pub policy: AccessPolicy,
}

impl AppState {
    pub fn new(resolver: SessionResolver, policy: AccessPolicy) -> Self {
        Self { resolver, policy }
    }
}
