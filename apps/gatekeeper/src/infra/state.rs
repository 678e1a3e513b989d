use crate::auth::session::SessionResolver;
use crate::config::gate::GateConfig;
use crate::error::AppError;
use crate::gate::AccessPolicy;
use crate::state::app_state::AppState;
use crate::state::security_config::{SecurityConfig, JWT_SECRET_ENV};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    gate_config: GateConfig,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            gate_config: GateConfig::default(),
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_gate(mut self, gate_config: GateConfig) -> Self {
        self.gate_config = gate_config;
        self
    }

    /// Compile the route table and wire the resolver.
    ///
    /// A builder without a secret is a startup error, never a gate that
    /// rejects every token.
    pub fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .ok_or(AppError::configuration_missing(JWT_SECRET_ENV))?;

        let policy = AccessPolicy::compile(&self.gate_config)?;
        let resolver =
            SessionResolver::new(security).with_cookie_names(self.gate_config.session_cookies);

        Ok(AppState::new(resolver, policy))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
