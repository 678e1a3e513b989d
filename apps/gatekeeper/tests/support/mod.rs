#![allow(dead_code)]

pub mod app_builder;
pub mod auth;

use gatekeeper::config::GateConfig;
use gatekeeper::infra::state::build_state;
use gatekeeper::state::security_config::SecurityConfig;
use gatekeeper::AppState;

/// State with the fixed test secret and default routes.
pub fn test_state() -> Result<AppState, gatekeeper::AppError> {
    test_state_with(GateConfig::default())
}

pub fn test_state_with(gate: GateConfig) -> Result<AppState, gatekeeper::AppError> {
    build_state()
        .with_security(SecurityConfig::for_tests())
        .with_gate(gate)
        .build()
}
