#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-exports for public API
pub use auth::claims::{Identity, Role};
pub use auth::jwt::{mint_session_token, verify_session_token, SessionSubject, TokenError};
pub use auth::session::SessionResolver;
pub use config::gate::GateConfig;
pub use error::AppError;
pub use extractors::{CurrentIdentity, OptionalIdentity};
pub use gate::{AccessPolicy, Decision, GateOutcome, RouteClass};
pub use infra::state::build_state;
pub use middleware::access_gate::AccessGate;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gatekeeper_test_support::logging::init();
}
