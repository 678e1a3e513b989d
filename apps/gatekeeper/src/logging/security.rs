use tracing::{debug, info, warn};

use crate::middleware::request_trace;

/// Log a presented session token that failed verification.
///
/// Debug level: an expired cookie is routine and must not flood the logs.
pub fn token_rejected(reason: &str) {
    let trace_id = request_trace::trace_id();

    debug!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        "Session token rejected"
    );
}

/// Log an anonymous request sent to sign in.
pub fn signin_required(path: &str) {
    let trace_id = request_trace::trace_id();

    info!(
        event = "SECURITY_SIGNIN_REQUIRED",
        %trace_id,
        path,
        "Access gate redirected anonymous request to sign-in"
    );
}

/// Log an authenticated request that lacked administrator privilege.
pub fn admin_denied(path: &str, sub: &str) {
    let trace_id = request_trace::trace_id();

    warn!(
        event = "SECURITY_ADMIN_DENIED",
        %trace_id,
        path,
        sub,
        "Access gate denied non-admin request"
    );
}
