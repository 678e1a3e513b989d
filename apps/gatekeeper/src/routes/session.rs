//! Session introspection for API clients.
//!
//! `/api` is outside the gate, so this handler resolves the session itself.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::OptionalIdentity;

async fn current_session(identity: OptionalIdentity) -> Result<HttpResponse, AppError> {
    match identity.0 {
        Some(identity) => Ok(HttpResponse::Ok().json(identity)),
        None => Err(AppError::unauthorized()),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/session", web::get().to(current_session));
}
