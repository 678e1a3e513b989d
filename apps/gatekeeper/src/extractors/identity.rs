use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::Identity;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Identity the access gate stored for this request.
///
/// Only meaningful on gated routes; elsewhere it rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl FromRequest for CurrentIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = req
            .extensions()
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(AppError::unauthorized);
        ready(identity)
    }
}

/// Identity for routes outside the gate (API paths).
///
/// Uses the gate's identity when present, otherwise resolves the session
/// itself. Invalid tokens count as anonymous; this extractor never fails
/// except when application state is missing.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(identity) = req.extensions().get::<Identity>().cloned() {
            return ready(Ok(OptionalIdentity(Some(identity))));
        }

        let result = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| AppError::internal("AppState not available"))
            .map(|state| OptionalIdentity(state.resolver.resolve_or_anonymous(req)));
        ready(result)
    }
}
