//! Access gate middleware
//!
//! Runs the compiled [`AccessPolicy`] against every request before any
//! handler executes. Allowed requests continue unmodified, with the resolved
//! [`Identity`] stored in request extensions. Denied requests get a bare
//! `307 Temporary Redirect` to sign-in or to the unauthorized page.

use std::future::{ready, Ready};

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::gate::{Decision, GateOutcome};
use crate::logging::security;
use crate::state::app_state::AppState;

/// Response header naming the deny reason (`signin` or `unauthorized`).
pub const GATE_OUTCOME_HEADER: &str = "x-gate-outcome";

pub struct AccessGate;

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware { service }))
    }
}

pub struct AccessGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Without state there is no policy to apply: fail closed.
        let app_state = match req.app_data::<web::Data<AppState>>().cloned() {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(actix_web::error::ErrorInternalServerError(
                        "AppState not available",
                    ))
                });
            }
        };

        let original_url = original_url(&req, app_state.policy.public_origin());
        let outcome = app_state
            .policy
            .evaluate(req.path(), &original_url, || {
                app_state.resolver.resolve_or_anonymous(req.request())
            });

        match outcome {
            GateOutcome {
                decision: Decision::Allow,
                identity,
                ..
            } => {
                if let Some(identity) = identity {
                    req.extensions_mut().insert(identity);
                }
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            GateOutcome {
                decision,
                location,
                identity,
                ..
            } => {
                match (&decision, &identity) {
                    (Decision::Unauthorized, Some(identity)) => {
                        security::admin_denied(req.path(), &identity.sub);
                    }
                    _ => security::signin_required(req.path()),
                }

                let location = location
                    .unwrap_or_else(|| app_state.policy.targets().signin_path().to_string());
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((header::LOCATION, location))
                    .insert_header((GATE_OUTCOME_HEADER, decision.as_str()))
                    .finish();

                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

/// Absolute URL of the incoming request, used as the sign-in `callbackUrl`.
///
/// Without a configured origin the scheme and host come from the connection
/// info, which honours `Forwarded` / `X-Forwarded-*` headers.
fn original_url(req: &ServiceRequest, public_origin: Option<&str>) -> String {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    match public_origin {
        Some(origin) => format!("{origin}{path_and_query}"),
        None => {
            let conn = req.connection_info();
            format!("{}://{}{}", conn.scheme(), conn.host(), path_and_query)
        }
    }
}
