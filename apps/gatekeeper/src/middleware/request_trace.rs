//! Per-request trace id.
//!
//! `RequestTrace` assigns a UUID to every request, stores it in request
//! extensions as [`TraceId`], makes it available task-locally through
//! [`trace_id`], wraps the downstream future in a `request` span and echoes
//! the id back in `x-trace-id`.
//!
//! Wire it outermost among the gate's middleware so the gate's own log lines
//! carry the id:
//!
//! ```text
//! App::new()
//!     .wrap(AccessGate)
//!     .wrap(StructuredLogger)
//!     .wrap(RequestTrace)
//! ```

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tokio::task_local;
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub const TRACE_HEADER: &str = "x-trace-id";

task_local! {
    static TRACE_ID: String;
}

/// Trace id stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// Trace id of the request being handled on this task, or `"unknown"`
/// outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` as the task-local trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}

#[derive(Clone, Default)]
pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(TraceId(trace_id.clone()));

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );

        // Calling the inner service inside the scope makes the id visible to
        // middleware that does its work synchronously in `call`.
        let fut = TRACE_ID.sync_scope(trace_id.clone(), || self.service.call(req));

        Box::pin(with_trace_id(trace_id.clone(), async move {
            let mut res = fut.instrument(span).await?;

            if let Ok(value) = HeaderValue::from_str(&trace_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(TRACE_HEADER), value);
            }

            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpResponse};

    use super::*;

    #[tokio::test]
    async fn test_trace_id_outside_context() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn test_nested_trace_contexts() {
        let result = with_trace_id("outer".to_string(), async {
            assert_eq!(trace_id(), "outer");
            let inner = with_trace_id("inner".to_string(), async { trace_id() }).await;
            assert_eq!(trace_id(), "outer");
            inner
        })
        .await;

        assert_eq!(result, "inner");
        assert_eq!(trace_id(), "unknown");
    }

    #[actix_web::test]
    async fn test_header_matches_handler_trace_id() {
        let app = test::init_service(App::new().wrap(RequestTrace).route(
            "/echo",
            web::get().to(|| async { HttpResponse::Ok().body(trace_id()) }),
        ))
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/echo").to_request()).await;
        let header = resp
            .headers()
            .get(TRACE_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = test::read_body(resp).await;

        assert_eq!(body, header.as_bytes());
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
