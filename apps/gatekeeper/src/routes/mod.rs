use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppError;

pub mod health;
pub mod pages;
pub mod session;

/// Register every route.
///
/// `main.rs` wraps the whole app in the gate; `/api/**` is excluded from it
/// by configuration, not by scope, so tests can mount this unchanged.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // API routes: /api/health, /api/session
    cfg.service(
        web::scope("/api")
            .configure(health::configure_routes)
            .configure(session::configure_routes),
    );

    // Pages: /, /auth/**, /feed, /admin/**, ...
    pages::configure_routes(cfg);

    cfg.default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(
        "ROUTE_NOT_FOUND",
        format!("No page at {}", req.path()),
    ))
}
