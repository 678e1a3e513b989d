//! Page endpoints behind the gate.
//!
//! Rendering belongs to the front end; these handlers only describe which
//! page was reached and for whom, which is what the gate's callers and tests
//! need to observe.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::claims::{Identity, Role};
use crate::error::AppError;
use crate::extractors::{CurrentIdentity, OptionalIdentity};

pub const ACCESS_DENIED_NOTICE: &str =
    "You do not have permission to view that page. Administrator access is required.";

#[derive(Debug, Serialize)]
struct Viewer {
    sub: String,
    role: Role,
    is_admin: bool,
}

impl From<&Identity> for Viewer {
    fn from(identity: &Identity) -> Self {
        Self {
            sub: identity.sub.clone(),
            role: identity.role,
            is_admin: identity.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
struct PageResponse {
    page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    viewer: Option<Viewer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'static str>,
    #[serde(rename = "callbackUrl", skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
}

impl PageResponse {
    fn new(page: impl Into<String>, viewer: Option<&Identity>) -> Self {
        Self {
            page: page.into(),
            viewer: viewer.map(Viewer::from),
            notice: None,
            callback_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HomeQuery {
    unauthorized: Option<String>,
}

async fn home(
    identity: OptionalIdentity,
    query: web::Query<HomeQuery>,
) -> Result<HttpResponse, AppError> {
    let mut page = PageResponse::new("home", identity.0.as_ref());
    if query.unauthorized.as_deref() == Some("true") {
        page.notice = Some(ACCESS_DENIED_NOTICE);
    }
    Ok(HttpResponse::Ok().json(page))
}

#[derive(Debug, Deserialize)]
struct SignInQuery {
    #[serde(rename = "callbackUrl")]
    callback_url: Option<String>,
}

async fn sign_in(query: web::Query<SignInQuery>) -> Result<HttpResponse, AppError> {
    let mut page = PageResponse::new("signin", None);
    page.callback_url = query.into_inner().callback_url;
    Ok(HttpResponse::Ok().json(page))
}

async fn sign_up() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(PageResponse::new("signup", None)))
}

async fn member_page(
    identity: CurrentIdentity,
    page: web::Data<&'static str>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(PageResponse::new(*page.get_ref(), Some(&identity.0))))
}

async fn profile(
    identity: CurrentIdentity,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let profile_id = path.into_inner();
    Ok(HttpResponse::Ok().json(PageResponse::new(
        format!("profile:{profile_id}"),
        Some(&identity.0),
    )))
}

/// Admin pages.
///
/// The gate attaches an identity only on admin-gated paths. Without one the
/// path was configured public and renders anonymously.
async fn admin(
    identity: Option<CurrentIdentity>,
    tail: Option<web::Path<String>>,
) -> Result<HttpResponse, AppError> {
    let identity = identity.map(|CurrentIdentity(identity)| identity);
    if identity
        .as_ref()
        .is_some_and(|identity| !identity.has_admin_privilege())
    {
        return Err(AppError::forbidden());
    }

    let section = tail
        .map(|t| t.into_inner())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "dashboard".to_string());
    Ok(HttpResponse::Ok().json(PageResponse::new(
        format!("admin:{section}"),
        identity.as_ref(),
    )))
}

fn member_resource(path: &'static str, page: &'static str) -> actix_web::Resource {
    web::resource(path)
        .app_data(web::Data::new(page))
        .route(web::get().to(member_page))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/auth/signin", web::get().to(sign_in))
        .route("/auth/signup", web::get().to(sign_up))
        .service(member_resource("/feed", "feed"))
        .service(member_resource("/groups", "groups"))
        .service(member_resource("/events", "events"))
        .service(member_resource("/messages", "messages"))
        .route("/profile/{id}", web::get().to(profile))
        .route("/admin", web::get().to(admin))
        .route("/admin/{tail:.*}", web::get().to(admin));
}
