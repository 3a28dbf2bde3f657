pub mod admin;
pub mod ai;
pub mod auth;
pub mod live;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use models::{upload::MAX_UPLOAD_BYTES, ContentKind};
use service::{ActionResult, Outcome};

use crate::metrics::{encode_metrics, record_mutation};
use crate::openapi::ApiDoc;
use auth::ServerState;

/// Multipart overhead on top of the largest accepted image.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

/// Count the action and pick the HTTP status for its outcome.
pub fn action_response(kind: ContentKind, result: ActionResult) -> (StatusCode, Json<ActionResult>) {
    record_mutation(kind.collection(), result.outcome.as_str());
    let status = match result.outcome {
        Outcome::Ok | Outcome::Partial => StatusCode::OK,
        Outcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Conflict => StatusCode::CONFLICT,
        Outcome::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        Outcome::Denied => StatusCode::FORBIDDEN,
        Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result))
}

/// Where uploaded assets are served from: URL prefix and directory.
pub struct UploadMount<'a> {
    pub public_url: &'a str,
    pub dir: &'a str,
}

/// Build the full application router: public pages, public forms, AI,
/// admin login, and the token-protected admin API. Uploads are mounted only
/// when their public URL is a site path.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str, uploads: UploadMount<'_>) -> Router {
    let static_dir =
        ServeDir::new(frontend_dir).fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/pages/home", get(pages::home))
        .route("/api/services", get(pages::services))
        .route("/api/projects", get(pages::projects))
        .route("/api/projects/:id", get(pages::project))
        .route("/api/blog", get(pages::articles))
        .route("/api/blog/:id", get(pages::article))
        .route("/api/gallery", get(pages::gallery))
        .route("/api/events", get(pages::events))
        .route("/api/events/:id", get(pages::event))
        .route("/api/careers", get(pages::careers))
        .route("/api/careers/:id", get(pages::career))
        .route("/api/feedback", get(pages::feedback).post(pages::submit_feedback))
        .route("/api/contact", post(pages::contact))
        .route("/api/ai/suggest", post(ai::suggest))
        .route("/api/ai/chat", post(ai::chat))
        .route("/admin/login", post(auth::login))
        .route("/admin/logout", post(auth::logout));

    let admin = Router::new()
        .route("/admin/api/:collection", get(admin::list).post(admin::create))
        .route(
            "/admin/api/:collection/:id",
            get(admin::get).put(admin::update).delete(admin::delete),
        )
        .route("/admin/api/:collection/:id/featured", patch(admin::set_featured))
        .route("/admin/api/:collection/:id/status", patch(admin::set_status))
        .route("/admin/live/:collection", get(live::stream))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    let mut app = public
        .merge(admin)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    if uploads.public_url.len() > 1 && uploads.public_url.starts_with('/') {
        app = app.nest_service(uploads.public_url, ServeDir::new(uploads.dir));
    }

    app.fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
