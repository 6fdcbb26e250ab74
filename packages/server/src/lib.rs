pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exam Papers API",
        version = "1.0.0",
        description = "Browse, upload and download past exam papers"
    ),
    paths(
        handlers::browse::list_years,
        handlers::browse::list_semesters,
        handlers::browse::list_subjects,
        handlers::papers::list_papers,
        handlers::papers::get_paper,
        handlers::papers::upload_papers,
        handlers::papers::delete_paper,
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::session,
        handlers::admin::reconcile,
        handlers::files::serve_file,
    ),
    components(schemas(
        common::PaperRecord,
        common::ExamType,
        common::catalog::UploadReport,
        common::catalog::DeleteReport,
        common::catalog::ReconcileReport,
        error::ErrorBody,
        models::paper::PaperListResponse,
        models::paper::YearSummary,
        models::paper::YearListResponse,
        models::paper::SubjectListResponse,
        models::auth::LoginRequest,
        models::auth::LoginResponse,
        models::auth::SessionResponse,
    )),
    tags(
        (name = "Browse", description = "Program years, semesters and subjects"),
        (name = "Papers", description = "Paper records, upload and delete"),
        (name = "Admin", description = "Shared-password admin session"),
        (name = "Files", description = "Stored paper downloads"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = cors
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .max_age(Duration::from_secs(cors.max_age)),
    )
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    let router = axum::Router::new()
        .nest("/api", routes::api_routes(&state.config))
        .route("/files/{*path}", get(handlers::files::serve_file))
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()));

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}
