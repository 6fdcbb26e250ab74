use axum::{
    Router,
    routing::{get, post},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/years", browse_routes())
        .nest("/papers", paper_routes(config))
        .nest("/admin", admin_routes())
}

fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::browse::list_years))
        .route("/{year}/semesters", get(handlers::browse::list_semesters))
        .route(
            "/{year}/semesters/{semester}/subjects",
            get(handlers::browse::list_subjects),
        )
}

fn paper_routes(config: &AppConfig) -> Router<AppState> {
    let upload = post(handlers::papers::upload_papers).layer(
        handlers::papers::upload_body_limit(config.storage.max_request_bytes),
    );

    Router::new()
        .route("/", get(handlers::papers::list_papers).merge(upload))
        .route(
            "/{id}",
            get(handlers::papers::get_paper).delete(handlers::papers::delete_paper),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::admin::login))
        .route("/logout", post(handlers::admin::logout))
        .route("/session", get(handlers::admin::session))
        .route("/reconcile", get(handlers::admin::reconcile))
}
