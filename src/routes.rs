use crate::{
    config::{app::DEFAULT_MAX_UPLOAD_BYTES, AppConfig},
    handlers,
    middleware::add_security_headers,
    AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Transport settings applied around the routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    pub max_upload_bytes: usize,
    /// Send `Strict-Transport-Security` on every response.
    pub hsts: bool,
}

impl RouterOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            hsts: config.production,
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            hsts: false,
        }
    }
}

/// Build the full route table.
///
/// Known paths answer other methods with 405. Upload bodies larger than
/// `options.max_upload_bytes` are rejected before parsing.
pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let report_routes = Router::new()
        .route("/report", get(handlers::report_page))
        .route("/report/csv", get(handlers::download_csv))
        .route("/report/excel", get(handlers::download_excel));

    let upload_routes = Router::new()
        .route("/upload/csv", post(handlers::upload_csv))
        .route("/upload/excel", post(handlers::upload_excel))
        .layer(DefaultBodyLimit::max(options.max_upload_bytes));

    Router::new()
        .route("/", get(|| async { Redirect::to("/report") }))
        .route("/health", get(handlers::health_handler))
        .merge(report_routes)
        .merge(upload_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    options.hsts,
                    add_security_headers,
                )),
        )
        .with_state(state)
}
