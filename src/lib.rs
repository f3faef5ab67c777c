pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

pub use routes::{build_router, RouterOptions};

#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<services::ReportService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn repositories::UserStatsRepository>) -> Self {
        Self {
            report_service: Arc::new(services::ReportService::new(repository)),
        }
    }
}
