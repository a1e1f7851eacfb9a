//! Router construction for the concordance service.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::server::{handlers, health};
use crate::service::ConcordanceReader;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<dyn ConcordanceReader>,
    /// `Cache-Control` value for successful lookups
    pub cache_control: String,
    pub system_code: String,
    /// API description served at `/__api`
    pub api_spec: Option<Arc<String>>,
}

impl AppState {
    pub fn new(
        reader: Arc<dyn ConcordanceReader>,
        cache_control: impl Into<String>,
        system_code: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            cache_control: cache_control.into(),
            system_code: system_code.into(),
            api_spec: None,
        }
    }

    pub fn with_api_spec(mut self, spec: String) -> Self {
        self.api_spec = Some(Arc::new(spec));
        self
    }
}

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let services = Router::new()
        .route("/concordances", get(handlers::get_concordances))
        .route("/__api", get(handlers::api_description));

    let monitoring = Router::new()
        .route("/__health", get(health::health))
        .route("/__gtg", get(health::good_to_go))
        .route("/__build-info", get(health::build_info))
        .route("/build-info", get(health::build_info));

    services
        .merge(monitoring)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
