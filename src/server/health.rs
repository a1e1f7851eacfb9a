//! Monitoring endpoints: /__health, /__gtg, /__build-info

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::server::handlers::json_response;
use crate::server::AppState;

pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub schema_version: u32,
    pub system_code: String,
    pub name: String,
    pub description: String,
    pub checks: Vec<CheckResult>,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Graph connectivity, bounded by `HEALTH_CHECK_TIMEOUT`
async fn connectivity(state: &AppState) -> Result<(), String> {
    match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, state.reader.check_connectivity()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "connectivity check timed out after {}s",
            HEALTH_CHECK_TIMEOUT.as_secs()
        )),
    }
}

/// GET /__health
pub async fn health(State(state): State<AppState>) -> Response {
    let outcome = connectivity(&state).await;
    let check_output = match &outcome {
        Ok(()) => "Connectivity to the graph store is ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Graph store connectivity check failed");
            format!("Error connecting to the graph store: {e}")
        }
    };

    let check = CheckResult {
        id: "check-connectivity-to-graph-store".to_string(),
        name: "Check connectivity to the graph store".to_string(),
        ok: outcome.is_ok(),
        severity: 1,
        business_impact: "Unable to respond to Public Concordances API requests".to_string(),
        technical_summary:
            "Cannot reach a graph store with at least one concordance loaded in it".to_string(),
        panic_guide: "https://runbooks.ftops.tech/public-concordances-api".to_string(),
        check_output,
        last_updated: chrono::Utc::now(),
    };

    let result = HealthResult {
        schema_version: 1,
        system_code: state.system_code.clone(),
        name: state.system_code.clone(),
        description: "Concords concept identifiers".to_string(),
        ok: check.ok,
        checks: vec![check],
    };

    json_response(StatusCode::OK, &result)
}

/// GET /__gtg
pub async fn good_to_go(State(state): State<AppState>) -> Response {
    let no_cache = [(header::CACHE_CONTROL, "no-cache")];
    match connectivity(&state).await {
        Ok(()) => (StatusCode::OK, no_cache, "OK").into_response(),
        Err(message) => (StatusCode::SERVICE_UNAVAILABLE, no_cache, message).into_response(),
    }
}

/// GET /__build-info and /build-info
pub async fn build_info() -> Response {
    json_response(
        StatusCode::OK,
        &BuildInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}
