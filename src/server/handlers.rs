//! GET /concordances and GET /__api

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::Instrument;

use crate::model::{Concordances, THING_URI_PREFIX};
use crate::server::AppState;
use crate::service;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MULTIPLE_AUTHORITIES: &str = "multiple authorities are not permitted";
const CONCEPT_AND_AUTHORITY: &str =
    "if conceptId is present then authority is not a valid parameter";
const AUTHORITY_MANDATORY: &str = "if conceptId is absent then authority is mandatory";
const DATASTORE_ERROR: &str = "error accessing Concordance datastore";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Query parameters, repeated keys kept in order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConcordanceParams {
    pub concept_ids: Option<Vec<String>>,
    pub authorities: Option<Vec<String>>,
    pub identifier_values: Vec<String>,
}

impl ConcordanceParams {
    pub fn parse(raw: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "conceptId" => params.concept_ids.get_or_insert_with(Vec::new).push(value),
                "authority" => params.authorities.get_or_insert_with(Vec::new).push(value),
                "identifierValue" => params.identifier_values.push(value),
                _ => {}
            }
        }
        params
    }

    /// Validate parameter combinations and pick the lookup to run
    pub fn into_lookup(self) -> Result<Lookup, &'static str> {
        match (self.concept_ids, self.authorities) {
            (Some(_), Some(_)) => Err(CONCEPT_AND_AUTHORITY),
            (None, None) => Err(AUTHORITY_MANDATORY),
            (None, Some(authorities)) if authorities.len() > 1 => Err(MULTIPLE_AUTHORITIES),
            (None, Some(mut authorities)) => Ok(Lookup::ByAuthority {
                authority: authorities.remove(0),
                values: self.identifier_values,
            }),
            (Some(ids), None) => Ok(Lookup::ByConceptId(
                ids.into_iter()
                    .map(|id| id.strip_prefix(THING_URI_PREFIX).map(str::to_string).unwrap_or(id))
                    .collect(),
            )),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    ByConceptId(Vec<String>),
    ByAuthority { authority: String, values: Vec<String> },
}

impl Lookup {
    async fn run(self, state: &AppState) -> service::Result<Option<Concordances>> {
        match self {
            Self::ByConceptId(ids) => state.reader.read_by_concept_id(&ids).await,
            Self::ByAuthority { authority, values } => {
                state.reader.read_by_authority(&authority, &values).await
            }
        }
    }
}

/// GET /concordances
pub async fn get_concordances(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let transaction_id = transaction_id(&headers);
    let span = tracing::info_span!("concordances", transaction_id = %transaction_id);

    let mut response = async {
        let raw = query.unwrap_or_default();
        tracing::debug!(query = %raw, "Concordance request");

        let lookup = match ConcordanceParams::parse(&raw).into_lookup() {
            Ok(lookup) => lookup,
            Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
        };

        match lookup.run(&state).await {
            Ok(found) => {
                let body = found.unwrap_or_default();
                let mut response = json_response(StatusCode::OK, &body);
                if let Ok(value) = HeaderValue::from_str(&state.cache_control) {
                    response.headers_mut().insert(header::CACHE_CONTROL, value);
                }
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Error looking up concordances");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, DATASTORE_ERROR)
            }
        }
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&transaction_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// GET /__api
pub async fn api_description(State(state): State<AppState>) -> Response {
    match &state.api_spec {
        Some(spec) => (
            [(header::CONTENT_TYPE, "application/yaml")],
            spec.as_str().to_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Incoming request id, or a fresh `tid_` one
pub fn transaction_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("tid_{}", uuid::Uuid::new_v4().simple()))
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    json_response(
        status,
        &ErrorResponse {
            message: message.to_string(),
        },
    )
}
