use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lemmapack_db::Dictionary;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone)]
pub struct AppState {
    pub dict: Arc<Dictionary>,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct InflectionsQuery {
    pub lemma: String,
}

#[derive(Deserialize)]
pub struct LemmasQuery {
    pub form: String,
}

#[derive(Serialize)]
pub struct ParadigmResponse {
    stem: String,
    pattern_id: u32,
    forms: Vec<String>,
}

#[derive(Serialize)]
pub struct InflectionsResponse {
    lemma: String,
    paradigms: Vec<ParadigmResponse>,
}

#[derive(Serialize)]
pub struct LemmasResponse {
    form: String,
    lemmas: Vec<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    entries: usize,
    patterns: usize,
    lemmas: usize,
    forms: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/stats", get(stats))
        .route("/v1/inflections", get(inflections))
        .route("/v1/lemmas", get(lemmas))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn stats(State(state): State<AppState>) -> Response {
    let dict = &state.dict;
    Json(StatsResponse {
        entries: dict.entry_count(),
        patterns: dict.pattern_count(),
        lemmas: dict.lemma_count(),
        forms: dict.form_count(),
    })
    .into_response()
}

async fn inflections(
    State(state): State<AppState>,
    Query(params): Query<InflectionsQuery>,
) -> Result<Response, ApiError> {
    let lemma = params.lemma.trim();
    if lemma.is_empty() {
        return Err(ApiError::bad_request("lemma is required"));
    }

    let paradigms: Vec<ParadigmResponse> = state
        .dict
        .inflections(lemma)
        .into_iter()
        .map(|paradigm| ParadigmResponse {
            stem: paradigm.stem.to_string(),
            pattern_id: paradigm.pattern_id.0,
            forms: paradigm.forms(),
        })
        .collect();
    if paradigms.is_empty() {
        return Err(ApiError::NotFound(format!("unknown lemma: {lemma}")));
    }

    let response = InflectionsResponse {
        lemma: lemma.to_string(),
        paradigms,
    };
    Ok(cached(&state, Json(response)))
}

async fn lemmas(
    State(state): State<AppState>,
    Query(params): Query<LemmasQuery>,
) -> Result<Response, ApiError> {
    let form = params.form.trim();
    if form.is_empty() {
        return Err(ApiError::bad_request("form is required"));
    }

    let response = LemmasResponse {
        form: form.to_string(),
        lemmas: state.dict.lemmas_for(form),
    };
    Ok(cached(&state, Json(response)))
}

fn cached(state: &AppState, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
