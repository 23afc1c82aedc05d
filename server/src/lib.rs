use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use recommender::{
    build_index, items_from_records, load_records, recommend_scored, BuiltIndex, DocumentSource,
    Neighbor, RecommendError, RecommenderConfig, DEFAULT_K,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct RecommendParams {
    pub title: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_K }

#[derive(Serialize)]
pub struct RecommendResponse {
    pub title: String,
    pub k: usize,
    pub results: Vec<Neighbor>,
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub position: usize,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<BuiltIndex>,
}

/// Query failures as HTTP responses.
pub struct ApiError(RecommendError);

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RecommendError::UnknownTitle(_) => StatusCode::NOT_FOUND,
            RecommendError::MalformedConfiguration(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Load the catalog, build the index once and wire up the routes.
pub fn build_app(catalog: &str, document: DocumentSource, config: &RecommenderConfig) -> Result<Router> {
    let records = load_records(catalog)?;
    let items = items_from_records(&records, document);
    let index = build_index(&items, config)?;
    tracing::info!(items = index.len(), %document, "index ready");
    Ok(router(index))
}

pub fn router(index: BuiltIndex) -> Router {
    let app_state = AppState { index: Arc::new(index) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .route("/items/:position", get(item_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let results = recommend_scored(&params.title, &state.index, params.k)?;
    tracing::debug!(title = %params.title, k = params.k, hits = results.len(), "served recommendation");
    Ok(Json(RecommendResponse {
        title: params.title,
        k: params.k,
        results,
    }))
}

pub async fn item_handler(
    State(state): State<AppState>,
    Path(position): Path<usize>,
) -> Result<Json<ItemResponse>, (StatusCode, Json<serde_json::Value>)> {
    match state.index.title_at(position) {
        Some(title) => Ok(Json(ItemResponse { position, title: title.to_string() })),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}
