use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::DatasetCache;
use crate::error::AneelError;
use crate::query;

#[derive(Clone)]
pub struct ApiState {
    cache: Arc<DatasetCache>,
}

pub fn router(cache: Arc<DatasetCache>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/datasets", get(list_datasets))
        .route("/datasets/:name", get(get_dataset))
        .route("/indicadores/perdas", get(loss_indicators))
        .with_state(ApiState { cache })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(cache: Arc<DatasetCache>, bind_addr: &str) -> Result<(), AneelError> {
    let app = router(cache);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|err| AneelError::Server(format!("bind {bind_addr}: {err}")))?;
    tracing::info!(addr = bind_addr, "API ANEEL rodando");
    axum::serve(listener, app)
        .await
        .map_err(|err| AneelError::Server(err.to_string()))
}

struct ApiError(AneelError);

impl From<AneelError> for ApiError {
    fn from(err: AneelError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            AneelError::DatasetNotFound(_) => {
                (StatusCode::NOT_FOUND, "Arquivo não encontrado".to_string())
            }
            AneelError::LossDatasetNotFound => (
                StatusCode::NOT_FOUND,
                "Dataset de perdas não encontrado".to_string(),
            ),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "API ANEEL rodando" }))
}

async fn list_datasets(State(state): State<ApiState>) -> Json<Vec<String>> {
    Json(query::list_datasets(&state.cache))
}

async fn get_dataset(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let table = query::get_dataset(&state.cache, &name)?;
    Ok(Json(table.to_records()))
}

async fn loss_indicators(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let table = query::loss_indicators(&state.cache)?;
    Ok(Json(table.to_records()))
}
