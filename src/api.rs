use crate::document::{Document, DocumentCollection};
use crate::engine::{Classification, EsaEngine};
use crate::error::EsaError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub concepts: Vec<Document>,
    pub texts: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub results: Vec<Classification>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<EsaError>() {
            Some(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn classify(
    State(engine): State<Arc<EsaEngine>>,
    Json(req): Json<ClassifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let concepts: DocumentCollection = req.concepts.into_iter().collect();
    let texts: DocumentCollection = req.texts.into_iter().collect();

    // Fitting is CPU bound, keep it off the async workers
    let results = tokio::task::spawn_blocking(move || engine.run(&concepts, &texts)).await??;

    let response = ClassifyResponse {
        results: results.into_values().collect(),
    };

    Ok(Json(ApiResponse::success(response)))
}

// ========== Router ==========

pub fn create_router(engine: Arc<EsaEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/classify", post(classify))
        .with_state(engine)
}
