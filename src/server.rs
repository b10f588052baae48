use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    inference::{Frontend, FrontendInput, FrontendResult},
    nlp::{LANGUAGE_ID_MAP, NUM_TONES, PAD, PUNCTUATIONS, SYMBOLS},
};

#[derive(Clone)]
struct AppState {
    frontend: Frontend,
}

#[derive(Debug, Deserialize)]
struct G2pRequest {
    input: String,
    #[serde(default)]
    normalize: Option<bool>,
}

#[derive(Debug, Serialize)]
struct G2pResponse {
    normalized: String,
    phones: Vec<String>,
    tones: Vec<i32>,
    word2ph: Vec<usize>,
    phone_ids: Vec<i64>,
    tone_ids: Vec<i64>,
    fallback: Option<String>,
}

impl From<FrontendResult> for G2pResponse {
    fn from(result: FrontendResult) -> Self {
        Self {
            normalized: result.normalized,
            phones: result.phones,
            tones: result.tones,
            word2ph: result.word2ph,
            phone_ids: result.inputs.phone_ids,
            tone_ids: result.inputs.tone_ids,
            fallback: result.fallback,
        }
    }
}

#[derive(Serialize)]
struct ApiErrorBody {
    message: String,
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
struct MetadataResponse {
    symbols: Vec<&'static str>,
    punctuation: Vec<&'static str>,
    pad: &'static str,
    num_tones: usize,
    languages: Vec<&'static str>,
}

pub fn router(frontend: Frontend) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/v1/metadata", get(metadata))
        .route("/v1/g2p", post(create_alignment))
        .with_state(AppState { frontend })
}

pub async fn serve(addr: SocketAddr, frontend: Frontend) -> Result<()> {
    let app = router(frontend);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn health() -> &'static str {
    "ok"
}

async fn metadata() -> Json<MetadataResponse> {
    let mut languages: Vec<&'static str> = LANGUAGE_ID_MAP.keys().copied().collect();
    languages.sort();
    Json(MetadataResponse {
        symbols: SYMBOLS.to_vec(),
        punctuation: PUNCTUATIONS.to_vec(),
        pad: PAD,
        num_tones: NUM_TONES,
        languages,
    })
}

async fn create_alignment(
    State(state): State<AppState>,
    Json(payload): Json<G2pRequest>,
) -> ApiResult<Json<G2pResponse>> {
    let G2pRequest { input, normalize } = payload;

    if input.trim().is_empty() {
        return Err(ApiError::bad_request("input text must not be empty"));
    }

    let mut frontend_input = FrontendInput::new(input);
    if let Some(normalize) = normalize {
        frontend_input.normalize = normalize;
    }

    let frontend = state.frontend.clone();
    let result = tokio::task::spawn_blocking(move || frontend.process(&frontend_input))
        .await
        .map_err(|err| ApiError::internal(format!("g2p task panicked: {err}")))?
        .map_err(|err| {
            tracing::error!("G2P failed: {err:?}");
            ApiError::from_anyhow(err)
        })?;

    Ok(Json(result.into()))
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    fn from_anyhow(err: anyhow::Error) -> Self {
        Self::internal(format!("{err:#}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ApiErrorBody {
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
