//! HTTP server exposing the four client operations.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::servers::schemas::{
    AiMoveResponse, BoardRequest, ErrorResponse, SetLevelRequest, StateResponse, StatusResponse,
    TrainLevelRequest,
};
use crate::services::LevelManager;
use crate::MocoVelhaError;

// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

// API server wired to one LevelManager
pub struct ApiServer {
    config: ApiConfig,
    manager: LevelManager,
}

impl ApiServer {
    pub fn new(config: ApiConfig, manager: LevelManager) -> Self {
        Self { config, manager }
    }

    pub async fn start(self) -> crate::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| MocoVelhaError::Server(format!("invalid bind address: {e}")))?;
        let listener = TcpListener::bind(addr).await?;

        log::info!("🌐 MocoVelha API listening on http://{addr}");

        axum::serve(listener, self.create_router()).await?;
        Ok(())
    }

    pub fn create_router(&self) -> Router {
        Router::new()
            .route("/status", get(get_status))
            .route("/state", get(get_state))
            .route("/set-level", post(set_level))
            .route("/train-level", post(train_level))
            .route("/ai-move", post(ai_move))
            .fallback_service(ServeDir::new("web"))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.manager.clone())
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn get_status() -> ResponseJson<StatusResponse> {
    ResponseJson(StatusResponse {
        status: "ok".to_string(),
    })
}

async fn get_state(
    State(manager): State<LevelManager>,
) -> Result<ResponseJson<StateResponse>, MocoVelhaError> {
    let stats = manager.active_stats().await?;
    Ok(ResponseJson(stats.into()))
}

async fn set_level(
    State(manager): State<LevelManager>,
    Json(request): Json<SetLevelRequest>,
) -> Result<ResponseJson<StateResponse>, MocoVelhaError> {
    let stats = manager.activate(&request.level).await?;
    Ok(ResponseJson(stats.into()))
}

async fn train_level(
    State(manager): State<LevelManager>,
    Json(request): Json<TrainLevelRequest>,
) -> Result<ResponseJson<StateResponse>, MocoVelhaError> {
    log::info!(
        "train-level request for target {} episodes",
        request.target_episodes
    );
    let stats = manager.train_active(request.target_episodes).await?;
    Ok(ResponseJson(stats.into()))
}

async fn ai_move(
    State(manager): State<LevelManager>,
    Json(request): Json<BoardRequest>,
) -> Result<ResponseJson<AiMoveResponse>, MocoVelhaError> {
    let (board, player) = request.parse()?;
    let position = manager.ai_move(&board, player).await?;
    Ok(ResponseJson(AiMoveResponse { position }))
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

impl IntoResponse for MocoVelhaError {
    fn into_response(self) -> Response {
        let status = match &self {
            MocoVelhaError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MocoVelhaError::InvalidLevel(_) => StatusCode::BAD_REQUEST,
            MocoVelhaError::LevelBusy(_) => StatusCode::CONFLICT,
            MocoVelhaError::Persistence { .. }
            | MocoVelhaError::Server(_)
            | MocoVelhaError::Json(_)
            | MocoVelhaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("request failed: {self}");
        } else {
            log::debug!("request rejected: {self}");
        }

        (
            status,
            ResponseJson(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
