//! # MocoVelha Backend Library
//!
//! Backend for the MocoVelha tic-tac-toe web client. The opponent is a
//! tabular Q-learning agent that learns through self-play.
//!
//! ## Features
//!
//! - **Game Engine**: Tic-tac-toe board logic and rules
//! - **Q-Learning Agent**: State encoding, Q-table, epsilon-greedy policy and self-play trainer
//! - **Levels**: Named training curricula, each with its own Q-table and episode target
//! - **Persistence**: Durable per-level model storage with atomic saves
//! - **HTTP API**: The four client operations (state, set-level, train-level, ai-move)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mocovelha::{
//!     agent::Hyperparameters,
//!     persistence::ModelStore,
//!     servers::{ApiConfig, ApiServer},
//!     services::LevelManager,
//! };
//!
//! # async fn run() -> mocovelha::Result<()> {
//! let store = ModelStore::new("models");
//! let manager = LevelManager::new(store, Hyperparameters::default(), None, "level_0");
//! manager.activate("level_0").await?;
//! ApiServer::new(ApiConfig::default(), manager).start().await
//! # }
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Q-learning agent: state encoding, Q-table, policy and trainer
pub mod agent;

/// Core tic-tac-toe logic and rules
pub mod game;

/// Durable per-level model storage
pub mod persistence;

/// HTTP API server and request/response schemas
pub mod servers;

/// Level management and request orchestration
pub mod services;

/// Logging setup helpers
pub mod logging;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the MocoVelha library
#[derive(Debug, thiserror::Error)]
pub enum MocoVelhaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid level id: {0:?}")]
    InvalidLevel(String),

    #[error("level '{0}' is busy with training or persistence")]
    LevelBusy(String),

    #[error("failed to persist model for level '{level}': {message}")]
    Persistence { level: String, message: String },

    #[error("server error: {0}")]
    Server(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MocoVelhaError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
