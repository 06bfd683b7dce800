//! Wire types for the client API.

use serde::{Deserialize, Serialize};

use crate::game::{create_board, Board, Player};
use crate::services::TrainingStats;
use crate::{MocoVelhaError, Result};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetLevelRequest {
    pub level: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrainLevelRequest {
    pub target_episodes: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BoardRequest {
    pub board: Vec<String>,
    pub player: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AiMoveResponse {
    #[serde(rename = "move")]
    pub position: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StateResponse {
    pub level: String,
    pub total_episodes: u64,
    pub known_states: usize,
    pub episodes_target: u64,
    pub model_loaded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub detail: String,
}

impl From<TrainingStats> for StateResponse {
    fn from(stats: TrainingStats) -> Self {
        StateResponse {
            level: stats.level,
            total_episodes: stats.total_episodes,
            known_states: stats.known_states,
            episodes_target: stats.episodes_target,
            model_loaded: stats.model_loaded,
        }
    }
}

impl BoardRequest {
    /// Checks the wire shape and converts to typed board and side.
    ///
    /// Cells are `"X"`, `"O"` or `""`; the board must hold exactly nine of
    /// them. Turn consistency is checked later, against the typed board.
    pub fn parse(&self) -> Result<(Board, Player)> {
        if self.board.len() != 9 {
            return Err(MocoVelhaError::Validation(format!(
                "board must have 9 cells, got {}",
                self.board.len()
            )));
        }

        let mut board = create_board();
        for (i, cell) in self.board.iter().enumerate() {
            board[i] = match cell.as_str() {
                "" => None,
                symbol => Some(Player::from_symbol(symbol).ok_or_else(|| {
                    MocoVelhaError::Validation(format!(
                        "cell {i} must be \"X\", \"O\" or empty, got {symbol:?}"
                    ))
                })?),
            };
        }

        let player = Player::from_symbol(&self.player).ok_or_else(|| {
            MocoVelhaError::Validation(format!(
                "player must be \"X\" or \"O\", got {:?}",
                self.player
            ))
        })?;

        Ok((board, player))
    }
}
