use crate::game::board::{Board, Player};
use crate::{MocoVelhaError, Result};

/// Returns a new board with the given move applied.
///
/// The input board is left untouched; out-of-range and occupied positions
/// are rejected before anything else looks at the move.
pub fn apply_move(board: &Board, position: usize, player: Player) -> Result<Board> {
    if position >= 9 {
        return Err(MocoVelhaError::Validation(format!(
            "position {position} is outside the board"
        )));
    }

    if board[position].is_some() {
        return Err(MocoVelhaError::Validation(format!(
            "position {position} is already occupied"
        )));
    }

    let mut new_board = *board;
    new_board[position] = Some(player);
    Ok(new_board)
}
