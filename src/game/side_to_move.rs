use crate::game::board::{Board, Player};
use crate::{MocoVelhaError, Result};

/// Infers whose turn it is from the piece counts.
///
/// X always moves first, so a turn-consistent board has either equal
/// counts (X to move) or one extra X (O to move). Anything else is not a
/// reachable position and gets rejected.
pub fn side_to_move(board: &Board) -> Result<Player> {
    let x_count = board.iter().filter(|c| **c == Some(Player::X)).count();
    let o_count = board.iter().filter(|c| **c == Some(Player::O)).count();

    if x_count == o_count {
        Ok(Player::X)
    } else if x_count == o_count + 1 {
        Ok(Player::O)
    } else {
        Err(MocoVelhaError::Validation(format!(
            "board is not turn-consistent ({x_count} X against {o_count} O)"
        )))
    }
}
