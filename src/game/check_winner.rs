use crate::game::board::{Board, Player};

/// The eight three-in-a-row lines: 3 rows, 3 columns, 2 diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// Returns true if the board has no empty cells left.
pub fn is_board_full(board: &Board) -> bool {
    board.iter().all(|cell| cell.is_some())
}

/// Evaluates the board and returns the outcome if the game is decided.
pub fn check_winner(board: &Board) -> Option<Outcome> {
    for line in WINNING_LINES {
        let [a, b, c] = line;
        if let Some(player) = board[a] {
            if board[b] == Some(player) && board[c] == Some(player) {
                return Some(Outcome::Win(player));
            }
        }
    }

    if is_board_full(board) {
        return Some(Outcome::Draw);
    }

    None
}
