pub mod apply_move;
pub mod board;
pub mod check_winner;
pub mod legal_moves;
pub mod side_to_move;

pub use apply_move::apply_move;
pub use board::{create_board, Board, Cell, Player};
pub use check_winner::{check_winner, is_board_full, Outcome, WINNING_LINES};
pub use legal_moves::legal_moves;
pub use side_to_move::side_to_move;
