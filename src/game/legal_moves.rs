use crate::game::board::Board;

/// Returns indices of all empty cells on the board.
pub fn legal_moves(board: &Board) -> Vec<usize> {
    board
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| if cell.is_none() { Some(i) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{create_board, Player};

    #[test]
    fn empty_board_has_nine_moves() {
        assert_eq!(legal_moves(&create_board()), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn occupied_cells_are_excluded() {
        let mut board = create_board();
        board[0] = Some(Player::X);
        board[4] = Some(Player::O);
        let moves = legal_moves(&board);
        assert_eq!(moves.len(), 7);
        assert!(!moves.contains(&0));
        assert!(!moves.contains(&4));
    }
}
