use std::fmt;

/// One of the two tic-tac-toe sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }

    /// Parses the symbol used on the wire ("X" or "O").
    pub fn from_symbol(symbol: &str) -> Option<Player> {
        match symbol {
            "X" => Some(Player::X),
            "O" => Some(Player::O),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single board cell, empty or owned by a player.
pub type Cell = Option<Player>;

/// The nine cells of the board, row-major from top-left.
pub type Board = [Cell; 9];

/// Returns a fresh empty board.
pub fn create_board() -> Board {
    [None; 9]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_swaps_sides() {
        assert_eq!(Player::X.opponent(), Player::O);
        assert_eq!(Player::O.opponent(), Player::X);
    }

    #[test]
    fn from_symbol_rejects_garbage() {
        assert_eq!(Player::from_symbol("X"), Some(Player::X));
        assert_eq!(Player::from_symbol("O"), Some(Player::O));
        assert_eq!(Player::from_symbol("x"), None);
        assert_eq!(Player::from_symbol(""), None);
    }

    #[test]
    fn fresh_board_is_empty() {
        assert!(create_board().iter().all(|cell| cell.is_none()));
    }
}
