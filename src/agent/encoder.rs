use crate::game::Board;

/// Canonical lookup key for a board layout.
///
/// Opaque to everything but the encoder; the policy and trainer only ever
/// compare and store it.
pub type StateKey = String;

/// Encodes a board as a stable nine-character key, `_` for empty cells.
///
/// Pure and deterministic: identical layouts always produce identical keys
/// and distinct layouts never collide, since every cell maps to exactly one
/// character at a fixed offset.
pub fn encode(board: &Board) -> StateKey {
    board
        .iter()
        .map(|cell| match cell {
            Some(player) => player.symbol(),
            None => '_',
        })
        .collect()
}
