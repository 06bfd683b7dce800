//! Self-play trainer applying the Q-learning update.

use rand::rngs::StdRng;

use crate::agent::encoder::{encode, StateKey};
use crate::agent::hyperparameters::Hyperparameters;
use crate::agent::policy::select_action;
use crate::agent::qtable::QTable;
use crate::game::{apply_move, check_winner, create_board, legal_moves, Outcome, Player};
use crate::Result;

/// One move of a self-play game, recorded for credit assignment.
struct Ply {
    state: StateKey,
    legal: Vec<usize>,
    action: usize,
    player: Player,
}

const PROGRESS_LOG_INTERVAL: u64 = 10_000;

/// Runs self-play episodes until `total_episodes` reaches `target`.
///
/// A target at or below the current total is a no-op, so repeated training
/// requests are idempotent. Returns the new episode total, which never
/// decreases. The first mover alternates between episodes to keep the
/// table from specializing on one starting side.
pub fn run(
    qtable: &mut QTable,
    total_episodes: u64,
    target: u64,
    hp: &Hyperparameters,
    rng: &mut StdRng,
) -> Result<u64> {
    if target <= total_episodes {
        log::debug!(
            "training target {target} already reached ({total_episodes} episodes), nothing to do"
        );
        return Ok(total_episodes);
    }

    log::info!(
        "training from {total_episodes} to {target} episodes (alpha={}, gamma={}, epsilon={})",
        hp.alpha,
        hp.gamma,
        hp.epsilon
    );

    let mut total = total_episodes;
    while total < target {
        let first = if total % 2 == 0 { Player::X } else { Player::O };
        run_episode(qtable, hp, rng, first)?;
        total += 1;

        if total % PROGRESS_LOG_INTERVAL == 0 {
            log::debug!("{total}/{target} episodes, {} known states", qtable.known_states());
        }
    }

    log::info!("training done: {total} episodes, {} known states", qtable.known_states());
    Ok(total)
}

/// Plays one full self-play game and updates the shared table.
///
/// Both sides draw from the same table through the exploration policy. Each
/// ply is buffered; once the outcome is known, every move is updated with
/// `v ← v + α·(reward + γ·max_a' Q(next, a') − v)`. For a given side,
/// `next` is the board at that side's next turn, so the bootstrap follows
/// the mover's own decision points. Each side's final move is terminal: no
/// bootstrap, reward +1 for the winner's final move, −1 for the loser's,
/// 0 everywhere in a draw.
fn run_episode(
    qtable: &mut QTable,
    hp: &Hyperparameters,
    rng: &mut StdRng,
    first: Player,
) -> Result<Outcome> {
    let mut board = create_board();
    let mut current = first;
    let mut history: Vec<Ply> = Vec::with_capacity(9);

    let outcome = loop {
        let state = encode(&board);
        let legal = legal_moves(&board);
        // The board below is never terminal here, so legal is non-empty.
        let action = match select_action(qtable, &state, &legal, true, hp.epsilon, rng) {
            Some(action) => action,
            None => break Outcome::Draw,
        };

        board = apply_move(&board, action, current)?;
        history.push(Ply {
            state,
            legal,
            action,
            player: current,
        });

        if let Some(outcome) = check_winner(&board) {
            break outcome;
        }
        current = current.opponent();
    };

    for i in 0..history.len() {
        let ply = &history[i];
        // The same side moves again two plies later, if the game lasted.
        let (reward, future) = match history.get(i + 2) {
            Some(next) => (0.0, qtable.max_value(&next.state, &next.legal)),
            None => (terminal_reward(ply.player, outcome), 0.0),
        };

        let current_value = qtable.value(&ply.state, ply.action);
        let updated = current_value + hp.alpha * (reward + hp.gamma * future - current_value);
        qtable.update(&history[i].state, history[i].action, updated);
    }

    Ok(outcome)
}

fn terminal_reward(player: Player, outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Win(winner) if winner == player => 1.0,
        Outcome::Win(_) => -1.0,
        Outcome::Draw => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fresh_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn reaches_the_requested_target() {
        let mut table = QTable::new();
        let total = run(
            &mut table,
            0,
            250,
            &Hyperparameters::default(),
            &mut fresh_rng(7),
        )
        .unwrap();
        assert_eq!(total, 250);
        assert!(table.known_states() > 0);
    }

    #[test]
    fn target_at_or_below_current_is_a_no_op() {
        let mut table = QTable::new();
        let hp = Hyperparameters::default();
        let total = run(&mut table, 0, 100, &hp, &mut fresh_rng(7)).unwrap();
        let snapshot = table.clone();

        assert_eq!(run(&mut table, total, 100, &hp, &mut fresh_rng(8)).unwrap(), 100);
        assert_eq!(run(&mut table, total, 50, &hp, &mut fresh_rng(9)).unwrap(), 100);
        assert_eq!(table, snapshot);
    }

    #[test]
    fn episode_totals_are_monotone() {
        let mut table = QTable::new();
        let hp = Hyperparameters::default();
        let mut rng = fresh_rng(11);
        let mut total = 0;
        for target in [10, 10, 40, 25, 100] {
            let next = run(&mut table, total, target, &hp, &mut rng).unwrap();
            assert!(next >= total);
            assert!(next >= target.min(next));
            total = next;
        }
        assert_eq!(total, 100);
    }

    #[test]
    fn same_seed_reproduces_the_same_table() {
        let hp = Hyperparameters::default();

        let mut a = QTable::new();
        run(&mut a, 0, 300, &hp, &mut fresh_rng(42)).unwrap();

        let mut b = QTable::new();
        run(&mut b, 0, 300, &hp, &mut fresh_rng(42)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn recorded_actions_are_always_legal() {
        let mut table = QTable::new();
        run(
            &mut table,
            0,
            500,
            &Hyperparameters::default(),
            &mut fresh_rng(13),
        )
        .unwrap();

        for (state, actions) in table.entries() {
            for &action in actions.keys() {
                assert!(action < 9, "action {action} out of range for {state}");
                assert_eq!(
                    state.as_bytes()[action],
                    b'_',
                    "action {action} recorded for occupied cell in {state}"
                );
            }
        }
    }

    #[test]
    fn values_stay_in_outcome_range() {
        let mut table = QTable::new();
        run(
            &mut table,
            0,
            2_000,
            &Hyperparameters::default(),
            &mut fresh_rng(17),
        )
        .unwrap();

        for actions in table.entries().values() {
            for value in actions.values() {
                assert!((-1.0..=1.0).contains(value), "value {value} out of range");
            }
        }
    }

    #[test]
    fn losing_moves_are_punished() {
        // After enough self-play, handing the opponent an open win must be
        // valued below blocking it. State: X on 0 and 1, O on 4, O to move;
        // every O reply except 2 loses to X completing the top row.
        let mut table = QTable::new();
        run(
            &mut table,
            0,
            50_000,
            &Hyperparameters::default(),
            &mut fresh_rng(23),
        )
        .unwrap();

        let state = "XX__O____";
        let legal = [2, 3, 5, 6, 7, 8];
        assert_eq!(table.best_action(state, &legal), Some(2));
        let block = table.value(state, 2);
        for action in [3, 5, 6, 7, 8] {
            assert!(
                block >= table.value(state, action),
                "blocking at 2 should dominate action {action}"
            );
        }
    }
}
