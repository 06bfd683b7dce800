//! Level registry and request orchestration.
//!
//! A `LevelManager` is the explicit context object handed to every request
//! handler: it owns the set of levels, each with its own Q-table behind its
//! own lock, and the id of the currently active level. Nothing here is
//! process-global, so independent managers (or tests) never cross-talk.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;

use crate::agent::{encode, select_action, trainer, Hyperparameters, QTable};
use crate::game::{legal_moves, side_to_move, Board, Player};
use crate::persistence::ModelStore;
use crate::{MocoVelhaError, Result};

/// Upper bound on a single training request; anything above this is a
/// client mistake, not a curriculum.
pub const MAX_TRAIN_TARGET: u64 = 10_000_000;

const MAX_LEVEL_ID_LEN: usize = 64;

/// The per-level statistics the client renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingStats {
    pub level: String,
    pub total_episodes: u64,
    pub known_states: usize,
    pub episodes_target: u64,
    pub model_loaded: bool,
}

/// In-memory state of one level.
#[derive(Debug, Clone)]
pub struct LevelState {
    pub qtable: QTable,
    pub total_episodes: u64,
    pub episodes_target: u64,
    pub model_loaded: bool,
}

type SharedLevel = Arc<RwLock<LevelState>>;

struct LevelManagerInner {
    store: ModelStore,
    hyperparameters: Hyperparameters,
    seed: Option<u64>,
    levels: RwLock<HashMap<String, SharedLevel>>,
    active: RwLock<String>,
}

/// Cloneable handle over the shared level registry.
#[derive(Clone)]
pub struct LevelManager {
    inner: Arc<LevelManagerInner>,
}

impl LevelManager {
    pub fn new(
        store: ModelStore,
        hyperparameters: Hyperparameters,
        seed: Option<u64>,
        default_level: &str,
    ) -> Self {
        LevelManager {
            inner: Arc::new(LevelManagerInner {
                store,
                hyperparameters,
                seed,
                levels: RwLock::new(HashMap::new()),
                active: RwLock::new(default_level.to_string()),
            }),
        }
    }

    /// Id of the currently active level.
    pub async fn active_level(&self) -> String {
        self.inner.active.read().await.clone()
    }

    /// Makes `level` the active level, loading or creating it as needed.
    ///
    /// An already-resident level is reused as-is; a persisted model is
    /// loaded with `model_loaded` set; an unseen id starts a fresh level.
    pub async fn activate(&self, level: &str) -> Result<TrainingStats> {
        let handle = self.resolve(level).await?;
        {
            let mut active = self.inner.active.write().await;
            if *active != level {
                log::info!("active level switched from '{active}' to '{level}'");
                *active = level.to_string();
            }
        }
        let state = handle.read().await;
        Ok(stats_of(level, &state))
    }

    /// Statistics for one level without touching the active selection.
    pub async fn stats(&self, level: &str) -> Result<TrainingStats> {
        let handle = self.resolve(level).await?;
        let state = handle.read().await;
        Ok(stats_of(level, &state))
    }

    /// Statistics for the active level.
    pub async fn active_stats(&self) -> Result<TrainingStats> {
        let level = self.active_level().await;
        self.stats(&level).await
    }

    /// Records a level's episode target. Informational only: the client's
    /// auto-target heuristic reads it back, training never enforces it.
    pub async fn set_target(&self, level: &str, target: u64) -> Result<()> {
        let handle = self.resolve(level).await?;
        handle.write().await.episodes_target = target;
        Ok(())
    }

    /// Trains the active level up to `target` episodes and persists it.
    ///
    /// The level's write lock is taken without waiting: a level already
    /// training (or persisting) rejects with [`MocoVelhaError::LevelBusy`]
    /// instead of interleaving episode updates. Episodes run on a blocking
    /// worker against a snapshot; the snapshot is only committed to the
    /// in-memory level after the save succeeded, so a failed save leaves
    /// the level at its last durable state.
    pub async fn train_active(&self, target: u64) -> Result<TrainingStats> {
        if target > MAX_TRAIN_TARGET {
            return Err(MocoVelhaError::Validation(format!(
                "target of {target} episodes exceeds the limit of {MAX_TRAIN_TARGET}"
            )));
        }

        let level = self.active_level().await;
        let handle = self.resolve(&level).await?;
        let mut guard = handle
            .clone()
            .try_write_owned()
            .map_err(|_| MocoVelhaError::LevelBusy(level.clone()))?;

        if target <= guard.total_episodes {
            log::debug!(
                "level '{level}' already has {} episodes, target {target} is a no-op",
                guard.total_episodes
            );
            return Ok(stats_of(&level, &guard));
        }

        let mut snapshot = guard.clone();
        let hyperparameters = self.inner.hyperparameters.clone();
        let store = self.inner.store.clone();
        let seed = self.inner.seed;
        let task_level = level.clone();

        let trained = tokio::task::spawn_blocking(move || -> Result<LevelState> {
            let mut rng = match seed {
                // Offset by the episode count so successive runs differ but
                // a full run from any checkpoint is reproducible.
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(snapshot.total_episodes)),
                None => StdRng::from_os_rng(),
            };
            snapshot.total_episodes = trainer::run(
                &mut snapshot.qtable,
                snapshot.total_episodes,
                target,
                &hyperparameters,
                &mut rng,
            )?;
            snapshot.episodes_target = target;
            store.save(&task_level, &snapshot.qtable, snapshot.total_episodes)?;
            Ok(snapshot)
        })
        .await
        .map_err(|e| MocoVelhaError::Server(format!("training task failed: {e}")))?
        .map_err(|e| match e {
            e @ MocoVelhaError::Validation(_) => e,
            e => MocoVelhaError::Persistence {
                level: level.clone(),
                message: e.to_string(),
            },
        })?;

        *guard = trained;
        Ok(stats_of(&level, &guard))
    }

    /// Greedy move for the given board against the active level's table.
    ///
    /// The board must be turn-consistent, `player` must be the side whose
    /// turn it is, and at least one cell must be empty. The returned index
    /// always points at an empty cell.
    pub async fn ai_move(&self, board: &Board, player: Player) -> Result<usize> {
        let mover = side_to_move(board)?;
        if mover != player {
            return Err(MocoVelhaError::Validation(format!(
                "it is {mover}'s turn to move, not {player}'s"
            )));
        }

        let legal = legal_moves(board);
        if legal.is_empty() {
            return Err(MocoVelhaError::Validation(
                "board has no empty cell".to_string(),
            ));
        }

        let level = self.active_level().await;
        let handle = self.resolve(&level).await?;
        let state = handle.read().await;
        let key = encode(board);

        select_action(&state.qtable, &key, &legal, false, 0.0, &mut rand::rng())
            .ok_or_else(|| MocoVelhaError::Server("no action for a non-empty legal set".to_string()))
    }

    /// Returns the shared handle for a level, loading or creating it.
    async fn resolve(&self, level: &str) -> Result<SharedLevel> {
        validate_level_id(level)?;

        {
            let levels = self.inner.levels.read().await;
            if let Some(handle) = levels.get(level) {
                return Ok(handle.clone());
            }
        }

        let mut levels = self.inner.levels.write().await;
        // Racing activations may both miss the read path.
        if let Some(handle) = levels.get(level) {
            return Ok(handle.clone());
        }

        let state = match self.inner.store.load(level) {
            Some(snapshot) => LevelState {
                qtable: snapshot.qtable,
                total_episodes: snapshot.total_episodes,
                episodes_target: 0,
                model_loaded: true,
            },
            None => {
                log::info!("creating fresh level '{level}'");
                LevelState {
                    qtable: QTable::new(),
                    total_episodes: 0,
                    episodes_target: 0,
                    model_loaded: false,
                }
            }
        };

        let handle = Arc::new(RwLock::new(state));
        levels.insert(level.to_string(), handle.clone());
        Ok(handle)
    }
}

fn stats_of(level: &str, state: &LevelState) -> TrainingStats {
    TrainingStats {
        level: level.to_string(),
        total_episodes: state.total_episodes,
        known_states: state.qtable.known_states(),
        episodes_target: state.episodes_target,
        model_loaded: state.model_loaded,
    }
}

/// A level id names a file on disk, so only a conservative charset passes.
fn validate_level_id(level: &str) -> Result<()> {
    if level.is_empty()
        || level.len() > MAX_LEVEL_ID_LEN
        || !level
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(MocoVelhaError::InvalidLevel(level.to_string()));
    }
    Ok(())
}
