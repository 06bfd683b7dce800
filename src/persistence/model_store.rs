//! Durable per-level storage for Q-tables.
//!
//! One JSON file per level under the store directory, with string action
//! keys so files written by earlier deployments keep loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agent::qtable::QTable;
use crate::Result;

/// On-disk image of one level's model.
#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    total_episodes: u64,
    #[serde(rename = "Q")]
    q: HashMap<String, HashMap<String, f64>>,
}

/// A loaded model: the table plus its persisted episode total.
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    pub qtable: QTable,
    pub total_episodes: u64,
}

/// Directory-backed store, one file per level id.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        ModelStore { dir }
    }

    pub fn model_path(&self, level: &str) -> PathBuf {
        self.dir.join(format!("{level}.json"))
    }

    /// Loads the persisted model for a level.
    ///
    /// An absent file is simply `None`. An unreadable or corrupt file is
    /// also `None`, after a warning: stale knowledge is recoverable by
    /// retraining, a crashed process is not. Malformed action keys are
    /// skipped the same way.
    pub fn load(&self, level: &str) -> Option<ModelSnapshot> {
        let path = self.model_path(level);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!(
                    "could not read model for level '{level}' from {}: {e}; starting fresh",
                    path.display()
                );
                return None;
            }
        };

        let file: ModelFile = match serde_json::from_str(&raw) {
            Ok(file) => file,
            Err(e) => {
                log::warn!(
                    "corrupt model for level '{level}' at {}: {e}; starting fresh",
                    path.display()
                );
                return None;
            }
        };

        let mut entries: HashMap<String, HashMap<usize, f64>> = HashMap::new();
        for (state, actions) in file.q {
            let parsed: HashMap<usize, f64> = actions
                .into_iter()
                .filter_map(|(action, value)| match action.parse::<usize>() {
                    Ok(action) if action < 9 => Some((action, value)),
                    _ => {
                        log::warn!(
                            "skipping malformed action key '{action}' for state '{state}' in level '{level}'"
                        );
                        None
                    }
                })
                .collect();
            entries.insert(state, parsed);
        }

        log::info!(
            "loaded model for level '{level}': {} episodes, {} states",
            file.total_episodes,
            entries.len()
        );

        Some(ModelSnapshot {
            qtable: QTable::from_entries(entries),
            total_episodes: file.total_episodes,
        })
    }

    /// Persists a level's model atomically.
    ///
    /// The image is written to a staging file in the same directory and
    /// renamed over the final path, so a crash mid-write never leaves a
    /// half-written model where the next load would find it.
    pub fn save(&self, level: &str, qtable: &QTable, total_episodes: u64) -> Result<()> {
        let file = ModelFile {
            total_episodes,
            q: qtable
                .entries()
                .iter()
                .map(|(state, actions)| {
                    let actions = actions
                        .iter()
                        .map(|(action, value)| (action.to_string(), *value))
                        .collect();
                    (state.clone(), actions)
                })
                .collect(),
        };

        let path = self.model_path(level);
        let staging = staging_path(&path);
        fs::write(&staging, serde_json::to_string(&file)?)?;
        fs::rename(&staging, &path)?;

        log::debug!(
            "saved model for level '{level}' ({total_episodes} episodes) to {}",
            path.display()
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_table() -> QTable {
        let mut table = QTable::new();
        table.update("_________", 4, 0.5);
        table.update("____X____", 0, -0.25);
        table.update("____X____", 8, 0.125);
        table
    }

    #[test]
    fn absent_model_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(store.load("level_0").is_none());
    }

    #[test]
    fn round_trip_preserves_every_value() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let table = sample_table();

        store.save("level_0", &table, 1234).unwrap();
        let snapshot = store.load("level_0").unwrap();

        assert_eq!(snapshot.total_episodes, 1234);
        assert_eq!(snapshot.qtable, table);
    }

    #[test]
    fn save_leaves_no_staging_file_behind() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        store.save("level_0", &sample_table(), 10).unwrap();

        assert!(store.model_path("level_0").exists());
        assert!(!staging_path(&store.model_path("level_0")).exists());
    }

    #[test]
    fn save_overwrites_previous_image() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        store.save("level_0", &sample_table(), 10).unwrap();

        let mut table = QTable::new();
        table.update("_________", 0, 0.9);
        store.save("level_0", &table, 20).unwrap();

        let snapshot = store.load("level_0").unwrap();
        assert_eq!(snapshot.total_episodes, 20);
        assert_eq!(snapshot.qtable, table);
    }

    #[test]
    fn corrupt_file_is_treated_as_absent() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        fs::write(store.model_path("level_0"), "{not json").unwrap();
        assert!(store.load("level_0").is_none());
    }

    #[test]
    fn malformed_action_keys_are_skipped() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        fs::write(
            store.model_path("level_0"),
            r#"{"total_episodes": 5, "Q": {"_________": {"4": 0.5, "banana": 1.0, "12": 0.3}}}"#,
        )
        .unwrap();

        let snapshot = store.load("level_0").unwrap();
        assert_eq!(snapshot.total_episodes, 5);
        assert_eq!(snapshot.qtable.value("_________", 4), 0.5);
        assert_eq!(snapshot.qtable.entries()["_________"].len(), 1);
    }

    #[test]
    fn reads_files_written_by_earlier_deployments() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        fs::write(
            store.model_path("level_1"),
            r#"{"total_episodes": 1000, "Q": {"X___O____": {"1": 0.75, "8": -0.5}}}"#,
        )
        .unwrap();

        let snapshot = store.load("level_1").unwrap();
        assert_eq!(snapshot.total_episodes, 1000);
        assert_eq!(snapshot.qtable.value("X___O____", 1), 0.75);
        assert_eq!(snapshot.qtable.value("X___O____", 8), -0.5);
    }

    #[test]
    fn levels_use_separate_files() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        store.save("level_0", &sample_table(), 10).unwrap();
        store.save("level_1", &QTable::new(), 0).unwrap();

        assert_eq!(store.load("level_0").unwrap().total_episodes, 10);
        assert_eq!(store.load("level_1").unwrap().total_episodes, 0);
    }
}
