pub mod level_manager;

pub use level_manager::{LevelManager, LevelState, TrainingStats};
