//! Q-learning update-rule configuration.

use serde::{Deserialize, Serialize};

use crate::{MocoVelhaError, Result};

/// Fixed learning constants for the temporal-difference update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α, weight of each new observation.
    /// Default: 0.5
    pub alpha: f64,

    /// Discount factor γ for future value.
    /// Default: 0.9
    pub gamma: f64,

    /// Exploration rate ε during self-play, fixed across episodes.
    /// Default: 0.1
    pub epsilon: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.1,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        if self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(MocoVelhaError::Validation(
                "alpha must be in (0, 1]".to_string(),
            ));
        }
        if self.gamma <= 0.0 || self.gamma > 1.0 {
            return Err(MocoVelhaError::Validation(
                "gamma must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(MocoVelhaError::Validation(
                "epsilon must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
