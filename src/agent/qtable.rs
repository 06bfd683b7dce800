use std::collections::HashMap;

/// Learned action values for one level.
///
/// Maps a state key to the value of each tried action. Unknown (state,
/// action) pairs read as 0.0. Only legal (empty-cell) actions are ever
/// written: the trainer and policy both select from the legal set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    entries: HashMap<String, HashMap<usize, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: HashMap<String, HashMap<usize, f64>>) -> Self {
        QTable { entries }
    }

    pub fn entries(&self) -> &HashMap<String, HashMap<usize, f64>> {
        &self.entries
    }

    /// Estimated value of playing `action` from `state`, 0.0 if unseen.
    pub fn value(&self, state: &str, action: usize) -> f64 {
        self.entries
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn update(&mut self, state: &str, action: usize, new_value: f64) {
        self.entries
            .entry(state.to_string())
            .or_default()
            .insert(action, new_value);
    }

    /// Highest-valued legal action; ties break to the lowest index so
    /// inference is reproducible.
    pub fn best_action(&self, state: &str, legal: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &action in legal {
            let value = self.value(state, action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Max value over the legal actions of `state`, 0.0 for an empty set.
    pub fn max_value(&self, state: &str, legal: &[usize]) -> f64 {
        legal
            .iter()
            .map(|&action| self.value(state, action))
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |best| best.max(v)))
            })
            .unwrap_or(0.0)
    }

    /// True when every legal action of `state` still carries the default value.
    pub fn is_unseen(&self, state: &str, legal: &[usize]) -> bool {
        legal.iter().all(|&action| self.value(state, action) == 0.0)
    }

    /// Number of states with at least one nonzero recorded value.
    pub fn known_states(&self) -> usize {
        self.entries
            .values()
            .filter(|actions| actions.values().any(|v| *v != 0.0))
            .count()
    }
}
