//! Dense action-value table with durable snapshots
//!
//! The snapshot is the serialized `[864 x 5]` matrix: rows follow the
//! canonical state enumeration (temp, motion, hour, light, fan, fan
//! fastest), columns the fixed action order. That layout is a versioned
//! contract with previously persisted tables.

use std::fs;
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use rand::Rng;
use tracing::{info, warn};

use ambient_rl_core::{Action, EngineError, EnvState, Result, StateSpace};

/// The learned mapping from (state, action) to estimated long-run value
#[derive(Debug, Clone)]
pub struct QTable {
    values: Array2<f64>,
    space: StateSpace,
    alpha: f64,
    gamma: f64,
}

impl QTable {
    /// Shape of the table: one row per state, one column per action
    pub const SHAPE: (usize, usize) = (StateSpace::NUM_STATES, Action::COUNT);

    /// Create a fresh table with independent uniform values in `[0, 1)`
    #[must_use]
    pub fn new_random(alpha: f64, gamma: f64) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            values: Array2::from_shape_fn(Self::SHAPE, |_| rng.gen::<f64>()),
            space: StateSpace,
            alpha,
            gamma,
        }
    }

    /// Load the snapshot at `path`, falling back to a fresh random table
    ///
    /// A missing snapshot is the normal first run. An unreadable,
    /// unparseable, or shape-incompatible snapshot is logged and replaced
    /// by a fresh table; the universe is fixed, so a fresh table is always
    /// valid, just unlearned.
    #[must_use]
    pub fn recover(path: &Path, alpha: f64, gamma: f64) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "no Q-table snapshot, starting fresh");
            return Self::new_random(alpha, gamma);
        }
        match Self::load(path, alpha, gamma) {
            Ok(table) => {
                info!(path = %path.display(), "recovered Q-table snapshot");
                table
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "corrupt Q-table snapshot, reinitializing");
                Self::new_random(alpha, gamma)
            }
        }
    }

    fn load(path: &Path, alpha: f64, gamma: f64) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let values: Array2<f64> = serde_json::from_str(&raw)?;
        if values.dim() != Self::SHAPE {
            return Err(EngineError::CorruptSnapshot {
                expected: Self::SHAPE,
                found: values.dim(),
            });
        }
        Ok(Self {
            values,
            space: StateSpace,
            alpha,
            gamma,
        })
    }

    /// Write the full table to `path` via a temp file and atomic rename
    pub fn persist(&self, path: &Path) -> Result<()> {
        let encoded = serde_json::to_string(&self.values)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Reinitialize every cell with fresh random values
    pub fn reset(&mut self) {
        let mut rng = rand::thread_rng();
        self.values = Array2::from_shape_fn(Self::SHAPE, |_| rng.gen::<f64>());
    }

    /// The value row for a state, in action-index order
    #[must_use]
    pub fn row(&self, state: &EnvState) -> ArrayView1<'_, f64> {
        self.values.row(self.space.index(state))
    }

    /// Greatest value in a state's row
    #[must_use]
    pub fn max_value(&self, state: &EnvState) -> f64 {
        self.row(state).iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// All actions achieving the row maximum
    ///
    /// Ties are returned in full so the caller can break them uniformly;
    /// argmax-first would bias the policy toward low-index actions.
    #[must_use]
    pub fn best_actions(&self, state: &EnvState) -> Vec<Action> {
        let row = self.row(state);
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        row.iter()
            .enumerate()
            .filter(|(_, &v)| v == max)
            .filter_map(|(i, _)| Action::from_index(i))
            .collect()
    }

    /// Apply one Bellman update and return the new cell value
    ///
    /// `Q[s,a] <- (1-alpha) * Q[s,a] + alpha * (r + gamma * max_a' Q[s',a'])`,
    /// a single read-modify-write of one cell.
    pub fn update(&mut self, state: &EnvState, action: Action, reward: f64, next: &EnvState) -> f64 {
        let target = reward + self.gamma * self.max_value(next);
        let cell = [self.space.index(state), action.index()];
        let updated = (1.0 - self.alpha) * self.values[cell] + self.alpha * target;
        self.values[cell] = updated;
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn table() -> QTable {
        QTable::new_random(0.1, 0.9)
    }

    #[test]
    fn fresh_table_has_full_shape_and_unit_range() {
        let t = table();
        assert_eq!(t.values.dim(), QTable::SHAPE);
        assert!(t.values.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn update_is_a_convex_combination() {
        let mut t = table();
        let s = StateSpace.state(10);
        let next = StateSpace.state(20);
        let action = Action::TurnOnFanLow;

        let old = t.row(&s)[action.index()];
        let target = 13.0 + 0.9 * t.max_value(&next);
        let updated = t.update(&s, action, 13.0, &next);

        let (lo, hi) = if old <= target { (old, target) } else { (target, old) };
        assert!(updated >= lo && updated <= hi);
        assert_relative_eq!(updated, 0.9 * old + 0.1 * target, epsilon = 1e-12);
        // one cell changed, nothing else
        assert_relative_eq!(t.row(&s)[action.index()], updated);
    }

    #[test]
    fn best_actions_returns_all_ties() {
        let mut t = table();
        let s = StateSpace.state(5);
        let row_idx = StateSpace.index(&s);
        for a in 0..Action::COUNT {
            t.values[[row_idx, a]] = 0.25;
        }
        t.values[[row_idx, Action::TurnOffFan.index()]] = 0.75;
        t.values[[row_idx, Action::TurnOnLight.index()]] = 0.75;

        let best = t.best_actions(&s);
        assert_eq!(best, vec![Action::TurnOffFan, Action::TurnOnLight]);
    }

    #[test]
    fn persist_and_recover_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("q_table.json");
        let mut t = table();
        let s = StateSpace.state(100);
        t.update(&s, Action::TurnOnLight, 16.0, &StateSpace.state(101));
        t.persist(&path).unwrap();

        let recovered = QTable::recover(&path, 0.1, 0.9);
        assert_eq!(recovered.values, t.values);
    }

    #[test]
    fn recover_missing_snapshot_starts_fresh() {
        let dir = tempdir().unwrap();
        let t = QTable::recover(&dir.path().join("absent.json"), 0.1, 0.9);
        assert_eq!(t.values.dim(), QTable::SHAPE);
    }

    #[test]
    fn recover_falls_back_on_garbage_and_wrong_shape() {
        let dir = tempdir().unwrap();

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json at all").unwrap();
        let t = QTable::recover(&garbage, 0.1, 0.9);
        assert_eq!(t.values.dim(), QTable::SHAPE);

        let wrong = dir.path().join("wrong.json");
        let small: Array2<f64> = Array2::zeros((4, 5));
        std::fs::write(&wrong, serde_json::to_string(&small).unwrap()).unwrap();
        let t = QTable::recover(&wrong, 0.1, 0.9);
        assert_eq!(t.values.dim(), QTable::SHAPE);
        assert!(t.values.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn reset_rerandomizes() {
        let mut t = table();
        let before = t.values.clone();
        t.reset();
        assert_eq!(t.values.dim(), QTable::SHAPE);
        assert_ne!(t.values, before);
    }
}
