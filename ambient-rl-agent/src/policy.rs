//! Decaying epsilon-greedy action selection

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use ambient_rl_core::{Action, EnvState};

use crate::qtable::QTable;

/// Epsilon-greedy policy with multiplicative decay
///
/// Every `choose` call decays the rate, explore or exploit alike; use
/// `rate()` to inspect it without the side effect.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    rate: f64,
    initial_rate: f64,
    min_rate: f64,
    decay: f64,
}

impl EpsilonGreedy {
    /// Create a policy with the given schedule
    #[must_use]
    pub fn new(initial_rate: f64, min_rate: f64, decay: f64) -> Self {
        Self {
            rate: initial_rate,
            initial_rate,
            min_rate,
            decay,
        }
    }

    /// Current exploration rate, without triggering decay
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Select an action for `state` and decay the exploration rate
    ///
    /// With probability `rate` the action is uniform over the whole action
    /// set; otherwise uniform over the Q-row's argmax set, so value ties
    /// never resolve by fixed preference.
    pub fn choose<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        table: &QTable,
        state: &EnvState,
    ) -> Action {
        let action = if rng.gen::<f64>() < self.rate {
            let action = Action::sample(rng);
            debug!(%action, rate = self.rate, "exploring");
            action
        } else {
            let best = table.best_actions(state);
            let action = *best.choose(rng).unwrap_or(&Action::TurnOffFan);
            debug!(%action, rate = self.rate, "exploiting");
            action
        };

        self.rate = (self.rate * self.decay).max(self.min_rate);
        action
    }

    /// Restore the initial exploration rate
    pub fn reset(&mut self) {
        self.rate = self.initial_rate;
    }
}
