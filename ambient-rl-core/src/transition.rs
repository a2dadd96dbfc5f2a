//! Applied-update audit records

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::state::EnvState;

/// One applied Q-table update
///
/// Wire layout matches the persisted log: states as 5-int arrays, the
/// action as its snake_case string, the reward as a signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// State the action was taken in
    pub state: EnvState,
    /// Action taken
    pub action: Action,
    /// Shaped (or override) reward applied
    pub reward: i32,
    /// State observed after the action
    pub next_state: EnvState,
}
