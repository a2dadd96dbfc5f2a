//! The fixed actuator command set

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::state::FanLevel;

/// One of the five actuator commands the agent can issue
///
/// Serializes as the snake_case wire string (`"turn_off_fan"`, ...); the
/// declaration order is the stable column order of the Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Turn the fan off
    TurnOffFan,
    /// Run the fan at low speed
    TurnOnFanLow,
    /// Run the fan at high speed
    TurnOnFanHigh,
    /// Turn the light off
    TurnOffLight,
    /// Turn the light on
    TurnOnLight,
}

impl Action {
    /// All actions in stable index order
    pub const ALL: [Self; 5] = [
        Self::TurnOffFan,
        Self::TurnOnFanLow,
        Self::TurnOnFanHigh,
        Self::TurnOffLight,
        Self::TurnOnLight,
    ];

    /// Number of actions
    pub const COUNT: usize = Self::ALL.len();

    /// Stable index of this action
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::TurnOffFan => 0,
            Self::TurnOnFanLow => 1,
            Self::TurnOnFanHigh => 2,
            Self::TurnOffLight => 3,
            Self::TurnOnLight => 4,
        }
    }

    /// Action at a stable index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Sample an action uniformly at random
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::COUNT)]
    }

    /// The wire string for this action
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOffFan => "turn_off_fan",
            Self::TurnOnFanLow => "turn_on_fan_low",
            Self::TurnOnFanHigh => "turn_on_fan_high",
            Self::TurnOffLight => "turn_off_light",
            Self::TurnOnLight => "turn_on_light",
        }
    }

    /// The fan level this action requests, if it is a fan command
    #[must_use]
    pub fn target_fan(self) -> Option<FanLevel> {
        match self {
            Self::TurnOffFan => Some(FanLevel::Off),
            Self::TurnOnFanLow => Some(FanLevel::Low),
            Self::TurnOnFanHigh => Some(FanLevel::High),
            _ => None,
        }
    }

    /// The light state this action requests, if it is a light command
    #[must_use]
    pub fn target_light(self) -> Option<bool> {
        match self {
            Self::TurnOffLight => Some(false),
            Self::TurnOnLight => Some(true),
            _ => None,
        }
    }

    /// Whether this action switches an actuator on
    #[must_use]
    pub fn is_turn_on(self) -> bool {
        matches!(self, Self::TurnOnFanLow | Self::TurnOnFanHigh | Self::TurnOnLight)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}
