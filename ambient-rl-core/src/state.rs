//! Discrete state universe and sensor-sample discretization
//!
//! The bucketing thresholds here are part of the public contract: the
//! persisted Q-table snapshot is laid out in the canonical enumeration
//! order of this universe, so changing a threshold or a range silently
//! reinterprets previously learned values.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Upper bound of the `Low` temperature bucket, degrees Celsius (exclusive)
pub const TEMP_LOW_MAX: f64 = 22.0;
/// Upper bound of the `Normal` temperature bucket, degrees Celsius (inclusive)
pub const TEMP_NORMAL_MAX: f64 = 28.0;
/// Valid raw temperature range accepted from sensors
pub const TEMP_VALID_RANGE: (f64, f64) = (0.0, 50.0);
/// Raw fan-speed reading for each discrete fan level, in level order
pub const FAN_RAW_SPEEDS: [u16; 3] = [0, 125, 255];
/// Hours in the time-of-day component
pub const HOURS_PER_DAY: u8 = 24;

/// Discretized temperature bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TempBucket {
    /// Below 22 degrees
    Low,
    /// 22 to 28 degrees inclusive
    Normal,
    /// Above 28 degrees
    High,
}

impl TempBucket {
    /// Bucket a raw temperature reading
    #[must_use]
    pub fn from_temperature(celsius: f64) -> Self {
        if celsius < TEMP_LOW_MAX {
            Self::Low
        } else if celsius <= TEMP_NORMAL_MAX {
            Self::Normal
        } else {
            Self::High
        }
    }

    /// Stable index of this bucket
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::High => 2,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Low),
            1 => Some(Self::Normal),
            2 => Some(Self::High),
            _ => None,
        }
    }
}

/// Discretized fan level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanLevel {
    /// Fan off (raw speed 0)
    Off,
    /// Low speed (raw speed 125)
    Low,
    /// High speed (raw speed 255)
    High,
}

impl FanLevel {
    /// Map a raw fan-speed reading onto its level
    ///
    /// Only the three fixed raw values are valid; anything else is a
    /// malformed sample.
    pub fn from_raw_speed(raw: u16) -> Result<Self> {
        match raw {
            0 => Ok(Self::Off),
            125 => Ok(Self::Low),
            255 => Ok(Self::High),
            other => Err(EngineError::InvalidInput {
                field: "fan_speed",
                value: f64::from(other),
            }),
        }
    }

    /// Stable index of this level
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Low => 1,
            Self::High => 2,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Off),
            1 => Some(Self::Low),
            2 => Some(Self::High),
            _ => None,
        }
    }
}

/// Raw sensor readings as supplied by the caller
///
/// Field ranges: temperature in `[0, 50]`, motion and light state in
/// `{0, 1}`, fan speed in `{0, 125, 255}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Motion detected (0 or 1)
    pub motion: u8,
    /// Current light state (0 or 1)
    pub light_state: u8,
    /// Raw fan-speed reading (0, 125 or 255)
    pub fan_speed: u16,
}

impl RawSample {
    /// Validate every field, naming the first offending one
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = TEMP_VALID_RANGE;
        if !(lo..=hi).contains(&self.temperature) {
            return Err(EngineError::InvalidInput {
                field: "temperature",
                value: self.temperature,
            });
        }
        if self.motion > 1 {
            return Err(EngineError::InvalidInput {
                field: "motion",
                value: f64::from(self.motion),
            });
        }
        if self.light_state > 1 {
            return Err(EngineError::InvalidInput {
                field: "light_state",
                value: f64::from(self.light_state),
            });
        }
        FanLevel::from_raw_speed(self.fan_speed)?;
        Ok(())
    }
}

/// Discretized environmental state
///
/// Serializes as the 5-int array `[temp, motion, hour, light, fan]`, the
/// wire layout the transition log persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u8; 5]", try_from = "[u8; 5]")]
pub struct EnvState {
    /// Temperature bucket
    pub temp: TempBucket,
    /// Motion detected
    pub motion: bool,
    /// Hour of day in the reference timezone (0..24)
    pub hour: u8,
    /// Light on
    pub light: bool,
    /// Fan level
    pub fan: FanLevel,
}

impl EnvState {
    /// The state components as the canonical 5-int tuple
    #[must_use]
    pub fn components(&self) -> [u8; 5] {
        [
            self.temp.index() as u8,
            u8::from(self.motion),
            self.hour,
            u8::from(self.light),
            self.fan.index() as u8,
        ]
    }
}

impl From<EnvState> for [u8; 5] {
    fn from(state: EnvState) -> Self {
        state.components()
    }
}

impl TryFrom<[u8; 5]> for EnvState {
    type Error = String;

    fn try_from(parts: [u8; 5]) -> std::result::Result<Self, Self::Error> {
        let temp = TempBucket::from_index(parts[0] as usize)
            .ok_or_else(|| format!("temperature bucket out of range: {}", parts[0]))?;
        if parts[1] > 1 {
            return Err(format!("motion out of range: {}", parts[1]));
        }
        if parts[2] >= HOURS_PER_DAY {
            return Err(format!("hour out of range: {}", parts[2]));
        }
        if parts[3] > 1 {
            return Err(format!("light state out of range: {}", parts[3]));
        }
        let fan = FanLevel::from_index(parts[4] as usize)
            .ok_or_else(|| format!("fan level out of range: {}", parts[4]))?;
        Ok(Self {
            temp,
            motion: parts[1] == 1,
            hour: parts[2],
            light: parts[3] == 1,
            fan,
        })
    }
}

/// The full discrete state universe and its canonical indexing
///
/// The universe is the Cartesian product of the five component ranges,
/// enumerated temp → motion → hour → light → fan. `index` and `state`
/// form a bijection over it; the mapping is closed-form and never changes
/// for the process lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateSpace;

impl StateSpace {
    /// Number of states in the universe (3 x 2 x 24 x 2 x 3)
    pub const NUM_STATES: usize = 3 * 2 * 24 * 2 * 3;

    /// Canonical index of a state
    #[must_use]
    pub fn index(&self, state: &EnvState) -> usize {
        let [temp, motion, hour, light, fan] = state.components();
        ((((temp as usize * 2 + motion as usize) * 24 + hour as usize) * 2 + light as usize) * 3)
            + fan as usize
    }

    /// State at a canonical index
    ///
    /// # Panics
    /// Panics if `index >= NUM_STATES`.
    #[must_use]
    pub fn state(&self, index: usize) -> EnvState {
        assert!(index < Self::NUM_STATES, "state index out of range: {index}");
        let fan = index % 3;
        let rest = index / 3;
        let light = rest % 2;
        let rest = rest / 2;
        let hour = rest % 24;
        let rest = rest / 24;
        let motion = rest % 2;
        let temp = rest / 2;
        EnvState::try_from([temp as u8, motion as u8, hour as u8, light as u8, fan as u8])
            .expect("decomposed components are in range")
    }

    /// Iterate the universe in canonical order
    pub fn states(&self) -> impl Iterator<Item = EnvState> + '_ {
        (0..Self::NUM_STATES).map(|i| self.state(i))
    }

    /// Discretize a validated raw sample at a given hour of day
    ///
    /// Pure and total over valid inputs; an out-of-range field fails with
    /// `InvalidInput` and must leave caller state untouched.
    pub fn discretize(&self, sample: &RawSample, hour: u8) -> Result<EnvState> {
        sample.validate()?;
        if hour >= HOURS_PER_DAY {
            return Err(EngineError::InvalidInput {
                field: "hour",
                value: f64::from(hour),
            });
        }
        Ok(EnvState {
            temp: TempBucket::from_temperature(sample.temperature),
            motion: sample.motion == 1,
            hour,
            light: sample.light_state == 1,
            fan: FanLevel::from_raw_speed(sample.fan_speed)?,
        })
    }
}
