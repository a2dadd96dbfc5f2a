//! Core types for the ambient comfort agent
//!
//! This crate provides the domain model for a tabular Q-learning agent
//! controlling a fan and a light: the discrete state and action universes,
//! sensor-sample discretization, the reward-shaping heuristic, and the
//! transition records the learning engine persists.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod clock;
pub mod error;
pub mod reward;
pub mod state;
pub mod transition;

// Re-export core types
pub use action::Action;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{EngineError, Result};
pub use reward::score;
pub use state::{EnvState, FanLevel, RawSample, StateSpace, TempBucket};
pub use transition::Transition;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, Clock, EngineError, EnvState, FanLevel, RawSample, Result, StateSpace, TempBucket,
        Transition,
    };
}
