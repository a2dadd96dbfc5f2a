//! Tabular Q-learning engine for the ambient comfort agent
//!
//! This crate provides the learning side of the system:
//! - the dense action-value table with durable snapshots
//! - the decaying epsilon-greedy exploration policy
//! - the bounded transition audit log
//! - the `LearningEngine` that serializes observe/choose/feedback cycles

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod log;
pub mod policy;
pub mod qtable;

// Re-export the engine surface
pub use config::AgentConfig;
pub use engine::{EngineMetrics, LearningEngine};
pub use log::TransitionLog;
pub use policy::EpsilonGreedy;
pub use qtable::QTable;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AgentConfig, LearningEngine, QTable};
    pub use ambient_rl_core::prelude::*;
}
