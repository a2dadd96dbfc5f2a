//! Engine configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the learning engine
///
/// The defaults are the canonical hyperparameters; the two paths name the
/// durable artifacts (Q-table snapshot and transition log).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate (alpha)
    pub learning_rate: f64,
    /// Discount factor (gamma)
    pub discount: f64,
    /// Initial exploration rate
    pub initial_exploration: f64,
    /// Exploration rate floor
    pub min_exploration: f64,
    /// Multiplicative exploration decay per action selection
    pub exploration_decay: f64,
    /// Fixed reward applied when a human overrides the agent
    pub override_penalty: i32,
    /// Maximum retained transition records (oldest evicted first)
    pub max_log_entries: usize,
    /// Q-table snapshot path
    pub table_path: PathBuf,
    /// Transition log path
    pub log_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            initial_exploration: 1.0,
            min_exploration: 0.01,
            exploration_decay: 0.995,
            override_penalty: -20,
            max_log_entries: 100_000,
            table_path: PathBuf::from("q_table.json"),
            log_path: PathBuf::from("q_table_updates.json"),
        }
    }
}
