//! The update/learning loop
//!
//! `LearningEngine` owns the Q-table, exploration policy, pending state,
//! and transition log behind one mutex, so every observe/choose/feedback
//! cycle is atomic with respect to concurrent callers and feedback N is
//! fully applied before feedback N+1 begins. Persistence failures degrade
//! durability only: the in-memory update stays authoritative and the next
//! successful persist reconciles.

use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ambient_rl_core::{
    reward, Action, Clock, EngineError, EnvState, RawSample, Result, StateSpace, SystemClock,
    Transition,
};

use crate::config::AgentConfig;
use crate::log::TransitionLog;
use crate::policy::EpsilonGreedy;
use crate::qtable::QTable;

/// Read-only snapshot of engine counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineMetrics {
    /// Bellman updates applied (feedback and overrides)
    pub total_updates: usize,
    /// Manual overrides penalized
    pub total_overrides: usize,
    /// Explicit resets
    pub total_resets: usize,
    /// Current exploration rate
    pub exploration_rate: f64,
    /// Retained transition records
    pub log_entries: usize,
}

struct Inner {
    table: QTable,
    policy: EpsilonGreedy,
    log: TransitionLog,
    pending: Option<EnvState>,
    total_updates: usize,
    total_overrides: usize,
    total_resets: usize,
}

/// The tabular learning engine
///
/// Construct once per process and inject it into the request-handling
/// layer; all shared mutable state lives inside.
pub struct LearningEngine {
    config: AgentConfig,
    clock: Box<dyn Clock>,
    space: StateSpace,
    inner: Mutex<Inner>,
}

impl LearningEngine {
    /// Create an engine on the wall clock, recovering persisted state
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create an engine with an injected hour-of-day source
    #[must_use]
    pub fn with_clock(config: AgentConfig, clock: Box<dyn Clock>) -> Self {
        let table = QTable::recover(&config.table_path, config.learning_rate, config.discount);
        let log = TransitionLog::load(&config.log_path, config.max_log_entries);
        let policy = EpsilonGreedy::new(
            config.initial_exploration,
            config.min_exploration,
            config.exploration_decay,
        );
        Self {
            clock,
            space: StateSpace,
            inner: Mutex::new(Inner {
                table,
                policy,
                log,
                pending: None,
                total_updates: 0,
                total_overrides: 0,
                total_resets: 0,
            }),
            config,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panicked holder leaves no half-applied invariant worth dying
        // for: the table is always a valid matrix and pending is a plain
        // Option. Keep serving rather than crash the process.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Record a fresh environment observation
    ///
    /// Discretizes the sample at the clock's current hour and replaces any
    /// pending state; repeated observations before feedback simply re-arm
    /// with no table mutation.
    pub fn observe(&self, sample: &RawSample) -> Result<EnvState> {
        let state = self.space.discretize(sample, self.clock.hour_of_day())?;
        self.lock().pending = Some(state);
        Ok(state)
    }

    /// Select an action for the pending state
    ///
    /// Fails with `NoObservation` before the first observation; decays the
    /// exploration rate on every successful call.
    pub fn choose_action(&self) -> Result<Action> {
        let mut inner = self.lock();
        let state = inner.pending.ok_or(EngineError::NoObservation)?;
        let Inner { table, policy, .. } = &mut *inner;
        Ok(policy.choose(&mut rand::thread_rng(), table, &state))
    }

    /// Apply feedback for the pending transition and return its reward
    ///
    /// Scores the transition from the pending state's factors and the new
    /// raw readings, applies the Bellman update, records the transition,
    /// persists both artifacts, and re-arms on the post-action state.
    pub fn feedback(&self, sample: &RawSample, action: Action, hour: u8) -> Result<i32> {
        let next = self.space.discretize(sample, hour)?;
        let mut inner = self.lock();
        let state = inner.pending.ok_or(EngineError::NoObservation)?;

        let reward = reward::score(&state, sample, action, hour);
        self.apply(&mut inner, state, action, reward, next);
        inner.pending = Some(next);
        Ok(reward)
    }

    /// Penalize the agent for a human override
    ///
    /// The action the policy would have chosen for the pending state is
    /// trained with the fixed override penalty against the post-override
    /// reading, ignoring the shaped reward. Returns the penalized action,
    /// or `None` when no observation was pending (acknowledged, no update).
    /// The pending state is intentionally left unchanged.
    pub fn manual_override(&self, sample: &RawSample, hour: u8) -> Result<Option<Action>> {
        let next = self.space.discretize(sample, hour)?;
        let mut inner = self.lock();
        let Some(state) = inner.pending else {
            return Ok(None);
        };

        let Inner { table, policy, .. } = &mut *inner;
        let action = policy.choose(&mut rand::thread_rng(), table, &state);
        let penalty = self.config.override_penalty;
        self.apply(&mut inner, state, action, penalty, next);
        inner.total_overrides += 1;
        info!(%action, penalty, "manual override penalized");
        Ok(Some(action))
    }

    /// Forget the pending state and relearn from scratch
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.table.reset();
        persist_table(&inner.table, &self.config.table_path);
        inner.log.clear();
        persist_log(&inner.log, &self.config.log_path);
        inner.policy.reset();
        inner.pending = None;
        inner.total_resets += 1;
        info!("engine reset: table reinitialized, log cleared");
    }

    /// Current exploration rate, without decay
    #[must_use]
    pub fn exploration_rate(&self) -> f64 {
        self.lock().policy.rate()
    }

    /// Counter snapshot
    #[must_use]
    pub fn metrics(&self) -> EngineMetrics {
        let inner = self.lock();
        EngineMetrics {
            total_updates: inner.total_updates,
            total_overrides: inner.total_overrides,
            total_resets: inner.total_resets,
            exploration_rate: inner.policy.rate(),
            log_entries: inner.log.len(),
        }
    }

    /// Update the table, append to the log, and persist both
    fn apply(&self, inner: &mut Inner, state: EnvState, action: Action, reward: i32, next: EnvState) {
        inner.table.update(&state, action, f64::from(reward), &next);
        persist_table(&inner.table, &self.config.table_path);
        inner.log.push(Transition {
            state,
            action,
            reward,
            next_state: next,
        });
        persist_log(&inner.log, &self.config.log_path);
        inner.total_updates += 1;
    }
}

fn persist_table(table: &QTable, path: &Path) {
    if let Err(err) = table.persist(path) {
        warn!(path = %path.display(), %err, "failed to persist Q-table snapshot");
    }
}

fn persist_log(log: &TransitionLog, path: &Path) {
    if let Err(err) = log.persist(path) {
        warn!(path = %path.display(), %err, "failed to persist transition log");
    }
}
