//! Run configuration
//!
//! Compile-time limits live next to the types they bound (`MAX_TASKS`,
//! `NAME_LEN`, `HISTORY_WINDOW`). This module holds what a front-end picks at
//! runtime, plus the task set the teaching pages start from.

use crate::clock::DEFAULT_TICK_INTERVAL_MS;
use crate::error::{Result, SimError};
use crate::policy::Policy;
use crate::task::TaskDescriptor;

/// Runtime settings for a [`crate::Simulator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Scheduling policy
    pub policy: Policy,
    /// Wall-clock spacing between ticks. Display-only: simulated time always
    /// advances one millisecond per tick.
    pub tick_interval_ms: u32,
}

impl SimConfig {
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(SimError::InvalidTickInterval);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

/// The four demo tasks: priorities 1–4, periods 50/200/300/500 ms
///
/// Total utilization 0.583, under the n=4 Rate-Monotonic bound (0.757).
pub fn default_task_set() -> [TaskDescriptor; 4] {
    [
        TaskDescriptor::new(1, "Sensor Read", 1, 50, 10),
        TaskDescriptor::new(2, "Motor Control", 2, 200, 30),
        TaskDescriptor::new(3, "Communication", 3, 300, 40),
        TaskDescriptor::new(4, "Logging", 4, 500, 50),
    ]
}
