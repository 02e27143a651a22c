//! Scheduling policies
//!
//! A policy is a pure selection rule: given the tasks that may run this tick,
//! the task picked on the previous tick and the current time, it names the
//! task to run. Policies never mutate anything; the step function applies
//! their decision.

use core::fmt;
use core::str::FromStr;

use crate::error::SimError;
use crate::task::{Task, TaskId};

/// Selection rule shared by every policy
pub trait SchedulerPolicy {
    /// Short display name
    fn name(&self) -> &'static str;

    /// Pick the task to run at `now`, or `None` when `ready` is empty
    ///
    /// `ready` is in task-table order; `previous` is the task selected on the
    /// previous tick.
    fn select(&self, ready: &[Task], previous: Option<TaskId>, now: u64) -> Option<TaskId>;
}

/// First task minimising `key`; ties go to the earliest entry
fn first_min_by_key<K: Ord>(ready: &[Task], key: impl Fn(&Task) -> K) -> Option<TaskId> {
    let mut best: Option<(&Task, K)> = None;
    for task in ready {
        let k = key(task);
        let better = match &best {
            Some((_, best_k)) => k < *best_k,
            None => true,
        };
        if better {
            best = Some((task, k));
        }
    }
    best.map(|(task, _)| task.id)
}

/// Fixed-priority preemptive: lowest priority number wins
#[derive(Debug, Clone, Copy, Default)]
pub struct PreemptivePriority;

impl SchedulerPolicy for PreemptivePriority {
    fn name(&self) -> &'static str {
        "preemptive-priority"
    }

    fn select(&self, ready: &[Task], _previous: Option<TaskId>, _now: u64) -> Option<TaskId> {
        first_min_by_key(ready, |t| t.priority)
    }
}

/// Round-robin with a one-tick quantum
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl SchedulerPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn select(&self, ready: &[Task], previous: Option<TaskId>, _now: u64) -> Option<TaskId> {
        if ready.is_empty() {
            return None;
        }
        let next = previous
            .and_then(|prev| ready.iter().position(|t| t.id == prev))
            .map_or(0, |i| (i + 1) % ready.len());
        Some(ready[next].id)
    }
}

/// Shortest remaining work first
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestJobFirst;

impl SchedulerPolicy for ShortestJobFirst {
    fn name(&self) -> &'static str {
        "shortest-job-first"
    }

    fn select(&self, ready: &[Task], _previous: Option<TaskId>, _now: u64) -> Option<TaskId> {
        first_min_by_key(ready, |t| t.remaining_time)
    }
}

/// Earliest end-of-period first
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestDeadlineFirst;

impl SchedulerPolicy for EarliestDeadlineFirst {
    fn name(&self) -> &'static str {
        "earliest-deadline-first"
    }

    fn select(&self, ready: &[Task], _previous: Option<TaskId>, now: u64) -> Option<TaskId> {
        first_min_by_key(ready, |t| t.next_deadline(now))
    }
}

/// The four built-in policies, selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Policy {
    #[default]
    PreemptivePriority,
    RoundRobin,
    ShortestJobFirst,
    EarliestDeadlineFirst,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::PreemptivePriority,
        Policy::RoundRobin,
        Policy::ShortestJobFirst,
        Policy::EarliestDeadlineFirst,
    ];

    fn strategy(&self) -> &'static dyn SchedulerPolicy {
        match self {
            Policy::PreemptivePriority => &PreemptivePriority,
            Policy::RoundRobin => &RoundRobin,
            Policy::ShortestJobFirst => &ShortestJobFirst,
            Policy::EarliestDeadlineFirst => &EarliestDeadlineFirst,
        }
    }
}

impl SchedulerPolicy for Policy {
    fn name(&self) -> &'static str {
        self.strategy().name()
    }

    fn select(&self, ready: &[Task], previous: Option<TaskId>, now: u64) -> Option<TaskId> {
        self.strategy().select(ready, previous, now)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const NAMES: [(&str, Policy); 8] = [
            ("priority", Policy::PreemptivePriority),
            ("preemptive-priority", Policy::PreemptivePriority),
            ("round-robin", Policy::RoundRobin),
            ("rr", Policy::RoundRobin),
            ("sjf", Policy::ShortestJobFirst),
            ("shortest-job-first", Policy::ShortestJobFirst),
            ("edf", Policy::EarliestDeadlineFirst),
            ("earliest-deadline-first", Policy::EarliestDeadlineFirst),
        ];
        let s = s.trim();
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, policy)| *policy)
            .ok_or(SimError::UnknownPolicy)
    }
}
