//! Task definition — periodic simulated work
//!
//! Each task has a fixed period, a nominal execution time per activation and a
//! static priority. Time is measured in ticks; one tick is one simulated
//! millisecond.

use core::fmt;

use crate::clock::next_deadline;
use crate::error::{Result, SimError};

/// Maximum tasks a simulation can hold
pub const MAX_TASKS: usize = 16;

/// Task name capacity in bytes
pub const NAME_LEN: usize = 16;

/// Display label for a task
pub type TaskName = heapless::String<NAME_LEN>;

/// Unique task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskId(pub u32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Task priority (lower number = higher priority)
///
/// `0` is rejected at validation time, so `HIGHEST` is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskPriority(pub u8);

impl TaskPriority {
    /// Highest usable priority
    pub const HIGHEST: TaskPriority = TaskPriority(1);
    /// Lowest priority
    pub const LOWEST: TaskPriority = TaskPriority(u8::MAX);
}

/// Task execution state
///
/// ```text
///   Ready ──select──► Running ──remaining = 0──► Completed
///     ▲                  │                           │
///     └────preempted─────┘                           │
///     └──────────────next activation─────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskState {
    /// Waiting for the CPU
    Ready,
    /// Selected for the current tick
    Running,
    /// Taken out of scheduling by the user
    Blocked,
    /// Work for this activation is done
    Completed,
}

/// Input form of a task, as handed over by a front-end
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskDescriptor {
    pub id: TaskId,
    pub name: TaskName,
    pub priority: TaskPriority,
    /// Ticks between activations
    pub period: u32,
    /// Ticks of work per activation
    pub execution_time: u32,
}

impl TaskDescriptor {
    /// Build a descriptor; `name` is truncated to [`NAME_LEN`] bytes
    pub fn new(id: u32, name: &str, priority: u8, period: u32, execution_time: u32) -> Self {
        Self {
            id: TaskId(id),
            name: truncated_name(name),
            priority: TaskPriority(priority),
            period,
            execution_time,
        }
    }

    /// Reject descriptors the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        let id = self.id.0;
        if self.period == 0 {
            return Err(SimError::InvalidPeriod { id });
        }
        if self.execution_time == 0 {
            return Err(SimError::InvalidExecutionTime { id });
        }
        if self.priority.0 == 0 {
            return Err(SimError::InvalidPriority { id });
        }
        Ok(())
    }
}

/// Copy as much of `name` as fits, never splitting a character
fn truncated_name(name: &str) -> TaskName {
    let mut out = TaskName::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Runtime view of a periodic task
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub name: TaskName,
    pub priority: TaskPriority,
    /// Ticks between activations
    pub period: u32,
    /// Ticks of work per activation
    pub execution_time: u32,
    /// Work left in the current activation, always `<= execution_time`
    pub remaining_time: u32,
    pub state: TaskState,
    /// Ticks spent ready but not running since the last activation
    pub wait_time: u64,
    /// Tick of the most recent transition into `Running`
    pub last_execution_start: Option<u64>,
}

impl Task {
    /// Fresh task at its first activation
    pub fn from_descriptor(desc: &TaskDescriptor) -> Self {
        Self {
            id: desc.id,
            name: desc.name.clone(),
            priority: desc.priority,
            period: desc.period,
            execution_time: desc.execution_time,
            remaining_time: desc.execution_time,
            state: TaskState::Ready,
            wait_time: 0,
            last_execution_start: None,
        }
    }

    /// Can this task take the CPU this tick?
    pub fn is_ready(&self) -> bool {
        matches!(self.state, TaskState::Ready | TaskState::Running) && self.remaining_time > 0
    }

    /// Is `now` one of this task's activation points (excluding t = 0)?
    pub fn is_due(&self, now: u64) -> bool {
        self.period > 0 && now > 0 && now % u64::from(self.period) == 0
    }

    /// Start a new activation. Returns the work left over from the previous one.
    pub(crate) fn activate(&mut self) -> u32 {
        let leftover = self.remaining_time;
        self.remaining_time = self.execution_time;
        self.wait_time = 0;
        self.state = TaskState::Ready;
        leftover
    }

    /// Run for one tick. Returns true if the activation just completed.
    pub(crate) fn execute_tick(&mut self) -> bool {
        self.remaining_time = self.remaining_time.saturating_sub(1);
        if self.remaining_time == 0 {
            self.state = TaskState::Completed;
            return true;
        }
        false
    }

    /// Absolute deadline of the current period
    pub fn next_deadline(&self, now: u64) -> u64 {
        next_deadline(now, self.period)
    }

    /// Activations per second of simulated time
    pub fn frequency_hz(&self) -> f32 {
        if self.period == 0 {
            0.0
        } else {
            1000.0 / self.period as f32
        }
    }

    /// CPU share demanded by this task
    pub fn utilization(&self) -> f32 {
        if self.period == 0 {
            0.0
        } else {
            self.execution_time as f32 / self.period as f32
        }
    }
}

/// An activation that found unfinished work from the previous instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeadlineMiss {
    pub task: TaskId,
    /// Tick of the activation that detected the miss
    pub time: u64,
    /// Work the previous instance still had left
    pub remaining: u32,
}
