//! Simulator errors
//!
//! Everything here is a pre-run validation failure or a bad lookup.
//! Deadline misses are *not* errors; see [`crate::task::DeadlineMiss`].

use thiserror::Error;

/// Errors raised while building or driving a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// Period must be at least one tick
    #[error("task {id}: period must be > 0")]
    InvalidPeriod { id: u32 },
    /// Execution time must be at least one tick
    #[error("task {id}: execution time must be > 0")]
    InvalidExecutionTime { id: u32 },
    /// Priority 0 is reserved (1 is the highest usable priority)
    #[error("task {id}: priority must be > 0")]
    InvalidPriority { id: u32 },
    /// Two descriptors share an id
    #[error("duplicate task id {id}")]
    DuplicateId { id: u32 },
    /// Task table is full
    #[error("too many tasks (max {max})")]
    TooManyTasks { max: usize },
    /// No task with this id
    #[error("unknown task {id}")]
    UnknownTask { id: u32 },
    /// Policy name not recognised
    #[error("unknown scheduling policy")]
    UnknownPolicy,
    /// Display tick interval must be non-zero
    #[error("tick interval must be > 0 ms")]
    InvalidTickInterval,
}

/// Result alias used across the crate
pub type Result<T> = core::result::Result<T, SimError>;
