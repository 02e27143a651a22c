//! rtos-sim — teaching RTOS scheduler simulator
//!
//! Discrete-time simulation of periodic tasks on a single CPU:
//! - Fixed-capacity task table (no heap, no allocation)
//! - Four interchangeable policies: preemptive priority, round-robin,
//!   shortest-job-first, earliest-deadline-first
//! - Value-semantics step function: `tick(state, policy) -> (state, report)`
//! - Bounded execution trace for Gantt-style rendering
//!
//! One tick is one simulated millisecond. Deadline misses are logged through
//! the `log` facade and reported, never fatal.
//!
//! ```
//! use rtos_sim::{default_task_set, Policy, SimConfig, Simulator};
//!
//! let mut sim = Simulator::new(&default_task_set(), SimConfig::with_policy(Policy::EarliestDeadlineFirst))?;
//! let stats = sim.run_for(500);
//! assert_eq!(stats.deadline_misses, 0);
//! # Ok::<(), rtos_sim::SimError>(())
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod task;
pub mod taskset;
pub mod policy;
pub mod clock;
pub mod history;
pub mod simulation;
pub mod simulator;
pub mod config;
pub mod error;

#[cfg(feature = "python")]
pub mod python;

pub use task::{DeadlineMiss, Task, TaskDescriptor, TaskId, TaskPriority, TaskState};
pub use taskset::TaskSet;
pub use policy::{Policy, SchedulerPolicy};
pub use clock::SimulationClock;
pub use history::{ExecutionSample, HistoryLog};
pub use simulation::{tick, SimulationState, TickReport};
pub use simulator::{RunStats, Simulator};
pub use config::{default_task_set, SimConfig};
pub use error::SimError;
