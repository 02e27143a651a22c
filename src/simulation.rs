//! Simulation step — one tick of scheduling
//!
//! All mutable state lives in [`SimulationState`], which [`tick`] takes by
//! value and hands back advanced by one tick. Nothing else is touched, so a
//! front-end, a test or a notebook can drive the simulation with plain
//! function calls.
//!
//! Per tick:
//! 1. activate tasks whose period boundary is now
//! 2. collect the ready set
//! 3. ask the policy for a task
//! 4. demote a preempted task to `Ready`
//! 5. run the selected task for one tick
//! 6. charge one tick of waiting to every other ready task
//! 7. record the decision in the history
//! 8. advance the clock

use log::{debug, trace};

use crate::clock::SimulationClock;
use crate::error::Result;
use crate::history::{ExecutionSample, HistoryLog};
use crate::policy::SchedulerPolicy;
use crate::task::{TaskDescriptor, TaskId, TaskState};
use crate::taskset::{Misses, TaskSet};

/// Everything a running simulation owns
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub tasks: TaskSet,
    pub clock: SimulationClock,
    pub history: HistoryLog,
    /// Task chosen on the previous tick
    last_selected: Option<TaskId>,
}

impl SimulationState {
    /// Fresh state at t = 0 with every task ready
    pub fn new(descriptors: &[TaskDescriptor], tick_interval_ms: u32) -> Result<Self> {
        Ok(Self {
            tasks: TaskSet::initialize(descriptors)?,
            clock: SimulationClock::new(tick_interval_ms),
            history: HistoryLog::new(),
            last_selected: None,
        })
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Task chosen on the previous tick
    pub fn last_selected(&self) -> Option<TaskId> {
        self.last_selected
    }
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub sample: ExecutionSample,
    /// Deadline misses detected by this tick's activations
    pub misses: Misses,
    /// The CPU moved from one task to a different one
    pub context_switch: bool,
}

/// Advance `state` by one tick under `policy`
pub fn tick(mut state: SimulationState, policy: &dyn SchedulerPolicy) -> (SimulationState, TickReport) {
    let now = state.clock.now();

    let misses = state.tasks.activate_due(now);

    let ready = state.tasks.ready_tasks();
    let selected = policy.select(&ready, state.last_selected, now);
    let previous = state.last_selected;

    for task in state.tasks.iter_mut() {
        if Some(task.id) == selected {
            let was_running = task.state == TaskState::Running;
            task.state = TaskState::Running;
            if !was_running {
                task.last_execution_start = Some(now);
            }
            task.execute_tick();
        } else {
            if task.state == TaskState::Running {
                debug!("t={}: {} preempted", now, task.id);
                task.state = TaskState::Ready;
            }
            if task.is_ready() {
                task.wait_time += 1;
            }
        }
    }

    let context_switch = matches!((previous, selected), (Some(a), Some(b)) if a != b);
    if context_switch {
        debug!("t={}: context switch {:?} -> {:?}", now, previous, selected);
    }
    trace!("t={} [{}] running {:?}", now, policy.name(), selected);

    let sample = ExecutionSample {
        time: now,
        running: selected,
    };
    state.history.append(sample);
    state.last_selected = selected;
    state.clock.advance();

    (
        state,
        TickReport {
            sample,
            misses,
            context_switch,
        },
    )
}
