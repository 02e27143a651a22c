//! Task set — authoritative task table
//!
//! Fixed-capacity table, no dynamic allocation. Holds every task's runtime
//! state; the step function in [`crate::simulation`] is the only writer
//! during a run. Also carries the Rate-Monotonic schedulability test used to
//! annotate a task set for students.

use heapless::Vec;
use log::warn;

use crate::error::{Result, SimError};
use crate::task::{DeadlineMiss, Task, TaskDescriptor, TaskId, TaskState, MAX_TASKS};

/// Misses detected during one activation pass
pub type Misses = Vec<DeadlineMiss, MAX_TASKS>;

/// Tasks eligible for the CPU on one tick
pub type ReadySet = Vec<Task, MAX_TASKS>;

/// Fixed-capacity table of periodic tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task, MAX_TASKS>,
}

impl TaskSet {
    /// Validate `descriptors` and build a task set with every task at its
    /// first activation
    pub fn initialize(descriptors: &[TaskDescriptor]) -> Result<Self> {
        if descriptors.len() > MAX_TASKS {
            return Err(SimError::TooManyTasks { max: MAX_TASKS });
        }

        let mut tasks: Vec<Task, MAX_TASKS> = Vec::new();
        for desc in descriptors {
            desc.validate()?;
            if tasks.iter().any(|t| t.id == desc.id) {
                return Err(SimError::DuplicateId { id: desc.id.0 });
            }
            tasks
                .push(Task::from_descriptor(desc))
                .map_err(|_| SimError::TooManyTasks { max: MAX_TASKS })?;
        }
        Ok(Self { tasks })
    }

    /// Start a new activation for every task whose period boundary is `now`
    ///
    /// An activation that still finds work left marks a deadline miss for the
    /// previous instance. Misses are logged and returned; the run goes on.
    /// Blocked tasks are left alone.
    pub fn activate_due(&mut self, now: u64) -> Misses {
        let mut misses = Misses::new();
        for task in self.tasks.iter_mut() {
            if task.state == TaskState::Blocked || !task.is_due(now) {
                continue;
            }
            let leftover = task.activate();
            if leftover > 0 {
                warn!(
                    "deadline miss: {} ({}) at t={} with {} ms of work left",
                    task.id, task.name, now, leftover
                );
                // Capacity equals the task table, so this cannot overflow
                let _ = misses.push(DeadlineMiss {
                    task: task.id,
                    time: now,
                    remaining: leftover,
                });
            }
        }
        misses
    }

    /// Snapshot of the tasks that may run this tick, in table order
    pub fn ready_tasks(&self) -> ReadySet {
        let mut ready = ReadySet::new();
        for task in self.tasks.iter().filter(|t| t.is_ready()) {
            // Capacity equals the task table, so this cannot overflow
            let _ = ready.push(task.clone());
        }
        ready
    }

    /// Task currently marked `Running`, if any
    pub fn running(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.state == TaskState::Running)
    }

    /// Look up a task
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look up a task for mutation
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// All tasks, in table order
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take a task out of scheduling
    pub fn block(&mut self, id: TaskId) -> Result<()> {
        let task = self.get_mut(id).ok_or(SimError::UnknownTask { id: id.0 })?;
        task.state = TaskState::Blocked;
        Ok(())
    }

    /// Return a blocked task to scheduling
    ///
    /// Unblocking a task that is not blocked is a no-op.
    pub fn unblock(&mut self, id: TaskId) -> Result<()> {
        let task = self.get_mut(id).ok_or(SimError::UnknownTask { id: id.0 })?;
        if task.state == TaskState::Blocked {
            task.state = if task.remaining_time > 0 {
                TaskState::Ready
            } else {
                TaskState::Completed
            };
        }
        Ok(())
    }

    /// Total CPU utilization (sum of Ci/Ti)
    pub fn total_utilization(&self) -> f32 {
        self.tasks.iter().map(Task::utilization).sum()
    }

    /// RMS schedulability test
    ///
    /// Liu & Layland bound: U ≤ n(2^(1/n) - 1). Sufficient, not necessary.
    pub fn is_rm_schedulable(&self) -> bool {
        let n = self.tasks.len();
        if n == 0 {
            return true;
        }
        self.total_utilization() <= liu_layland_bound(n)
    }
}

/// Liu & Layland bound: n(2^(1/n) - 1)
///
/// Precomputed for small n, ln(2) beyond.
fn liu_layland_bound(n: usize) -> f32 {
    const BOUNDS: [f32; 10] = [
        1.000, // n=0: unused
        1.000, // n=1
        0.828, // n=2
        0.780, // n=3
        0.757, // n=4
        0.743, // n=5
        0.735, // n=6
        0.729, // n=7
        0.724, // n=8
        0.693, // n≥9: ln(2)
    ];
    BOUNDS[n.min(9)]
}
