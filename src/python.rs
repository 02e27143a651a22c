//! Python bindings (PyO3)
//!
//! Exposes [`Simulator`] as `rtos_sim.Simulator` for notebooks and UI
//! front-ends. Everything crosses the boundary as plain tuples and dicts.
//!
//! ```python
//! import rtos_sim
//! sim = rtos_sim.Simulator([(1, "sensor", 1, 50, 10), (2, "motor", 2, 200, 30)], "edf")
//! sim.run_for(100)
//! sim.recent(10)   # [(time, task_id | None), ...]
//! ```

use std::string::{String, ToString};
use std::vec::Vec;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::policy::{Policy, SchedulerPolicy};
use crate::simulator::Simulator;
use crate::task::{TaskDescriptor, TaskId, TaskState};

impl From<SimError> for PyErr {
    fn from(err: SimError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

fn state_name(state: TaskState) -> &'static str {
    match state {
        TaskState::Ready => "ready",
        TaskState::Running => "running",
        TaskState::Blocked => "blocked",
        TaskState::Completed => "completed",
    }
}

/// `(id, name, priority, period, execution_time)`
type PyDescriptor = (u32, String, u8, u32, u32);

#[pyclass(name = "Simulator")]
pub struct PySimulator {
    inner: Simulator,
}

#[pymethods]
impl PySimulator {
    #[new]
    #[pyo3(signature = (descriptors, policy = "priority", tick_interval_ms = 100))]
    fn new(descriptors: Vec<PyDescriptor>, policy: &str, tick_interval_ms: u32) -> PyResult<Self> {
        let descriptors: Vec<TaskDescriptor> = descriptors
            .iter()
            .map(|(id, name, priority, period, exec)| {
                TaskDescriptor::new(*id, name, *priority, *period, *exec)
            })
            .collect();
        let config = SimConfig {
            policy: policy.parse::<Policy>()?,
            tick_interval_ms,
        };
        Ok(Self {
            inner: Simulator::new(&descriptors, config)?,
        })
    }

    /// One tick; returns `(time, task_id | None, [missed task ids])`
    fn tick(&mut self) -> (u64, Option<u32>, Vec<u32>) {
        let report = self.inner.tick();
        let missed = report.misses.iter().map(|m| m.task.0).collect();
        (report.sample.time, report.sample.running.map(|id| id.0), missed)
    }

    /// Batch run; returns the run statistics as a dict
    fn run_for<'py>(&mut self, py: Python<'py>, ticks: u64) -> PyResult<Bound<'py, PyDict>> {
        let stats = self.inner.run_for(ticks);
        let dict = PyDict::new_bound(py);
        dict.set_item("total_ticks", stats.total_ticks)?;
        dict.set_item("busy_ticks", stats.busy_ticks)?;
        dict.set_item("idle_ticks", stats.idle_ticks)?;
        dict.set_item("context_switches", stats.context_switches)?;
        dict.set_item("deadline_misses", stats.deadline_misses)?;
        dict.set_item("utilization", stats.utilization)?;
        dict.set_item("schedulable", stats.schedulable)?;
        Ok(dict)
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    #[getter]
    fn running(&self) -> bool {
        self.inner.is_running()
    }

    #[getter]
    fn now(&self) -> u64 {
        self.inner.now()
    }

    #[getter]
    fn policy(&self) -> &'static str {
        self.inner.policy().name()
    }

    fn reset(&mut self) -> PyResult<()> {
        Ok(self.inner.reset()?)
    }

    fn set_policy(&mut self, name: &str) -> PyResult<()> {
        self.inner.set_policy(name.parse::<Policy>()?);
        Ok(())
    }

    fn block(&mut self, id: u32) -> PyResult<()> {
        Ok(self.inner.block(TaskId(id))?)
    }

    fn unblock(&mut self, id: u32) -> PyResult<()> {
        Ok(self.inner.unblock(TaskId(id))?)
    }

    /// Task snapshot as a list of dicts
    fn tasks<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .tasks()
            .iter()
            .map(|t| {
                let dict = PyDict::new_bound(py);
                dict.set_item("id", t.id.0)?;
                dict.set_item("name", t.name.as_str())?;
                dict.set_item("priority", t.priority.0)?;
                dict.set_item("period", t.period)?;
                dict.set_item("execution_time", t.execution_time)?;
                dict.set_item("remaining_time", t.remaining_time)?;
                dict.set_item("state", state_name(t.state))?;
                dict.set_item("wait_time", t.wait_time)?;
                dict.set_item("last_execution_start", t.last_execution_start)?;
                Ok(dict)
            })
            .collect()
    }

    /// Last `n` samples, oldest first
    fn recent(&self, n: usize) -> Vec<(u64, Option<u32>)> {
        self.inner
            .recent(n)
            .map(|s| (s.time, s.running.map(|id| id.0)))
            .collect()
    }
}

#[pymodule]
fn rtos_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimulator>()?;
    m.add(
        "POLICIES",
        Vec::from(["priority", "round-robin", "sjf", "edf"]),
    )?;
    Ok(())
}
