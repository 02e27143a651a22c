//! Simulator — top-level driver
//!
//! Owns a [`SimulationState`], the selected policy and the start/stop flag.
//! An external periodic timer calls [`Simulator::on_timer`]; tests and batch
//! runs call [`Simulator::tick`] or [`Simulator::run_for`] directly.

use heapless::Vec;
use log::info;

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::history::ExecutionSample;
use crate::policy::Policy;
use crate::simulation::{tick, SimulationState, TickReport};
use crate::task::{Task, TaskDescriptor, TaskId, MAX_TASKS};

/// Interactive simulation driver
#[derive(Debug, Clone)]
pub struct Simulator {
    /// Descriptors the run was built from, kept for `reset`
    descriptors: Vec<TaskDescriptor, MAX_TASKS>,
    config: SimConfig,
    state: SimulationState,
    running: bool,
}

impl Simulator {
    /// Validate the inputs and build a stopped simulator at t = 0
    pub fn new(descriptors: &[TaskDescriptor], config: SimConfig) -> Result<Self> {
        config.validate()?;
        let state = SimulationState::new(descriptors, config.tick_interval_ms)?;
        let descriptors = Vec::from_slice(descriptors)
            .map_err(|_| SimError::TooManyTasks { max: MAX_TASKS })?;
        Ok(Self {
            descriptors,
            config,
            state,
            running: false,
        })
    }

    /// Advance one tick, whether or not the simulator is started
    pub fn tick(&mut self) -> TickReport {
        let state = core::mem::take(&mut self.state);
        let (state, report) = tick(state, &self.config.policy);
        self.state = state;
        report
    }

    /// Timer callback: steps only while started
    pub fn on_timer(&mut self) -> Option<TickReport> {
        if self.running {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Run `ticks` ticks back to back and summarise them
    pub fn run_for(&mut self, ticks: u64) -> RunStats {
        let mut stats = RunStats {
            utilization: self.state.tasks.total_utilization(),
            schedulable: self.state.tasks.is_rm_schedulable(),
            ..RunStats::default()
        };
        for _ in 0..ticks {
            let report = self.tick();
            stats.total_ticks += 1;
            if report.sample.running.is_some() {
                stats.busy_ticks += 1;
            } else {
                stats.idle_ticks += 1;
            }
            if report.context_switch {
                stats.context_switches += 1;
            }
            stats.deadline_misses += report.misses.len() as u64;
        }
        stats
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("simulation started at t={} ({})", self.now(), self.config.policy);
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("simulation stopped at t={}", self.now());
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Back to t = 0 with the original descriptors; the simulator stops
    pub fn reset(&mut self) -> Result<()> {
        self.state = SimulationState::new(&self.descriptors, self.config.tick_interval_ms)?;
        self.running = false;
        info!("simulation reset ({} tasks)", self.descriptors.len());
        Ok(())
    }

    /// Switch policy; takes effect on the next tick
    pub fn set_policy(&mut self, policy: Policy) {
        info!("policy: {} -> {}", self.config.policy, policy);
        self.config.policy = policy;
    }

    pub fn policy(&self) -> Policy {
        self.config.policy
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Task snapshot, in table order
    pub fn tasks(&self) -> &[Task] {
        self.state.tasks.as_slice()
    }

    /// Last `n` decisions, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ExecutionSample> + '_ {
        self.state.history.recent(n)
    }

    pub fn block(&mut self, id: TaskId) -> Result<()> {
        self.state.tasks.block(id)
    }

    pub fn unblock(&mut self, id: TaskId) -> Result<()> {
        self.state.tasks.unblock(id)
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.state.now()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }
}

/// Summary of a `run_for` batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub total_ticks: u64,
    /// Ticks with a task on the CPU
    pub busy_ticks: u64,
    pub idle_ticks: u64,
    pub context_switches: u64,
    pub deadline_misses: u64,
    /// Demanded CPU share (sum of Ci/Ti)
    pub utilization: f32,
    /// Passes the Rate-Monotonic bound
    pub schedulable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_task_set;

    fn demo() -> Simulator {
        Simulator::new(&default_task_set(), SimConfig::default()).unwrap()
    }

    #[test]
    fn test_simulator_creation() {
        let sim = demo();
        assert_eq!(sim.tasks().len(), 4);
        assert_eq!(sim.now(), 0);
        assert!(!sim.is_running());
        assert_eq!(sim.recent(10).count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            tick_interval_ms: 0,
            ..SimConfig::default()
        };
        assert_eq!(
            Simulator::new(&default_task_set(), config).err(),
            Some(SimError::InvalidTickInterval)
        );
    }

    #[test]
    fn test_timer_respects_running_flag() {
        let mut sim = demo();
        assert!(sim.on_timer().is_none());
        assert_eq!(sim.now(), 0);

        sim.start();
        assert!(sim.on_timer().is_some());
        assert!(sim.on_timer().is_some());
        assert_eq!(sim.now(), 2);

        sim.stop();
        assert!(sim.on_timer().is_none());
        assert_eq!(sim.now(), 2);
    }

    #[test]
    fn test_run_for_stats() {
        let mut sim = demo();
        let stats = sim.run_for(500);
        assert_eq!(stats.total_ticks, 500);
        assert_eq!(stats.busy_ticks + stats.idle_ticks, 500);
        // 10 activations of the 50 ms task alone account for 100 busy ticks
        assert!(stats.busy_ticks >= 100);
        assert_eq!(stats.deadline_misses, 0);
        assert!(stats.schedulable);
        assert!((stats.utilization - 0.583).abs() < 0.01);
        assert!(stats.context_switches > 0);
    }

    #[test]
    fn test_reset() {
        let mut sim = demo();
        sim.start();
        sim.run_for(120);
        sim.reset().unwrap();
        assert_eq!(sim.now(), 0);
        assert!(!sim.is_running());
        assert_eq!(sim.recent(50).count(), 0);
        for task in sim.tasks() {
            assert_eq!(task.remaining_time, task.execution_time);
            assert_eq!(task.wait_time, 0);
        }
    }

    #[test]
    fn test_set_policy() {
        let mut sim = demo();
        sim.set_policy(Policy::ShortestJobFirst);
        assert_eq!(sim.policy(), Policy::ShortestJobFirst);
        // Sensor Read has the least work (10 ms)
        let report = sim.tick();
        assert_eq!(report.sample.running, Some(TaskId(1)));
    }

    #[test]
    fn test_recent_is_bounded() {
        let mut sim = demo();
        sim.run_for(200);
        assert_eq!(sim.recent(usize::MAX).count(), crate::history::HISTORY_WINDOW);
        let last = sim.recent(1).next().map(|s| s.time);
        assert_eq!(last, Some(199));
    }

    #[test]
    fn test_block_through_simulator() {
        let mut sim = demo();
        sim.block(TaskId(1)).unwrap();
        let report = sim.tick();
        assert_eq!(report.sample.running, Some(TaskId(2)));
        sim.unblock(TaskId(1)).unwrap();
        let report = sim.tick();
        assert_eq!(report.sample.running, Some(TaskId(1)));
        assert!(sim.block(TaskId(42)).is_err());
    }

    #[test]
    fn test_tick_keeps_state_across_steps() {
        let mut sim = demo();
        sim.tick();
        sim.tick();
        assert_eq!(sim.now(), 2);
        assert_eq!(sim.tasks().len(), 4);
        assert_eq!(sim.recent(10).count(), 2);
        assert_eq!(sim.state().last_selected(), Some(TaskId(1)));
        assert_eq!(sim.tasks()[0].remaining_time, 8);
    }
}
