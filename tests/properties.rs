//! Property tests: policy purity and per-tick invariants over random task sets.

use proptest::prelude::*;
use rtos_sim::{tick, Policy, SchedulerPolicy, SimulationState, Task, TaskDescriptor, TaskState};

fn arb_policy() -> impl Strategy<Value = Policy> {
    prop::sample::select(Policy::ALL.to_vec())
}

/// 1..=6 valid descriptors with distinct ids
fn arb_descriptors() -> impl Strategy<Value = Vec<TaskDescriptor>> {
    prop::collection::vec((1u8..=8, 5u32..=120, 1u32..=40), 1..=6).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (priority, period, exec))| {
                TaskDescriptor::new(i as u32 + 1, "t", priority, period, exec)
            })
            .collect()
    })
}

fn arb_ready() -> impl Strategy<Value = Vec<Task>> {
    (arb_descriptors(), prop::collection::vec(0u32..=40, 6)).prop_map(|(descs, remaining)| {
        descs
            .iter()
            .zip(remaining)
            .map(|(d, rem)| {
                let mut t = Task::from_descriptor(d);
                t.remaining_time = rem.clamp(1, d.execution_time);
                t
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn select_is_deterministic(
        policy in arb_policy(),
        ready in arb_ready(),
        prev in prop::option::of(1u32..=6),
        now in 0u64..10_000,
    ) {
        let prev = prev.map(rtos_sim::TaskId);
        let first = policy.select(&ready, prev, now);
        let second = policy.select(&ready, prev, now);
        prop_assert_eq!(first, second);

        // A non-empty ready set always yields one of its own tasks
        let chosen = first.expect("ready set is non-empty");
        prop_assert!(ready.iter().any(|t| t.id == chosen));
    }

    #[test]
    fn priority_choice_ignores_order(ready in arb_ready(), now in 0u64..1_000) {
        let mut reversed = ready.clone();
        reversed.reverse();
        let a = Policy::PreemptivePriority.select(&ready, None, now).unwrap();
        let b = Policy::PreemptivePriority.select(&reversed, None, now).unwrap();
        let prio = |id| ready.iter().find(|t| t.id == id).unwrap().priority;
        prop_assert_eq!(prio(a), prio(b));
    }

    #[test]
    fn tick_invariants_hold(
        policy in arb_policy(),
        descs in arb_descriptors(),
        ticks in 1usize..400,
    ) {
        let mut state = SimulationState::new(&descs, 100).unwrap();
        for expected_time in 0..ticks as u64 {
            let (next, report) = tick(state, &policy);
            state = next;

            prop_assert_eq!(report.sample.time, expected_time);
            let running: Vec<_> = state
                .tasks
                .iter()
                .filter(|t| t.state == TaskState::Running)
                .collect();
            prop_assert!(running.len() <= 1);
            if let Some(t) = running.first() {
                prop_assert_eq!(Some(t.id), report.sample.running);
            }
            for t in state.tasks.iter() {
                prop_assert!(t.remaining_time <= t.execution_time);
                if t.remaining_time == 0 {
                    prop_assert_eq!(t.state, TaskState::Completed);
                }
            }
        }
        prop_assert_eq!(state.now(), ticks as u64);
        prop_assert_eq!(state.history.len(), ticks.min(state.history.capacity()));
        prop_assert_eq!(
            state.history.latest().map(|s| s.time),
            Some(ticks as u64 - 1)
        );
    }
}
