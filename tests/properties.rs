#[cfg(test)]
mod property_tests {
    use std::collections::HashSet;

    use jsp_arena::{
        ArenaConfig, Condition, Instance, JspEnvironment, Operation, Resolution,
    };
    use proptest::prelude::*;

    const MAX_JOBS: usize = 4;

    // Strategy for small valid instances: each job visits every machine once
    fn instance_strategy() -> impl Strategy<Value = Instance> {
        (1usize..=MAX_JOBS, 1usize..=4).prop_flat_map(|(jobs, machines)| {
            let order = Just((0..machines).collect::<Vec<usize>>()).prop_shuffle();
            let durations = prop::collection::vec(1u32..=5, machines);
            prop::collection::vec((order, durations), jobs).prop_map(move |rows| {
                let jobs = rows
                    .into_iter()
                    .map(|(order, durations)| {
                        order
                            .into_iter()
                            .zip(durations)
                            .map(|(m, d)| Operation::new(m, d))
                            .collect()
                    })
                    .collect();
                Instance::new(jobs).unwrap()
            })
        })
    }

    // Strategy for a sequence of per-tick bid vectors (negative and oversized included)
    fn bids_strategy() -> impl Strategy<Value = Vec<Vec<i64>>> {
        prop::collection::vec(prop::collection::vec(-3i64..30, MAX_JOBS), 1..80)
    }

    proptest! {
        #[test]
        fn test_stake_is_conserved(instance in instance_strategy(), ticks in bids_strategy()) {
            let n = instance.job_count();
            let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
            env.reset(0);
            for bids in &ticks {
                env.step(&bids[..n]).unwrap();
                for agent in env.agents() {
                    prop_assert_eq!(agent.current_bet(), 0);
                    prop_assert_eq!(agent.stake_balance() + agent.stake_spent(), 20);
                }
            }
        }

        #[test]
        fn test_at_most_one_winner_per_machine(instance in instance_strategy(), ticks in bids_strategy()) {
            let n = instance.job_count();
            let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
            env.reset(0);
            for bids in &ticks {
                let result = env.step(&bids[..n]).unwrap();
                let machines: HashSet<_> = result.info.winners.iter().map(|&(m, _)| m).collect();
                let jobs: HashSet<_> = result.info.winners.iter().map(|&(_, j)| j).collect();
                prop_assert_eq!(machines.len(), result.info.winners.len());
                prop_assert_eq!(jobs.len(), result.info.winners.len());

                for (machine, resolution) in result.info.resolutions.iter().enumerate() {
                    if let Some(Resolution::Tied { tied, .. }) = resolution {
                        prop_assert!(tied.len() >= 2);
                        prop_assert!(result.info.winners.iter().all(|&(m, _)| m != machine));
                    }
                }
            }
        }

        #[test]
        fn test_occupancy_is_consistent(instance in instance_strategy(), ticks in bids_strategy()) {
            let n = instance.job_count();
            let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
            env.reset(0);
            for bids in &ticks {
                env.step(&bids[..n]).unwrap();
                for machine in env.machines() {
                    if let Some(job) = machine.occupant() {
                        let agent = &env.agents()[job];
                        prop_assert_eq!(agent.condition(), Condition::Processing);
                        prop_assert_eq!(agent.required_machine(), Some(machine.id()));
                    }
                }
                for agent in env.agents() {
                    if agent.condition() == Condition::Processing {
                        let m = agent.required_machine().unwrap();
                        prop_assert_eq!(env.machines()[m].occupant(), Some(agent.id()));
                    }
                }
            }
        }

        #[test]
        fn test_operation_index_is_monotone(instance in instance_strategy(), ticks in bids_strategy()) {
            let n = instance.job_count();
            let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
            env.reset(0);
            let mut previous: Vec<usize> = vec![0; n];
            for bids in &ticks {
                let result = env.step(&bids[..n]).unwrap();
                for agent in env.agents() {
                    let before = previous[agent.id()];
                    prop_assert!(agent.operation_index() >= before);
                    prop_assert!(agent.operation_index() <= before + 1);
                    if agent.operation_index() > before {
                        prop_assert!(result.info.completed(agent.id()));
                    }
                    let p = agent.progress_fraction();
                    prop_assert!((0.0..=1.0).contains(&p));
                    prop_assert_eq!(
                        agent.operation_index() == agent.operations().len(),
                        agent.condition() == Condition::Done
                    );
                    previous[agent.id()] = agent.operation_index();
                }
            }
        }

        #[test]
        fn test_done_is_terminal(instance in instance_strategy(), ticks in bids_strategy()) {
            let n = instance.job_count();
            let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
            env.reset(0);
            let mut seen_done = false;
            for bids in &ticks {
                let result = env.step(&bids[..n]).unwrap();
                prop_assert_eq!(result.done, result.dones.iter().all(|&d| d));
                if seen_done {
                    prop_assert!(result.done);
                    prop_assert!(result.rewards.iter().all(|&r| r == 0.0));
                }
                seen_done = result.done;
            }
        }

        #[test]
        fn test_observations_are_finite(instance in instance_strategy(), ticks in bids_strategy()) {
            let n = instance.job_count();
            let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
            env.reset(0);
            for bids in &ticks {
                let result = env.step(&bids[..n]).unwrap();
                prop_assert_eq!(result.observations.len(), n);
                for obs in &result.observations {
                    prop_assert!(obs.iter().all(|v| v.is_finite()));
                }
            }
        }
    }
}
