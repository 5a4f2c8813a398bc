// Demonstration: run the bidding arena and evaluate a baseline policy.
//
// Build/run from this repo root:
//   cargo run --example arena_demo -- --policy greedy --episodes 50
//   cargo run --example arena_demo -- --instance path/to/instance.txt --render

use std::env;
use std::process;

use jsp_arena::{
    ArenaConfig, EvaluationMetrics, GreedyHeuristicPolicy, Instance, JspEnvironment, Policy,
    RandomPolicy,
};

const FT06: &str = include_str!("data/ft06.txt");

fn main() {
    let args: Vec<String> = env::args().collect();
    let policy_name = arg_value(&args, "--policy").unwrap_or("greedy");
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(25);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let render = args.iter().any(|a| a == "--render");

    let instance = match arg_value(&args, "--instance") {
        Some(path) => Instance::from_path(path),
        None => FT06.parse::<Instance>(),
    };
    let instance = instance.unwrap_or_else(|e| {
        eprintln!("Failed to load instance: {}", e);
        process::exit(1);
    });

    let config = ArenaConfig {
        max_cycles: Some(2_000),
        ..ArenaConfig::default()
    };
    let mut env = JspEnvironment::new(instance, config.clone()).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    });

    let mut policy: Box<dyn Policy> = match policy_name {
        "random" => Box::new(RandomPolicy::new(config.max_bid, seed)),
        "greedy" => Box::new(GreedyHeuristicPolicy::new(0.5, seed)),
        other => {
            eprintln!("Unknown --policy '{}'; expected 'greedy' or 'random'.", other);
            process::exit(2);
        }
    };

    if render {
        let mut obs = env.reset(seed);
        env.render();
        loop {
            let bids = policy.select_bids(&obs);
            let result = env.step(&bids).unwrap_or_else(|e| {
                eprintln!("Step failed: {}", e);
                process::exit(1);
            });
            env.render();
            obs = result.observations;
            if result.done || result.truncated {
                break;
            }
        }
    }

    match EvaluationMetrics::evaluate(&mut env, policy.as_mut(), episodes, seed) {
        Ok(metrics) => {
            println!("Policy: {}", policy.name());
            println!(
                "Makespan lower bound: {}",
                env.instance().makespan_lower_bound()
            );
            println!("{}", metrics);
        }
        Err(e) => {
            eprintln!("Evaluation failed: {}", e);
            process::exit(1);
        }
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
