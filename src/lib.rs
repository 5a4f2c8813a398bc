//! jsp_arena - competitive multi-agent Job Shop Scheduling
//!
//! Every job of a JSP instance is an agent holding a stake of bidding
//! currency. Each tick, jobs waiting for a machine bid for it; the strictly
//! highest bid wins the machine, ties leave it idle, and losers are refunded.
//! The environment turns each resolved tick into per-job rewards and
//! observations for a multi-agent training loop.
//!
//! ```
//! use jsp_arena::{ArenaConfig, Instance, JspEnvironment};
//!
//! let instance: Instance = "2 1\n0 5\n0 3\n".parse().unwrap();
//! let mut env = JspEnvironment::new(instance, ArenaConfig::default()).unwrap();
//! env.reset(0);
//!
//! let tied = env.step(&[10, 10]).unwrap();
//! assert!(tied.info.winners.is_empty());
//!
//! let won = env.step(&[12, 5]).unwrap();
//! assert_eq!(won.info.winners, vec![(0, 0)]);
//! ```

pub mod agent;
pub mod bidding;
pub mod config;
pub mod environment;
pub mod instance;
pub mod machine;
pub mod metrics;
pub mod observation;
pub mod policy;
pub mod render;
pub mod reward;
pub mod scheduler;
pub mod types;

pub use agent::JobAgent;
pub use bidding::{BiddingEngine, Resolution};
pub use config::ArenaConfig;
pub use environment::{EnvError, JspEnvironment, ScheduledOperation, StepResult};
pub use instance::{Instance, InstanceError};
pub use machine::MachineResource;
pub use metrics::EvaluationMetrics;
pub use observation::{Observation, ObservationBuilder};
pub use policy::{GreedyHeuristicPolicy, Policy, RandomPolicy};
pub use render::Frame;
pub use reward::RewardComputer;
pub use scheduler::{Completion, ContentionOutcome, Scheduler, TickResult};
pub use types::{Condition, JobId, MachineId, Operation};
