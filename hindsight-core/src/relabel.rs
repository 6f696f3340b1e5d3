//! Hindsight relabeling of trajectories.
//!
//! A trajectory that missed its goal still shows how to reach the goals it
//! actually achieved. [`Relabeler`] turns every transition of a trajectory into
//! additional transitions whose goal is substituted by an achieved goal, with
//! rewards recomputed by the environment's reward function.
//!
//! Substitute goals are selected by [`GoalStrategy`]:
//!
//! * `final` - the goal achieved by the last transition of the trajectory.
//! * `future` - `future_k` goals drawn uniformly, with replacement, from the goals
//!   achieved by transition `t` and the transitions after it.
//!
//! ```rust
//! use hindsight_core::relabel::{GoalStrategy, RelabelConfig, Relabeler};
//!
//! let config = RelabelConfig::default()
//!     .strategy(GoalStrategy::Future)
//!     .future_k(4);
//! let mut relabeler = Relabeler::build(&config);
//!
//! // Indices of transitions whose achieved goals substitute the goal of the
//! // third transition in a trajectory of length 10.
//! let ixs = relabeler.goal_indices(2, 10);
//! assert_eq!(ixs.len(), 4);
//! assert!(ixs.iter().all(|&ix| (2..10).contains(&ix)));
//! ```
mod base;
mod config;
mod strategy;
pub use base::Relabeler;
pub use config::RelabelConfig;
pub use strategy::GoalStrategy;
