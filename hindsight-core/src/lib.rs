#![warn(missing_docs)]
//! Hindsight experience replay for goal-conditioned reinforcement learning.
//!
//! Trajectories played by an [`Agent`] on a [`GoalEnv`] are relabeled with
//! goals achieved in hindsight ([`relabel`]), stored in a bounded ring buffer
//! ([`her_buffer`]) and replayed in batches drawn from windows that emphasize
//! recent experience ([`ere`]). Agents keep running statistics of their inputs
//! with [`normalizer`]. [`HerTrainer`] ties these together.
pub mod dummy;
pub mod ere;
pub mod error;
pub mod experience;
pub mod her_buffer;
pub mod normalizer;
pub mod record;
pub mod relabel;
pub mod wrapper;

mod base;
pub use base::{
    Agent, ExperienceBufferBase, GoalEnv, Info, Policy, ReplayBufferBase, Step, TransitionBatch,
};

mod evaluator;
pub use evaluator::{Evaluator, SuccessRateEvaluator};

mod trainer;
pub use trainer::{HerTrainer, HerTrainerConfig, Sampler};
