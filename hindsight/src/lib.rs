//! Hindsight experience replay for goal-conditioned reinforcement learning.
//!
//! This crate re-exports [`hindsight_core`], which holds the relabeling,
//! replay and training machinery, and [`hindsight_tensorboard`], which writes
//! training records for TensorBoard.
//!
//! A runnable demo lives in `examples/her_point_reach.rs`:
//!
//! ```bash
//! cargo run --example her_point_reach -- --epochs 5 --ere
//! ```
pub use hindsight_core;
pub use hindsight_tensorboard;

pub use hindsight_core::{
    dummy, record, wrapper,
    ere::{EreConfig, EreScheduler},
    error::HerError,
    experience::{Experience, GoalObs, HindsightExperience, Trajectory},
    her_buffer::{HerBatch, HerReplayBuffer, HerReplayBufferConfig},
    normalizer::{HindsightNormalizer, NormalizationMode, Normalizer, NormalizerConfig},
    relabel::{GoalStrategy, RelabelConfig, Relabeler},
    Agent, Evaluator, GoalEnv, HerTrainer, HerTrainerConfig, Policy, SuccessRateEvaluator,
};
pub use hindsight_tensorboard::TensorboardRecorder;
