//! Goal-conditioned environment.
use super::{Info, Step};
use crate::{experience::GoalObs, record::Record};
use anyhow::Result;

/// Environment whose observations carry an achieved and a desired goal.
///
/// Actions are flat `f32` vectors. [`GoalEnv::compute_reward`] must be a pure
/// function of its arguments, since it is also called with substitute goals
/// when trajectories are relabeled.
pub trait GoalEnv {
    /// Configurations.
    type Config: Clone;

    /// Information in the [`self::Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and samples a new desired goal.
    fn reset(&mut self) -> Result<GoalObs>;

    /// Resets the environment with a given index.
    ///
    /// Evaluators use the index to make the initial state and the goal of each
    /// evaluation episode reproducible.
    fn reset_with_index(&mut self, ix: usize) -> Result<GoalObs>;

    /// Performes an environment step.
    fn step(&mut self, act: &[f32]) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Reward of reaching `achieved` when `desired` is the goal.
    fn compute_reward(&self, achieved: &[f32], desired: &[f32], info: Option<&Self::Info>)
        -> f32;
}
