//! Environment wrappers.
use crate::{experience::GoalObs, record::Record, GoalEnv, Info, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration of [`DoneOnSuccess`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DoneOnSuccessConfig<C> {
    /// Configuration of the wrapped environment.
    pub env: C,

    /// Added to every reward, including the ones computed for relabeled goals.
    pub reward_offset: f32,
}

impl<C> DoneOnSuccessConfig<C> {
    /// Wraps `env` with the default offset of `1.0`.
    pub fn new(env: C) -> Self {
        Self {
            env,
            reward_offset: 1.0,
        }
    }

    /// Sets the reward offset.
    pub fn reward_offset(mut self, reward_offset: f32) -> Self {
        self.reward_offset = reward_offset;
        self
    }
}

/// Terminates episodes as soon as the environment reports success.
///
/// With sparse `-1`/`0` rewards and the default offset, rewards become `0`/`1`.
pub struct DoneOnSuccess<E: GoalEnv> {
    env: E,
    reward_offset: f32,
}

impl<E: GoalEnv> DoneOnSuccess<E> {
    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: GoalEnv> GoalEnv for DoneOnSuccess<E> {
    type Config = DoneOnSuccessConfig<E::Config>;
    type Info = E::Info;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            env: E::build(&config.env, seed)?,
            reward_offset: config.reward_offset,
        })
    }

    fn reset(&mut self) -> Result<GoalObs> {
        self.env.reset()
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<GoalObs> {
        self.env.reset_with_index(ix)
    }

    fn step(&mut self, act: &[f32]) -> Result<(Step<Self>, Record)> {
        let (step, record) = self.env.step(act)?;
        let is_success = step.info.is_success();
        let step = Step::new(
            step.obs,
            step.act,
            step.reward + self.reward_offset,
            step.is_terminated || is_success,
            step.is_truncated,
            step.info,
        );
        Ok((step, record))
    }

    fn compute_reward(&self, achieved: &[f32], desired: &[f32], info: Option<&Self::Info>) -> f32 {
        self.env.compute_reward(achieved, desired, info) + self.reward_offset
    }
}
