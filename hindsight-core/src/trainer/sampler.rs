//! Episode sampling.
use crate::{
    experience::{Experience, Trajectory},
    record::{Record, RecordValue::Scalar},
    GoalEnv, Info, Policy,
};
use anyhow::Result;
use log::debug;

/// Plays episodes of a policy on an environment.
pub struct Sampler<E: GoalEnv> {
    env: E,
    episode_len: usize,
}

impl<E: GoalEnv> Sampler<E> {
    /// Creates a sampler playing episodes of at most `episode_len` steps.
    pub fn new(env: E, episode_len: usize) -> Self {
        Self { env, episode_len }
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Plays an episode and returns its transitions.
    ///
    /// The episode ends when the environment reports termination or truncation,
    /// or after `episode_len` steps. Only termination sets the `done` flag of a
    /// transition. The record holds `episode_return`, `episode_length`,
    /// `episode_success` and the values the environment recorded at the last step.
    pub fn sample_episode<P: Policy<E>>(&mut self, policy: &mut P) -> Result<(Trajectory, Record)> {
        let mut trajectory = Vec::with_capacity(self.episode_len);
        let mut prev_obs = self.env.reset()?;
        let mut r_total = 0.;
        let mut is_success = false;
        let mut record = Record::empty();

        for _ in 0..self.episode_len {
            let act = policy.sample(&prev_obs);
            let (step, record_env) = self.env.step(&act)?;
            record = record_env;
            r_total += step.reward;
            is_success = step.info.is_success();

            let is_done = step.is_done();
            let obs = step.obs.clone();
            trajectory.push(Experience::new(
                prev_obs,
                step.act,
                step.reward,
                step.obs,
                step.is_terminated,
            ));
            prev_obs = obs;

            if is_done {
                break;
            }
        }
        debug!(
            "Episode of {} steps, return {}, success {}",
            trajectory.len(),
            r_total,
            is_success
        );

        record.insert("episode_return", Scalar(r_total));
        record.insert("episode_length", Scalar(trajectory.len() as f32));
        record.insert("episode_success", Scalar(is_success as i32 as f32));
        Ok((trajectory, record))
    }
}
