//! Agent.
use super::{GoalEnv, Policy, ReplayBufferBase};
use crate::{experience::HindsightExperience, record::Record};
use anyhow::Result;

/// A trainable goal-conditioned policy.
///
/// The trainer hands every hindsight experience it stores to
/// [`Agent::observe`] before optimizing, so that the agent can keep its input
/// normalization statistics up to date.
pub trait Agent<E: GoalEnv, R: ReplayBufferBase>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Observes hindsight experiences that were just stored in the buffer.
    fn observe(&mut self, _experiences: &[HindsightExperience]) -> Result<()> {
        Ok(())
    }

    /// Performs an optimization step on a batch drawn from the `window` most
    /// recent items of `buffer`, returning the losses or other values.
    fn opt_with_record(&mut self, buffer: &mut R, window: usize) -> Result<Record>;

    /// Performs an optimization step, discarding the record.
    fn opt(&mut self, buffer: &mut R, window: usize) -> Result<()> {
        self.opt_with_record(buffer, window).map(|_| ())
    }
}
