//! Policy.
use super::GoalEnv;
use crate::experience::GoalObs;

/// A goal-conditioned policy on an environment.
pub trait Policy<E: GoalEnv> {
    /// Samples an action given an observation.
    fn sample(&mut self, obs: &GoalObs) -> Vec<f32>;
}
