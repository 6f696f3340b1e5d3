//! Environment step.
use super::GoalEnv;
use crate::experience::GoalObs;

/// Additional information to `Obs` and `Act`.
pub trait Info {
    /// Returns `true` if the desired goal was reached at this step.
    fn is_success(&self) -> bool {
        false
    }
}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
pub struct Step<E: GoalEnv> {
    /// Action.
    pub act: Vec<f32>,

    /// Observation.
    pub obs: GoalObs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if episode is truncated.
    pub is_truncated: bool,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: GoalEnv> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: GoalObs,
        act: Vec<f32>,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    /// Terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
