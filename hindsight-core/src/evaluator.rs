//! Evaluate policies.
use crate::{record::Record, GoalEnv, Policy};
use anyhow::Result;
mod success_rate_evaluator;
pub use success_rate_evaluator::SuccessRateEvaluator;

/// Evaluate a policy.
pub trait Evaluator<E: GoalEnv> {
    /// Evaluate a policy.
    ///
    /// The caller of this method needs to handle the internal state of the agent,
    /// like training/evaluation mode.
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Record>;
}
