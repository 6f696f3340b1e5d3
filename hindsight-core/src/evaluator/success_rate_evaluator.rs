//! Success rate of goal-conditioned policies.
use super::Evaluator;
use crate::{
    error::HerError,
    record::{Record, RecordValue::Scalar},
    GoalEnv, Info, Policy,
};
use anyhow::Result;
use log::debug;

/// Runs a fixed number of episodes and reports how often the goal was reached.
///
/// An episode ends when the environment reports done or after `max_steps`
/// steps, the same horizon as training episodes of
/// [`Sampler`](crate::Sampler). It counts as a success if its last step
/// reports success. The record holds `success_rate` and the mean
/// `episode_return`.
pub struct SuccessRateEvaluator<E: GoalEnv> {
    n_episodes: usize,
    max_steps: usize,
    env: E,
}

impl<E: GoalEnv> SuccessRateEvaluator<E> {
    /// Constructs an evaluator running `n_episodes` episodes of at most
    /// `max_steps` steps.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize, max_steps: usize) -> Result<Self> {
        if max_steps == 0 {
            return Err(HerError::Configuration(
                "evaluation episodes need at least one step".to_string(),
            )
            .into());
        }

        Ok(Self {
            n_episodes,
            max_steps,
            env: E::build(config, seed)?,
        })
    }
}

impl<E: GoalEnv> Evaluator<E> for SuccessRateEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Record> {
        let mut r_total = 0f32;
        let mut n_success = 0;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            for t in 1..=self.max_steps {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act)?;
                r_total += step.reward;
                if step.is_done() || t == self.max_steps {
                    if step.info.is_success() {
                        n_success += 1;
                    }
                    break;
                }
                prev_obs = step.obs;
            }
        }
        debug!("{} of {} evaluation episodes succeeded", n_success, self.n_episodes);

        let n = self.n_episodes.max(1) as f32;
        let mut record = Record::empty();
        record.insert("success_rate", Scalar(n_success as f32 / n));
        record.insert("episode_return", Scalar(r_total / n));
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{PointReachConfig, PointReachEnv};
    use crate::experience::GoalObs;

    struct Greedy(f32);

    impl Policy<PointReachEnv> for Greedy {
        fn sample(&mut self, obs: &GoalObs) -> Vec<f32> {
            PointReachEnv::greedy_action(obs, self.0)
        }
    }

    struct Idle;

    impl Policy<PointReachEnv> for Idle {
        fn sample(&mut self, obs: &GoalObs) -> Vec<f32> {
            vec![0.; obs.achieved_goal.len()]
        }
    }

    #[test]
    fn test_success_rate() -> Result<()> {
        let config = PointReachConfig::default();
        let mut evaluator =
            SuccessRateEvaluator::<PointReachEnv>::new(&config, 0, 5, config.max_steps)?;

        let record = evaluator.evaluate(&mut Greedy(config.step_size))?;
        assert_eq!(record.get_scalar("success_rate")?, 1.);

        let record = evaluator.evaluate(&mut Idle)?;
        assert_eq!(record.get_scalar("success_rate")?, 0.);
        assert_eq!(
            record.get_scalar("episode_return")?,
            -(config.max_steps as f32)
        );
        Ok(())
    }

    #[test]
    fn test_episodes_cut_at_max_steps() -> Result<()> {
        // The environment alone would run 1000 steps
        let config = PointReachConfig::default().max_steps(1000);
        let mut evaluator = SuccessRateEvaluator::<PointReachEnv>::new(&config, 0, 3, 50)?;

        let record = evaluator.evaluate(&mut Idle)?;
        assert_eq!(record.get_scalar("episode_return")?, -50.);
        assert_eq!(record.get_scalar("success_rate")?, 0.);

        let record = evaluator.evaluate(&mut Greedy(config.step_size))?;
        assert_eq!(record.get_scalar("success_rate")?, 1.);
        Ok(())
    }

    #[test]
    fn test_zero_max_steps() {
        let config = PointReachConfig::default();
        assert!(SuccessRateEvaluator::<PointReachEnv>::new(&config, 0, 3, 0).is_err());
    }
}
