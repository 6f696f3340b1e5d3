//! A toy goal-reaching task and a scripted agent, used in tests and demos.
//!
//! In [`PointReachEnv`] a point starts at the origin and moves by
//! `step_size · a` per step, with every component of the action `a` clipped to
//! `[-1, 1]`. The achieved goal is the position. The reward is `0` within
//! `distance_threshold` of the desired goal and `-1` elsewhere.
use crate::{
    error::HerError,
    experience::{GoalObs, HindsightExperience},
    her_buffer::HerReplayBuffer,
    normalizer::{HindsightNormalizer, NormalizerConfig},
    record::{Record, RecordValue::Scalar},
    Agent, GoalEnv, Info, Policy, ReplayBufferBase, Step,
};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration of [`PointReachEnv`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PointReachConfig {
    /// Dimension of positions, goals and actions.
    pub dim: usize,

    /// Episodes are truncated after this many steps.
    pub max_steps: usize,

    /// Goals are drawn uniformly from `[-goal_range, goal_range]^dim`.
    pub goal_range: f32,

    /// Distance within which the goal counts as reached.
    pub distance_threshold: f32,

    /// Displacement of a unit action.
    pub step_size: f32,
}

impl Default for PointReachConfig {
    fn default() -> Self {
        Self {
            dim: 2,
            max_steps: 50,
            goal_range: 1.0,
            distance_threshold: 0.05,
            step_size: 0.1,
        }
    }
}

impl PointReachConfig {
    /// Sets the dimension.
    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Sets the episode length.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Information of a step of [`PointReachEnv`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointReachInfo {
    /// Distance to the desired goal after the step.
    pub distance: f32,

    is_success: bool,
}

impl Info for PointReachInfo {
    fn is_success(&self) -> bool {
        self.is_success
    }
}

/// Moves a point towards a goal.
pub struct PointReachEnv {
    config: PointReachConfig,
    position: Vec<f32>,
    goal: Vec<f32>,
    t: usize,
    rng: StdRng,
}

fn distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

impl PointReachEnv {
    /// Action heading straight for the desired goal of `obs`.
    pub fn greedy_action(obs: &GoalObs, step_size: f32) -> Vec<f32> {
        obs.desired_goal
            .iter()
            .zip(obs.achieved_goal.iter())
            .map(|(g, x)| ((g - x) / step_size).max(-1.).min(1.))
            .collect()
    }

    fn observe(&self) -> GoalObs {
        GoalObs::new(
            self.position.clone(),
            self.position.clone(),
            self.goal.clone(),
        )
    }

    /// Draws a goal that is not already reached at the origin.
    fn sample_goal<R: Rng>(config: &PointReachConfig, rng: &mut R) -> Vec<f32> {
        let origin = vec![0.; config.dim];
        loop {
            let goal = (0..config.dim)
                .map(|_| rng.gen_range(-config.goal_range..=config.goal_range))
                .collect::<Vec<f32>>();
            if distance(&goal, &origin) > config.distance_threshold {
                return goal;
            }
        }
    }

    fn reset_with_goal(&mut self, goal: Vec<f32>) -> GoalObs {
        self.position = vec![0.; self.config.dim];
        self.goal = goal;
        self.t = 0;
        self.observe()
    }
}

impl GoalEnv for PointReachEnv {
    type Config = PointReachConfig;
    type Info = PointReachInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.dim == 0 || !(config.goal_range > config.distance_threshold) {
            return Err(HerError::Configuration(format!(
                "goals out of reach in point reach config {:?}",
                config
            ))
            .into());
        }

        Ok(Self {
            config: config.clone(),
            position: vec![0.; config.dim],
            goal: vec![0.; config.dim],
            t: 0,
            rng: StdRng::seed_from_u64(seed as _),
        })
    }

    fn reset(&mut self) -> Result<GoalObs> {
        let goal = Self::sample_goal(&self.config, &mut self.rng);
        Ok(self.reset_with_goal(goal))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<GoalObs> {
        let mut rng = StdRng::seed_from_u64(ix as _);
        let goal = Self::sample_goal(&self.config, &mut rng);
        Ok(self.reset_with_goal(goal))
    }

    fn step(&mut self, act: &[f32]) -> Result<(Step<Self>, Record)> {
        HerError::check_dim("action", self.config.dim, act.len())?;

        let step_size = self.config.step_size;
        for (x, a) in self.position.iter_mut().zip(act.iter()) {
            *x += step_size * a.max(-1.).min(1.);
        }
        self.t += 1;

        let d = distance(&self.position, &self.goal);
        let info = PointReachInfo {
            distance: d,
            is_success: d <= self.config.distance_threshold,
        };
        let reward = self.compute_reward(&self.position, &self.goal, Some(&info));
        let is_truncated = self.t >= self.config.max_steps;
        let step = Step::new(self.observe(), act.to_vec(), reward, false, is_truncated, info);

        Ok((step, Record::from_scalar("distance", d)))
    }

    fn compute_reward(&self, achieved: &[f32], desired: &[f32], _info: Option<&Self::Info>) -> f32 {
        if distance(achieved, desired) <= self.config.distance_threshold {
            0.
        } else {
            -1.
        }
    }
}

/// Configuration of [`HeuristicAgent`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HeuristicAgentConfig {
    /// Dimension of observations.
    pub dim_obs: usize,

    /// Dimension of goals.
    pub dim_goal: usize,

    /// Dimension of actions.
    pub dim_act: usize,

    /// Probability of a uniformly random action in training mode.
    pub epsilon: f32,

    /// Number of transitions drawn per optimization step.
    pub batch_size: usize,

    /// Normalizes actions besides states.
    pub normalize_actions: bool,

    /// Normalizer settings; `size` is overwritten.
    pub normalizer: NormalizerConfig,

    /// Random seed.
    pub seed: u64,
}

impl Default for HeuristicAgentConfig {
    fn default() -> Self {
        Self {
            dim_obs: 2,
            dim_goal: 2,
            dim_act: 2,
            epsilon: 0.3,
            batch_size: 32,
            normalize_actions: false,
            normalizer: NormalizerConfig::default().clip_range(5.),
            seed: 42,
        }
    }
}

/// Heads for the goal with a step size fixed at construction, taking random
/// actions with probability `epsilon` while training.
///
/// Optimization steps draw batches and normalize them, but change nothing in
/// the policy; the reported values describe the batches.
pub struct HeuristicAgent {
    step_size: f32,
    epsilon: f32,
    batch_size: usize,
    dim_act: usize,
    normalizer: HindsightNormalizer,
    is_train: bool,
    n_opts: usize,
    rng: fastrand::Rng,
}

impl HeuristicAgent {
    /// Constructs an agent for environments moving by `step_size` per unit action.
    pub fn build(config: &HeuristicAgentConfig, step_size: f32) -> Result<Self> {
        let state = config
            .normalizer
            .clone()
            .size(config.dim_obs + config.dim_goal);
        let action = config.normalizer.clone().size(config.dim_act);
        let normalizer = HindsightNormalizer::build(
            &state,
            match config.normalize_actions {
                true => Some(&action),
                false => None,
            },
        )?;

        Ok(Self {
            step_size,
            epsilon: config.epsilon,
            batch_size: config.batch_size,
            dim_act: config.dim_act,
            normalizer,
            is_train: false,
            n_opts: 0,
            rng: fastrand::Rng::with_seed(config.seed),
        })
    }

    /// Input normalizers.
    pub fn normalizer(&self) -> &HindsightNormalizer {
        &self.normalizer
    }

    /// Number of optimization steps done.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }
}

impl<E: GoalEnv> Policy<E> for HeuristicAgent {
    fn sample(&mut self, obs: &GoalObs) -> Vec<f32> {
        if self.is_train && self.rng.f32() < self.epsilon {
            (0..self.dim_act)
                .map(|_| 2. * self.rng.f32() - 1.)
                .collect()
        } else {
            PointReachEnv::greedy_action(obs, self.step_size)
        }
    }
}

impl<E: GoalEnv> Agent<E, HerReplayBuffer> for HeuristicAgent {
    fn train(&mut self) {
        self.is_train = true;
    }

    fn eval(&mut self) {
        self.is_train = false;
    }

    fn is_train(&self) -> bool {
        self.is_train
    }

    fn observe(&mut self, experiences: &[HindsightExperience]) -> Result<()> {
        self.normalizer.update(experiences)?;
        Ok(())
    }

    fn opt_with_record(&mut self, buffer: &mut HerReplayBuffer, window: usize) -> Result<Record> {
        let batch_size = self.batch_size.min(window).min(buffer.len());
        let batch = buffer.batch_recent(batch_size, window)?;
        let batch = self.normalizer.normalize_batch(batch)?;
        self.n_opts += 1;

        let n = batch.reward.len().max(1) as f32;
        let mut record = Record::empty();
        record.insert("batch_reward", Scalar(batch.reward.iter().sum::<f32>() / n));
        record.insert("batch_mask", Scalar(batch.mask.iter().sum::<f32>() / n));
        record.insert("batch_size", Scalar(batch.reward.len() as f32));
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_reach_step() -> Result<()> {
        let config = PointReachConfig::default();
        let mut env = PointReachEnv::build(&config, 3)?;
        let obs = env.reset()?;
        assert_eq!(obs.observation, vec![0., 0.]);
        assert_eq!(obs.achieved_goal, obs.observation);
        assert!(distance(&obs.desired_goal, &[0., 0.]) > config.distance_threshold);

        // Actions are clipped to [-1, 1]
        let (step, record) = env.step(&[5., -0.5])?;
        assert!((step.obs.observation[0] - 0.1).abs() < 1e-6);
        assert!((step.obs.observation[1] + 0.05).abs() < 1e-6);
        assert_eq!(record.get_scalar("distance")?, step.info.distance);
        assert!(!step.is_done());

        assert!(env.step(&[0.]).is_err());
        Ok(())
    }

    #[test]
    fn test_truncation_and_reproducible_goals() -> Result<()> {
        let config = PointReachConfig::default().max_steps(3);
        let mut env = PointReachEnv::build(&config, 0)?;
        let goal = env.reset_with_index(7)?.desired_goal;

        for t in 1..=3 {
            let (step, _) = env.step(&[0., 0.])?;
            assert_eq!(step.reward, -1.);
            assert_eq!(step.is_done(), t == 3);
            assert!(!step.is_terminated);
        }
        assert_eq!(env.reset_with_index(7)?.desired_goal, goal);
        Ok(())
    }

    #[test]
    fn test_greedy_reaches_goal() -> Result<()> {
        let config = PointReachConfig::default();
        let mut env = PointReachEnv::build(&config, 1)?;
        let mut obs = env.reset()?;
        let mut reward = -1.;
        for _ in 0..config.max_steps {
            let (step, _) = env.step(&PointReachEnv::greedy_action(&obs, config.step_size))?;
            reward = step.reward;
            obs = step.obs;
        }
        assert_eq!(reward, 0.);
        Ok(())
    }
}
