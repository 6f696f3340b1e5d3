use super::{GoalStrategy, RelabelConfig};
use crate::{
    error::HerError,
    experience::{Experience, HindsightExperience},
};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Produces hindsight transitions from trajectories.
pub struct Relabeler {
    strategy: GoalStrategy,
    future_k: usize,
    keep_original: bool,
    rng: StdRng,
}

impl Relabeler {
    /// Constructs a relabeler.
    pub fn build(config: &RelabelConfig) -> Self {
        Self {
            strategy: config.strategy,
            future_k: config.future_k,
            keep_original: config.keep_original,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Returns the goal selection strategy.
    pub fn strategy(&self) -> GoalStrategy {
        self.strategy
    }

    /// Returns indices of the transitions whose achieved goals substitute the
    /// goal of transition `t` in a trajectory of length `len`.
    ///
    /// Every index lies in `[t, len - 1]`. Returns an empty vector if `t >= len`.
    pub fn goal_indices(&mut self, t: usize, len: usize) -> Vec<usize> {
        if t >= len {
            return vec![];
        }
        match self.strategy {
            GoalStrategy::Final => vec![len - 1],
            GoalStrategy::Future => (0..self.future_k)
                .map(|_| self.rng.gen_range(t..len))
                .collect(),
        }
    }

    /// Calls `f(experience, goal, reward)` for every transition of `trajectory`
    /// and every goal it is stored with, in the order the transitions were played.
    ///
    /// For each transition, the episode goal with the environment reward comes
    /// first when `keep_original` is set, then the substitute goals with rewards
    /// recomputed by `reward_fn(achieved_goal, goal)`.
    pub fn for_each_goal<R, F, E>(
        &mut self,
        trajectory: &[Experience],
        mut reward_fn: R,
        mut f: F,
    ) -> Result<(), E>
    where
        R: FnMut(&[f32], &[f32]) -> f32,
        F: FnMut(&Experience, &[f32], f32) -> Result<(), E>,
    {
        let len = trajectory.len();
        for (t, exp) in trajectory.iter().enumerate() {
            if self.keep_original {
                f(exp, exp.state().desired_goal.as_slice(), exp.reward())?;
            }
            for ix in self.goal_indices(t, len) {
                let goal = trajectory[ix].achieved_goal();
                let reward = reward_fn(exp.achieved_goal(), goal);
                trace!("t={}, goal from t={}, reward={}", t, ix, reward);
                f(exp, goal, reward)?;
            }
        }
        Ok(())
    }

    /// Returns the transitions of `trajectory` relabeled with substitute goals only.
    ///
    /// With [`GoalStrategy::Final`] the result has one item per transition,
    /// with [`GoalStrategy::Future`] it has `future_k` items per transition.
    pub fn relabel<R>(
        &mut self,
        trajectory: &[Experience],
        mut reward_fn: R,
    ) -> Result<Vec<HindsightExperience>, HerError>
    where
        R: FnMut(&[f32], &[f32]) -> f32,
    {
        let mut out = Vec::with_capacity(trajectory.len());
        for (t, exp) in trajectory.iter().enumerate() {
            for ix in self.goal_indices(t, trajectory.len()) {
                let goal = trajectory[ix].achieved_goal();
                out.push(exp.relabel(goal, reward_fn(exp.achieved_goal(), goal))?);
            }
        }
        Ok(out)
    }

    /// Returns every hindsight transition [`Relabeler::for_each_goal`] visits.
    pub fn expand<R>(
        &mut self,
        trajectory: &[Experience],
        reward_fn: R,
    ) -> Result<Vec<HindsightExperience>, HerError>
    where
        R: FnMut(&[f32], &[f32]) -> f32,
    {
        let mut out = Vec::new();
        self.for_each_goal(trajectory, reward_fn, |exp, goal, reward| {
            out.push(exp.relabel(goal, reward)?);
            Ok::<_, HerError>(())
        })?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::GoalObs;

    /// Transition `t` moves the achieved goal from `[t]` to `[t + 1]`; the
    /// episode goal is `[100]`.
    fn trajectory(len: usize) -> Vec<Experience> {
        (0..len)
            .map(|t| {
                let obs = |v: f32| GoalObs::new(vec![v, -v], vec![v], vec![100.]);
                Experience::new(
                    obs(t as f32),
                    vec![1.],
                    -1.,
                    obs((t + 1) as f32),
                    t + 1 == len,
                )
            })
            .collect()
    }

    fn sparse_reward(achieved: &[f32], desired: &[f32]) -> f32 {
        if achieved == desired {
            0.
        } else {
            -1.
        }
    }

    fn goal_of(h: &HindsightExperience) -> f32 {
        h.state()[2]
    }

    #[test]
    fn test_final_strategy_uses_last_achieved_goal() {
        let config = RelabelConfig::default().strategy(GoalStrategy::Final);
        let mut relabeler = Relabeler::build(&config);
        let traj = trajectory(3);
        let hs = relabeler.relabel(&traj, sparse_reward).unwrap();

        assert_eq!(hs.len(), 3);
        for (t, h) in hs.iter().enumerate() {
            assert_eq!(goal_of(h), traj[2].achieved_goal()[0]);
            assert_eq!(h.state()[..2], traj[t].state().observation[..]);
        }
        // Only the last transition achieves the final goal
        let rewards = hs.iter().map(|h| h.reward()).collect::<Vec<_>>();
        assert_eq!(rewards, vec![-1., -1., 0.]);
    }

    #[test]
    fn test_future_indices_stay_in_range() {
        let config = RelabelConfig::default()
            .strategy(GoalStrategy::Future)
            .future_k(8);
        let mut relabeler = Relabeler::build(&config);
        let len = 20;

        for t in 0..len {
            for _ in 0..50 {
                let ixs = relabeler.goal_indices(t, len);
                assert_eq!(ixs.len(), 8);
                assert!(ixs.iter().all(|&ix| t <= ix && ix < len));
            }
        }
        assert_eq!(relabeler.goal_indices(len - 1, len), vec![len - 1; 8]);
        assert!(relabeler.goal_indices(len, len).is_empty());
    }

    #[test]
    fn test_future_relabel_count_and_goals() {
        let config = RelabelConfig::default()
            .strategy(GoalStrategy::Future)
            .future_k(4);
        let mut relabeler = Relabeler::build(&config);
        let traj = trajectory(5);
        let hs = relabeler.relabel(&traj, sparse_reward).unwrap();

        assert_eq!(hs.len(), 4 * 5);
        for (i, h) in hs.iter().enumerate() {
            let t = i / 4;
            // Achieved goals of transitions t..=4 are t + 1..=5
            let g = goal_of(h);
            assert!(g >= (t + 1) as f32 && g <= 5.);
            let expected = if g == (t + 1) as f32 { 0. } else { -1. };
            assert_eq!(h.reward(), expected);
        }
    }

    #[test]
    fn test_expand_keeps_original_first() {
        let config = RelabelConfig::default()
            .strategy(GoalStrategy::Future)
            .future_k(2);
        let mut relabeler = Relabeler::build(&config);
        let traj = trajectory(3);
        let hs = relabeler.expand(&traj, sparse_reward).unwrap();

        assert_eq!(hs.len(), 3 * (1 + 2));
        for t in 0..3 {
            let original = &hs[3 * t];
            assert_eq!(goal_of(original), 100.);
            assert_eq!(original.reward(), -1.);
            assert_eq!(original.done(), t == 2);
        }
    }

    #[test]
    fn test_expand_without_original() {
        let config = RelabelConfig::default()
            .strategy(GoalStrategy::Final)
            .keep_original(false);
        let mut relabeler = Relabeler::build(&config);
        let hs = relabeler.expand(&trajectory(4), sparse_reward).unwrap();

        assert_eq!(hs.len(), 4);
        assert!(hs.iter().all(|h| goal_of(h) == 4.));
    }
}
