//! Transitions of goal-conditioned environments and their hindsight form.
use crate::error::HerError;

/// Observation of a goal-conditioned environment.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalObs {
    /// Raw sensor or joint values.
    pub observation: Vec<f32>,

    /// Projection of the current state onto the goal space.
    pub achieved_goal: Vec<f32>,

    /// Goal the episode is conditioned on.
    pub desired_goal: Vec<f32>,
}

impl GoalObs {
    /// Constructs an observation.
    pub fn new(observation: Vec<f32>, achieved_goal: Vec<f32>, desired_goal: Vec<f32>) -> Self {
        Self {
            observation,
            achieved_goal,
            desired_goal,
        }
    }

    /// Returns `observation ‖ goal`.
    pub fn concat_goal(&self, goal: &[f32]) -> Vec<f32> {
        let mut v = Vec::with_capacity(self.observation.len() + goal.len());
        v.extend_from_slice(&self.observation);
        v.extend_from_slice(goal);
        v
    }

    /// Returns `observation ‖ desired_goal`, the input of a goal-conditioned policy.
    pub fn flatten(&self) -> Vec<f32> {
        self.concat_goal(&self.desired_goal)
    }
}

/// A transition `(s_t, a_t, r_t, s_t+1, done_t)` of a goal-conditioned environment.
///
/// Fields are read-only; relabeling produces a new [`HindsightExperience`].
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    state: GoalObs,
    action: Vec<f32>,
    reward: f32,
    next_state: GoalObs,
    done: bool,
}

/// Transitions of one episode, in the order they were played.
pub type Trajectory = Vec<Experience>;

impl Experience {
    /// Constructs a transition.
    pub fn new(
        state: GoalObs,
        action: Vec<f32>,
        reward: f32,
        next_state: GoalObs,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    /// State before the transition.
    pub fn state(&self) -> &GoalObs {
        &self.state
    }

    /// Action taken.
    pub fn action(&self) -> &[f32] {
        &self.action
    }

    /// Reward given by the environment.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// State after the transition.
    pub fn next_state(&self) -> &GoalObs {
        &self.next_state
    }

    /// Terminal flag.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Goal achieved by this transition, i.e., `next_state.achieved_goal`.
    pub fn achieved_goal(&self) -> &[f32] {
        &self.next_state.achieved_goal
    }

    /// Returns the hindsight representation of this transition for `goal`.
    ///
    /// States become `observation ‖ goal`; `reward` replaces the environment
    /// reward and must already be computed for `goal`.
    pub fn relabel(&self, goal: &[f32], reward: f32) -> Result<HindsightExperience, HerError> {
        HerError::check_dim("goal", self.state.desired_goal.len(), goal.len())?;
        HerError::check_dim(
            "next observation",
            self.state.observation.len(),
            self.next_state.observation.len(),
        )?;

        Ok(HindsightExperience {
            state: self.state.concat_goal(goal),
            action: self.action.clone(),
            reward,
            next_state: self.next_state.concat_goal(goal),
            done: self.done,
        })
    }

    /// Returns the hindsight representation for the goal the episode was
    /// conditioned on, keeping the environment reward.
    pub fn with_desired_goal(&self) -> Result<HindsightExperience, HerError> {
        self.relabel(&self.state.desired_goal, self.reward)
    }
}

/// A transition whose states are flat `observation ‖ goal` vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct HindsightExperience {
    state: Vec<f32>,
    action: Vec<f32>,
    reward: f32,
    next_state: Vec<f32>,
    done: bool,
}

impl HindsightExperience {
    /// Constructs a hindsight transition from flat vectors.
    pub fn new(
        state: Vec<f32>,
        action: Vec<f32>,
        reward: f32,
        next_state: Vec<f32>,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    /// `observation ‖ goal` before the transition.
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    /// Action taken.
    pub fn action(&self) -> &[f32] {
        &self.action
    }

    /// Reward for the goal concatenated to the states.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// `observation ‖ goal` after the transition.
    pub fn next_state(&self) -> &[f32] {
        &self.next_state
    }

    /// Terminal flag.
    pub fn done(&self) -> bool {
        self.done
    }

    /// `1 - done`, the continuation mask of the Bellman target.
    pub fn mask(&self) -> f32 {
        if self.done {
            0.
        } else {
            1.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience() -> Experience {
        Experience::new(
            GoalObs::new(vec![1., 2., 3.], vec![0.5, 0.5], vec![1., 1.]),
            vec![0.1, -0.1],
            -1.,
            GoalObs::new(vec![4., 5., 6.], vec![0.7, 0.8], vec![1., 1.]),
            false,
        )
    }

    #[test]
    fn test_relabel_concatenates_goal() {
        let exp = experience();
        let goal = [0.7f32, 0.8];
        let h = exp.relabel(&goal, 0.).unwrap();

        assert_eq!(h.reward(), 0.);
        assert_eq!(h.state(), &[1f32, 2., 3., 0.7, 0.8]);
        assert_eq!(h.next_state(), &[4f32, 5., 6., 0.7, 0.8]);
        assert_eq!(h.action(), exp.action());
        assert_eq!(h.done(), exp.done());
        assert_eq!(h.mask(), 1.);

        // The source transition is left as it was
        assert_eq!(exp, experience());
    }

    #[test]
    fn test_relabel_rejects_goal_of_wrong_size() {
        let err = experience().relabel(&[0.1, 0.2, 0.3], 0.).unwrap_err();
        assert_eq!(
            err,
            HerError::ShapeMismatch {
                what: "goal",
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_with_desired_goal_keeps_env_reward() {
        let h = experience().with_desired_goal().unwrap();
        assert_eq!(h.reward(), -1.);
        assert_eq!(h.state(), &[1f32, 2., 3., 1., 1.]);
    }
}
