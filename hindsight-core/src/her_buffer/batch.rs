//! Batch of hindsight transitions.
use crate::{experience::HindsightExperience, TransitionBatch};
use ndarray::Array2;

/// A batch of hindsight transitions, one row per transition.
#[derive(Debug, Clone, PartialEq)]
pub struct HerBatch {
    /// `observation ‖ goal` before the transitions.
    pub obs: Array2<f32>,

    /// Actions.
    pub act: Array2<f32>,

    /// `observation ‖ goal` after the transitions.
    pub next_obs: Array2<f32>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// `1 - done`.
    pub mask: Vec<f32>,

    /// Logical indices of the sampled items.
    pub ixs: Vec<u64>,
}

impl HerBatch {
    /// Stacks `items` row by row.
    ///
    /// All items must have states of length `dim_obs` and actions of length
    /// `dim_act`, which [`HerReplayBuffer`](super::HerReplayBuffer) guarantees.
    pub(super) fn from_items(
        items: &[&HindsightExperience],
        ixs: Vec<u64>,
        dim_obs: usize,
        dim_act: usize,
    ) -> Self {
        let n = items.len();

        Self {
            obs: Array2::from_shape_fn((n, dim_obs), |(r, c)| items[r].state()[c]),
            act: Array2::from_shape_fn((n, dim_act), |(r, c)| items[r].action()[c]),
            next_obs: Array2::from_shape_fn((n, dim_obs), |(r, c)| items[r].next_state()[c]),
            reward: items.iter().map(|h| h.reward()).collect(),
            mask: items.iter().map(|h| h.mask()).collect(),
            ixs,
        }
    }
}

impl TransitionBatch for HerBatch {
    type ObsBatch = Array2<f32>;
    type ActBatch = Array2<f32>;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<f32>,
    ) {
        (self.obs, self.act, self.next_obs, self.reward, self.mask)
    }

    fn len(&self) -> usize {
        self.reward.len()
    }

    fn obs(&self) -> &Self::ObsBatch {
        &self.obs
    }

    fn act(&self) -> &Self::ActBatch {
        &self.act
    }
}
