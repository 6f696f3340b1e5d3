use super::{Normalizer, NormalizerConfig};
use crate::{error::HerError, experience::HindsightExperience, her_buffer::HerBatch};
use ndarray::Array2;

/// Normalizers of the inputs of a goal-conditioned agent.
///
/// One normalizer covers the `observation ‖ goal` vectors; actions have their
/// own normalizer only when one is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct HindsightNormalizer {
    state: Normalizer,
    action: Option<Normalizer>,
}

impl HindsightNormalizer {
    /// Constructs the normalizers. Pass `None` as `action` to leave actions as they are.
    pub fn build(
        state: &NormalizerConfig,
        action: Option<&NormalizerConfig>,
    ) -> Result<Self, HerError> {
        Ok(Self {
            state: Normalizer::build(state)?,
            action: action.map(Normalizer::build).transpose()?,
        })
    }

    /// Normalizer of `observation ‖ goal` vectors.
    pub fn state(&self) -> &Normalizer {
        &self.state
    }

    /// Normalizer of actions, if any.
    pub fn action(&self) -> Option<&Normalizer> {
        self.action.as_ref()
    }

    /// Folds the states (and actions, if normalized) of `experiences` into the
    /// statistics.
    pub fn update(&mut self, experiences: &[HindsightExperience]) -> Result<(), HerError> {
        let states = stack(experiences, self.state.size(), |h| h.state())?;
        self.state.update(states.view())?;

        if let Some(action) = &mut self.action {
            let actions = stack(experiences, action.size(), |h| h.action())?;
            action.update(actions.view())?;
        }
        Ok(())
    }

    /// Normalizes a single `observation ‖ goal` vector, e.g. a policy input.
    pub fn normalize_state(&self, v: &[f32]) -> Result<Vec<f32>, HerError> {
        self.state.normalize(v, None)
    }

    /// Returns `batch` with normalized states, and normalized actions if configured.
    pub fn normalize_batch(&self, mut batch: HerBatch) -> Result<HerBatch, HerError> {
        batch.obs = self.state.normalize_batch(batch.obs.view())?;
        batch.next_obs = self.state.normalize_batch(batch.next_obs.view())?;
        if let Some(action) = &self.action {
            batch.act = action.normalize_batch(batch.act.view())?;
        }
        Ok(batch)
    }
}

/// Stacks the vectors `f` selects from `experiences` as rows.
fn stack<F>(experiences: &[HindsightExperience], size: usize, f: F) -> Result<Array2<f32>, HerError>
where
    F: Fn(&HindsightExperience) -> &[f32],
{
    for h in experiences {
        HerError::check_dim("normalizer input", size, f(h).len())?;
    }
    Ok(Array2::from_shape_fn((experiences.len(), size), |(r, c)| {
        f(&experiences[r])[c]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::her_buffer::{HerReplayBuffer, HerReplayBufferConfig};
    use crate::ExperienceBufferBase;

    fn experiences() -> Vec<HindsightExperience> {
        (0..4)
            .map(|i| {
                let x = i as f32;
                HindsightExperience::new(vec![x, 2. * x], vec![10. * x], -1., vec![x, x], false)
            })
            .collect()
    }

    #[test]
    fn test_update_states_only() {
        let mut normalizer = HindsightNormalizer::build(&NormalizerConfig::new(2), None).unwrap();
        normalizer.update(&experiences()).unwrap();

        assert_eq!(normalizer.state().count(), 4);
        assert_eq!(normalizer.state().mean().unwrap().to_vec(), vec![1.5, 3.]);
        assert!(normalizer.action().is_none());
    }

    #[test]
    fn test_normalize_batch_with_actions() {
        let mut normalizer =
            HindsightNormalizer::build(&NormalizerConfig::new(2), Some(&NormalizerConfig::new(1)))
                .unwrap();
        normalizer.update(&experiences()).unwrap();

        let mut buffer = HerReplayBuffer::new(&HerReplayBufferConfig::default()).unwrap();
        for h in experiences() {
            buffer.push(h).unwrap();
        }
        let batch = buffer.sample(4, 4).unwrap();
        let normalized = normalizer.normalize_batch(batch).unwrap();

        for r in 0..4 {
            let obs = normalized.obs.row(r).to_vec();
            let l = normalized.ixs[r] as f32;
            assert_eq!(obs, normalizer.normalize_state(&[l, 2. * l]).unwrap());
        }
        // Mean action is 15, so normalized actions are centered
        let sum: f32 = normalized.act.iter().sum();
        assert!(sum.abs() < 1e-4);
    }

    #[test]
    fn test_update_rejects_wrong_size() {
        let mut normalizer = HindsightNormalizer::build(&NormalizerConfig::new(3), None).unwrap();
        assert!(matches!(
            normalizer.update(&experiences()),
            Err(HerError::ShapeMismatch { .. })
        ));
    }
}
