use super::{HerBatch, HerReplayBufferConfig};
use crate::{
    error::HerError,
    experience::{Experience, HindsightExperience},
    relabel::Relabeler,
    ExperienceBufferBase, ReplayBufferBase,
};
use anyhow::Result;
use log::trace;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// Lengths shared by every item of a buffer, fixed by the first one stored.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Dims {
    state: usize,
    action: usize,
}

impl Dims {
    fn of(h: &HindsightExperience) -> Self {
        Self {
            state: h.state().len(),
            action: h.action().len(),
        }
    }

    fn check(&self, h: &HindsightExperience) -> Result<(), HerError> {
        HerError::check_dim("stored state", self.state, h.state().len())?;
        HerError::check_dim("stored next state", self.state, h.next_state().len())?;
        HerError::check_dim("stored action", self.action, h.action().len())
    }
}

/// Ring buffer of hindsight experiences.
pub struct HerReplayBuffer {
    capacity: usize,

    /// Slot written by the next store.
    i: usize,

    /// Grows up to `capacity`, then stays there.
    slots: Vec<HindsightExperience>,

    total_inserted: u64,
    dims: Option<Dims>,
    rng: StdRng,
}

impl HerReplayBuffer {
    /// Constructs an empty buffer. Fails if the capacity is zero.
    pub fn new(config: &HerReplayBufferConfig) -> Result<Self, HerError> {
        if config.capacity == 0 {
            return Err(HerError::Configuration(
                "capacity of the replay buffer must be positive".to_string(),
            ));
        }

        Ok(Self {
            capacity: config.capacity,
            i: 0,
            slots: Vec::with_capacity(config.capacity.min(1 << 16)),
            total_inserted: 0,
            dims: None,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Relabels `experience` with `goal` and `reward`, then stores it.
    ///
    /// Returns a copy of the stored item.
    pub fn store(
        &mut self,
        experience: &Experience,
        reward: f32,
        goal: &[f32],
    ) -> Result<HindsightExperience, HerError> {
        let h = experience.relabel(goal, reward)?;
        self.insert(h.clone())?;
        Ok(h)
    }

    /// Stores every hindsight experience `relabeler` derives from `trajectory`.
    ///
    /// Returns the stored items in the order they were stored.
    pub fn store_trajectory<R>(
        &mut self,
        trajectory: &[Experience],
        relabeler: &mut Relabeler,
        reward_fn: R,
    ) -> Result<Vec<HindsightExperience>, HerError>
    where
        R: FnMut(&[f32], &[f32]) -> f32,
    {
        let mut stored = Vec::new();
        relabeler.for_each_goal(trajectory, reward_fn, |exp, goal, reward| {
            stored.push(self.store(exp, reward, goal)?);
            Ok::<_, HerError>(())
        })?;
        trace!(
            "Stored {} items from a trajectory of length {}",
            stored.len(),
            trajectory.len()
        );
        Ok(stored)
    }

    fn insert(&mut self, h: HindsightExperience) -> Result<(), HerError> {
        match &self.dims {
            Some(dims) => dims.check(&h)?,
            None => {
                let dims = Dims::of(&h);
                HerError::check_dim("stored next state", dims.state, h.next_state().len())?;
                self.dims = Some(dims);
            }
        }

        if self.slots.len() < self.capacity {
            self.slots.push(h);
        } else {
            self.slots[self.i] = h;
        }
        self.i = (self.i + 1) % self.capacity;
        self.total_inserted += 1;
        Ok(())
    }

    /// Draws `batch_size` distinct items uniformly among the `window` most
    /// recently stored ones.
    ///
    /// A window larger than the number of stored items covers the whole buffer.
    pub fn sample(&mut self, batch_size: usize, window: usize) -> Result<HerBatch, HerError> {
        let available = window.min(self.slots.len());
        if self.slots.is_empty() || batch_size > available {
            return Err(HerError::InsufficientData {
                requested: batch_size,
                available,
            });
        }

        let start = self.total_inserted - available as u64;
        let ixs = index::sample(&mut self.rng, available, batch_size)
            .into_iter()
            .map(|j| start + j as u64)
            .collect::<Vec<_>>();
        let items = ixs
            .iter()
            .map(|&l| &self.slots[self.slot(l)])
            .collect::<Vec<_>>();

        let dims = self.dims.unwrap_or(Dims {
            state: 0,
            action: 0,
        });

        Ok(HerBatch::from_items(&items, ixs, dims.state, dims.action))
    }

    #[inline]
    fn slot(&self, logical: u64) -> usize {
        (logical % self.capacity as u64) as usize
    }

    /// Returns the item with logical index `logical` if it is still held.
    pub fn get(&self, logical: u64) -> Option<&HindsightExperience> {
        let oldest = self.total_inserted - self.slots.len() as u64;
        if logical >= oldest && logical < self.total_inserted {
            Some(&self.slots[self.slot(logical)])
        } else {
            None
        }
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of items held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items stored over the lifetime of the buffer.
    pub fn total_inserted(&self) -> u64 {
        self.total_inserted
    }

    /// Iterates over the held items from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &HindsightExperience> {
        // Before the first wrap-around the cursor equals the length
        let split = if self.slots.len() < self.capacity {
            0
        } else {
            self.i
        };
        self.slots[split..].iter().chain(self.slots[..split].iter())
    }
}

impl ExperienceBufferBase for HerReplayBuffer {
    type Item = HindsightExperience;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        self.insert(tr)?;
        Ok(())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl ReplayBufferBase for HerReplayBuffer {
    type Config = HerReplayBufferConfig;
    type Batch = HerBatch;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self::new(config)?)
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Ok(self.sample(size, self.slots.len())?)
    }

    fn batch_recent(&mut self, size: usize, window: usize) -> Result<Self::Batch> {
        Ok(self.sample(size, window)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        experience::GoalObs,
        relabel::{GoalStrategy, RelabelConfig},
        TransitionBatch,
    };
    use std::collections::HashSet;

    /// Transition whose observation holds `label`.
    fn experience(label: f32) -> Experience {
        Experience::new(
            GoalObs::new(vec![label, 0.], vec![label], vec![-1.]),
            vec![label],
            -1.,
            GoalObs::new(vec![label, 1.], vec![label + 0.5], vec![-1.]),
            label as usize % 4 == 0,
        )
    }

    fn buffer(capacity: usize) -> HerReplayBuffer {
        HerReplayBuffer::new(&HerReplayBufferConfig::default().capacity(capacity)).unwrap()
    }

    fn labels(buffer: &HerReplayBuffer) -> Vec<f32> {
        buffer.iter().map(|h| h.state()[0]).collect()
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        let mut buffer = buffer(5);
        for label in 1..=7 {
            buffer.store(&experience(label as f32), 0., &[0.]).unwrap();
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.capacity(), 5);
        assert_eq!(buffer.total_inserted(), 7);
        assert_eq!(labels(&buffer), vec![3., 4., 5., 6., 7.]);
        assert!(buffer.get(1).is_none());
        assert_eq!(buffer.get(2).unwrap().state()[0], 3.);
        assert_eq!(buffer.get(6).unwrap().state()[0], 7.);
        assert!(buffer.get(7).is_none());
    }

    #[test]
    fn test_size_is_min_of_stored_and_capacity() {
        for capacity in [1, 3, 8] {
            let mut buffer = buffer(capacity);
            for m in 0..12usize {
                assert_eq!(buffer.len(), m.min(capacity));
                buffer.store(&experience(m as f32), 0., &[0.]).unwrap();
            }
        }
    }

    #[test]
    fn test_first_item_evicted_exactly_after_capacity() {
        let capacity = 4;
        let mut buffer = buffer(capacity);
        buffer.store(&experience(100.), 0., &[0.]).unwrap();
        for label in 0..capacity - 1 {
            buffer.store(&experience(label as f32), 0., &[0.]).unwrap();
        }
        assert!(labels(&buffer).contains(&100.));

        buffer.store(&experience(50.), 0., &[0.]).unwrap();
        assert!(!labels(&buffer).contains(&100.));
    }

    #[test]
    fn test_store_returns_stored_item() {
        let mut buffer = buffer(10);
        let exp = experience(4.);
        let h = buffer.store(&exp, 0., &[7.]).unwrap();

        assert_eq!(h.state(), &[4f32, 0., 7.]);
        assert_eq!(h.next_state(), &[4f32, 1., 7.]);
        assert_eq!(h.reward(), 0.);
        assert!(h.done());
        assert_eq!(buffer.get(0), Some(&h));
    }

    #[test]
    fn test_dimensions_fixed_by_first_item() {
        let mut buffer = buffer(10);
        buffer.store(&experience(1.), 0., &[0.]).unwrap();

        let wide = HindsightExperience::new(vec![0.; 4], vec![0.], 0., vec![0.; 4], false);
        assert!(buffer.push(wide).is_err());

        let exp = Experience::new(
            GoalObs::new(vec![0., 0.], vec![0., 0.], vec![0., 0.]),
            vec![0.],
            0.,
            GoalObs::new(vec![0., 0.], vec![0., 0.], vec![0., 0.]),
            false,
        );
        assert!(matches!(
            buffer.store(&exp, 0., &[1., 1.]),
            Err(HerError::ShapeMismatch { .. })
        ));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_sample_within_recent_window() {
        let mut buffer = buffer(50);
        for label in 0..120 {
            buffer.store(&experience(label as f32), 0., &[0.]).unwrap();
        }

        for (batch_size, window) in [(10, 10), (5, 20), (50, 50), (30, 1000)] {
            for _ in 0..20 {
                let batch = buffer.sample(batch_size, window).unwrap();
                assert_eq!(batch.len(), batch_size);

                let window = window.min(50) as u64;
                let distinct = batch.ixs.iter().collect::<HashSet<_>>();
                assert_eq!(distinct.len(), batch_size);
                assert!(batch.ixs.iter().all(|&l| l >= 120 - window && l < 120));

                // Row r of the batch is the item with logical index ixs[r]
                for (r, &l) in batch.ixs.iter().enumerate() {
                    assert_eq!(batch.obs[[r, 0]], l as f32);
                    assert_eq!(batch.act[[r, 0]], l as f32);
                    assert_eq!(batch.next_obs[[r, 1]], 1.);
                    let expected_mask = if l % 4 == 0 { 0. } else { 1. };
                    assert_eq!(batch.mask[r], expected_mask);
                }
            }
        }
    }

    #[test]
    fn test_insufficient_data() {
        let mut buffer = buffer(10);
        assert_eq!(
            buffer.sample(1, 10).unwrap_err(),
            HerError::InsufficientData {
                requested: 1,
                available: 0
            }
        );

        for label in 0..6 {
            buffer.store(&experience(label as f32), 0., &[0.]).unwrap();
        }
        assert_eq!(
            buffer.sample(4, 3).unwrap_err(),
            HerError::InsufficientData {
                requested: 4,
                available: 3
            }
        );
        assert!(buffer.sample(7, 100).is_err());
        assert_eq!(buffer.sample(6, 100).unwrap().len(), 6);
        assert!(buffer.batch_recent(3, 3).is_ok());
    }

    #[test]
    fn test_store_trajectory_with_final_strategy() {
        let mut buffer = buffer(100);
        let config = RelabelConfig::default()
            .strategy(GoalStrategy::Final)
            .keep_original(false);
        let mut relabeler = Relabeler::build(&config);
        let trajectory = (0..3).map(|t| experience(t as f32)).collect::<Vec<_>>();
        let reward_fn = |a: &[f32], d: &[f32]| if a == d { 0. } else { -1. };

        let stored = buffer
            .store_trajectory(&trajectory, &mut relabeler, reward_fn)
            .unwrap();

        assert_eq!(stored.len(), 3);
        assert_eq!(buffer.len(), 3);
        for h in buffer.iter() {
            // Goal achieved by transition 2
            assert_eq!(h.state()[2], 2.5);
        }
        let rewards = stored.iter().map(|h| h.reward()).collect::<Vec<_>>();
        assert_eq!(rewards, vec![-1., -1., 0.]);
    }

    #[test]
    fn test_zero_capacity() {
        let config = HerReplayBufferConfig::default().capacity(0);
        assert!(matches!(
            HerReplayBuffer::new(&config),
            Err(HerError::Configuration(_))
        ));
    }
}
