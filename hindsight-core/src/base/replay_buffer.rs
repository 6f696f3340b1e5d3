//! Replay buffer.
use anyhow::Result;

/// Interface of buffers that store experiences.
pub trait ExperienceBufferBase {
    /// Items pushed into the buffer.
    type Item;

    /// Pushes a transition into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// The number of transitions in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no transitions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface of replay buffers that generate batches for training.
///
/// Independent of [`ExperienceBufferBase`], this trait is only concerned with
/// sampling.
pub trait ReplayBufferBase {
    /// Configuration of the replay buffer.
    type Config: Clone;

    /// Batch generated from the buffer.
    type Batch;

    /// Builds a replay buffer from [Self::Config].
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Constructs a batch drawn from the whole buffer.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;

    /// Constructs a batch drawn from the `window` most recently stored items.
    fn batch_recent(&mut self, size: usize, window: usize) -> Result<Self::Batch>;
}
