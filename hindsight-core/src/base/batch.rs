//! Batch.

/// A batch of transitions `(o_t, a_t, o_t+1, r_t, mask_t)` for an optimization step.
pub trait TransitionBatch {
    /// A set of observations in a batch.
    type ObsBatch;

    /// A set of actions in a batch.
    type ActBatch;

    /// Unpacks the data `(o_t, a_t, o_t+1, r_t, mask_t)`.
    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<f32>,
    );

    /// Returns the number of transitions.
    fn len(&self) -> usize;

    /// Returns `true` if the batch has no transitions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `o_t`.
    fn obs(&self) -> &Self::ObsBatch;

    /// Returns `a_t`.
    fn act(&self) -> &Self::ActBatch;
}
