use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);
}

/// Stores records and writes values aggregated over them on [`AggregateRecorder::flush`].
pub trait AggregateRecorder {
    /// Stores a record.
    fn store(&mut self, record: Record);

    /// Writes the aggregation of the stored records, tagged with `step`, and
    /// clears them.
    fn flush(&mut self, step: i64);
}
