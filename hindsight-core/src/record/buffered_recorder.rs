use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};

/// Keeps records in memory.
///
/// Records given to [`Recorder::write`] are kept as is. Records given to
/// [`AggregateRecorder::store`] are aggregated on flush and the aggregation
/// is kept with an additional `"step"` scalar. Mainly used in tests and for
/// inspecting evaluation runs.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Returns the number of kept records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record is kept.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let mut record = self.storage.aggregate();
        record.insert("step", RecordValue::Scalar(step as f32));
        self.buf.push(record);
    }
}
