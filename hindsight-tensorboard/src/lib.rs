//! Writes training records as TensorBoard scalars.
use hindsight_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    ignore_unsupported_value: bool,
    storage: RecordStorage,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "step".to_string(),
            ignore_unsupported_value: true,
            storage: RecordStorage::new(),
        }
    }

    /// Construct a [`TensorboardRecorder`] warning about values it cannot write.
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            ignore_unsupported_value: false,
            ..Self::new(logdir)
        }
    }

    fn write_at(&mut self, record: &Record, step: usize) {
        for (k, v) in record.iter() {
            if *k == self.step_key {
                continue;
            }
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::DateTime(_) => {} // discard value
                _ => {
                    if !self.ignore_unsupported_value {
                        warn!("Unsupported value: {:?}", (k, v));
                    }
                }
            }
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord at the step given by its `"step"` scalar.
    ///
    /// This method handles [RecordValue::Scalar] in the [Record].
    /// Other variants will be ignored.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without {:?} is not written", self.step_key);
                return;
            }
        };
        self.write_at(&record, step);
    }
}

impl AggregateRecorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        self.write_at(&record, step.max(0) as usize);
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_write_event_file() {
        let dir = TempDir::new("tensorboard_recorder").unwrap();
        let mut recorder = TensorboardRecorder::new(dir.path());

        let mut record = Record::from_scalar("mean_reward", -0.5);
        record.insert("goal", RecordValue::Array1(vec![0.1, 0.2]));
        recorder.store(record);
        recorder.flush(10);
        recorder.write(Record::from_scalar("success_rate", 1.0));
        recorder.write(Record::from_slice(&[
            ("step", RecordValue::Scalar(20.0)),
            ("success_rate", RecordValue::Scalar(0.5)),
        ]));

        // The event file is written by a background thread, joined on drop
        drop(recorder);
        let event_files = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("events.out.tfevents.")
            })
            .count();
        assert_eq!(event_files, 1);
    }
}
