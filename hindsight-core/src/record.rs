//! Key-value records of values observed during training and evaluation.
//!
//! ```rust
//! use hindsight_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("cycle", 3.0);
//! record.insert("mean_reward", RecordValue::Scalar(-0.8));
//! record.insert("goal", RecordValue::Array1(vec![0.1, 0.2, 0.3]));
//! assert_eq!(record.get_scalar("cycle").unwrap(), 3.0);
//! ```
//!
//! [`HerTrainer`](crate::HerTrainer) writes its records into an
//! [`AggregateRecorder`], which summarizes them when flushed.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
