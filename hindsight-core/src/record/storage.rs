//! Aggregation of stored records.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// Stores records and aggregates them.
///
/// Scalars stored more than once under the same key are summarized as
/// `{key}_min`, `{key}_max`, `{key}_mean` and `{key}_median`. A scalar stored
/// once, and every other kind of value, is passed through; when a non-scalar
/// key occurs several times, the most recent value is kept.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::INFINITY, f32::min)
}

fn max(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn mean(vs: &[f32]) -> f32 {
    vs.iter().sum::<f32>() / vs.len() as f32
}

fn median(mut vs: Vec<f32>) -> f32 {
    vs.sort_by(|x, y| x.total_cmp(y));
    vs[vs.len() / 2]
}

impl RecordStorage {
    /// Constructs an empty storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            keys.extend(record.keys().cloned());
        }
        keys
    }

    fn aggregate_key(&self, key: &str) -> Record {
        let values = self
            .data
            .iter()
            .filter_map(|record| record.get(key))
            .collect::<Vec<_>>();
        let scalars = values
            .iter()
            .filter_map(|v| match v {
                RecordValue::Scalar(v) => Some(*v),
                _ => None,
            })
            .collect::<Vec<_>>();

        if scalars.len() > 1 && scalars.len() == values.len() {
            Record::from_slice(&[
                (format!("{}_min", key), RecordValue::Scalar(min(&scalars))),
                (format!("{}_max", key), RecordValue::Scalar(max(&scalars))),
                (format!("{}_mean", key), RecordValue::Scalar(mean(&scalars))),
                (format!("{}_median", key), RecordValue::Scalar(median(scalars))),
            ])
        } else {
            match values.last() {
                Some(&v) => Record::from_slice(&[(key, v.clone())]),
                None => Record::empty(),
            }
        }
    }

    /// Aggregates the stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();
        for key in self.keys().iter() {
            record.merge_inplace(self.aggregate_key(key));
        }
        self.data.clear();
        record
    }
}
