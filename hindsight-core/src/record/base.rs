//! Record and its values.
use crate::error::HerError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A scalar, e.g., optimization steps, rewards and loss values.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array, e.g., a goal vector.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// A set of named values.
#[derive(Debug, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Constructs an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Constructs a record holding a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Constructs a record from a slice of `(key, value)`.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns the keys.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a value, overwriting the previous one with the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over `(key, value)`.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns a consuming iterator over `(key, value)`.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a value.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges `record` into `self`. Values of `record` win on key collisions.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f32, HerError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(HerError::RecordValueTypeError("Scalar".to_string())),
            None => Err(HerError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, HerError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(HerError::RecordValueTypeError("Array1".to_string())),
            None => Err(HerError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string.
    pub fn get_string(&self, k: &str) -> Result<String, HerError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(HerError::RecordValueTypeError("String".to_string())),
            None => Err(HerError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns `true` if the record has no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites() {
        let a = Record::from_slice(&[
            ("success_rate", RecordValue::Scalar(0.1)),
            ("strategy", RecordValue::String("future".into())),
        ]);
        let b = Record::from_scalar("success_rate", 0.5);
        let merged = a.merge(b);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get_scalar("success_rate").unwrap(), 0.5);
        assert_eq!(merged.get_string("strategy").unwrap(), "future");
    }

    #[test]
    fn test_lookup_errors() {
        let record = Record::from_scalar("buffer_size", 10.0);

        assert_eq!(
            record.get_array1("buffer_size"),
            Err(HerError::RecordValueTypeError("Array1".to_string()))
        );
        assert_eq!(
            record.get_scalar("eval_reward"),
            Err(HerError::RecordKeyError("eval_reward".to_string()))
        );
    }
}
