//! Configuration of [`HerReplayBuffer`](super::HerReplayBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`HerReplayBuffer`](super::HerReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HerReplayBufferConfig {
    /// Maximum number of items held at once.
    pub capacity: usize,

    /// Random seed for sampling.
    pub seed: u64,
}

impl Default for HerReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            seed: 42,
        }
    }
}

impl HerReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`HerReplayBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`HerReplayBufferConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_her_replay_buffer_config() -> Result<()> {
        let config = HerReplayBufferConfig::default().capacity(100).seed(1);

        let dir = TempDir::new("her_replay_buffer_config")?;
        let path = dir.path().join("her_replay_buffer_config.yaml");
        config.save(&path)?;
        let config_ = HerReplayBufferConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }
}
