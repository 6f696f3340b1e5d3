//! Configuration of [`Relabeler`](super::Relabeler).
use super::GoalStrategy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Relabeler`](super::Relabeler).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RelabelConfig {
    /// Selection of substitute goals.
    pub strategy: GoalStrategy,

    /// Number of substitute goals per transition with [`GoalStrategy::Future`].
    pub future_k: usize,

    /// If `true`, [`Relabeler::expand`](super::Relabeler::expand) also emits each
    /// transition with the goal of the episode and the reward of the environment.
    pub keep_original: bool,

    /// Random seed for drawing future goals.
    pub seed: u64,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            strategy: GoalStrategy::Future,
            future_k: 4,
            keep_original: true,
            seed: 42,
        }
    }
}

impl RelabelConfig {
    /// Sets the goal selection strategy.
    pub fn strategy(mut self, strategy: GoalStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the number of future goals per transition.
    pub fn future_k(mut self, future_k: usize) -> Self {
        self.future_k = future_k;
        self
    }

    /// Sets if transitions with the episode goal are kept.
    pub fn keep_original(mut self, keep_original: bool) -> Self {
        self.keep_original = keep_original;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
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
    fn test_serde_relabel_config() -> Result<()> {
        let config = RelabelConfig::default()
            .strategy(GoalStrategy::Final)
            .keep_original(false)
            .seed(7);

        let dir = TempDir::new("relabel_config")?;
        let path = dir.path().join("relabel_config.yaml");
        config.save(&path)?;
        let config_ = RelabelConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }

    #[test]
    fn test_unknown_strategy_in_yaml() {
        let yaml = "strategy: episode\nfuture_k: 4\nkeep_original: true\nseed: 0\n";
        let err = serde_yaml::from_str::<RelabelConfig>(yaml).unwrap_err();
        assert!(err.to_string().contains("Wrong strategy"));
    }
}
