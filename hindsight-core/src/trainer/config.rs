//! Configuration of [`HerTrainer`](super::HerTrainer).
use crate::ere::EreConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`HerTrainer`](super::HerTrainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HerTrainerConfig {
    /// Number of epochs. The agent is evaluated at the end of each epoch.
    pub epochs: usize,

    /// Number of cycles in an epoch.
    pub cycles_per_epoch: usize,

    /// Number of episodes played at the start of each cycle.
    pub episodes_per_cycle: usize,

    /// Maximum number of steps in an episode.
    pub episode_len: usize,

    /// Upper bound of the optimization steps in a cycle.
    ///
    /// A cycle never runs more optimization steps than it played environment steps.
    pub opt_steps_per_cycle: usize,

    /// Environment steps played before optimization starts.
    pub warmup_steps: usize,

    /// Number of most recent rewards averaged into `mean_reward`.
    pub reward_window: usize,

    /// Sampling windows of Emphasizing Recent Experience.
    ///
    /// `None` samples from the whole buffer.
    pub ere: Option<EreConfig>,

    /// Random seed of the training environment.
    pub seed: i64,
}

impl Default for HerTrainerConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            cycles_per_epoch: 50,
            episodes_per_cycle: 2,
            episode_len: 50,
            opt_steps_per_cycle: 40,
            warmup_steps: 0,
            reward_window: 1000,
            ere: None,
            seed: 0,
        }
    }
}

impl HerTrainerConfig {
    /// Sets the number of epochs.
    pub fn epochs(mut self, v: usize) -> Self {
        self.epochs = v;
        self
    }

    /// Sets the number of cycles in an epoch.
    pub fn cycles_per_epoch(mut self, v: usize) -> Self {
        self.cycles_per_epoch = v;
        self
    }

    /// Sets the number of episodes in a cycle.
    pub fn episodes_per_cycle(mut self, v: usize) -> Self {
        self.episodes_per_cycle = v;
        self
    }

    /// Sets the maximum length of episodes.
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }

    /// Sets the upper bound of optimization steps in a cycle.
    pub fn opt_steps_per_cycle(mut self, v: usize) -> Self {
        self.opt_steps_per_cycle = v;
        self
    }

    /// Sets the warmup period in environment steps.
    pub fn warmup_steps(mut self, v: usize) -> Self {
        self.warmup_steps = v;
        self
    }

    /// Sets the number of rewards averaged into `mean_reward`.
    pub fn reward_window(mut self, v: usize) -> Self {
        self.reward_window = v;
        self
    }

    /// Enables Emphasizing Recent Experience.
    pub fn ere(mut self, ere: EreConfig) -> Self {
        self.ere = Some(ere);
        self
    }

    /// Sets the random seed of the training environment.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`HerTrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`HerTrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
