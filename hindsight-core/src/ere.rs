//! Emphasizing Recent Experience (ERE).
//!
//! Within one training cycle, the `k`-th of `K` optimization steps samples only
//! from the most recent
//!
//! ```text
//! c_k = max(N · η^(k · L / K), c_min)
//! ```
//!
//! transitions of the replay buffer, where `N` is the buffer capacity, `η` the
//! decay rate and `L` the episode length. Early steps see the whole buffer, later
//! steps a window shrinking towards `c_min`.
use crate::error::HerError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Size of the sampling window for the `k`-th of `total_steps` optimization steps.
///
/// The result is floored to an integer and capped at the number of stored
/// transitions `n`. With `total_steps == 0` the exponent is taken as zero.
pub fn window_size(
    capacity: usize,
    eta: f32,
    k: usize,
    total_steps: usize,
    episode_len: usize,
    min_window: usize,
    n: usize,
) -> usize {
    let exponent = if total_steps == 0 {
        0.
    } else {
        k as f64 * (episode_len as f64 / total_steps as f64)
    };
    let c_k = (capacity as f64 * (eta as f64).powf(exponent)).max(min_window as f64);
    (c_k.floor() as usize).min(n)
}

/// Configuration of [`EreScheduler`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EreConfig {
    /// Decay rate `η` in `(0, 1]`; `1` disables the emphasis.
    pub eta: f32,

    /// Lower bound `c_min` of the window.
    pub min_window: usize,

    /// Episode length `L`.
    pub episode_len: usize,
}

impl Default for EreConfig {
    fn default() -> Self {
        Self {
            eta: 0.996,
            min_window: 2500,
            episode_len: 50,
        }
    }
}

impl EreConfig {
    /// Sets the decay rate.
    pub fn eta(mut self, eta: f32) -> Self {
        self.eta = eta;
        self
    }

    /// Sets the lower bound of the window.
    pub fn min_window(mut self, min_window: usize) -> Self {
        self.min_window = min_window;
        self
    }

    /// Sets the episode length.
    pub fn episode_len(mut self, episode_len: usize) -> Self {
        self.episode_len = episode_len;
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

/// Computes ERE sampling windows.
#[derive(Debug, Clone, PartialEq)]
pub struct EreScheduler {
    eta: f32,
    min_window: usize,
    episode_len: usize,
}

impl EreScheduler {
    /// Constructs a scheduler. Fails if `eta` is not in `(0, 1]`.
    pub fn build(config: &EreConfig) -> Result<Self, HerError> {
        if !(config.eta > 0. && config.eta <= 1.) {
            return Err(HerError::Configuration(format!(
                "ERE decay rate must be in (0, 1], got {}",
                config.eta
            )));
        }
        Ok(Self {
            eta: config.eta,
            min_window: config.min_window,
            episode_len: config.episode_len,
        })
    }

    /// Window for the `k`-th of `total_steps` optimization steps on a buffer of
    /// `capacity` holding `n` transitions.
    pub fn window(&self, capacity: usize, k: usize, total_steps: usize, n: usize) -> usize {
        window_size(
            capacity,
            self.eta,
            k,
            total_steps,
            self.episode_len,
            self.min_window,
            n,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_covers_buffer() {
        assert_eq!(window_size(1_000, 0.9, 0, 50, 50, 10, 1_000), 1_000);
        assert_eq!(window_size(1_000, 0.9, 0, 50, 50, 10, 300), 300);
    }

    #[test]
    fn test_window_is_monotone_and_bounded() {
        let (capacity, n, total_steps, min_window) = (100_000, 60_000, 50, 5_000);
        let mut prev = usize::MAX;
        for k in 0..total_steps {
            let w = window_size(capacity, 0.922, k, total_steps, 50, min_window, n);
            assert!(w <= prev);
            assert!(w >= min_window);
            assert!(w <= n);
            prev = w;
        }
        // 0.922^49 * 1e5 is about 1.86e3, below the floor
        assert_eq!(prev, min_window);
    }

    #[test]
    fn test_window_capped_by_size_below_floor() {
        assert_eq!(window_size(1_000, 0.5, 40, 50, 50, 100, 30), 30);
    }

    #[test]
    fn test_zero_total_steps() {
        assert_eq!(window_size(500, 0.5, 3, 0, 50, 1, 500), 500);
    }

    #[test]
    fn test_scheduler_rejects_bad_eta() {
        for eta in [0., -0.5, 1.5, f32::NAN] {
            let config = EreConfig::default().eta(eta);
            assert!(matches!(
                EreScheduler::build(&config),
                Err(HerError::Configuration(_))
            ));
        }
        let scheduler = EreScheduler::build(&EreConfig::default().eta(1.)).unwrap();
        assert_eq!(scheduler.window(100, 10, 10, 80), 80);
    }
}
