//! Configuration of [`Normalizer`](super::Normalizer).
use super::NormalizationMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Normalizer`](super::Normalizer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct NormalizerConfig {
    /// Dimensionality of the normalized vectors.
    pub size: usize,

    /// Lower bound of the standard deviation.
    pub eps: f32,

    /// Normalized values are clipped to `[-clip_range, clip_range]`.
    ///
    /// `None` means no clipping.
    pub clip_range: Option<f32>,

    /// Rescaling rule.
    pub mode: NormalizationMode,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            size: 0,
            eps: 1e-2,
            clip_range: None,
            mode: NormalizationMode::Gaussian,
        }
    }
}

impl NormalizerConfig {
    /// Default configuration for vectors of dimension `size`.
    pub fn new(size: usize) -> Self {
        Self::default().size(size)
    }

    /// Sets the dimensionality.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the lower bound of the standard deviation.
    pub fn eps(mut self, eps: f32) -> Self {
        self.eps = eps;
        self
    }

    /// Sets the clipping range.
    pub fn clip_range(mut self, clip_range: f32) -> Self {
        self.clip_range = Some(clip_range);
        self
    }

    /// Sets the rescaling rule.
    pub fn mode(mut self, mode: NormalizationMode) -> Self {
        self.mode = mode;
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
    fn test_serde_normalizer_config() -> Result<()> {
        let config = NormalizerConfig::new(13)
            .eps(1e-3)
            .clip_range(5.)
            .mode(NormalizationMode::MinMax);

        let dir = TempDir::new("normalizer_config")?;
        let path = dir.path().join("normalizer_config.yaml");
        config.save(&path)?;
        let config_ = NormalizerConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }
}
