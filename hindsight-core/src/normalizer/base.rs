use super::{NormalizationMode, NormalizerConfig};
use crate::error::HerError;
use log::trace;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Per-dimension statistics of the vectors seen so far.
#[derive(Debug, Clone, PartialEq)]
enum Stats {
    Gaussian {
        sum: Array1<f64>,
        sumsq: Array1<f64>,
        count: u64,
        mean: Array1<f32>,
        std: Array1<f32>,
    },
    MinMax {
        min: Array1<f32>,
        max: Array1<f32>,
    },
}

/// Running normalization statistics of fixed-size vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    size: usize,
    eps: f32,
    clip_range: f32,
    stats: Stats,
}

impl Normalizer {
    /// Constructs a normalizer with mean 0 and std 1, or min 0 and max 1.
    pub fn build(config: &NormalizerConfig) -> Result<Self, HerError> {
        if !(config.eps > 0.) {
            return Err(HerError::Configuration(format!(
                "eps of the normalizer must be positive, got {}",
                config.eps
            )));
        }
        let clip_range = config.clip_range.unwrap_or(f32::INFINITY);
        if !(clip_range > 0.) {
            return Err(HerError::Configuration(format!(
                "clip range of the normalizer must be positive, got {}",
                clip_range
            )));
        }

        let size = config.size;
        let stats = match config.mode {
            NormalizationMode::Gaussian => Stats::Gaussian {
                sum: Array1::zeros(size),
                sumsq: Array1::zeros(size),
                count: 0,
                mean: Array1::zeros(size),
                std: Array1::ones(size),
            },
            NormalizationMode::MinMax => Stats::MinMax {
                min: Array1::zeros(size),
                max: Array1::ones(size),
            },
        };

        Ok(Self {
            size,
            eps: config.eps,
            clip_range,
            stats,
        })
    }

    /// Dimensionality of the normalized vectors.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Rescaling rule.
    pub fn mode(&self) -> NormalizationMode {
        match self.stats {
            Stats::Gaussian { .. } => NormalizationMode::Gaussian,
            Stats::MinMax { .. } => NormalizationMode::MinMax,
        }
    }

    /// Number of vectors seen, counted in [`NormalizationMode::Gaussian`] only.
    pub fn count(&self) -> u64 {
        match &self.stats {
            Stats::Gaussian { count, .. } => *count,
            Stats::MinMax { .. } => 0,
        }
    }

    /// Current mean, if the mode is [`NormalizationMode::Gaussian`].
    pub fn mean(&self) -> Option<&Array1<f32>> {
        match &self.stats {
            Stats::Gaussian { mean, .. } => Some(mean),
            Stats::MinMax { .. } => None,
        }
    }

    /// Current standard deviation, if the mode is [`NormalizationMode::Gaussian`].
    pub fn std(&self) -> Option<&Array1<f32>> {
        match &self.stats {
            Stats::Gaussian { std, .. } => Some(std),
            Stats::MinMax { .. } => None,
        }
    }

    /// Current `(min, max)`, if the mode is [`NormalizationMode::MinMax`].
    pub fn range(&self) -> Option<(&Array1<f32>, &Array1<f32>)> {
        match &self.stats {
            Stats::Gaussian { .. } => None,
            Stats::MinMax { min, max } => Some((min, max)),
        }
    }

    /// Folds the rows of `batch` into the statistics.
    ///
    /// An empty batch leaves the statistics unchanged.
    pub fn update(&mut self, batch: ArrayView2<f32>) -> Result<(), HerError> {
        HerError::check_dim("normalizer update", self.size, batch.ncols())?;
        if batch.nrows() == 0 {
            return Ok(());
        }

        match &mut self.stats {
            Stats::Gaussian {
                sum,
                sumsq,
                count,
                mean,
                std,
            } => {
                let batch = batch.mapv(|x| x as f64);
                *sum += &batch.sum_axis(Axis(0));
                *sumsq += &batch.mapv(|x| x * x).sum_axis(Axis(0));
                *count += batch.nrows() as u64;

                let n = *count as f64;
                let eps2 = (self.eps as f64).powi(2);
                let m = sum.mapv(|s| s / n);
                let var = ndarray::Zip::from(&*sumsq)
                    .and(&m)
                    .map_collect(|&sq, &mu| (sq / n - mu * mu).max(eps2));
                *mean = m.mapv(|x| x as f32);
                *std = var.mapv(|v| v.sqrt() as f32);
            }
            Stats::MinMax { min, max } => {
                for row in batch.rows() {
                    min.zip_mut_with(&row, |m, &x| *m = (*m).min(x));
                    max.zip_mut_with(&row, |m, &x| *m = (*m).max(x));
                }
            }
        }
        trace!("Normalizer updated with {} rows", batch.nrows());

        Ok(())
    }

    /// Rescales `v` and clips the result to `[-clip, clip]`.
    ///
    /// `clip_range == None` uses the configured range. Statistics are left
    /// unchanged.
    pub fn normalize(&self, v: &[f32], clip_range: Option<f32>) -> Result<Vec<f32>, HerError> {
        HerError::check_dim("normalized vector", self.size, v.len())?;
        let clip = clip_range.unwrap_or(self.clip_range);

        let out = match &self.stats {
            Stats::Gaussian { mean, std, .. } => v
                .iter()
                .zip(mean.iter().zip(std.iter()))
                .map(|(x, (m, s))| ((x - m) / s).max(-clip).min(clip))
                .collect(),
            Stats::MinMax { min, max } => v
                .iter()
                .zip(min.iter().zip(max.iter()))
                .map(|(x, (lo, hi))| ((x - lo) / (hi - lo)).max(-clip).min(clip))
                .collect(),
        };
        Ok(out)
    }

    /// Rescales every row of `batch` with the configured clipping range.
    pub fn normalize_batch(&self, batch: ArrayView2<f32>) -> Result<Array2<f32>, HerError> {
        HerError::check_dim("normalized batch", self.size, batch.ncols())?;
        let mut out = Array2::zeros(batch.raw_dim());
        for (src, mut dst) in batch.rows().into_iter().zip(out.rows_mut()) {
            let v = src.to_vec();
            dst.assign(&Array1::from(self.normalize(&v, None)?));
        }
        Ok(out)
    }
}
