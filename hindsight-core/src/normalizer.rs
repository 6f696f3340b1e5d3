//! Running normalization statistics.
//!
//! A [`Normalizer`] keeps per-dimension statistics of the vectors it has seen
//! and rescales new vectors with them, either to zero mean and unit variance
//! ([`NormalizationMode::Gaussian`]) or to the observed range
//! ([`NormalizationMode::MinMax`]). Statistics only change through
//! [`Normalizer::update`].
//!
//! ```
//! use hindsight_core::normalizer::{Normalizer, NormalizerConfig};
//! use ndarray::array;
//!
//! let mut normalizer = Normalizer::build(&NormalizerConfig::new(2).clip_range(5.)).unwrap();
//! normalizer.update(array![[1., 10.], [3., 30.]].view()).unwrap();
//!
//! let v = normalizer.normalize(&[2., 50.], None).unwrap();
//! assert_eq!(v, vec![0., 3.]);
//! ```
mod base;
mod config;
mod hindsight;
mod mode;
pub use base::Normalizer;
pub use config::NormalizerConfig;
pub use hindsight::HindsightNormalizer;
pub use mode::NormalizationMode;
