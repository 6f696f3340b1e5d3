use crate::error::HerError;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

/// How a [`Normalizer`](super::Normalizer) rescales vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NormalizationMode {
    /// `(v - mean) / std`.
    Gaussian,

    /// `(v - min) / (max - min)`.
    MinMax,
}

impl FromStr for NormalizationMode {
    type Err = HerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gaussian" => Ok(Self::Gaussian),
            "MinMax" => Ok(Self::MinMax),
            _ => Err(HerError::Configuration(format!(
                "Wrong normalization type: {:?} [available 'Gaussian', 'MinMax']",
                s
            ))),
        }
    }
}

impl TryFrom<String> for NormalizationMode {
    type Error = HerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NormalizationMode> for String {
    fn from(mode: NormalizationMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gaussian => write!(f, "Gaussian"),
            Self::MinMax => write!(f, "MinMax"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "Gaussian".parse::<NormalizationMode>().unwrap(),
            NormalizationMode::Gaussian
        );
        assert_eq!(
            "MinMax".parse::<NormalizationMode>().unwrap(),
            NormalizationMode::MinMax
        );
        assert!(matches!(
            "ZScore".parse::<NormalizationMode>(),
            Err(HerError::Configuration(_))
        ));
    }
}
