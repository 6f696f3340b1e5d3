use crate::error::HerError;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

/// Selection of substitute goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GoalStrategy {
    /// Goal achieved at the end of the trajectory.
    Final,

    /// Goals achieved at the same or a later step of the trajectory.
    Future,
}

impl FromStr for GoalStrategy {
    type Err = HerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "final" => Ok(Self::Final),
            "future" => Ok(Self::Future),
            _ => Err(HerError::Configuration(format!(
                "Wrong strategy for goal sampling: {:?} [available 'final', 'future']",
                s
            ))),
        }
    }
}

impl TryFrom<String> for GoalStrategy {
    type Error = HerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GoalStrategy> for String {
    fn from(strategy: GoalStrategy) -> Self {
        strategy.to_string()
    }
}

impl fmt::Display for GoalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Final => write!(f, "final"),
            Self::Future => write!(f, "future"),
        }
    }
}
