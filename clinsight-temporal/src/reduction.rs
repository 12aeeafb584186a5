use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use clinsight_core::errors::TemporalError;

/// How a parent's cutoff time is derived from its children's cutoff times
/// during a child -> parent hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Max cutoff time among children.
    Latest,
    /// Min cutoff time among children.
    Earliest,
}

impl Reduction {
    pub fn combine(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Reduction::Latest => a.max(b),
            Reduction::Earliest => a.min(b),
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Latest => f.write_str("latest"),
            Reduction::Earliest => f.write_str("earliest"),
        }
    }
}

impl FromStr for Reduction {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Reduction::Latest),
            "earliest" => Ok(Reduction::Earliest),
            other => Err(TemporalError::InvalidReduction {
                value: other.to_string(),
            }),
        }
    }
}
