//! Nutrient status classification.
//!
//! Two interchangeable strategies are available: a fixed-ratio rule against an
//! ideal kg/ha reference ([`rule`]) and a nearest-calibration-point decision
//! over (ppm, area) pairs ([`region`]).

pub mod region;
pub mod rule;

use crate::error::SoilError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub use region::{classify_region, CalibrationPoint, RegionClassifier};
pub use rule::{classify_rule, IdealReference};

/// Fertility status of a nutrient. Ordered from lowest to highest supply.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    Deficient,
    Optimal,
    Excessive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Deficient => "Deficient",
            Status::Optimal => "Optimal",
            Status::Excessive => "Excessive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classifier the pipeline consults.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// ±30% tolerance band around the ideal kg/ha
    #[default]
    Rule,
    /// Nearest calibration point over (ppm, area)
    Region,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Rule => "rule",
            Strategy::Region => "region",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SoilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rule" => Ok(Strategy::Rule),
            "region" => Ok(Strategy::Region),
            _ => Err(SoilError::InvalidInput {
                field: "strategy",
                value: s.to_string(),
                reason: "expected 'rule' or 'region'",
            }),
        }
    }
}

/// Outcome of a single classification.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub status: Status,
    pub strategy: Strategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(Status::Deficient < Status::Optimal);
        assert!(Status::Optimal < Status::Excessive);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Region".parse::<Strategy>().unwrap(), Strategy::Region);
        assert_eq!(Strategy::default(), Strategy::Rule);
        assert!("tree".parse::<Strategy>().is_err());
    }
}
