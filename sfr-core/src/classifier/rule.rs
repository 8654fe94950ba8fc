use super::Status;
use crate::error::{Result, SoilError};
use crate::nutrient::Nutrient;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Below this fraction of the ideal the nutrient is deficient.
pub const DEFICIENT_RATIO: f64 = 0.7;

/// Above this fraction of the ideal the nutrient is excessive.
pub const EXCESSIVE_RATIO: f64 = 1.3;

/// Shared by [`classify_rule`] and every pipeline built with the standard ideals.
pub(crate) static STANDARD_IDEALS: LazyLock<IdealReference> =
    LazyLock::new(IdealReference::standard);

/// Ideal supply per nutrient, in kg/ha.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IdealReference {
    entries: Vec<(Nutrient, f64)>,
}

impl IdealReference {
    /// Reference crop targets: nitrogen 80, phosphorus 40, potassium 60 kg/ha.
    pub fn standard() -> Self {
        IdealReference {
            entries: vec![
                (Nutrient::Nitrogen, 80.0),
                (Nutrient::Phosphorus, 40.0),
                (Nutrient::Potassium, 60.0),
            ],
        }
    }

    pub fn new(entries: Vec<(Nutrient, f64)>) -> Self {
        IdealReference { entries }
    }

    pub fn ideal_kg_per_ha(&self, nutrient: Nutrient) -> Result<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == nutrient)
            .map(|(_, ideal)| *ideal)
            .ok_or_else(|| SoilError::UnknownNutrient {
                key: nutrient.to_string(),
            })
    }

    /// Exactly 0.7× or 1.3× the ideal is still optimal.
    pub fn classify(&self, nutrient: Nutrient, actual_kg_ha: f64) -> Result<Status> {
        let ideal = self.ideal_kg_per_ha(nutrient)?;
        let status = if actual_kg_ha < DEFICIENT_RATIO * ideal {
            Status::Deficient
        } else if actual_kg_ha > EXCESSIVE_RATIO * ideal {
            Status::Excessive
        } else {
            Status::Optimal
        };
        Ok(status)
    }
}

/// Classify against the standard ideal reference.
pub fn classify_rule(nutrient: Nutrient, actual_kg_ha: f64) -> Result<Status> {
    STANDARD_IDEALS.classify(nutrient, actual_kg_ha)
}
