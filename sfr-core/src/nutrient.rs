use crate::error::{Result, SoilError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three primary macronutrients the analyzer understands.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "nitrogen",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutrient {
    type Err = SoilError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nitrogen" => Ok(Nutrient::Nitrogen),
            "phosphorus" => Ok(Nutrient::Phosphorus),
            "potassium" => Ok(Nutrient::Potassium),
            _ => Err(SoilError::UnknownNutrient { key: s.to_string() }),
        }
    }
}

/// Fertilizer sourcing category.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Natural,
    Synthetic,
}

impl Preference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Natural => "natural",
            Preference::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = SoilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "natural" => Ok(Preference::Natural),
            "synthetic" => Ok(Preference::Synthetic),
            _ => Err(SoilError::invalid_input(
                "preference",
                s,
                "expected 'natural' or 'synthetic'",
            )),
        }
    }
}

/// A single validated measurement fed through the pipeline.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct NutrientReading {
    nutrient: Nutrient,
    ppm: f64,
    area_ha: f64,
}

impl NutrientReading {
    /// Validate and build a reading. The concentration is checked before the
    /// area so a bad ppm is always the reported failure.
    pub fn new(nutrient: Nutrient, ppm: f64, area_ha: f64) -> Result<Self> {
        validate_ppm(ppm)?;
        validate_area(area_ha)?;
        Ok(NutrientReading {
            nutrient,
            ppm,
            area_ha,
        })
    }

    pub fn nutrient(&self) -> Nutrient {
        self.nutrient
    }

    pub fn ppm(&self) -> f64 {
        self.ppm
    }

    pub fn area_ha(&self) -> f64 {
        self.area_ha
    }
}

pub(crate) fn validate_ppm(ppm: f64) -> Result<f64> {
    if !ppm.is_finite() {
        return Err(SoilError::invalid_input(
            "ppm",
            ppm.to_string(),
            "must be a finite number",
        ));
    }
    if ppm < 0.0 {
        return Err(SoilError::invalid_input(
            "ppm",
            ppm.to_string(),
            "must not be negative",
        ));
    }
    Ok(ppm)
}

pub(crate) fn validate_area(area_ha: f64) -> Result<f64> {
    if !area_ha.is_finite() || area_ha <= 0.0 {
        return Err(SoilError::InvalidArea { value: area_ha });
    }
    Ok(area_ha)
}
