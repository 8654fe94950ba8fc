//! Concentration to mass-per-area conversion.
//!
//! The soil model is linear: a layer `depth_cm` deep with the given bulk
//! density (g/cm³) holds `ppm * depth_cm * bulk_density * 0.1` kg of nutrient
//! per hectare.

use crate::error::{Result, SoilError};
use serde::{Deserialize, Serialize};

/// Default sampling depth in centimetres.
pub const DEFAULT_SOIL_DEPTH_CM: f64 = 15.0;

/// Default soil bulk density in g/cm³.
pub const DEFAULT_BULK_DENSITY: f64 = 1.3;

/// Pounds in one kilogram.
pub const LB_PER_KG: f64 = 2.20462;

const PPM_LAYER_FACTOR: f64 = 0.1;

/// Convert ppm to kilograms per hectare.
pub fn ppm_to_kg_per_ha(ppm: f64, soil_depth_cm: f64, bulk_density: f64) -> f64 {
    ppm * soil_depth_cm * bulk_density * PPM_LAYER_FACTOR
}

/// Convert ppm to pounds per hectare.
pub fn ppm_to_lb_per_ha(ppm: f64, soil_depth_cm: f64, bulk_density: f64) -> f64 {
    ppm_to_kg_per_ha(ppm, soil_depth_cm, bulk_density) * LB_PER_KG
}

/// Sampling-layer parameters used for every conversion.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SoilModel {
    pub depth_cm: f64,
    pub bulk_density: f64,
}

impl Default for SoilModel {
    fn default() -> Self {
        SoilModel {
            depth_cm: DEFAULT_SOIL_DEPTH_CM,
            bulk_density: DEFAULT_BULK_DENSITY,
        }
    }
}

/// A concentration expressed in both agronomic units.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Conversion {
    pub kg_ha: f64,
    pub lb_ha: f64,
}

impl SoilModel {
    pub fn new(depth_cm: f64, bulk_density: f64) -> Result<Self> {
        let model = SoilModel {
            depth_cm,
            bulk_density,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.depth_cm.is_finite() || self.depth_cm <= 0.0 {
            return Err(SoilError::invalid_input(
                "depth_cm",
                self.depth_cm.to_string(),
                "soil depth must be a positive number",
            ));
        }
        if !self.bulk_density.is_finite() || self.bulk_density <= 0.0 {
            return Err(SoilError::invalid_input(
                "bulk_density",
                self.bulk_density.to_string(),
                "bulk density must be a positive number",
            ));
        }
        Ok(())
    }

    pub fn kg_per_ha(&self, ppm: f64) -> f64 {
        ppm_to_kg_per_ha(ppm, self.depth_cm, self.bulk_density)
    }

    pub fn lb_per_ha(&self, ppm: f64) -> f64 {
        ppm_to_lb_per_ha(ppm, self.depth_cm, self.bulk_density)
    }

    pub fn convert(&self, ppm: f64) -> Conversion {
        Conversion {
            kg_ha: self.kg_per_ha(ppm),
            lb_ha: self.lb_per_ha(ppm),
        }
    }
}
