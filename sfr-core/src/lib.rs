//! Soil nutrient estimation and fertilizer recommendation.
//!
//! Resolves a nutrient concentration (directly, or from a light-sensor proxy
//! reading via the calibration table), converts it to kg/ha and lb/ha,
//! classifies it as deficient, optimal or excessive, and looks up suitable
//! fertilizers.

pub mod calibration;
pub mod catalog;
pub mod classifier;
pub mod conversion;
pub mod error;
pub mod nutrient;
pub mod pipeline;
pub mod sensor;

pub use error::{Result, SoilError};
