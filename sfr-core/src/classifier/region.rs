//! Nearest-calibration-point classifier over (ppm, area) pairs.
//!
//! Points are grouped into area bands. A query first snaps to the nearest
//! area band, then to the nearest calibration ppm inside that band, and takes
//! that point's label. Ties go to the lower area band and the lower ppm.

use super::Status;
use crate::error::{Result, SoilError};
use crate::nutrient::Preference;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Status calibration: three samples per area band of 1, 2 and 3 ha.
pub const STATUS_POINTS: [CalibrationPoint<Status>; 9] = [
    CalibrationPoint::new(20.0, 1.0, Status::Deficient),
    CalibrationPoint::new(50.0, 1.0, Status::Optimal),
    CalibrationPoint::new(90.0, 1.0, Status::Excessive),
    CalibrationPoint::new(30.0, 2.0, Status::Deficient),
    CalibrationPoint::new(80.0, 2.0, Status::Optimal),
    CalibrationPoint::new(110.0, 2.0, Status::Excessive),
    CalibrationPoint::new(40.0, 3.0, Status::Deficient),
    CalibrationPoint::new(70.0, 3.0, Status::Optimal),
    CalibrationPoint::new(130.0, 3.0, Status::Excessive),
];

/// Fertilizer-type calibration: low-ppm samples lean natural, high-ppm
/// samples lean synthetic.
pub const PREFERENCE_POINTS: [CalibrationPoint<Preference>; 6] = [
    CalibrationPoint::new(20.0, 1.0, Preference::Natural),
    CalibrationPoint::new(90.0, 1.0, Preference::Synthetic),
    CalibrationPoint::new(30.0, 2.0, Preference::Natural),
    CalibrationPoint::new(110.0, 2.0, Preference::Synthetic),
    CalibrationPoint::new(40.0, 3.0, Preference::Natural),
    CalibrationPoint::new(130.0, 3.0, Preference::Synthetic),
];

/// Shared by [`classify_region`] and every pipeline.
pub(crate) static STANDARD_STATUS: LazyLock<RegionClassifier<Status>> =
    LazyLock::new(RegionClassifier::standard_status);

pub(crate) static STANDARD_PREFERENCE: LazyLock<RegionClassifier<Preference>> =
    LazyLock::new(RegionClassifier::standard_preference);

/// A labelled calibration sample.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct CalibrationPoint<L> {
    pub ppm: f64,
    pub area_ha: f64,
    pub label: L,
}

impl<L> CalibrationPoint<L> {
    pub const fn new(ppm: f64, area_ha: f64, label: L) -> Self {
        CalibrationPoint {
            ppm,
            area_ha,
            label,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
struct AreaBand<L> {
    area_ha: f64,
    /// sorted by ppm ascending
    points: Vec<(f64, L)>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RegionClassifier<L> {
    /// sorted by area ascending
    bands: Vec<AreaBand<L>>,
}

impl<L: Copy> RegionClassifier<L> {
    pub fn new(points: &[CalibrationPoint<L>]) -> Result<Self> {
        if points.is_empty() {
            return Err(SoilError::CalibrationLoad(
                "region classifier needs at least one calibration point".to_string(),
            ));
        }
        if let Some(bad) = points
            .iter()
            .find(|p| !p.ppm.is_finite() || !p.area_ha.is_finite())
        {
            return Err(SoilError::CalibrationLoad(format!(
                "calibration point ({}, {}) is not finite",
                bad.ppm, bad.area_ha
            )));
        }

        Ok(RegionClassifier::group(points))
    }

    /// Group points by area and sort both levels. `points` must be non-empty
    /// and finite.
    fn group(points: &[CalibrationPoint<L>]) -> Self {
        let mut bands: Vec<AreaBand<L>> = Vec::new();
        for point in points {
            match bands.iter_mut().find(|b| b.area_ha == point.area_ha) {
                Some(band) => band.points.push((point.ppm, point.label)),
                None => bands.push(AreaBand {
                    area_ha: point.area_ha,
                    points: vec![(point.ppm, point.label)],
                }),
            }
        }
        bands.sort_by(|a, b| a.area_ha.total_cmp(&b.area_ha));
        for band in bands.iter_mut() {
            band.points.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        RegionClassifier { bands }
    }

    pub fn classify(&self, ppm: f64, area_ha: f64) -> L {
        let band = nearest(&self.bands, area_ha, |b| b.area_ha);
        let point = nearest(&band.points, ppm, |p| p.0);
        point.1
    }

    /// Number of distinct area bands.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }
}

/// First element with the smallest distance; inputs are sorted ascending, so
/// ties resolve to the lower key. Callers guarantee `items` is non-empty.
fn nearest<'a, T>(items: &'a [T], target: f64, key: impl Fn(&T) -> f64) -> &'a T {
    let mut best = &items[0];
    let mut best_distance = (key(best) - target).abs();
    for item in &items[1..] {
        let distance = (key(item) - target).abs();
        if distance < best_distance {
            best = item;
            best_distance = distance;
        }
    }
    best
}

impl RegionClassifier<Status> {
    pub fn standard_status() -> Self {
        RegionClassifier::group(&STATUS_POINTS)
    }
}

impl RegionClassifier<Preference> {
    pub fn standard_preference() -> Self {
        RegionClassifier::group(&PREFERENCE_POINTS)
    }
}

/// Classify with the standard nine-point status calibration.
pub fn classify_region(ppm: f64, area_ha: f64) -> Status {
    STANDARD_STATUS.classify(ppm, area_ha)
}
