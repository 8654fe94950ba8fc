//! Calibration bands relating a light-sensor reading (lux) to an expected
//! nitrogen concentration.
//!
//! # File format
//!
//! A JSON array ordered by `lux_min`. `lux_max` may be `null` on the last band
//! to leave it open-ended.
//!
//! ```text
//! [
//!   { "lux_min": 0, "lux_max": 100,
//!     "nitrogen_level_ppm": { "min": 70, "max": 90 },
//!     "fertility_level": "Very High" }
//! ]
//! ```

use crate::error::{Result, SoilError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedded default calibration table.
pub static CALIBRATION_JSON: &str = include_str!("../../fixtures/ref_values.json");

/// A sensor-proxy interval and the nitrogen range it implies.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CalibrationBand {
    pub lux_min: f64,
    /// `f64::INFINITY` for an open-ended band, `null` when serialized
    #[serde(with = "open_bound")]
    pub lux_max: f64,
    pub nitrogen_ppm_min: f64,
    pub nitrogen_ppm_max: f64,
    pub fertility_level: String,
}

impl CalibrationBand {
    /// Closed interval on both ends.
    pub fn contains(&self, lux: f64) -> bool {
        self.lux_min <= lux && lux <= self.lux_max
    }

    /// Midpoint of the nitrogen range, used when only a proxy reading exists.
    pub fn expected_avg_ppm(&self) -> f64 {
        (self.nitrogen_ppm_min + self.nitrogen_ppm_max) / 2.0
    }

    pub fn is_open_ended(&self) -> bool {
        self.lux_max == f64::INFINITY
    }
}

/// Maps an infinite upper bound to and from `null`.
mod open_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[derive(Debug, Deserialize)]
struct PpmRange {
    min: f64,
    max: f64,
}

/// On-disk record shape.
#[derive(Debug, Deserialize)]
struct BandRecord {
    lux_min: f64,
    lux_max: Option<f64>,
    nitrogen_level_ppm: PpmRange,
    fertility_level: String,
}

impl From<BandRecord> for CalibrationBand {
    fn from(record: BandRecord) -> Self {
        CalibrationBand {
            lux_min: record.lux_min,
            lux_max: record.lux_max.unwrap_or(f64::INFINITY),
            nitrogen_ppm_min: record.nitrogen_level_ppm.min,
            nitrogen_ppm_max: record.nitrogen_level_ppm.max,
            fertility_level: record.fertility_level,
        }
    }
}

/// Ordered, non-overlapping calibration bands.
#[derive(Debug, PartialEq, Clone)]
pub struct RangeTable {
    bands: Vec<CalibrationBand>,
}

impl RangeTable {
    /// Build a table from bands already in memory, enforcing ordering and
    /// non-overlap.
    pub fn from_bands(bands: Vec<CalibrationBand>) -> Result<Self> {
        validate_bands(&bands)?;
        Ok(RangeTable { bands })
    }

    /// Parse a JSON calibration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<BandRecord> = serde_json::from_str(json)
            .map_err(|e| SoilError::CalibrationLoad(format!("malformed calibration JSON: {e}")))?;
        let bands = records.into_iter().map(CalibrationBand::from).collect();
        RangeTable::from_bands(bands)
    }

    /// Read and parse a calibration file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SoilError::CalibrationLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        let table = RangeTable::from_json(&json)?;
        info!(
            "Loaded {} calibration bands from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self> {
        RangeTable::from_json(CALIBRATION_JSON)
    }

    pub fn bands(&self) -> &[CalibrationBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Find the band containing `lux`. The first match wins, which only
    /// matters on a boundary shared by two adjacent bands.
    pub fn lookup(&self, lux: f64) -> Result<&CalibrationBand> {
        match self.bands.iter().find(|band| band.contains(lux)) {
            Some(band) => {
                debug!(
                    "lux {} matched band '{}' ({}..{})",
                    lux, band.fertility_level, band.lux_min, band.lux_max
                );
                Ok(band)
            }
            None => Err(SoilError::OutOfRange { value: lux }),
        }
    }
}

fn validate_bands(bands: &[CalibrationBand]) -> Result<()> {
    if bands.is_empty() {
        return Err(SoilError::CalibrationLoad(
            "calibration table has no bands".to_string(),
        ));
    }
    let last = bands.len() - 1;
    for (i, band) in bands.iter().enumerate() {
        let label = &band.fertility_level;
        if !band.lux_min.is_finite() || band.lux_max.is_nan() {
            return Err(SoilError::CalibrationLoad(format!(
                "band {i} ('{label}') has a non-numeric lux bound"
            )));
        }
        if band.lux_min > band.lux_max {
            return Err(SoilError::CalibrationLoad(format!(
                "band {i} ('{label}') has lux_min {} above lux_max {}",
                band.lux_min, band.lux_max
            )));
        }
        if band.is_open_ended() && i != last {
            return Err(SoilError::CalibrationLoad(format!(
                "band {i} ('{label}') is open-ended but is not the last band"
            )));
        }
        if !band.nitrogen_ppm_min.is_finite()
            || !band.nitrogen_ppm_max.is_finite()
            || band.nitrogen_ppm_min < 0.0
            || band.nitrogen_ppm_min > band.nitrogen_ppm_max
        {
            return Err(SoilError::CalibrationLoad(format!(
                "band {i} ('{label}') has an invalid nitrogen range {}..{}",
                band.nitrogen_ppm_min, band.nitrogen_ppm_max
            )));
        }
    }
    for (i, pair) in bands.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.lux_min < prev.lux_min {
            return Err(SoilError::CalibrationLoad(format!(
                "band {} is not ordered by lux_min",
                i + 1
            )));
        }
        // A shared boundary value is allowed; anything deeper is overlap.
        if next.lux_min < prev.lux_max {
            return Err(SoilError::CalibrationLoad(format!(
                "band {} overlaps band {} ({} < {})",
                i + 1,
                i,
                next.lux_min,
                prev.lux_max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(lux_min: f64, lux_max: f64, ppm: (f64, f64), level: &str) -> CalibrationBand {
        CalibrationBand {
            lux_min,
            lux_max,
            nitrogen_ppm_min: ppm.0,
            nitrogen_ppm_max: ppm.1,
            fertility_level: level.to_string(),
        }
    }

    #[test]
    fn test_embedded_table_parses() {
        let table = RangeTable::embedded().unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.bands()[0].fertility_level, "Very High");
        assert!(table.bands()[4].is_open_ended());
    }

    #[test]
    fn test_lookup_and_midpoint() {
        let table = RangeTable::embedded().unwrap();
        let band = table.lookup(50.0).unwrap();
        assert_eq!(band.fertility_level, "Very High");
        assert!((band.expected_avg_ppm() - 80.0).abs() < f64::EPSILON);

        let band = table.lookup(300.0).unwrap();
        assert_eq!(band.fertility_level, "Medium");
        assert!((band.expected_avg_ppm() - 40.0).abs() < f64::EPSILON);

        let band = table.lookup(1_000_000.0).unwrap();
        assert_eq!(band.fertility_level, "Very Low");
    }

    #[test]
    fn test_lookup_closed_interval_edges() {
        let table = RangeTable::embedded().unwrap();
        assert_eq!(table.lookup(0.0).unwrap().fertility_level, "Very High");
        assert_eq!(table.lookup(100.0).unwrap().fertility_level, "Very High");
        assert_eq!(table.lookup(100.01).unwrap().fertility_level, "High");
    }

    #[test]
    fn test_lookup_out_of_range() {
        let table = RangeTable::embedded().unwrap();
        assert_eq!(
            table.lookup(-5.0),
            Err(SoilError::OutOfRange { value: -5.0 })
        );
        // falls in the gap between 100 and 100.01
        assert_eq!(
            table.lookup(100.005),
            Err(SoilError::OutOfRange { value: 100.005 })
        );
        assert!(matches!(
            table.lookup(f64::NAN),
            Err(SoilError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_shared_boundary_resolves_to_first_band() {
        let table = RangeTable::from_bands(vec![
            band(0.0, 100.0, (60.0, 80.0), "first"),
            band(100.0, 200.0, (40.0, 60.0), "second"),
        ])
        .unwrap();
        assert_eq!(table.lookup(100.0).unwrap().fertility_level, "first");
        assert_eq!(table.lookup(100.5).unwrap().fertility_level, "second");
    }

    #[test]
    fn test_sweep_matches_at_most_one_band() {
        let table = RangeTable::embedded().unwrap();
        let last_min = table.bands().last().unwrap().lux_min;
        let mut step = -1000i64;
        while (step as f64) / 100.0 <= last_min + 50.0 {
            let lux = step as f64 / 100.0;
            let matching = table.bands().iter().filter(|b| b.contains(lux)).count();
            assert!(matching <= 1, "lux {lux} matched {matching} bands");
            match table.lookup(lux) {
                Ok(b) => assert!(b.contains(lux)),
                Err(e) => {
                    assert_eq!(matching, 0);
                    assert_eq!(e, SoilError::OutOfRange { value: lux });
                }
            }
            step += 1;
        }
    }

    #[test]
    fn test_rejects_overlap() {
        let result = RangeTable::from_bands(vec![
            band(0.0, 150.0, (60.0, 80.0), "a"),
            band(100.0, 200.0, (40.0, 60.0), "b"),
        ]);
        assert!(matches!(result, Err(SoilError::CalibrationLoad(_))));
    }

    #[test]
    fn test_rejects_unordered_and_inner_open_band() {
        let unordered = RangeTable::from_bands(vec![
            band(200.0, 300.0, (10.0, 20.0), "a"),
            band(0.0, 100.0, (40.0, 60.0), "b"),
        ]);
        assert!(matches!(unordered, Err(SoilError::CalibrationLoad(_))));

        let inner_open = RangeTable::from_bands(vec![
            band(0.0, f64::INFINITY, (10.0, 20.0), "a"),
            band(100.0, 200.0, (40.0, 60.0), "b"),
        ]);
        assert!(matches!(inner_open, Err(SoilError::CalibrationLoad(_))));
    }

    #[test]
    fn test_rejects_empty_and_malformed_json() {
        assert!(matches!(
            RangeTable::from_json("[]"),
            Err(SoilError::CalibrationLoad(_))
        ));
        assert!(matches!(
            RangeTable::from_json("{ not json"),
            Err(SoilError::CalibrationLoad(_))
        ));
        assert!(matches!(
            RangeTable::from_json(r#"[{"lux_min": 0, "lux_max": 10}]"#),
            Err(SoilError::CalibrationLoad(_))
        ));
    }

    #[test]
    fn test_open_band_serializes_as_null() {
        let table = RangeTable::embedded().unwrap();
        let open = table.lookup(700.0).unwrap();
        let json = serde_json::to_string(open).unwrap();
        assert!(json.contains("\"lux_max\":null"));
        let back: CalibrationBand = serde_json::from_str(&json).unwrap();
        assert!(back.is_open_ended());
        assert_eq!(&back, open);

        let closed = table.lookup(50.0).unwrap();
        let back: CalibrationBand =
            serde_json::from_str(&serde_json::to_string(closed).unwrap()).unwrap();
        assert_eq!(back.lux_max, 100.0);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = RangeTable::from_path(Path::new("/nonexistent/ref_values.json"));
        assert!(matches!(result, Err(SoilError::CalibrationLoad(_))));
    }
}
