//! Calibration and catalog listings.

use crate::render::{products_line, title_case};
use crate::Settings;
use serde::Serialize;
use sfr_core::calibration::{CalibrationBand, RangeTable};
use sfr_core::nutrient::{Nutrient, Preference};
use sfr_core::pipeline::Pipeline;
use std::io::Write;

/// One CSV/JSON row per calibration band. An open upper bound is left empty.
#[derive(Debug, Serialize)]
struct BandRow<'a> {
    lux_min: f64,
    lux_max: Option<f64>,
    nitrogen_ppm_min: f64,
    nitrogen_ppm_max: f64,
    expected_avg_ppm: f64,
    fertility_level: &'a str,
}

impl<'a> From<&'a CalibrationBand> for BandRow<'a> {
    fn from(band: &'a CalibrationBand) -> Self {
        BandRow {
            lux_min: band.lux_min,
            lux_max: (!band.is_open_ended()).then_some(band.lux_max),
            nitrogen_ppm_min: band.nitrogen_ppm_min,
            nitrogen_ppm_max: band.nitrogen_ppm_max,
            expected_avg_ppm: band.expected_avg_ppm(),
            fertility_level: &band.fertility_level,
        }
    }
}

/// Write the calibration table as CSV (with headers), or JSON with `--json`.
pub fn run_bands(
    table: &RangeTable,
    settings: &Settings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rows: Vec<BandRow> = table.bands().iter().map(BandRow::from).collect();
    if settings.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    let mut wtr = csv::Writer::from_writer(&mut *out);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CatalogRow<'a> {
    preference: Preference,
    nutrient: Nutrient,
    products: &'a [String],
}

/// Recommendations for every nutrient, for one or both preferences.
pub fn run_catalog(
    pipeline: &Pipeline,
    settings: &Settings,
    preference: Option<Preference>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let preferences = match preference {
        Some(p) => vec![p],
        None => vec![Preference::Natural, Preference::Synthetic],
    };
    let mut rows: Vec<CatalogRow> = Vec::new();
    for preference in preferences {
        for rec in pipeline.recommend_all(preference) {
            rows.push(CatalogRow {
                preference,
                nutrient: rec.nutrient,
                products: rec.products,
            });
        }
    }

    if settings.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    let mut current: Option<Preference> = None;
    for row in &rows {
        if current != Some(row.preference) {
            writeln!(out, "{} fertilizers:", title_case(row.preference.as_str()))?;
            current = Some(row.preference);
        }
        writeln!(
            out,
            "   {}: {}",
            title_case(row.nutrient.as_str()),
            products_line(row.products)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Settings::default().build_pipeline().unwrap()
    }

    #[test]
    fn test_bands_csv() {
        let mut out = Vec::new();
        run_bands(pipeline().table(), &Settings::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "lux_min,lux_max,nitrogen_ppm_min,nitrogen_ppm_max,expected_avg_ppm,fertility_level"
        );
        assert_eq!(lines.len(), 6);
        assert!(lines[1].ends_with(",Very High"));
        // open-ended band leaves lux_max empty
        assert!(lines[5].starts_with("600.01,,"));
    }

    #[test]
    fn test_bands_json() {
        let settings = Settings {
            json: true,
            ..Settings::default()
        };
        let mut out = Vec::new();
        run_bands(pipeline().table(), &settings, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 5);
        assert!(value[4]["lux_max"].is_null());
        assert_eq!(value[0]["expected_avg_ppm"], 80.0);
    }

    #[test]
    fn test_catalog_text_both_preferences() {
        let mut out = Vec::new();
        run_catalog(&pipeline(), &Settings::default(), None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Natural fertilizers:"));
        assert!(text.contains("Synthetic fertilizers:"));
        assert!(text.contains("   Potassium: muriate of potash"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_catalog_json_single_preference() {
        let settings = Settings {
            json: true,
            ..Settings::default()
        };
        let mut out = Vec::new();
        run_catalog(&pipeline(), &settings, Some(Preference::Natural), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["nutrient"], "potassium");
        assert_eq!(rows[2]["products"][1], "kelp meal");
    }
}
