//! Plain-text report rendering.

use sfr_core::calibration::CalibrationBand;
use sfr_core::pipeline::{AnalysisReport, PreferenceSource};

/// "nitrogen" -> "Nitrogen"
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn products_line(products: &[String]) -> String {
    if products.is_empty() {
        "No recommendations found".to_string()
    } else {
        products.join(", ")
    }
}

pub fn band_range(band: &CalibrationBand) -> String {
    if band.is_open_ended() {
        format!("{}+ lux", band.lux_min)
    } else {
        format!("{}-{} lux", band.lux_min, band.lux_max)
    }
}

pub fn report_text(report: &AnalysisReport) -> String {
    let mut lines: Vec<String> = vec![
        "Soil Nutrient Report".to_string(),
        "---------------------------".to_string(),
        format!("Nutrient: {}", title_case(report.nutrient.as_str())),
        format!("PPM Value: {} ppm", report.ppm),
        format!("Area: {} hectare", report.area_ha),
    ];
    if let Some(band) = &report.calibration {
        lines.push(format!(
            "Fertility Level: {} ({}, nitrogen {}-{} ppm)",
            band.fertility_level,
            band_range(band),
            band.nitrogen_ppm_min,
            band.nitrogen_ppm_max
        ));
    }
    let derived = match report.preference_source {
        PreferenceSource::Derived => " (derived)",
        PreferenceSource::Chosen => "",
    };
    lines.extend([
        String::new(),
        "Converted Values:".to_string(),
        format!("   {:.2} kg/ha", report.kg_ha),
        format!("   {:.2} lb/ha", report.lb_ha),
        String::new(),
        format!("Fertility Status: {} ({})", report.status, report.strategy),
        String::new(),
        format!(
            "Recommended {}{} Fertilizers:",
            title_case(report.preference.as_str()),
            derived
        ),
        format!("   {}", products_line(&report.recommended_products)),
    ]);
    if !report.all_recommendations.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "All Nutrients ({}):",
            title_case(report.preference.as_str())
        ));
        for entry in &report.all_recommendations {
            lines.push(format!(
                "   {}: {}",
                title_case(entry.nutrient.as_str()),
                products_line(&entry.products)
            ));
        }
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfr_core::catalog::CatalogEntry;
    use sfr_core::classifier::{Status, Strategy};
    use sfr_core::nutrient::{Nutrient, Preference};

    fn report(products: Vec<String>) -> AnalysisReport {
        AnalysisReport {
            nutrient: Nutrient::Phosphorus,
            ppm: 12.5,
            area_ha: 1.0,
            kg_ha: 24.4,
            lb_ha: 53.737,
            status: Status::Deficient,
            strategy: Strategy::Rule,
            preference: Preference::Synthetic,
            preference_source: PreferenceSource::Chosen,
            recommended_products: products,
            calibration: None,
            all_recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("potassium"), "Potassium");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_report_text() {
        let text = report_text(&report(vec!["superphosphate".to_string()]));
        assert!(text.contains("Nutrient: Phosphorus"));
        assert!(text.contains("PPM Value: 12.5 ppm"));
        assert!(text.contains("24.40 kg/ha"));
        assert!(text.contains("Fertility Status: Deficient (rule)"));
        assert!(text.contains("Recommended Synthetic Fertilizers:"));
        assert!(text.contains("   superphosphate"));
        assert!(!text.contains("Fertility Level"));
        assert!(!text.contains("All Nutrients"));
    }

    #[test]
    fn test_all_nutrients_section() {
        let mut report = report(vec!["superphosphate".to_string()]);
        report.all_recommendations = vec![
            CatalogEntry {
                nutrient: Nutrient::Nitrogen,
                preference: Preference::Synthetic,
                products: vec!["urea".to_string(), "ammonium nitrate".to_string()],
            },
            CatalogEntry {
                nutrient: Nutrient::Potassium,
                preference: Preference::Synthetic,
                products: Vec::new(),
            },
        ];
        let text = report_text(&report);
        assert!(text.contains("All Nutrients (Synthetic):\n   Nitrogen: urea, ammonium nitrate\n"));
        assert!(text.contains("   Potassium: No recommendations found"));
    }

    #[test]
    fn test_empty_products() {
        let text = report_text(&report(Vec::new()));
        assert!(text.contains("No recommendations found"));
    }

    #[test]
    fn test_band_range() {
        let mut band = CalibrationBand {
            lux_min: 600.01,
            lux_max: f64::INFINITY,
            nitrogen_ppm_min: 0.0,
            nitrogen_ppm_max: 15.0,
            fertility_level: "Very Low".to_string(),
        };
        assert_eq!(band_range(&band), "600.01+ lux");
        band.lux_max = 700.0;
        assert_eq!(band_range(&band), "600.01-700 lux");
    }
}
