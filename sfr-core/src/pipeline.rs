//! Estimate-and-recommend orchestration.
//!
//! A [`Pipeline`] owns the read-only calibration and reference tables and
//! turns an [`AnalysisRequest`] into an [`AnalysisReport`]. Every step is a
//! hard gate: the first failure is returned and no partial report exists.

use crate::calibration::{CalibrationBand, RangeTable};
use crate::catalog::{CatalogEntry, FertilizerCatalog, NutrientRecommendation};
use crate::classifier::region::{STANDARD_PREFERENCE, STANDARD_STATUS};
use crate::classifier::rule::STANDARD_IDEALS;
use crate::classifier::{ClassificationResult, IdealReference, RegionClassifier, Status, Strategy};
use crate::conversion::{Conversion, SoilModel};
use crate::error::{Result, SoilError};
use crate::nutrient::{validate_area, validate_ppm, Nutrient, NutrientReading, Preference};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Where the concentration comes from.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum PpmSource {
    /// Concentration entered directly.
    Direct { nutrient: Nutrient, ppm: f64 },
    /// Light-sensor reading; the sensor only measures nitrogen.
    Sensor { lux: f64 },
}

/// How the fertilizer preference is chosen.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum PreferenceChoice {
    Fixed(Preference),
    /// Decided by the fertilizer-type classifier
    Derived,
}

impl Default for PreferenceChoice {
    fn default() -> Self {
        PreferenceChoice::Fixed(Preference::default())
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub source: PpmSource,
    pub area_ha: f64,
    pub preference: PreferenceChoice,
}

impl AnalysisRequest {
    pub fn direct(nutrient: Nutrient, ppm: f64, area_ha: f64, preference: Preference) -> Self {
        AnalysisRequest {
            source: PpmSource::Direct { nutrient, ppm },
            area_ha,
            preference: PreferenceChoice::Fixed(preference),
        }
    }

    pub fn sensor(lux: f64, area_ha: f64, preference: PreferenceChoice) -> Self {
        AnalysisRequest {
            source: PpmSource::Sensor { lux },
            area_ha,
            preference,
        }
    }
}

/// Raw text from a manual entry form.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ManualForm {
    pub nutrient: String,
    pub ppm: String,
    pub area_ha: String,
    pub preference: String,
}

fn parse_number(field: &'static str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| SoilError::invalid_input(field, text, "not a number"))
}

impl TryFrom<&ManualForm> for AnalysisRequest {
    type Error = SoilError;

    /// Numeric fields are checked before the nutrient and preference names.
    /// A parseable but non-positive area is left for the pipeline to reject
    /// as [`SoilError::InvalidArea`].
    fn try_from(form: &ManualForm) -> Result<Self> {
        let ppm = validate_ppm(parse_number("ppm", &form.ppm)?)?;
        let area_ha = parse_number("area_ha", &form.area_ha)?;
        let nutrient: Nutrient = form.nutrient.parse()?;
        let preference: Preference = form.preference.parse()?;
        Ok(AnalysisRequest::direct(nutrient, ppm, area_ha, preference))
    }
}

/// How the report's preference was decided.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceSource {
    Chosen,
    Derived,
}

/// Output of one analysis. Owned by the caller and never mutated.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub nutrient: Nutrient,
    pub ppm: f64,
    pub area_ha: f64,
    pub kg_ha: f64,
    pub lb_ha: f64,
    pub status: Status,
    pub strategy: Strategy,
    pub preference: Preference,
    pub preference_source: PreferenceSource,
    pub recommended_products: Vec<String>,
    /// Present when the concentration was estimated from a sensor reading
    pub calibration: Option<CalibrationBand>,
    /// Every nutrient's products for the report's preference, in catalog
    /// order. Filled for sensor readings only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_recommendations: Vec<CatalogEntry>,
}

impl AnalysisReport {
    pub fn builder(
        reading: NutrientReading,
        conversion: Conversion,
        classification: ClassificationResult,
    ) -> AnalysisReportBuilder {
        AnalysisReportBuilder {
            reading,
            conversion,
            classification,
            preference: Preference::default(),
            preference_source: PreferenceSource::Chosen,
            products: Vec::new(),
            calibration: None,
            all_recommendations: Vec::new(),
        }
    }
}

pub struct AnalysisReportBuilder {
    reading: NutrientReading,
    conversion: Conversion,
    classification: ClassificationResult,
    preference: Preference,
    preference_source: PreferenceSource,
    products: Vec<String>,
    calibration: Option<CalibrationBand>,
    all_recommendations: Vec<CatalogEntry>,
}

impl AnalysisReportBuilder {
    pub fn preference(mut self, preference: Preference, source: PreferenceSource) -> Self {
        self.preference = preference;
        self.preference_source = source;
        self
    }

    pub fn products(mut self, products: Vec<String>) -> Self {
        self.products = products;
        self
    }

    pub fn calibration(mut self, band: Option<CalibrationBand>) -> Self {
        self.calibration = band;
        self
    }

    pub fn all_recommendations(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.all_recommendations = entries;
        self
    }

    pub fn build(self) -> AnalysisReport {
        AnalysisReport {
            nutrient: self.reading.nutrient(),
            ppm: self.reading.ppm(),
            area_ha: self.reading.area_ha(),
            kg_ha: self.conversion.kg_ha,
            lb_ha: self.conversion.lb_ha,
            status: self.classification.status,
            strategy: self.classification.strategy,
            preference: self.preference,
            preference_source: self.preference_source,
            recommended_products: self.products,
            calibration: self.calibration,
            all_recommendations: self.all_recommendations,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub soil: SoilModel,
    pub strategy: Strategy,
}

/// The assembled estimate-and-recommend pipeline.
///
/// All tables are fixed at construction, so a single instance can be shared
/// by reference across threads and calls.
#[derive(Debug, Clone)]
pub struct Pipeline {
    table: RangeTable,
    ideals: IdealReference,
    catalog: FertilizerCatalog,
    status_classifier: RegionClassifier<Status>,
    preference_classifier: RegionClassifier<Preference>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Standard reference tables around the given calibration bands. The
    /// ideals and classifiers are the ones behind [`crate::classifier::classify_rule`]
    /// and [`crate::classifier::classify_region`].
    pub fn new(table: RangeTable, config: PipelineConfig) -> Result<Self> {
        config.soil.validate()?;
        Ok(Pipeline {
            table,
            ideals: STANDARD_IDEALS.clone(),
            catalog: FertilizerCatalog::standard(),
            status_classifier: STANDARD_STATUS.clone(),
            preference_classifier: STANDARD_PREFERENCE.clone(),
            config,
        })
    }

    pub fn with_embedded_calibration(config: PipelineConfig) -> Result<Self> {
        Pipeline::new(RangeTable::embedded()?, config)
    }

    pub fn with_ideals(mut self, ideals: IdealReference) -> Self {
        self.ideals = ideals;
        self
    }

    pub fn with_catalog(mut self, catalog: FertilizerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    pub fn catalog(&self) -> &FertilizerCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        // 1. concentration
        let (nutrient, ppm, band) = match request.source {
            PpmSource::Direct { nutrient, ppm } => (nutrient, validate_ppm(ppm)?, None),
            PpmSource::Sensor { lux } => {
                let band = self.table.lookup(lux)?;
                (Nutrient::Nitrogen, band.expected_avg_ppm(), Some(band.clone()))
            }
        };
        debug!("resolved {} at {} ppm", nutrient, ppm);

        // 2. area
        let area_ha = validate_area(request.area_ha)?;
        let reading = NutrientReading::new(nutrient, ppm, area_ha)?;

        // 3. units
        let conversion = self.config.soil.convert(ppm);

        // 4. status
        let classification = self.classify(&reading, conversion.kg_ha)?;
        debug!(
            "{} classified {} by {} strategy",
            nutrient, classification.status, classification.strategy
        );

        // 5. preference
        let (preference, preference_source) = match request.preference {
            PreferenceChoice::Fixed(preference) => (preference, PreferenceSource::Chosen),
            PreferenceChoice::Derived => (
                self.preference_classifier.classify(ppm, area_ha),
                PreferenceSource::Derived,
            ),
        };

        // 6. recommendations; a sensor reading also lists every nutrient
        let products = self.catalog.recommend(nutrient, preference).to_vec();
        let all_recommendations = if band.is_some() {
            self.recommend_all(preference)
                .into_iter()
                .map(|rec| CatalogEntry {
                    nutrient: rec.nutrient,
                    preference,
                    products: rec.products.to_vec(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let report = AnalysisReport::builder(reading, conversion, classification)
            .preference(preference, preference_source)
            .products(products)
            .calibration(band)
            .all_recommendations(all_recommendations)
            .build();
        info!(
            "{} {:.2} ppm over {} ha: {} ({} products, {})",
            report.nutrient,
            report.ppm,
            report.area_ha,
            report.status,
            report.recommended_products.len(),
            report.preference
        );
        Ok(report)
    }

    /// Classify with the configured strategy.
    pub fn classify(&self, reading: &NutrientReading, kg_ha: f64) -> Result<ClassificationResult> {
        let strategy = self.config.strategy;
        let status = match strategy {
            Strategy::Rule => self.ideals.classify(reading.nutrient(), kg_ha)?,
            Strategy::Region => self
                .status_classifier
                .classify(reading.ppm(), reading.area_ha()),
        };
        Ok(ClassificationResult { status, strategy })
    }

    pub fn recommend(&self, nutrient: Nutrient, preference: Preference) -> &[String] {
        self.catalog.recommend(nutrient, preference)
    }

    pub fn recommend_all(&self, preference: Preference) -> Vec<NutrientRecommendation<'_>> {
        self.catalog.recommend_all(preference)
    }
}
