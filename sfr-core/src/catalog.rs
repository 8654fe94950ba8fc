use crate::nutrient::{Nutrient, Preference};
use serde::{Deserialize, Serialize};

/// Products recommended for one (nutrient, preference) pair.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub nutrient: Nutrient,
    pub preference: Preference,
    pub products: Vec<String>,
}

/// Recommendations for a nutrient, as returned by
/// [`FertilizerCatalog::recommend_all`].
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct NutrientRecommendation<'a> {
    pub nutrient: Nutrient,
    pub products: &'a [String],
}

/// Fertilizer products keyed by nutrient and sourcing preference.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FertilizerCatalog {
    entries: Vec<CatalogEntry>,
}

impl FertilizerCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        FertilizerCatalog { entries }
    }

    pub fn standard() -> Self {
        fn entry(nutrient: Nutrient, preference: Preference, products: &[&str]) -> CatalogEntry {
            CatalogEntry {
                nutrient,
                preference,
                products: products.iter().map(|p| p.to_string()).collect(),
            }
        }
        FertilizerCatalog {
            entries: vec![
                entry(
                    Nutrient::Nitrogen,
                    Preference::Natural,
                    &["composted manure", "blood meal", "legume cover crops"],
                ),
                entry(
                    Nutrient::Nitrogen,
                    Preference::Synthetic,
                    &["urea", "ammonium nitrate"],
                ),
                entry(
                    Nutrient::Phosphorus,
                    Preference::Natural,
                    &["bone meal", "rock phosphate"],
                ),
                entry(Nutrient::Phosphorus, Preference::Synthetic, &["superphosphate"]),
                entry(
                    Nutrient::Potassium,
                    Preference::Natural,
                    &["wood ash", "kelp meal"],
                ),
                entry(
                    Nutrient::Potassium,
                    Preference::Synthetic,
                    &["muriate of potash"],
                ),
            ],
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Empty when the pair is not in the catalog.
    pub fn recommend(&self, nutrient: Nutrient, preference: Preference) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.nutrient == nutrient && e.preference == preference)
            .map(|e| e.products.as_slice())
            .unwrap_or(&[])
    }

    /// One entry per nutrient, in the order nutrients first appear in the
    /// catalog.
    pub fn recommend_all(&self, preference: Preference) -> Vec<NutrientRecommendation<'_>> {
        let mut nutrients: Vec<Nutrient> = Vec::new();
        for entry in &self.entries {
            if !nutrients.contains(&entry.nutrient) {
                nutrients.push(entry.nutrient);
            }
        }
        nutrients
            .into_iter()
            .map(|nutrient| NutrientRecommendation {
                nutrient,
                products: self.recommend(nutrient, preference),
            })
            .collect()
    }
}

impl Default for FertilizerCatalog {
    fn default() -> Self {
        FertilizerCatalog::standard()
    }
}
