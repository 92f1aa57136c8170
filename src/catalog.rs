//! Property Reference Table
//!
//! Static catalog of known soil properties: optimal ranges, units, relative
//! importance weights, and the ordered recommendation rules that apply when
//! a measured value falls outside its range. The catalog is immutable after
//! construction and shared by reference across evaluations.
//!
//! Catalog order is significant: recommendations tied on priority keep the
//! catalog position of their property, so identical inputs always produce
//! identically ordered output.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Direction of a deviation from the optimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    /// Below the range minimum
    Deficit,
    /// Above the range maximum
    Excess,
}

/// A severity predicate paired with the recommendation it produces.
///
/// Rules are evaluated in declaration order; the first rule whose direction
/// matches the deviation and whose margin is exceeded fires. A margin of 0.0
/// matches any deviation in that direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRule {
    /// Which side of the range this rule covers
    pub direction: Deviation,

    /// Deviation beyond the violated bound required to fire, in the
    /// property's own unit
    pub margin: f64,

    /// Recommendation class, e.g. "amendment" or "fertilizer"
    pub rec_type: String,

    pub title: String,

    /// Description template; `{label}` and `{value}` are interpolated at
    /// generation time
    pub description: String,

    pub dosage: String,

    pub timing: String,

    /// 1 = high, 2 = medium, 3 = low
    pub priority: u8,
}

/// Reference data for one known soil property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyReference {
    /// Machine name matching the provider's key, e.g. "carbon_organic"
    pub name: String,

    /// Human label used in recommendation text, e.g. "Organic carbon"
    pub label: String,

    /// Optimal range lower bound
    pub min: f64,

    /// Optimal range upper bound
    pub max: f64,

    /// Measurement unit for display, e.g. "mg/kg"
    pub unit: String,

    /// Relative importance in the weighted overall score (positive)
    pub weight: f64,

    /// Ordered rules; first match wins
    #[serde(default)]
    pub rules: Vec<RecommendationRule>,
}

impl PropertyReference {
    /// Check whether a value lies in the optimal range (bounds inclusive).
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Range width used to normalize out-of-range distances.
    /// A degenerate zero-width range is treated as width 1.
    pub fn range_width(&self) -> f64 {
        let width = self.max - self.min;
        if width > 0.0 {
            width
        } else {
            1.0
        }
    }
}

/// Immutable, ordered catalog of property references.
#[derive(Debug, Clone)]
pub struct PropertyCatalog {
    entries: Vec<PropertyReference>,
    index: FxHashMap<String, usize>,
}

impl PropertyCatalog {
    /// Build a catalog from ordered references, validating each entry.
    pub fn new(entries: Vec<PropertyReference>) -> Result<Self> {
        let mut index = FxHashMap::default();

        for (position, reference) in entries.iter().enumerate() {
            if !(reference.min <= reference.max) {
                anyhow::bail!(
                    "property '{}': min {} exceeds max {}",
                    reference.name,
                    reference.min,
                    reference.max
                );
            }
            if !(reference.weight > 0.0) {
                anyhow::bail!(
                    "property '{}': weight must be positive, got {}",
                    reference.name,
                    reference.weight
                );
            }
            for rule in &reference.rules {
                if !(1..=3).contains(&rule.priority) {
                    anyhow::bail!(
                        "property '{}': rule priority must be 1-3, got {}",
                        reference.name,
                        rule.priority
                    );
                }
                if !(rule.margin >= 0.0) {
                    anyhow::bail!(
                        "property '{}': rule margin must be non-negative, got {}",
                        reference.name,
                        rule.margin
                    );
                }
            }
            if index.insert(reference.name.clone(), position).is_some() {
                anyhow::bail!("duplicate property '{}' in catalog", reference.name);
            }
        }

        Ok(Self { entries, index })
    }

    /// Load a catalog from a JSON configuration artifact.
    ///
    /// The artifact is an ordered array of property references (order
    /// determines the recommendation tie-break).
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        Self::from_json(&contents)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<PropertyReference> =
            serde_json::from_str(json).with_context(|| "Failed to parse catalog JSON")?;
        Self::new(entries)
    }

    /// Look up a property by machine name.
    pub fn get(&self, name: &str) -> Option<&PropertyReference> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// Catalog position of a property, used for deterministic tie-breaks.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate references in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyReference> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Built-in catalog
// ============================================================================

impl PropertyCatalog {
    /// Built-in reference table for the five key agricultural properties.
    ///
    /// Ranges follow the agronomic optima used by the upstream soil-data
    /// provider; rule margins reproduce its severity cutoffs (e.g. lime is
    /// only advised once pH drops half a unit below the optimal minimum).
    pub fn default_catalog() -> Self {
        let entries = vec![
            PropertyReference {
                name: "ph".to_string(),
                label: "Soil pH".to_string(),
                min: 6.0,
                max: 7.5,
                unit: "pH".to_string(),
                weight: 2.0,
                rules: vec![
                    RecommendationRule {
                        direction: Deviation::Deficit,
                        margin: 0.5,
                        rec_type: "amendment".to_string(),
                        title: "Apply Lime".to_string(),
                        description: "{label} is {value}, which is too acidic. Apply \
                                      agricultural lime to raise pH to the optimal range \
                                      (6.0-7.5). This will improve nutrient availability \
                                      and reduce aluminum toxicity."
                            .to_string(),
                        dosage: "2-4 tons per hectare".to_string(),
                        timing: "Apply 3-4 months before planting".to_string(),
                        priority: 1,
                    },
                    RecommendationRule {
                        direction: Deviation::Excess,
                        margin: 0.5,
                        rec_type: "amendment".to_string(),
                        title: "Apply Sulfur".to_string(),
                        description: "{label} is {value}, which is too alkaline. Apply \
                                      elemental sulfur to lower pH to the optimal range \
                                      (6.0-7.5)."
                            .to_string(),
                        dosage: "200-500 kg per hectare".to_string(),
                        timing: "Apply 2-3 months before planting".to_string(),
                        priority: 1,
                    },
                ],
            },
            PropertyReference {
                name: "carbon_organic".to_string(),
                label: "Organic carbon".to_string(),
                min: 2.0,
                max: 4.0,
                unit: "%".to_string(),
                weight: 1.5,
                rules: vec![RecommendationRule {
                    direction: Deviation::Deficit,
                    margin: 0.5,
                    rec_type: "amendment".to_string(),
                    title: "Add Organic Matter".to_string(),
                    description: "{label} is {value}%, which is low. Incorporate compost, \
                                  manure, or crop residues to improve soil structure and \
                                  fertility."
                        .to_string(),
                    dosage: "5-10 tons compost per hectare".to_string(),
                    timing: "Apply before planting season".to_string(),
                    priority: 2,
                }],
            },
            PropertyReference {
                name: "nitrogen_total".to_string(),
                label: "Total nitrogen".to_string(),
                min: 0.2,
                max: 0.5,
                unit: "%".to_string(),
                weight: 1.5,
                rules: vec![RecommendationRule {
                    direction: Deviation::Deficit,
                    margin: 0.05,
                    rec_type: "fertilizer".to_string(),
                    title: "Apply Nitrogen Fertilizer".to_string(),
                    description: "{label} is {value}%, which is low. Apply nitrogen \
                                  fertilizer to support crop growth."
                        .to_string(),
                    dosage: "100-150 kg N per hectare".to_string(),
                    timing: "Split application: 1/3 at planting, 2/3 at 6 weeks".to_string(),
                    priority: 2,
                }],
            },
            PropertyReference {
                name: "phosphorous_extractable".to_string(),
                label: "Available phosphorus".to_string(),
                min: 20.0,
                max: 50.0,
                unit: "mg/kg".to_string(),
                weight: 1.0,
                rules: vec![RecommendationRule {
                    direction: Deviation::Deficit,
                    margin: 5.0,
                    rec_type: "fertilizer".to_string(),
                    title: "Apply Phosphorus Fertilizer".to_string(),
                    description: "{label} is {value} mg/kg, which is low. Apply phosphorus \
                                  fertilizer to support root development and flowering."
                        .to_string(),
                    dosage: "40-60 kg P2O5 per hectare".to_string(),
                    timing: "Apply at planting".to_string(),
                    priority: 2,
                }],
            },
            PropertyReference {
                name: "potassium_extractable".to_string(),
                label: "Available potassium".to_string(),
                min: 150.0,
                max: 300.0,
                unit: "mg/kg".to_string(),
                weight: 1.0,
                rules: vec![RecommendationRule {
                    direction: Deviation::Deficit,
                    margin: 50.0,
                    rec_type: "fertilizer".to_string(),
                    title: "Apply Potassium Fertilizer".to_string(),
                    description: "{label} is {value} mg/kg, which is low. Apply potassium \
                                  fertilizer to improve disease resistance and water use \
                                  efficiency."
                        .to_string(),
                    dosage: "50-80 kg K2O per hectare".to_string(),
                    timing: "Apply at planting".to_string(),
                    priority: 3,
                }],
            },
        ];

        // Built-in entries are known valid
        Self::new(entries).expect("built-in catalog is valid")
    }
}
