//! Engine Facade
//!
//! Single entry point composing normalization, scoring, aggregation, and
//! recommendation generation into one response. Evaluation is a pure
//! function of the input and the immutable catalog: no I/O, no state kept
//! between calls, safe to share across threads by reference.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::catalog::PropertyCatalog;
use crate::error::{EngineError, InvalidMeasurement};
use crate::health::{self, HealthScore};
use crate::measurement::{normalize_property, Normalized, SoilProperties};
use crate::recommendation::{self, Recommendation};
use crate::scorer::score_property;

/// Soil health engine over an immutable property catalog.
#[derive(Debug, Clone)]
pub struct SoilHealthEngine {
    catalog: PropertyCatalog,
}

/// Complete result of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct SoilAssessment {
    /// `None` when zero usable properties were present (insufficient data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthScore>,

    /// Ordered by priority, ties in catalog order
    pub recommendations: Vec<Recommendation>,

    /// Properties present in the input but excluded for unusable data,
    /// in catalog order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_properties: Vec<InvalidMeasurement>,
}

impl SoilAssessment {
    /// Overall health, or `InsufficientData` when nothing was scored.
    pub fn require_health(&self) -> Result<&HealthScore, EngineError> {
        self.health.as_ref().ok_or(EngineError::InsufficientData)
    }

    pub fn is_insufficient(&self) -> bool {
        self.health.is_none()
    }
}

impl SoilHealthEngine {
    pub fn new(catalog: PropertyCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PropertyCatalog {
        &self.catalog
    }

    /// Evaluate one set of raw measurements.
    ///
    /// Unknown property names are silently ignored — they have no catalog
    /// entry, so they can neither be scored nor generate recommendations.
    /// Invalid measurements are reported in the assessment and do not abort
    /// evaluation of the remaining properties.
    pub fn evaluate(&self, measurements: &SoilProperties) -> SoilAssessment {
        for name in measurements.keys() {
            if self.catalog.get(name).is_none() {
                tracing::debug!(property = %name, "ignoring property not in catalog");
            }
        }

        // Walk the catalog, not the input map, so invalid-property reporting
        // and score insertion follow catalog order deterministically
        let mut normalized: FxHashMap<String, Normalized> = FxHashMap::default();
        let mut invalid_properties = Vec::new();

        for reference in self.catalog.iter() {
            let Some(entries) = measurements.get(reference.name.as_str()) else {
                continue;
            };
            match normalize_property(&reference.name, entries) {
                Ok(Some(measured)) => {
                    normalized.insert(reference.name.clone(), measured);
                }
                Ok(None) => {
                    // All entries malformed: treated as absent
                }
                Err(invalid) => {
                    tracing::warn!(
                        property = %reference.name,
                        error = %invalid,
                        "excluding invalid measurement"
                    );
                    invalid_properties.push(invalid);
                }
            }
        }

        let mut property_scores: FxHashMap<String, f64> = FxHashMap::default();
        for reference in self.catalog.iter() {
            if let Some(measured) = normalized.get(reference.name.as_str()) {
                property_scores.insert(
                    reference.name.clone(),
                    score_property(measured.value, reference),
                );
            }
        }

        let health = health::aggregate(property_scores, &self.catalog);
        let recommendations = recommendation::generate_recommendations(&normalized, &self.catalog);

        SoilAssessment {
            health,
            recommendations,
            invalid_properties,
        }
    }
}

impl Default for SoilHealthEngine {
    /// Engine over the built-in property catalog.
    fn default() -> Self {
        Self::new(PropertyCatalog::default_catalog())
    }
}
