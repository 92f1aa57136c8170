//! Health Aggregation
//!
//! Combines per-property sub-scores into a single weighted overall score and
//! a categorical label. Only properties actually present in the input
//! participate; a missing property is excluded, never counted as zero.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::PropertyCatalog;

/// Categorical soil-health label derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthCategory {
    /// Derive the category from a score (0-100).
    ///
    /// Cut points are inclusive at the lower bound of each bucket and are
    /// applied to the unrounded score: 79.99 is Good, not Excellent.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => HealthCategory::Excellent,
            s if s >= 60.0 => HealthCategory::Good,
            s if s >= 40.0 => HealthCategory::Fair,
            _ => HealthCategory::Poor,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            HealthCategory::Excellent => "Excellent",
            HealthCategory::Good => "Good",
            HealthCategory::Fair => "Fair",
            HealthCategory::Poor => "Poor",
        }
    }
}

/// Overall soil-health result for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    /// Weighted mean of the property sub-scores, in [0, 100]
    pub overall_score: f64,

    pub health_category: HealthCategory,

    /// Sub-score per present property, keyed by machine name
    pub property_scores: FxHashMap<String, f64>,
}

/// Weighted mean of sub-scores over present properties only.
///
/// Returns `None` when nothing was scored: with zero properties the overall
/// score is undefined and the caller must surface an insufficient-data
/// outcome rather than a numeric 0.
pub fn aggregate(
    property_scores: FxHashMap<String, f64>,
    catalog: &PropertyCatalog,
) -> Option<HealthScore> {
    if property_scores.is_empty() {
        return None;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (name, score) in &property_scores {
        // Scores only exist for cataloged properties; fall back to a
        // neutral weight if a caller scored something out-of-catalog
        let weight = catalog.get(name).map_or(1.0, |r| r.weight);
        weighted_sum += score * weight;
        total_weight += weight;
    }

    let overall_score = weighted_sum / total_weight;

    Some(HealthScore {
        overall_score,
        health_category: HealthCategory::from_score(overall_score),
        property_scores,
    })
}
