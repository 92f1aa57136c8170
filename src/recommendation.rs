//! Recommendation Generation
//!
//! Maps out-of-range properties to actionable recommendation records using
//! each property's ordered rule list: first matching rule wins, at most one
//! recommendation per property per evaluation. The result is sorted by
//! priority ascending (1 = high first); ties keep catalog order, so two runs
//! over identical input produce identically ordered output.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Deviation, PropertyCatalog, PropertyReference, RecommendationRule};
use crate::measurement::Normalized;

/// One actionable farming recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommendation class, e.g. "amendment" or "fertilizer"
    #[serde(rename = "type")]
    pub rec_type: String,

    pub title: String,

    /// Rendered description with property label and measured value
    pub description: String,

    pub dosage: String,

    pub timing: String,

    /// 1 = high, 2 = medium, 3 = low
    pub priority: u8,
}

/// How far a measured value sits outside its optimal range.
#[derive(Debug, Clone, Copy)]
struct RangeDeviation {
    direction: Deviation,
    /// Distance beyond the violated bound, in the property's unit
    beyond: f64,
}

fn deviation_from_range(value: f64, reference: &PropertyReference) -> Option<RangeDeviation> {
    if value < reference.min {
        Some(RangeDeviation {
            direction: Deviation::Deficit,
            beyond: reference.min - value,
        })
    } else if value > reference.max {
        Some(RangeDeviation {
            direction: Deviation::Excess,
            beyond: value - reference.max,
        })
    } else {
        None
    }
}

/// Evaluate one property's rules against its measured value.
///
/// In-range values never produce a recommendation. An out-of-range value
/// that matches no rule (deviation still inside the first rule's margin)
/// also produces nothing — the rule margins define a buffer zone beyond the
/// optimal range where the deviation is noted in the score but not yet
/// actionable.
pub fn recommend_property(
    reference: &PropertyReference,
    measured: &Normalized,
) -> Option<Recommendation> {
    let deviation = deviation_from_range(measured.value, reference)?;

    reference
        .rules
        .iter()
        .find(|rule| rule.direction == deviation.direction && deviation.beyond > rule.margin)
        .map(|rule| render(rule, reference, measured.value))
}

/// Render a rule's template against the measured value.
///
/// The measured value is always formatted to one decimal place.
fn render(rule: &RecommendationRule, reference: &PropertyReference, value: f64) -> Recommendation {
    let description = rule
        .description
        .replace("{label}", &reference.label)
        .replace("{value}", &format!("{:.1}", value));

    Recommendation {
        rec_type: rule.rec_type.clone(),
        title: rule.title.clone(),
        description,
        dosage: rule.dosage.clone(),
        timing: rule.timing.clone(),
        priority: rule.priority,
    }
}

/// Generate the full ordered recommendation list for an evaluation.
///
/// Walks the catalog in its declared order, so the stable sort on priority
/// keeps catalog position within equal priorities.
pub fn generate_recommendations(
    measurements: &FxHashMap<String, Normalized>,
    catalog: &PropertyCatalog,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = catalog
        .iter()
        .filter_map(|reference| {
            measurements
                .get(&reference.name)
                .and_then(|measured| recommend_property(reference, measured))
        })
        .collect();

    // Stable: ties retain catalog order
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PropertyCatalog;

    fn measured(value: f64) -> Normalized {
        Normalized {
            value,
            confidence: 1.0,
        }
    }

    fn input(pairs: &[(&str, f64)]) -> FxHashMap<String, Normalized> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), measured(*value)))
            .collect()
    }

    #[test]
    fn test_in_range_produces_nothing() {
        let catalog = PropertyCatalog::default_catalog();
        let ph = catalog.get("ph").unwrap();
        assert!(recommend_property(ph, &measured(6.8)).is_none());
        assert!(recommend_property(ph, &measured(6.0)).is_none());
        assert!(recommend_property(ph, &measured(7.5)).is_none());
    }

    #[test]
    fn test_buffer_zone_produces_nothing() {
        // Out of range but inside the rule margin: scored below 100
        // elsewhere, but not yet actionable
        let catalog = PropertyCatalog::default_catalog();
        let ph = catalog.get("ph").unwrap();
        assert!(recommend_property(ph, &measured(5.8)).is_none());
        assert!(recommend_property(ph, &measured(7.9)).is_none());
    }

    #[test]
    fn test_acidic_soil_fires_lime_rule() {
        let catalog = PropertyCatalog::default_catalog();
        let ph = catalog.get("ph").unwrap();
        let rec = recommend_property(ph, &measured(4.8)).unwrap();
        assert_eq!(rec.title, "Apply Lime");
        assert_eq!(rec.rec_type, "amendment");
        assert_eq!(rec.priority, 1);
        assert!(rec.description.contains("Soil pH is 4.8"));
    }

    #[test]
    fn test_alkaline_soil_fires_sulfur_rule() {
        let catalog = PropertyCatalog::default_catalog();
        let ph = catalog.get("ph").unwrap();
        let rec = recommend_property(ph, &measured(8.4)).unwrap();
        assert_eq!(rec.title, "Apply Sulfur");
        assert!(rec.description.contains("8.4"));
    }

    #[test]
    fn test_value_formatted_to_one_decimal() {
        let catalog = PropertyCatalog::default_catalog();
        let ph = catalog.get("ph").unwrap();
        let rec = recommend_property(ph, &measured(4.4444)).unwrap();
        assert!(rec.description.contains("Soil pH is 4.4,"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        use crate::catalog::{Deviation, PropertyReference, RecommendationRule};

        let template = |title: &str, margin: f64, priority: u8| RecommendationRule {
            direction: Deviation::Deficit,
            margin,
            rec_type: "amendment".to_string(),
            title: title.to_string(),
            description: "{label} is {value}.".to_string(),
            dosage: "".to_string(),
            timing: "".to_string(),
            priority,
        };

        // Severe rule first, mild catch-all second
        let reference = PropertyReference {
            name: "ph".to_string(),
            label: "Soil pH".to_string(),
            min: 6.0,
            max: 7.5,
            unit: "pH".to_string(),
            weight: 1.0,
            rules: vec![template("Severe", 1.0, 1), template("Mild", 0.0, 2)],
        };

        let severe = recommend_property(&reference, &measured(4.5)).unwrap();
        assert_eq!(severe.title, "Severe");

        let mild = recommend_property(&reference, &measured(5.5)).unwrap();
        assert_eq!(mild.title, "Mild");
    }

    #[test]
    fn test_at_most_one_recommendation_per_property() {
        let catalog = PropertyCatalog::default_catalog();
        let recs = generate_recommendations(&input(&[("ph", 4.0)]), &catalog);
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_priority_then_catalog_order() {
        let catalog = PropertyCatalog::default_catalog();
        // potassium (priority 3, catalog pos 4), nitrogen (priority 2,
        // pos 2), phosphorus (priority 2, pos 3), ph (priority 1, pos 0)
        let recs = generate_recommendations(
            &input(&[
                ("potassium_extractable", 60.0),
                ("phosphorous_extractable", 5.0),
                ("nitrogen_total", 0.05),
                ("ph", 4.2),
            ]),
            &catalog,
        );

        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Apply Lime",
                "Apply Nitrogen Fertilizer",
                "Apply Phosphorus Fertilizer",
                "Apply Potassium Fertilizer",
            ]
        );
    }

    #[test]
    fn test_deterministic_across_runs() {
        let catalog = PropertyCatalog::default_catalog();
        let measurements = input(&[
            ("ph", 4.2),
            ("carbon_organic", 0.8),
            ("potassium_extractable", 60.0),
        ]);

        let first = generate_recommendations(&measurements, &catalog);
        let second = generate_recommendations(&measurements, &catalog);
        assert_eq!(first, second);
    }
}
