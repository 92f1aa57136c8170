//! Measurement input and normalization
//!
//! The soil-data provider reports each property as an ordered list of value
//! entries (typically one per depth band), each carrying a central estimate
//! plus optional uncertainty: a standard error and/or a bounding interval.
//! The normalizer reduces that list to a single representative
//! (value, confidence) pair, or excludes the property entirely.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{InvalidMeasurement, InvalidValueKind};

/// Central estimate wrapper, as reported by the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CentralValue {
    pub value: Option<f64>,
}

/// One element of the provider's `uncertainty` array.
///
/// The array mixes two shapes: `{ "type": "standard_error", "value": x }`
/// and `{ "lower_bound": a, "upper_bound": b }`. All fields are optional so
/// either shape (or partial data) deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UncertaintyEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}

/// One reported value entry for a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawValueEntry {
    /// Central estimate; an entry with no central value is malformed and
    /// skipped by the normalizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CentralValue>,

    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub uncertainty: SmallVec<[UncertaintyEntry; 2]>,
}

impl RawValueEntry {
    /// Entry carrying only a central value (no uncertainty reported).
    pub fn from_value(value: f64) -> Self {
        Self {
            value: Some(CentralValue { value: Some(value) }),
            uncertainty: SmallVec::new(),
        }
    }

    /// Entry with a central value and a reported standard error.
    pub fn with_standard_error(value: f64, standard_error: f64) -> Self {
        Self {
            value: Some(CentralValue { value: Some(value) }),
            uncertainty: SmallVec::from_vec(vec![UncertaintyEntry {
                kind: Some("standard_error".to_string()),
                value: Some(standard_error),
                ..Default::default()
            }]),
        }
    }
}

/// Raw input boundary: property name → ordered value entries.
pub type SoilProperties = FxHashMap<String, SmallVec<[RawValueEntry; 1]>>;

/// Single representative measurement for one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub value: f64,

    /// 1.0 when no standard error was reported; decays as 1 / (1 + se)
    pub confidence: f64,
}

/// Reduce a property's raw entries to one representative measurement.
///
/// Picks the first entry in input order that carries a central value. The
/// caller pre-filters entries to the requested depth slice, so averaging
/// across entries is deliberately not attempted. Entries with no central
/// value are skipped; a property whose entries are all malformed is treated
/// as absent (`Ok(None)`) and excluded downstream.
pub fn normalize_property(
    name: &str,
    entries: &[RawValueEntry],
) -> Result<Option<Normalized>, InvalidMeasurement> {
    for entry in entries {
        let Some(central) = entry.value.as_ref().and_then(|v| v.value) else {
            tracing::debug!(property = name, "skipping entry with no central value");
            continue;
        };
        return normalize_entry(name, central, &entry.uncertainty).map(Some);
    }
    Ok(None)
}

fn normalize_entry(
    name: &str,
    central: f64,
    uncertainty: &[UncertaintyEntry],
) -> Result<Normalized, InvalidMeasurement> {
    let invalid = |kind| InvalidMeasurement {
        property: name.to_string(),
        kind,
    };

    if !central.is_finite() {
        return Err(invalid(InvalidValueKind::NonFinite));
    }

    let mut standard_error = None;
    let mut bounds = None;
    for entry in uncertainty {
        if entry.kind.as_deref() == Some("standard_error") {
            if let Some(se) = entry.value {
                standard_error = Some(se);
            }
        }
        if let (Some(lower), Some(upper)) = (entry.lower_bound, entry.upper_bound) {
            bounds = Some((lower, upper));
        }
    }

    if let Some(se) = standard_error {
        if !se.is_finite() || se < 0.0 {
            return Err(invalid(InvalidValueKind::BadStandardError));
        }
    }

    if let Some((lower, upper)) = bounds {
        if lower > upper {
            return Err(invalid(InvalidValueKind::InvertedBounds));
        }
        if central < lower || central > upper {
            return Err(invalid(InvalidValueKind::OutsideBounds));
        }
    }

    let confidence = match standard_error {
        Some(se) => 1.0 / (1.0 + se),
        None => 1.0,
    };

    Ok(Normalized {
        value: central,
        confidence,
    })
}
