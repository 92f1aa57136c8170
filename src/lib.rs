//! Soil Health Scoring Engine
//!
//! Converts per-location soil-property measurements (value + statistical
//! uncertainty) into a normalized 0-100 soil-health score and a prioritized
//! list of actionable farming recommendations.
//!
//! - `catalog`: Static reference table of known properties and their rules
//! - `measurement`: Raw provider input and the measurement normalizer
//! - `scorer`: Per-property 0-100 sub-scores
//! - `health`: Weighted aggregation and health categories
//! - `recommendation`: Rule-driven recommendation generation
//! - `engine`: Facade composing the full evaluation
//!
//! The engine is a pure, synchronous, stateless computation: the only shared
//! resource is the immutable property catalog, so concurrent callers need no
//! coordination.
//!
//! ```
//! use soil_scorer::{RawValueEntry, SoilHealthEngine, SoilProperties};
//!
//! let engine = SoilHealthEngine::default();
//!
//! let mut measurements = SoilProperties::default();
//! measurements.insert(
//!     "ph".to_string(),
//!     [RawValueEntry::from_value(5.2)].into_iter().collect(),
//! );
//!
//! let assessment = engine.evaluate(&measurements);
//! assert!(assessment.health.is_some());
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod health;
pub mod measurement;
pub mod recommendation;
pub mod scorer;

// Re-export commonly used types
pub use catalog::{Deviation, PropertyCatalog, PropertyReference, RecommendationRule};
pub use engine::{SoilAssessment, SoilHealthEngine};
pub use error::{EngineError, InvalidMeasurement, InvalidValueKind};
pub use health::{HealthCategory, HealthScore};
pub use measurement::{normalize_property, Normalized, RawValueEntry, SoilProperties};
pub use recommendation::Recommendation;
pub use scorer::score_property;
