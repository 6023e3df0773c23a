//! Business logic services for the Muselink API

pub mod fact;
pub mod mood;
pub mod recommendation;

pub use fact::FactService;
pub use mood::MoodThresholds;
pub use recommendation::{
    FeatureResolution, NoMatchReason, RecommendationOutcome, RecommendationService,
};
