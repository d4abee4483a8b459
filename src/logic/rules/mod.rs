pub mod air_quality;
pub mod engine;
pub mod heat_stress;
pub mod low_rainfall;

pub use engine::AlertEngine;

use crate::config::AlertThresholds;
use crate::models::{Alert, EnvironmentalReading, WeatherForecast};

/// Trait for alert rules
pub trait AlertRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return an alert if conditions are met
    fn evaluate(
        &self,
        reading: &EnvironmentalReading,
        forecast: &WeatherForecast,
        thresholds: &AlertThresholds,
    ) -> Option<Alert>;
}
