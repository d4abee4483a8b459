use super::AlertRule;
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertSeverity, EnvironmentalReading, WeatherForecast};

/// Poor air quality rule
///
/// Conditions:
/// - Air quality index strictly above the configured threshold (100 by
///   default, the "Unhealthy for Sensitive Groups" boundary)
///
/// Emits a Danger. Particulate pollution settles on leaf surfaces and
/// reduces photosynthesis.
pub struct AirQualityRule;

impl AlertRule for AirQualityRule {
    fn id(&self) -> &'static str {
        "air_quality"
    }

    fn name(&self) -> &'static str {
        "Air Quality"
    }

    fn evaluate(
        &self,
        reading: &EnvironmentalReading,
        _forecast: &WeatherForecast,
        thresholds: &AlertThresholds,
    ) -> Option<Alert> {
        if reading.air_quality_index <= thresholds.air_quality_index {
            return None;
        }

        Some(Alert::new(
            AlertSeverity::Danger,
            format!(
                "Poor air quality detected (AQI {:.0})",
                reading.air_quality_index
            ),
            "Monitor crop health for pollution stress symptoms",
        ))
    }
}
