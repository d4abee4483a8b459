use super::AlertRule;
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertSeverity, EnvironmentalReading, WeatherForecast};

/// Heat stress rule
///
/// Conditions:
/// - Current temperature strictly above the heat stress threshold (32°C
///   by default)
///
/// Emits a Warning. Sustained heat above this level accelerates
/// evapotranspiration and can halt pollination in most field crops.
pub struct HeatStressRule;

impl AlertRule for HeatStressRule {
    fn id(&self) -> &'static str {
        "heat_stress"
    }

    fn name(&self) -> &'static str {
        "Heat Stress"
    }

    fn evaluate(
        &self,
        reading: &EnvironmentalReading,
        _forecast: &WeatherForecast,
        thresholds: &AlertThresholds,
    ) -> Option<Alert> {
        if reading.temperature_c <= thresholds.heat_stress_temp_c {
            return None;
        }

        Some(Alert::new(
            AlertSeverity::Warning,
            format!(
                "High temperature ({:.1}°C) may cause crop heat stress",
                reading.temperature_c
            ),
            "Increase irrigation frequency and consider shade structures",
        ))
    }
}
