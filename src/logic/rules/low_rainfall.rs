use super::AlertRule;
use crate::config::AlertThresholds;
use crate::models::{Alert, AlertSeverity, EnvironmentalReading, WeatherForecast};

/// Low rainfall rule
///
/// Conditions:
/// - Mean rainfall over the full forecast window strictly below the
///   configured threshold (2mm by default)
///
/// Emits a Warning. An empty forecast yields no average, and the rule is
/// skipped rather than evaluated against a placeholder.
pub struct LowRainfallRule;

impl AlertRule for LowRainfallRule {
    fn id(&self) -> &'static str {
        "low_rainfall"
    }

    fn name(&self) -> &'static str {
        "Low Rainfall"
    }

    fn evaluate(
        &self,
        _reading: &EnvironmentalReading,
        forecast: &WeatherForecast,
        thresholds: &AlertThresholds,
    ) -> Option<Alert> {
        let avg_rainfall = forecast.avg_rainfall_mm()?;

        if avg_rainfall >= thresholds.low_rainfall_mm {
            return None;
        }

        Some(Alert::new(
            AlertSeverity::Warning,
            format!(
                "Low rainfall expected over the forecast window ({:.1}mm/day average)",
                avg_rainfall
            ),
            "Plan irrigation schedule and ensure water availability",
        ))
    }
}
