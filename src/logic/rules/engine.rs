use super::{
    air_quality::AirQualityRule, heat_stress::HeatStressRule, low_rainfall::LowRainfallRule,
    AlertRule,
};
use crate::config::AlertThresholds;
use crate::models::{Alert, EnvironmentalReading, WeatherForecast};

/// Runs every alert rule against the current conditions. Rules fire
/// independently; emission order is registration order, not severity order.
pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl AlertEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn AlertRule>> = vec![
            Box::new(HeatStressRule),
            Box::new(AirQualityRule),
            Box::new(LowRainfallRule),
        ];

        Self { rules }
    }

    pub fn evaluate(
        &self,
        reading: &EnvironmentalReading,
        forecast: &WeatherForecast,
        thresholds: &AlertThresholds,
    ) -> Vec<Alert> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(reading, forecast, thresholds))
            .collect()
    }

    pub fn evaluate_rule(
        &self,
        rule_id: &str,
        reading: &EnvironmentalReading,
        forecast: &WeatherForecast,
        thresholds: &AlertThresholds,
    ) -> Option<Alert> {
        self.rules
            .iter()
            .find(|r| r.id() == rule_id)
            .and_then(|rule| rule.evaluate(reading, forecast, thresholds))
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertSeverity, DataSource, ForecastDay, ForecastLocation};
    use chrono::{Duration, NaiveDate, Utc};

    fn reading(temperature_c: f64, air_quality_index: f64) -> EnvironmentalReading {
        EnvironmentalReading::new(
            DataSource::OpenWeatherMap,
            temperature_c,
            65.0,
            12.0,
            1012.0,
            air_quality_index,
            "scattered clouds",
        )
    }

    fn forecast(daily_rainfall_mm: &[f64]) -> WeatherForecast {
        let start = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let days = daily_rainfall_mm
            .iter()
            .enumerate()
            .map(|(i, &rain)| {
                ForecastDay::new(start + Duration::days(i as i64), 27.0, 70.0, rain, 50.0)
            })
            .collect();

        WeatherForecast {
            fetched_at: Utc::now(),
            location: ForecastLocation {
                city: "Nagpur".into(),
                country: "IN".into(),
                latitude: 21.15,
                longitude: 79.09,
            },
            days,
        }
    }

    #[test]
    fn hot_polluted_dry_week_fires_all_three_in_order() {
        let engine = AlertEngine::new();
        let alerts = engine.evaluate(
            &reading(33.0, 120.0),
            &forecast(&[1.0, 1.0, 1.0]),
            &AlertThresholds::default(),
        );

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert!(alerts[0].message.contains("temperature"));
        assert_eq!(alerts[1].severity, AlertSeverity::Danger);
        assert!(alerts[1].message.contains("air quality"));
        assert_eq!(alerts[2].severity, AlertSeverity::Warning);
        assert!(alerts[2].message.contains("rainfall"));
    }

    #[test]
    fn mild_conditions_with_empty_forecast_fire_nothing() {
        let engine = AlertEngine::new();
        let alerts = engine.evaluate(
            &reading(20.0, 10.0),
            &forecast(&[]),
            &AlertThresholds::default(),
        );

        assert!(alerts.is_empty());
    }

    #[test]
    fn thresholds_are_strict_inequalities() {
        let engine = AlertEngine::new();
        let thresholds = AlertThresholds::default();

        // Exactly at the threshold does not fire
        let at_limits = engine.evaluate(&reading(32.0, 100.0), &forecast(&[2.0, 2.0]), &thresholds);
        assert!(at_limits.is_empty());

        // Just past it does
        let past = engine.evaluate(&reading(32.1, 100.0), &forecast(&[2.0, 2.0]), &thresholds);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let engine = AlertEngine::new();
        let current = reading(34.0, 130.0);
        let week = forecast(&[0.0, 0.5, 1.0]);
        let thresholds = AlertThresholds::default();

        let first = engine.evaluate(&current, &week, &thresholds);
        let second = engine.evaluate(&current, &week, &thresholds);
        assert_eq!(first, second);
    }

    #[test]
    fn single_rule_lookup_by_id() {
        let engine = AlertEngine::new();
        let alert = engine.evaluate_rule(
            "low_rainfall",
            &reading(25.0, 40.0),
            &forecast(&[0.0, 0.0]),
            &AlertThresholds::default(),
        );

        assert!(alert.is_some());
        assert!(engine
            .evaluate_rule(
                "heat_stress",
                &reading(25.0, 40.0),
                &forecast(&[0.0, 0.0]),
                &AlertThresholds::default(),
            )
            .is_none());
    }

    #[test]
    fn rules_register_in_declaration_order() {
        let engine = AlertEngine::new();
        let ids: Vec<&str> = engine.list_rules().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["heat_stress", "air_quality", "low_rainfall"]);
    }
}
