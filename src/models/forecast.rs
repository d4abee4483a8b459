use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Daily weather outlook assembled from the OpenWeatherMap 5-day/3-hour feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub fetched_at: DateTime<Utc>,
    pub location: ForecastLocation,
    /// Chronological, one entry per day, index 0 = soonest.
    pub days: Vec<ForecastDay>,
}

impl WeatherForecast {
    /// Mean rainfall over the whole forecast window. An empty window has no
    /// meaningful average, so it yields None instead of dividing by zero.
    pub fn avg_rainfall_mm(&self) -> Option<f64> {
        if self.days.is_empty() {
            return None;
        }
        let total: f64 = self.days.iter().map(|d| d.rainfall_mm).sum();
        Some(total / self.days.len() as f64)
    }

    pub fn max_temperature_c(&self) -> Option<f64> {
        self.days
            .iter()
            .map(|d| d.temperature_c)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn next_days(&self, count: usize) -> &[ForecastDay] {
        &self.days[..count.min(self.days.len())]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Aggregated outlook for a single day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Short weekday name ("Mon", "Tue", ...).
    pub label: String,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub rainfall_mm: f64,
    /// ML-predicted temperature for the day. Starts as a copy of
    /// `temperature_c` and is overwritten when the prediction backend answers.
    pub predicted_temperature_c: f64,
    pub air_quality_index: f64,
}

impl ForecastDay {
    pub fn new(
        date: NaiveDate,
        temperature_c: f64,
        humidity_percent: f64,
        rainfall_mm: f64,
        air_quality_index: f64,
    ) -> Self {
        Self {
            date,
            label: Self::label_for(date),
            temperature_c,
            humidity_percent,
            rainfall_mm,
            predicted_temperature_c: temperature_c,
            air_quality_index,
        }
    }

    pub fn label_for(date: NaiveDate) -> String {
        date.format("%a").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forecast(rainfall: &[f64]) -> WeatherForecast {
        let start = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let days = rainfall
            .iter()
            .enumerate()
            .map(|(i, mm)| {
                ForecastDay::new(
                    start + chrono::Duration::days(i as i64),
                    26.0 + i as f64,
                    70.0,
                    *mm,
                    45.0,
                )
            })
            .collect();

        WeatherForecast {
            fetched_at: Utc::now(),
            location: ForecastLocation {
                city: "Chennai".to_string(),
                country: "IN".to_string(),
                latitude: 13.0827,
                longitude: 80.2707,
            },
            days,
        }
    }

    #[test]
    fn avg_rainfall_over_window() {
        let forecast = sample_forecast(&[0.0, 1.0, 2.0, 3.0]);
        assert!((forecast.avg_rainfall_mm().unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn avg_rainfall_empty_window_is_none() {
        let forecast = sample_forecast(&[]);
        assert_eq!(forecast.avg_rainfall_mm(), None);
    }

    #[test]
    fn max_temperature_over_window() {
        let forecast = sample_forecast(&[0.0, 0.0, 0.0]);
        assert_eq!(forecast.max_temperature_c(), Some(28.0));
        assert_eq!(sample_forecast(&[]).max_temperature_c(), None);
    }

    #[test]
    fn next_days_clamps_to_window() {
        let forecast = sample_forecast(&[0.0, 1.0]);
        assert_eq!(forecast.next_days(5).len(), 2);
        assert_eq!(forecast.next_days(1).len(), 1);
    }

    #[test]
    fn day_labels_follow_the_calendar() {
        // 2026-08-24 is a Monday
        let forecast = sample_forecast(&[0.0, 0.0, 0.0]);
        let labels: Vec<&str> = forecast.days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed"]);
    }

    #[test]
    fn predicted_temperature_defaults_to_forecast() {
        let day = ForecastDay::new(
            NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            30.0,
            70.0,
            0.0,
            45.0,
        );
        assert_eq!(day.predicted_temperature_c, 30.0);
    }
}
