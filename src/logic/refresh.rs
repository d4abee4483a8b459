use crate::config::Config;
use crate::datasources::prediction::PredictionOutcome;
use crate::datasources::{simulated, OpenWeatherMapClient, PredictionClient};
use crate::models::ConditionsSummary;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fetches weather and predictions and assembles the conditions summary.
/// Persistence is left to the caller, which only writes a summary it has
/// accepted as fresh.
///
/// Every refresh carries a monotonically increasing generation number so
/// that a slow fetch finishing late can be recognized as stale and dropped
/// instead of overwriting fresher data.
pub struct RefreshService {
    config: Config,
    openweathermap_client: Option<OpenWeatherMapClient>,
    prediction_client: Option<PredictionClient>,
    generation: AtomicU64,
}

impl RefreshService {
    pub fn new(config: Config) -> Self {
        // Create OpenWeatherMap client if configured and enabled
        let openweathermap_client = config
            .openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
            .map(|c| {
                tracing::info!("OpenWeatherMap client configured for weather data");
                OpenWeatherMapClient::new(c.clone(), config.location.clone())
            });

        if openweathermap_client.is_none() {
            tracing::warn!("OpenWeatherMap not configured - refreshes will use simulated data");
        }

        let prediction_client = config
            .prediction
            .as_ref()
            .filter(|c| c.enabled && !c.url.is_empty())
            .map(|c| {
                tracing::info!("Prediction backend configured at {}", c.url);
                PredictionClient::new(c.clone())
            });

        Self {
            config,
            openweathermap_client,
            prediction_client,
            generation: AtomicU64::new(0),
        }
    }

    /// Run one refresh cycle and return the summary with its generation.
    ///
    /// A weather failure swaps in the labeled simulated bundle. A prediction
    /// failure leaves the live reading in place and the per-day predicted
    /// temperatures at their forecast defaults.
    pub async fn refresh(&self) -> (u64, ConditionsSummary) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (reading, forecast) = match self.openweathermap_client {
            Some(ref client) => match client.fetch_conditions().await {
                Ok(bundle) => bundle,
                Err(e) => {
                    tracing::warn!("Weather fetch failed, substituting simulated data: {}", e);
                    simulated::simulated_conditions(&self.config.location)
                }
            },
            None => simulated::simulated_conditions(&self.config.location),
        };

        let mut summary = ConditionsSummary::new(reading, forecast);

        // Predictions only make sense over live data
        if !summary.is_simulated() {
            if let Some(ref client) = self.prediction_client {
                match client.predict(&summary.reading, &summary.forecast).await {
                    Ok(outcome) => apply_predictions(&mut summary, &outcome),
                    Err(e) => {
                        tracing::warn!("Prediction backend unavailable: {}", e);
                    }
                }

                match client.fetch_performance().await {
                    Ok(report) => summary.model_performance = Some(report),
                    Err(e) => {
                        tracing::debug!("Model performance report unavailable: {}", e);
                    }
                }
            }
        }

        tracing::debug!(generation, "Refresh cycle complete");

        (generation, summary)
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus::default();

        // Check OpenWeatherMap
        if let Some(ref client) = self.openweathermap_client {
            status.openweathermap = client.test_connection().await.unwrap_or(false);
        }

        // Check the prediction backend
        if let Some(ref client) = self.prediction_client {
            status.prediction = client.test_connection().await.unwrap_or(false);
        }

        status
    }

    pub fn has_weather_source(&self) -> bool {
        self.openweathermap_client.is_some()
    }

    pub fn has_prediction_backend(&self) -> bool {
        self.prediction_client.is_some()
    }
}

/// Overlay backend predictions onto the summary: the current-temperature
/// estimate, then per-day predicted temperature and AQI zipped in forecast
/// order. Days beyond the prediction list keep their defaults.
fn apply_predictions(summary: &mut ConditionsSummary, outcome: &PredictionOutcome) {
    summary.prediction = Some(outcome.current);

    for (day, predicted) in summary.forecast.days.iter_mut().zip(outcome.daily.iter()) {
        day.predicted_temperature_c = predicted.temperature_c;
        day.air_quality_index = predicted.air_quality_index;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub openweathermap: bool,
    pub prediction: bool,
}

impl ConnectionStatus {
    pub fn all_connected(&self) -> bool {
        self.openweathermap && self.prediction
    }

    pub fn any_connected(&self) -> bool {
        self.openweathermap || self.prediction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::prediction::DailyPrediction;
    use crate::models::{
        DataSource, EnvironmentalReading, ForecastDay, ForecastLocation, TemperaturePrediction,
        WeatherForecast,
    };
    use chrono::{Duration, NaiveDate, Utc};

    fn summary_with_days(count: usize) -> ConditionsSummary {
        let reading = EnvironmentalReading::new(
            DataSource::OpenWeatherMap,
            28.0,
            75.0,
            10.0,
            1012.0,
            40.0,
            "few clouds",
        );
        let start = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let days = (0..count)
            .map(|i| ForecastDay::new(start + Duration::days(i as i64), 27.0, 70.0, 1.0, 40.0))
            .collect();
        let forecast = WeatherForecast {
            fetched_at: Utc::now(),
            location: ForecastLocation {
                city: "Nagpur".into(),
                country: "IN".into(),
                latitude: 21.15,
                longitude: 79.09,
            },
            days,
        };
        ConditionsSummary::new(reading, forecast)
    }

    fn outcome(daily_temps: &[f64]) -> PredictionOutcome {
        PredictionOutcome {
            current: TemperaturePrediction {
                temperature_c: 29.4,
                confidence: 95.8,
            },
            daily: daily_temps
                .iter()
                .map(|&t| DailyPrediction {
                    temperature_c: t,
                    air_quality_index: 58.0,
                })
                .collect(),
        }
    }

    #[test]
    fn predictions_overlay_forecast_days() {
        let mut summary = summary_with_days(3);
        apply_predictions(&mut summary, &outcome(&[26.0, 25.0, 24.0]));

        assert!(summary.prediction.is_some());
        let temps: Vec<f64> = summary
            .forecast
            .days
            .iter()
            .map(|d| d.predicted_temperature_c)
            .collect();
        assert_eq!(temps, vec![26.0, 25.0, 24.0]);
        assert!(summary
            .forecast
            .days
            .iter()
            .all(|d| d.air_quality_index == 58.0));
    }

    #[test]
    fn short_prediction_list_leaves_tail_at_defaults() {
        let mut summary = summary_with_days(3);
        apply_predictions(&mut summary, &outcome(&[26.0]));

        assert_eq!(summary.forecast.days[0].predicted_temperature_c, 26.0);
        // Untouched days keep the forecast temperature
        assert_eq!(summary.forecast.days[1].predicted_temperature_c, 27.0);
        assert_eq!(summary.forecast.days[2].air_quality_index, 40.0);
    }

    #[test]
    fn extra_predictions_are_ignored() {
        let mut summary = summary_with_days(1);
        apply_predictions(&mut summary, &outcome(&[26.0, 25.0, 24.0]));

        assert_eq!(summary.forecast.days.len(), 1);
        assert_eq!(summary.forecast.days[0].predicted_temperature_c, 26.0);
    }
}
