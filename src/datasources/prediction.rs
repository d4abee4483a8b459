use crate::config::PredictionConfig;
use crate::error::{CropWatchError, Result};
use crate::models::{
    EnvironmentalReading, ModelPerformanceReport, TemperaturePrediction, WeatherForecast,
};
use serde::{Deserialize, Serialize};

/// Client for the opaque ML prediction backend. Only the HTTP contract is
/// consumed here; model internals stay on the other side of the wire.
pub struct PredictionClient {
    client: reqwest::Client,
    config: PredictionConfig,
}

/// What one prediction round trip produced: the current-temperature estimate
/// plus one entry per forecast day, in forecast order.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub current: TemperaturePrediction,
    pub daily: Vec<DailyPrediction>,
}

#[derive(Debug, Clone, Copy)]
pub struct DailyPrediction {
    pub temperature_c: f64,
    pub air_quality_index: f64,
}

/// 3-hourly slots per forecast day in the wire payload; the backend strides
/// the list by this count to sample one item per day.
const SLOTS_PER_DAY: usize = 8;

// Prediction backend request/response structures
#[derive(Debug, Serialize)]
struct PredictRequest {
    current_weather: FeatureItem,
    forecast: FeatureList,
}

#[derive(Debug, Serialize)]
struct FeatureList {
    list: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Serialize)]
struct FeatureItem {
    main: FeatureMain,
    wind: FeatureWind,
}

#[derive(Debug, Clone, Serialize)]
struct FeatureMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Clone, Serialize)]
struct FeatureWind {
    /// Wind speed in m/s; the backend converts to km/h itself.
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    temperature_prediction: Option<TempPrediction>,
    #[serde(default)]
    forecast_predictions: Vec<ForecastPrediction>,
}

#[derive(Debug, Deserialize)]
struct TempPrediction {
    temp: f64,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastPrediction {
    temperature: TempPrediction,
    #[allow(dead_code)]
    humidity: f64,
    #[allow(dead_code)]
    rainfall: f64,
    aqi: f64,
}

impl PredictionClient {
    pub fn new(config: PredictionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Test connection to the prediction backend
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/health", self.config.url.trim_end_matches('/'));

        let response = self.client.get(&url).send().await.map_err(|e| {
            CropWatchError::DataSourceUnavailable(format!("Prediction backend: {}", e))
        })?;

        Ok(response.status().is_success())
    }

    /// Fetch the per-parameter model accuracy report.
    pub async fn fetch_performance(&self) -> Result<ModelPerformanceReport> {
        let url = format!(
            "{}/api/models/performance",
            self.config.url.trim_end_matches('/')
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            CropWatchError::DataSourceUnavailable(format!("Prediction backend: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(CropWatchError::DataSourceUnavailable(format!(
                "Prediction backend returned {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            CropWatchError::DataSourceUnavailable(format!(
                "Failed to parse model performance response: {}",
                e
            ))
        })
    }

    /// Run one prediction round trip over the current reading and forecast.
    pub async fn predict(
        &self,
        reading: &EnvironmentalReading,
        forecast: &WeatherForecast,
    ) -> Result<PredictionOutcome> {
        let url = format!("{}/api/predict", self.config.url.trim_end_matches('/'));
        let payload = Self::build_payload(reading, forecast);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                CropWatchError::DataSourceUnavailable(format!("Prediction backend: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(CropWatchError::DataSourceUnavailable(format!(
                "Prediction backend returned {}",
                response.status()
            )));
        }

        let parsed: PredictResponse = response.json().await.map_err(|e| {
            CropWatchError::DataSourceUnavailable(format!(
                "Failed to parse prediction response: {}",
                e
            ))
        })?;

        Self::convert_response(parsed)
    }

    /// Assemble the backend's expected feature payload. The backend samples
    /// every 8th entry of a 3-hourly forecast list to pick one item per day,
    /// so each daily aggregate is expanded to eight slots to keep that stride
    /// landing on successive days. Daily entries reuse the current pressure
    /// and wind because the daily aggregate drops both.
    fn build_payload(reading: &EnvironmentalReading, forecast: &WeatherForecast) -> PredictRequest {
        let wind_ms = reading.wind_speed_kmh / 3.6;

        let list = forecast
            .days
            .iter()
            .flat_map(|day| {
                std::iter::repeat_n(
                    FeatureItem {
                        main: FeatureMain {
                            temp: day.temperature_c,
                            humidity: day.humidity_percent,
                            pressure: reading.pressure_hpa,
                        },
                        wind: FeatureWind { speed: wind_ms },
                    },
                    SLOTS_PER_DAY,
                )
            })
            .collect();

        PredictRequest {
            current_weather: FeatureItem {
                main: FeatureMain {
                    temp: reading.temperature_c,
                    humidity: reading.humidity_percent,
                    pressure: reading.pressure_hpa,
                },
                wind: FeatureWind { speed: wind_ms },
            },
            forecast: FeatureList { list },
        }
    }

    fn convert_response(response: PredictResponse) -> Result<PredictionOutcome> {
        if !response.success {
            return Err(CropWatchError::DataSourceUnavailable(format!(
                "Prediction backend reported failure: {}",
                response.error.unwrap_or_else(|| "unknown error".into())
            )));
        }

        let current = response.temperature_prediction.ok_or_else(|| {
            CropWatchError::DataSourceUnavailable(
                "Prediction backend omitted the temperature prediction".into(),
            )
        })?;

        let daily = response
            .forecast_predictions
            .into_iter()
            .map(|p| DailyPrediction {
                temperature_c: p.temperature.temp,
                air_quality_index: p.aqi,
            })
            .collect();

        Ok(PredictionOutcome {
            current: TemperaturePrediction {
                temperature_c: current.temp,
                confidence: current.confidence,
            },
            daily,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataSource, ForecastDay, ForecastLocation};
    use chrono::{NaiveDate, Utc};

    fn sample_reading() -> EnvironmentalReading {
        EnvironmentalReading::new(
            DataSource::OpenWeatherMap,
            28.0,
            75.0,
            10.8,
            1013.0,
            42.0,
            "clear sky",
        )
    }

    fn sample_forecast() -> WeatherForecast {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        WeatherForecast {
            fetched_at: Utc::now(),
            location: ForecastLocation {
                city: "Nagpur".into(),
                country: "IN".into(),
                latitude: 21.15,
                longitude: 79.09,
            },
            days: vec![ForecastDay::new(date, 27.0, 70.0, 1.5, 42.0)],
        }
    }

    #[test]
    fn payload_sends_wind_in_meters_per_second() {
        let payload = PredictionClient::build_payload(&sample_reading(), &sample_forecast());

        assert!((payload.current_weather.wind.speed - 3.0).abs() < 1e-9);
        assert_eq!(payload.forecast.list.len(), SLOTS_PER_DAY);
        assert_eq!(payload.forecast.list[0].main.temp, 27.0);
        // Daily entries carry the current pressure
        assert_eq!(payload.forecast.list[0].main.pressure, 1013.0);
    }

    #[test]
    fn backend_stride_samples_one_item_per_day() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let mut forecast = sample_forecast();
        forecast.days = (0..5)
            .map(|i| {
                ForecastDay::new(
                    start + chrono::Duration::days(i),
                    20.0 + i as f64,
                    70.0,
                    1.5,
                    42.0,
                )
            })
            .collect();

        let payload = PredictionClient::build_payload(&sample_reading(), &forecast);
        assert_eq!(payload.forecast.list.len(), 5 * SLOTS_PER_DAY);

        // The backend walks the list with this stride; each hit must land on
        // the next day's features.
        let sampled: Vec<f64> = payload
            .forecast
            .list
            .iter()
            .step_by(SLOTS_PER_DAY)
            .map(|item| item.main.temp)
            .collect();
        assert_eq!(sampled, vec![20.0, 21.0, 22.0, 23.0, 24.0]);
    }

    #[test]
    fn successful_response_converts_to_outcome() {
        let json = r#"{
            "success": true,
            "temperature_prediction": {"temp": 29.42, "confidence": 95.8},
            "forecast_predictions": [
                {"temperature": {"temp": 28.1, "confidence": 95.8}, "humidity": 71.0, "rainfall": 0.8, "aqi": 61.0}
            ],
            "timestamp": "2026-08-24T06:00:00"
        }"#;
        let parsed: PredictResponse = serde_json::from_str(json).unwrap();
        let outcome = PredictionClient::convert_response(parsed).unwrap();

        assert!((outcome.current.temperature_c - 29.42).abs() < 1e-9);
        assert!((outcome.current.confidence - 95.8).abs() < 1e-9);
        assert_eq!(outcome.daily.len(), 1);
        assert!((outcome.daily[0].air_quality_index - 61.0).abs() < 1e-9);
    }

    #[test]
    fn backend_failure_body_maps_to_unavailable() {
        let json = r#"{"success": false, "error": "models not loaded", "temperature_prediction": null}"#;
        let parsed: PredictResponse = serde_json::from_str(json).unwrap();

        let err = PredictionClient::convert_response(parsed).unwrap_err();
        assert!(err.to_string().contains("models not loaded"));
    }
}
