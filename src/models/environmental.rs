use super::forecast::WeatherForecast;
use super::prediction::{ModelPerformanceReport, TemperaturePrediction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    OpenWeatherMap,
    Simulated,
    Cached,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::OpenWeatherMap => "OpenWeatherMap",
            DataSource::Simulated => "Simulated",
            DataSource::Cached => "Cached",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One point-in-time observation. Always fully populated: callers that cannot
/// produce real values substitute a simulated reading instead of nulling
/// fields, so the evaluation code never handles partial data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    /// Surface pressure, carried for the prediction backend's feature vector.
    pub pressure_hpa: f64,
    pub air_quality_index: f64,
    pub description: String,
}

impl EnvironmentalReading {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: DataSource,
        temperature_c: f64,
        humidity_percent: f64,
        wind_speed_kmh: f64,
        pressure_hpa: f64,
        air_quality_index: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            source,
            temperature_c,
            humidity_percent,
            wind_speed_kmh,
            pressure_hpa,
            air_quality_index,
            description: description.into(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.source == DataSource::Simulated
    }
}

/// Everything one refresh cycle produced: the current reading, the daily
/// forecast and whatever the prediction backend contributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionsSummary {
    pub reading: EnvironmentalReading,
    pub forecast: WeatherForecast,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<TemperaturePrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_performance: Option<ModelPerformanceReport>,
    pub last_updated: DateTime<Utc>,
}

impl ConditionsSummary {
    pub fn new(reading: EnvironmentalReading, forecast: WeatherForecast) -> Self {
        Self {
            reading,
            forecast,
            prediction: None,
            model_performance: None,
            last_updated: Utc::now(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.reading.is_simulated()
    }
}

pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}
