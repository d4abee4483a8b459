use crate::config::{LocationConfig, OpenWeatherMapConfig};
use crate::error::{CropWatchError, Result};
use crate::models::{
    ms_to_kmh, DataSource, EnvironmentalReading, ForecastDay, ForecastLocation, WeatherForecast,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// EPA PM2.5 breakpoints: (concentration low/high in µg/m³, index low/high).
const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 7] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 350.4, 301.0, 400.0),
    (350.5, 500.4, 401.0, 500.0),
];

/// Convert a PM2.5 concentration to the 0-500 air quality index by linear
/// interpolation within its breakpoint band. Concentrations beyond the table
/// clamp to 500.
pub fn aqi_from_pm25(pm25: f64) -> f64 {
    let pm25 = pm25.max(0.0);
    for (conc_lo, conc_hi, index_lo, index_hi) in PM25_BREAKPOINTS {
        if pm25 <= conc_hi {
            let fraction = (pm25 - conc_lo) / (conc_hi - conc_lo);
            return (index_lo + fraction * (index_hi - index_lo)).round();
        }
    }
    500.0
}

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
    location: LocationConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    wind: OwmWind,
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    name: String,
    country: String,
    coord: OwmCoord,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwmAirPollutionResponse {
    list: Vec<OwmAirPollutionItem>,
}

#[derive(Debug, Deserialize)]
struct OwmAirPollutionItem {
    components: OwmPollutionComponents,
}

#[derive(Debug, Deserialize)]
struct OwmPollutionComponents {
    pm2_5: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig, location: LocationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            location,
        }
    }

    /// Fetch the current reading and the daily-aggregated forecast in one
    /// pass: current weather, air pollution (for the AQI), then the
    /// 5-day/3-hour forecast.
    pub async fn fetch_conditions(&self) -> Result<(EnvironmentalReading, WeatherForecast)> {
        let current = self.fetch_current().await?;
        let air_quality_index = self.fetch_air_quality().await?;
        let forecast_response = self.fetch_forecast_response().await?;

        let reading = self.convert_current(&current, air_quality_index);
        let forecast = self.convert_forecast(forecast_response, air_quality_index);

        Ok((reading, forecast))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                CropWatchError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }

    async fn fetch_current(&self) -> Result<OwmCurrentResponse> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.config.api_key
        );
        self.get_json(&url).await
    }

    /// Current AQI derived from the PM2.5 concentration.
    async fn fetch_air_quality(&self) -> Result<f64> {
        let url = format!(
            "{}/air_pollution?lat={}&lon={}&appid={}",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.config.api_key
        );
        let response: OwmAirPollutionResponse = self.get_json(&url).await?;

        let pm25 = response
            .list
            .first()
            .map(|item| item.components.pm2_5)
            .ok_or_else(|| {
                CropWatchError::DataSourceUnavailable(
                    "OpenWeatherMap returned an empty air pollution list".into(),
                )
            })?;

        Ok(aqi_from_pm25(pm25))
    }

    async fn fetch_forecast_response(&self) -> Result<OwmForecastResponse> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.location.latitude, self.location.longitude, self.config.api_key
        );
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response =
            self.client.get(url).send().await.map_err(|e| {
                CropWatchError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CropWatchError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            CropWatchError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })
    }

    fn convert_current(
        &self,
        response: &OwmCurrentResponse,
        air_quality_index: f64,
    ) -> EnvironmentalReading {
        let description = response
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "unknown".to_string());

        EnvironmentalReading::new(
            DataSource::OpenWeatherMap,
            response.main.temp,
            response.main.humidity,
            ms_to_kmh(response.wind.speed),
            response.main.pressure,
            air_quality_index,
            description,
        )
    }

    fn convert_forecast(
        &self,
        response: OwmForecastResponse,
        air_quality_index: f64,
    ) -> WeatherForecast {
        let location = ForecastLocation {
            city: response.city.name,
            country: response.city.country,
            latitude: response.city.coord.lat,
            longitude: response.city.coord.lon,
        };

        WeatherForecast {
            fetched_at: Utc::now(),
            location,
            days: Self::aggregate_daily(&response.list, air_quality_index),
        }
    }

    /// Collapse the 3-hourly forecast into one entry per day: mean
    /// temperature and humidity, summed rain plus snow volume. Forecast days
    /// inherit the current AQI until the prediction backend overrides it.
    fn aggregate_daily(items: &[OwmForecastItem], air_quality_index: f64) -> Vec<ForecastDay> {
        // Group by date
        let mut by_date: HashMap<NaiveDate, Vec<&OwmForecastItem>> = HashMap::new();
        for item in items {
            let date = DateTime::from_timestamp(item.dt, 0)
                .unwrap_or_else(Utc::now)
                .date_naive();
            by_date.entry(date).or_default().push(item);
        }

        let mut days: Vec<ForecastDay> = by_date
            .into_iter()
            .map(|(date, points)| {
                let count = points.len().max(1) as f64;
                let avg_temp = points.iter().map(|p| p.main.temp).sum::<f64>() / count;
                let avg_humidity = points.iter().map(|p| p.main.humidity).sum::<f64>() / count;
                let total_rainfall: f64 = points
                    .iter()
                    .map(|p| {
                        let rain = p.rain.as_ref().map(|r| r.three_hour).unwrap_or(0.0);
                        let snow = p.snow.as_ref().map(|s| s.three_hour).unwrap_or(0.0);
                        rain + snow
                    })
                    .sum();

                ForecastDay::new(
                    date,
                    avg_temp,
                    avg_humidity,
                    total_rainfall,
                    air_quality_index,
                )
            })
            .collect();

        days.sort_by_key(|d| d.date);
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(
        dt: i64,
        temp: f64,
        humidity: f64,
        rain: Option<f64>,
        snow: Option<f64>,
    ) -> OwmForecastItem {
        OwmForecastItem {
            dt,
            main: OwmMain {
                temp,
                humidity,
                pressure: 1010.0,
            },
            rain: rain.map(|three_hour| OwmPrecipitation { three_hour }),
            snow: snow.map(|three_hour| OwmPrecipitation { three_hour }),
        }
    }

    #[test]
    fn aqi_table_known_values() {
        assert_eq!(aqi_from_pm25(0.0), 0.0);
        assert_eq!(aqi_from_pm25(12.0), 50.0);
        assert_eq!(aqi_from_pm25(35.4), 100.0);
        assert_eq!(aqi_from_pm25(55.4), 150.0);
        assert_eq!(aqi_from_pm25(150.4), 200.0);
        assert_eq!(aqi_from_pm25(500.4), 500.0);
        // Beyond the table clamps instead of extrapolating
        assert_eq!(aqi_from_pm25(900.0), 500.0);
        // Negative concentrations are treated as clean air
        assert_eq!(aqi_from_pm25(-5.0), 0.0);
    }

    #[test]
    fn aqi_interpolates_within_band() {
        // Midway through the 35.5-55.4 band lands midway through 101-150
        let mid = aqi_from_pm25(45.45);
        assert!((mid - 126.0).abs() <= 1.0);
    }

    #[test]
    fn daily_aggregation_groups_by_date() {
        // 2026-08-24 00:00 UTC
        let day_one = 1_787_529_600;
        let day_two = day_one + 86_400;
        let items = vec![
            item(day_one, 24.0, 60.0, Some(1.0), None),
            item(day_one + 10_800, 30.0, 70.0, Some(2.0), None),
            item(day_two, 26.0, 80.0, None, Some(0.5)),
        ];

        let days = OpenWeatherMapClient::aggregate_daily(&items, 42.0);

        assert_eq!(days.len(), 2);
        assert!(days[0].date < days[1].date);
        assert!((days[0].temperature_c - 27.0).abs() < 1e-9);
        assert!((days[0].humidity_percent - 65.0).abs() < 1e-9);
        assert!((days[0].rainfall_mm - 3.0).abs() < 1e-9);
        // Snow volume counts toward the day's precipitation
        assert!((days[1].rainfall_mm - 0.5).abs() < 1e-9);
        assert_eq!(days[0].air_quality_index, 42.0);
        // Prediction defaults to the forecast temperature until overridden
        assert_eq!(days[0].predicted_temperature_c, days[0].temperature_c);
    }
}
