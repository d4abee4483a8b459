use crate::config::LocationConfig;
use crate::models::{
    DataSource, EnvironmentalReading, ForecastDay, ForecastLocation, WeatherForecast,
};
use chrono::{Duration, Utc};
use rand::RngExt;

pub const SIMULATED_FORECAST_DAYS: usize = 5;

/// Generate a stand-in weather bundle for when the live fetch fails. Values
/// are random within plausible growing-season ranges, and the bundle is
/// always labeled so downstream consumers can tell it apart from live data.
pub fn simulated_conditions(location: &LocationConfig) -> (EnvironmentalReading, WeatherForecast) {
    let mut rng = rand::rng();

    let temperature_c = rng.random_range(22.0..34.0);
    let humidity_percent = rng.random_range(55.0..85.0);
    let wind_speed_kmh = rng.random_range(4.0..18.0);
    let pressure_hpa = rng.random_range(1005.0..1018.0);
    let air_quality_index = rng.random_range(30.0..90.0);

    let reading = EnvironmentalReading::new(
        DataSource::Simulated,
        temperature_c,
        humidity_percent,
        wind_speed_kmh,
        pressure_hpa,
        air_quality_index,
        "Simulated conditions (live weather unavailable)",
    );

    let today = Utc::now().date_naive();
    let days = (0..SIMULATED_FORECAST_DAYS)
        .map(|i| {
            let date = today + Duration::days(i as i64 + 1);
            let day_temp = temperature_c + rng.random_range(-3.0..3.0);
            let day_humidity =
                (humidity_percent + rng.random_range(-10.0..10.0)).clamp(20.0, 100.0);
            let rainfall_mm = rng.random_range(0.0..8.0);
            ForecastDay::new(date, day_temp, day_humidity, rainfall_mm, air_quality_index)
        })
        .collect();

    let forecast = WeatherForecast {
        fetched_at: Utc::now(),
        location: ForecastLocation {
            city: location.city.clone(),
            country: location.country.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        },
        days,
    };

    (reading, forecast)
}
