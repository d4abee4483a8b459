pub mod openweathermap;
pub mod prediction;
pub mod simulated;

pub use openweathermap::OpenWeatherMapClient;
pub use prediction::PredictionClient;
