use crate::error::{CropWatchError, Result};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reading temperature above this triggers the heat stress alert.
pub const DEFAULT_HEAT_STRESS_TEMP_C: f64 = 32.0;
/// Air quality index above this triggers the poor air quality alert.
pub const DEFAULT_AIR_QUALITY_INDEX: f64 = 100.0;
/// Average forecast rainfall below this triggers the low rainfall alert.
pub const DEFAULT_LOW_RAINFALL_MM: f64 = 2.0;
/// Score penalty per degree Celsius outside a crop's temperature range.
pub const DEFAULT_TEMPERATURE_SENSITIVITY: f64 = 5.0;
/// Score penalty per percentage point outside a crop's humidity range.
pub const DEFAULT_HUMIDITY_SENSITIVITY: f64 = 2.0;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub location: LocationConfig,
    pub openweathermap: Option<OpenWeatherMapConfig>,
    pub prediction: Option<PredictionConfig>,
    #[serde(default)]
    pub alerts: AlertThresholds,
    #[serde(default)]
    pub scoring: SuitabilityTuning,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionConfig {
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Thresholds for the alert rules. Every field has a working default so a
/// config file can omit the whole section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct AlertThresholds {
    #[serde(default = "default_heat_stress_temp_c")]
    pub heat_stress_temp_c: f64,
    #[serde(default = "default_air_quality_index")]
    pub air_quality_index: f64,
    #[serde(default = "default_low_rainfall_mm")]
    pub low_rainfall_mm: f64,
}

fn default_heat_stress_temp_c() -> f64 {
    DEFAULT_HEAT_STRESS_TEMP_C
}

fn default_air_quality_index() -> f64 {
    DEFAULT_AIR_QUALITY_INDEX
}

fn default_low_rainfall_mm() -> f64 {
    DEFAULT_LOW_RAINFALL_MM
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            heat_stress_temp_c: DEFAULT_HEAT_STRESS_TEMP_C,
            air_quality_index: DEFAULT_AIR_QUALITY_INDEX,
            low_rainfall_mm: DEFAULT_LOW_RAINFALL_MM,
        }
    }
}

/// Per-metric penalty slopes for suitability scoring.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SuitabilityTuning {
    #[serde(default = "default_temperature_sensitivity")]
    pub temperature_sensitivity: f64,
    #[serde(default = "default_humidity_sensitivity")]
    pub humidity_sensitivity: f64,
}

fn default_temperature_sensitivity() -> f64 {
    DEFAULT_TEMPERATURE_SENSITIVITY
}

fn default_humidity_sensitivity() -> f64 {
    DEFAULT_HUMIDITY_SENSITIVITY
}

impl Default for SuitabilityTuning {
    fn default() -> Self {
        Self {
            temperature_sensitivity: DEFAULT_TEMPERATURE_SENSITIVITY,
            humidity_sensitivity: DEFAULT_HUMIDITY_SENSITIVITY,
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(CropWatchError::Config(format!(
                "Config file not found at {:?}. Run `cropwatch init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropWatchError::Config(format!("Failed to read config: {}", e)))?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str);

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| CropWatchError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        // Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cropwatch").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        // Return XDG path as the default (will trigger "not found" in load)
        let default_path = dirs::config_dir()
            .ok_or_else(|| CropWatchError::Config("Cannot determine config directory".into()))?
            .join("cropwatch")
            .join("config.yaml");
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropwatch/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropWatchError::Config("Cannot determine config directory".into()))?
            .join("cropwatch");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("No configuration found. Let's set up CropWatch!");
        println!();

        // --- Field Location ---
        println!("Field Location");
        let city: String = Input::new()
            .with_prompt("  City")
            .default("Nagpur".into())
            .interact_text()
            .map_err(|e| CropWatchError::Config(format!("Input error: {}", e)))?;

        let country: String = Input::new()
            .with_prompt("  Country code")
            .default("IN".into())
            .interact_text()
            .map_err(|e| CropWatchError::Config(format!("Input error: {}", e)))?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(21.15)
            .interact_text()
            .map_err(|e| CropWatchError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(79.09)
            .interact_text()
            .map_err(|e| CropWatchError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- OpenWeatherMap (optional) ---
        println!("OpenWeatherMap (leave API key blank to use simulated weather)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| CropWatchError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                enabled: true,
            })
        };

        println!();

        // --- Prediction backend (optional) ---
        println!("Prediction backend (leave URL blank to skip)");
        let prediction_url: String = Input::new()
            .with_prompt("  URL")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CropWatchError::Config(format!("Input error: {}", e)))?;

        let prediction = if prediction_url.is_empty() {
            None
        } else {
            Some(PredictionConfig {
                url: prediction_url,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            location: LocationConfig {
                city,
                country,
                latitude,
                longitude,
            },
            openweathermap,
            prediction,
            alerts: AlertThresholds::default(),
            scoring: SuitabilityTuning::default(),
        };

        // Write to default config path
        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropWatchError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# CropWatch Configuration\n# Generated by `cropwatch init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        // Then check env var
        if let Ok(dir) = std::env::var("CROPWATCH_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        // Use XDG data directory
        let data_dir = dirs::data_dir()
            .ok_or_else(|| CropWatchError::Config("Cannot determine data directory".into()))?
            .join("cropwatch");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("cropwatch.db"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: LocationConfig {
                city: "Nagpur".into(),
                country: "IN".into(),
                latitude: 21.15,
                longitude: 79.09,
            },
            openweathermap: None,
            prediction: None,
            alerts: AlertThresholds::default(),
            scoring: SuitabilityTuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_thresholds_defaults() {
        let thresholds = AlertThresholds::default();
        assert_eq!(thresholds.heat_stress_temp_c, 32.0);
        assert_eq!(thresholds.air_quality_index, 100.0);
        assert_eq!(thresholds.low_rainfall_mm, 2.0);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
location:
  city: Pune
  country: IN
  latitude: 18.52
  longitude: 73.86
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.location.city, "Pune");
        assert!(config.openweathermap.is_none());
        assert_eq!(config.alerts.low_rainfall_mm, DEFAULT_LOW_RAINFALL_MM);
        assert_eq!(
            config.scoring.temperature_sensitivity,
            DEFAULT_TEMPERATURE_SENSITIVITY
        );
    }

    #[test]
    fn env_var_substitution() {
        std::env::set_var("CROPWATCH_TEST_API_KEY", "abc123");
        let substituted = Config::substitute_env_vars(
            "api_key: ${CROPWATCH_TEST_API_KEY}\nother: ${NO_SUCH_VAR_SET}",
        );
        assert!(substituted.contains("api_key: abc123"));
        // Unset variables keep their placeholder
        assert!(substituted.contains("${NO_SUCH_VAR_SET}"));
    }

    #[test]
    fn api_key_redacted_in_debug() {
        let owm = OpenWeatherMapConfig {
            api_key: "secret".into(),
            enabled: true,
        };
        let debug = format!("{:?}", owm);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }
}
