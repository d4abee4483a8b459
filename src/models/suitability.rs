use serde::{Deserialize, Serialize};

/// Environmental metric a crop requirement range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureVerdict {
    Optimal,
    BelowRange,
    AboveRange,
}

impl TemperatureVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureVerdict::Optimal => "Optimal",
            TemperatureVerdict::BelowRange => "Below Range",
            TemperatureVerdict::AboveRange => "Above Range",
        }
    }
}

impl std::fmt::Display for TemperatureVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumidityVerdict {
    Optimal,
    Low,
    High,
}

impl HumidityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            HumidityVerdict::Optimal => "Optimal",
            HumidityVerdict::Low => "Low",
            HumidityVerdict::High => "High",
        }
    }
}

impl std::fmt::Display for HumidityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How well current conditions fit one crop's requirements. Scores are on a
/// 0-100 scale and exist for comparative ranking, not for gating advisories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilityResult {
    pub crop_id: String,
    pub temperature_verdict: TemperatureVerdict,
    pub humidity_verdict: HumidityVerdict,
    pub temperature_score: f64,
    pub humidity_score: f64,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvisoryLevel {
    Success,
    Warning,
    Critical,
}

impl AdvisoryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryLevel::Success => "OK",
            AdvisoryLevel::Warning => "Warning",
            AdvisoryLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for AdvisoryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed advisory text for one (metric, verdict) combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub metric: Metric,
    pub level: AdvisoryLevel,
    pub message: String,
    pub action: String,
}

impl Advisory {
    pub fn new(
        metric: Metric,
        level: AdvisoryLevel,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            metric,
            level,
            message: message.into(),
            action: action.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_display() {
        assert_eq!(TemperatureVerdict::Optimal.as_str(), "Optimal");
        assert_eq!(TemperatureVerdict::BelowRange.as_str(), "Below Range");
        assert_eq!(HumidityVerdict::High.as_str(), "High");
        assert_eq!(Metric::Humidity.as_str(), "Humidity");
    }
}
