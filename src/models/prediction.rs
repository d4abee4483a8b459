use serde::{Deserialize, Serialize};

/// Point forecast returned by the prediction backend for a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemperaturePrediction {
    pub temperature_c: f64,
    pub confidence: f64,
}

/// Error statistics for one trained model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub mae: f64,
    pub rmse: f64,
    pub accuracy: f64,
}

/// Per-parameter accuracy report published by the prediction backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPerformanceReport {
    pub temperature: ModelScore,
    pub humidity: ModelScore,
    pub rainfall: ModelScore,
    #[serde(rename = "airQuality")]
    pub air_quality: ModelScore,
    pub ensemble: ModelScore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_report_field_names() {
        let json = r#"{
            "temperature": {"mae": 1.2, "rmse": 1.8, "accuracy": 94.5},
            "humidity": {"mae": 3.5, "rmse": 4.2, "accuracy": 92.8},
            "rainfall": {"mae": 2.1, "rmse": 3.0, "accuracy": 91.2},
            "airQuality": {"mae": 5.2, "rmse": 6.8, "accuracy": 89.5},
            "ensemble": {"mae": 1.8, "rmse": 2.4, "accuracy": 95.8}
        }"#;
        let report: ModelPerformanceReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.air_quality.mae, 5.2);
        assert_eq!(report.ensemble.accuracy, 95.8);
    }
}
