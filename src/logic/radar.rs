use super::suitability;
use crate::config::SuitabilityTuning;
use crate::models::{CropRegistry, EnvironmentalReading};
use serde::{Deserialize, Serialize};

/// Axis of the multi-crop comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMetric {
    TemperatureSuitability,
    HumiditySuitability,
    OverallHealth,
}

impl ComparisonMetric {
    pub fn all() -> [ComparisonMetric; 3] {
        [
            ComparisonMetric::TemperatureSuitability,
            ComparisonMetric::HumiditySuitability,
            ComparisonMetric::OverallHealth,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMetric::TemperatureSuitability => "Temperature Suitability",
            ComparisonMetric::HumiditySuitability => "Humidity Suitability",
            ComparisonMetric::OverallHealth => "Overall Health",
        }
    }
}

impl std::fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scores for one comparison axis, in the caller's requested crop order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricScores {
    pub metric: ComparisonMetric,
    pub scores: Vec<(String, f64)>,
}

impl MetricScores {
    pub fn score_for(&self, crop_id: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(id, _)| id == crop_id)
            .map(|(_, score)| *score)
    }
}

/// One axis per comparison metric, each mapping crop id to score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropComparison {
    pub crop_ids: Vec<String>,
    pub metrics: Vec<MetricScores>,
}

impl CropComparison {
    pub fn metric(&self, metric: ComparisonMetric) -> Option<&MetricScores> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

/// Score the requested crops against the current reading, one axis per
/// comparison metric. Requested order is preserved; ids the registry does
/// not know are skipped. Overall health is the mean of the temperature and
/// humidity scores for that crop.
pub fn compare(
    crop_ids: &[String],
    registry: &CropRegistry,
    reading: &EnvironmentalReading,
    tuning: &SuitabilityTuning,
) -> CropComparison {
    let results: Vec<_> = crop_ids
        .iter()
        .filter_map(|id| registry.get(id))
        .map(|crop| suitability::evaluate(reading, crop, tuning))
        .collect();

    let known_ids: Vec<String> = results.iter().map(|r| r.crop_id.clone()).collect();

    let metrics = ComparisonMetric::all()
        .into_iter()
        .map(|metric| MetricScores {
            metric,
            scores: results
                .iter()
                .map(|result| {
                    let score = match metric {
                        ComparisonMetric::TemperatureSuitability => result.temperature_score,
                        ComparisonMetric::HumiditySuitability => result.humidity_score,
                        ComparisonMetric::OverallHealth => result.overall_score,
                    };
                    (result.crop_id.clone(), score)
                })
                .collect(),
        })
        .collect();

    CropComparison {
        crop_ids: known_ids,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataSource;

    fn reading(temperature_c: f64, humidity_percent: f64) -> EnvironmentalReading {
        EnvironmentalReading::new(
            DataSource::OpenWeatherMap,
            temperature_c,
            humidity_percent,
            8.0,
            1010.0,
            55.0,
            "haze",
        )
    }

    #[test]
    fn requested_order_preserved_and_unknown_ids_skipped() {
        let registry = CropRegistry::builtin();
        let requested = vec![
            "wheat".to_string(),
            "dragonfruit".to_string(),
            "rice".to_string(),
        ];
        let comparison = compare(
            &requested,
            &registry,
            &reading(22.0, 60.0),
            &SuitabilityTuning::default(),
        );

        assert_eq!(comparison.crop_ids, vec!["wheat", "rice"]);
        for metric in &comparison.metrics {
            let ids: Vec<&str> = metric.scores.iter().map(|(id, _)| id.as_str()).collect();
            assert_eq!(ids, vec!["wheat", "rice"]);
        }
    }

    #[test]
    fn all_three_axes_present_in_fixed_order() {
        let registry = CropRegistry::builtin();
        let comparison = compare(
            &["rice".to_string()],
            &registry,
            &reading(28.0, 80.0),
            &SuitabilityTuning::default(),
        );

        let axes: Vec<ComparisonMetric> = comparison.metrics.iter().map(|m| m.metric).collect();
        assert_eq!(
            axes,
            vec![
                ComparisonMetric::TemperatureSuitability,
                ComparisonMetric::HumiditySuitability,
                ComparisonMetric::OverallHealth,
            ]
        );
    }

    #[test]
    fn overall_health_is_mean_of_metric_scores() {
        let registry = CropRegistry::builtin();
        // 22°C suits wheat (12-25) but sits below rice's range; 60% humidity
        // suits wheat (50-70) but sits below rice's 70-90.
        let comparison = compare(
            &["rice".to_string(), "wheat".to_string()],
            &registry,
            &reading(22.0, 60.0),
            &SuitabilityTuning::default(),
        );

        let temp = comparison
            .metric(ComparisonMetric::TemperatureSuitability)
            .unwrap();
        let humidity = comparison
            .metric(ComparisonMetric::HumiditySuitability)
            .unwrap();
        let overall = comparison.metric(ComparisonMetric::OverallHealth).unwrap();

        for crop_id in &comparison.crop_ids {
            let expected =
                (temp.score_for(crop_id).unwrap() + humidity.score_for(crop_id).unwrap()) / 2.0;
            assert!((overall.score_for(crop_id).unwrap() - expected).abs() < 1e-9);
        }

        // Wheat fits both ranges at this reading, so it tops the overall axis
        assert_eq!(overall.score_for("wheat").unwrap(), 100.0);
        assert!(overall.score_for("rice").unwrap() < 100.0);
    }
}
