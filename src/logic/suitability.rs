use crate::config::SuitabilityTuning;
use crate::models::{
    Advisory, AdvisoryLevel, CropProfile, EnvironmentalReading, HumidityVerdict, Metric,
    SuitabilityResult, TemperatureVerdict, ValueRange,
};

/// Score one metric against a crop requirement range.
///
/// A value inside the range (boundaries inclusive) scores the full 100.
/// Outside the range the score drops linearly with distance from the range
/// midpoint, clamped at zero. The score ranks crops against each other; it
/// does not gate advisories.
pub fn metric_score(value: f64, range: &ValueRange, sensitivity: f64) -> f64 {
    if range.contains(value) {
        100.0
    } else {
        (100.0 - (value - range.midpoint()).abs() * sensitivity).max(0.0)
    }
}

fn temperature_verdict(value: f64, range: &ValueRange) -> TemperatureVerdict {
    if value < range.min {
        TemperatureVerdict::BelowRange
    } else if value > range.max {
        TemperatureVerdict::AboveRange
    } else {
        TemperatureVerdict::Optimal
    }
}

fn humidity_verdict(value: f64, range: &ValueRange) -> HumidityVerdict {
    if value < range.min {
        HumidityVerdict::Low
    } else if value > range.max {
        HumidityVerdict::High
    } else {
        HumidityVerdict::Optimal
    }
}

/// Classify and score one crop against the current reading.
///
/// Pure function of its inputs; expects a fully populated reading. Callers
/// substitute the simulated bundle before evaluation when live data is
/// unavailable.
pub fn evaluate(
    reading: &EnvironmentalReading,
    crop: &CropProfile,
    tuning: &SuitabilityTuning,
) -> SuitabilityResult {
    let temperature_score = metric_score(
        reading.temperature_c,
        &crop.temperature_range,
        tuning.temperature_sensitivity,
    );
    let humidity_score = metric_score(
        reading.humidity_percent,
        &crop.humidity_range,
        tuning.humidity_sensitivity,
    );

    SuitabilityResult {
        crop_id: crop.id.clone(),
        temperature_verdict: temperature_verdict(reading.temperature_c, &crop.temperature_range),
        humidity_verdict: humidity_verdict(reading.humidity_percent, &crop.humidity_range),
        temperature_score,
        humidity_score,
        overall_score: (temperature_score + humidity_score) / 2.0,
    }
}

/// Fixed advisory text for a temperature verdict.
pub fn temperature_advisory(verdict: TemperatureVerdict) -> Advisory {
    match verdict {
        TemperatureVerdict::Optimal => Advisory::new(
            Metric::Temperature,
            AdvisoryLevel::Success,
            "Temperature is within the optimal range",
            "Continue normal operations",
        ),
        TemperatureVerdict::BelowRange => Advisory::new(
            Metric::Temperature,
            AdvisoryLevel::Warning,
            "Temperature is below the optimal range",
            "Consider protective measures like mulching or row covers",
        ),
        TemperatureVerdict::AboveRange => Advisory::new(
            Metric::Temperature,
            AdvisoryLevel::Critical,
            "Temperature is above the optimal range",
            "Increase irrigation frequency and consider shade netting",
        ),
    }
}

/// Fixed advisory text for a humidity verdict.
pub fn humidity_advisory(verdict: HumidityVerdict) -> Advisory {
    match verdict {
        HumidityVerdict::Optimal => Advisory::new(
            Metric::Humidity,
            AdvisoryLevel::Success,
            "Humidity levels are optimal",
            "Maintain current irrigation schedule",
        ),
        HumidityVerdict::Low => Advisory::new(
            Metric::Humidity,
            AdvisoryLevel::Warning,
            "Humidity is low",
            "Increase irrigation frequency",
        ),
        HumidityVerdict::High => Advisory::new(
            Metric::Humidity,
            AdvisoryLevel::Warning,
            "Humidity is high",
            "Monitor for fungal diseases and ensure proper ventilation",
        ),
    }
}

/// Advisories for an evaluation, temperature first then humidity.
pub fn advisories_for(result: &SuitabilityResult) -> Vec<Advisory> {
    vec![
        temperature_advisory(result.temperature_verdict),
        humidity_advisory(result.humidity_verdict),
    ]
}
