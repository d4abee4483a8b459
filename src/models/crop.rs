use serde::{Deserialize, Serialize};

/// Inclusive min/max band for one environmental metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "range min {} exceeds max {}", min, max);
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}-{:.0}", self.min, self.max)
    }
}

/// Static environmental requirements for one crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropProfile {
    pub id: String,
    pub name: String,
    pub temperature_range: ValueRange,
    pub humidity_range: ValueRange,
    pub rainfall_description: String,
    pub growth_stages: Vec<String>,
}

impl CropProfile {
    pub fn new(
        id: &str,
        name: &str,
        temperature_range: ValueRange,
        humidity_range: ValueRange,
        rainfall_description: &str,
        growth_stages: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            temperature_range,
            humidity_range,
            rainfall_description: rainfall_description.to_string(),
            growth_stages: growth_stages.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Read-only reference table of supported crops. Built once at startup and
/// shared by everything that evaluates suitability.
#[derive(Debug, Clone)]
pub struct CropRegistry {
    crops: Vec<CropProfile>,
}

impl CropRegistry {
    pub fn builtin() -> Self {
        let crops = vec![
            CropProfile::new(
                "rice",
                "Rice",
                ValueRange::new(20.0, 35.0),
                ValueRange::new(70.0, 90.0),
                "1500-2000 mm per season",
                &[
                    "Nursery",
                    "Tillering",
                    "Panicle Initiation",
                    "Flowering",
                    "Grain Filling",
                    "Maturity",
                ],
            ),
            CropProfile::new(
                "wheat",
                "Wheat",
                ValueRange::new(12.0, 25.0),
                ValueRange::new(50.0, 70.0),
                "500-750 mm per season",
                &[
                    "Germination",
                    "Tillering",
                    "Jointing",
                    "Heading",
                    "Grain Filling",
                    "Ripening",
                ],
            ),
            CropProfile::new(
                "cotton",
                "Cotton",
                ValueRange::new(21.0, 30.0),
                ValueRange::new(60.0, 80.0),
                "600-1200 mm per season",
                &[
                    "Emergence",
                    "Squaring",
                    "Flowering",
                    "Boll Development",
                    "Boll Opening",
                ],
            ),
        ];

        Self { crops }
    }

    pub fn get(&self, id: &str) -> Option<&CropProfile> {
        self.crops.iter().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn ids(&self) -> Vec<String> {
        self.crops.iter().map(|c| c.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

impl Default for CropRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_is_inclusive() {
        let range = ValueRange::new(20.0, 35.0);
        assert!(range.contains(20.0));
        assert!(range.contains(35.0));
        assert!(range.contains(27.5));
        assert!(!range.contains(19.999));
        assert!(!range.contains(35.001));
    }

    #[test]
    fn range_midpoint() {
        assert!((ValueRange::new(21.0, 30.0).midpoint() - 25.5).abs() < 1e-9);
        assert!((ValueRange::new(20.0, 35.0).midpoint() - 27.5).abs() < 1e-9);
    }

    #[test]
    fn registry_ships_reference_crops() {
        let registry = CropRegistry::builtin();

        let rice = registry.get("rice").expect("rice profile");
        assert_eq!(rice.temperature_range, ValueRange::new(20.0, 35.0));
        assert_eq!(rice.humidity_range, ValueRange::new(70.0, 90.0));

        let wheat = registry.get("wheat").expect("wheat profile");
        assert_eq!(wheat.temperature_range, ValueRange::new(12.0, 25.0));
        assert_eq!(wheat.humidity_range, ValueRange::new(50.0, 70.0));

        let cotton = registry.get("cotton").expect("cotton profile");
        assert_eq!(cotton.temperature_range, ValueRange::new(21.0, 30.0));
        assert_eq!(cotton.humidity_range, ValueRange::new(60.0, 80.0));
    }

    #[test]
    fn registry_profiles_are_well_formed() {
        for crop in CropRegistry::builtin().all() {
            assert!(crop.temperature_range.is_valid(), "{}", crop.id);
            assert!(crop.humidity_range.is_valid(), "{}", crop.id);
            assert!(!crop.growth_stages.is_empty(), "{}", crop.id);
            assert!(!crop.rainfall_description.is_empty(), "{}", crop.id);
        }
    }

    #[test]
    fn registry_lookup_unknown_id() {
        let registry = CropRegistry::builtin();
        assert!(registry.get("sorghum").is_none());
        assert!(!registry.contains("sorghum"));
        assert!(registry.contains("wheat"));
    }
}
