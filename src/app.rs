use crate::config::Config;
use crate::db::Database;
use crate::error::{CropWatchError, Result};
use crate::logic::radar::{self, CropComparison};
use crate::logic::suitability;
use crate::logic::AlertEngine;
use crate::models::{
    Advisory, Alert, ConditionsSummary, CropRegistry, SavedLocation, SuitabilityResult,
};

/// Application state restored from the key-value store at startup. Every
/// mutation is written back immediately; the evaluation cores stay pure and
/// never touch the store themselves.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub registry: CropRegistry,
    pub selected_crop_ids: Vec<String>,
    pub locations: Vec<SavedLocation>,
    pub active_location: Option<String>,
    pub summary: Option<ConditionsSummary>,
    pub alert_engine: AlertEngine,
    applied_generation: u64,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let registry = CropRegistry::builtin();

        // Restore persisted state; selection defaults to the full registry
        let selected_crop_ids = match db.load_selected_crops()? {
            Some(ids) if !ids.is_empty() => ids,
            _ => registry.ids(),
        };
        let locations = db.load_locations()?;
        let active_location = db.load_active_location()?;
        let summary = db.load_summary()?;

        // A persisted active location overrides the configured coordinates,
        // matching what `location use` set up in the previous run.
        let mut config = config;
        if let Some(name) = active_location.as_deref() {
            match locations.iter().find(|l| l.name == name) {
                Some(location) => {
                    config.location.city = location.name.clone();
                    config.location.latitude = location.latitude;
                    config.location.longitude = location.longitude;
                }
                None => {
                    tracing::warn!(
                        "Active location '{}' is no longer saved; using configured coordinates",
                        name
                    );
                }
            }
        }

        Ok(Self {
            config,
            db,
            registry,
            selected_crop_ids,
            locations,
            active_location,
            summary,
            alert_engine: AlertEngine::new(),
            applied_generation: 0,
        })
    }

    /// Apply a refresh result unless it is stale. Returns whether the
    /// summary was accepted; a completion carrying an older generation than
    /// the last applied one never overwrites fresher data. Only accepted
    /// summaries are written to the store, so a restart restores the
    /// freshest reading rather than whichever fetch finished last.
    pub fn apply_refresh(&mut self, generation: u64, summary: ConditionsSummary) -> Result<bool> {
        if generation <= self.applied_generation {
            tracing::debug!(
                generation,
                applied = self.applied_generation,
                "Ignoring stale refresh result"
            );
            return Ok(false);
        }

        self.db.save_summary(&summary)?;
        self.applied_generation = generation;
        self.summary = Some(summary);
        Ok(true)
    }

    /// Replace the selected crop set. Ids are validated against the
    /// registry before anything is persisted.
    pub fn select_crops(&mut self, crop_ids: Vec<String>) -> Result<()> {
        if crop_ids.is_empty() {
            return Err(CropWatchError::InvalidData(
                "Select at least one crop".into(),
            ));
        }
        for id in &crop_ids {
            if !self.registry.contains(id) {
                return Err(CropWatchError::NotFound(format!("Unknown crop id '{}'", id)));
            }
        }

        self.db.save_selected_crops(&crop_ids)?;
        self.selected_crop_ids = crop_ids;
        Ok(())
    }

    pub fn add_location(&mut self, location: SavedLocation) -> Result<()> {
        if self.locations.iter().any(|l| l.name == location.name) {
            return Err(CropWatchError::InvalidData(format!(
                "Location '{}' already exists",
                location.name
            )));
        }

        self.locations.push(location);
        self.db.save_locations(&self.locations)?;
        Ok(())
    }

    pub fn remove_location(&mut self, name: &str) -> Result<()> {
        let before = self.locations.len();
        self.locations.retain(|l| l.name != name);
        if self.locations.len() == before {
            return Err(CropWatchError::NotFound(format!(
                "No saved location named '{}'",
                name
            )));
        }

        if self.active_location.as_deref() == Some(name) {
            self.active_location = None;
            self.db.save_active_location(None)?;
        }
        self.db.save_locations(&self.locations)?;
        Ok(())
    }

    /// Mark a saved location active and point the configured coordinates at
    /// it, so subsequent refreshes fetch for that spot.
    pub fn use_location(&mut self, name: &str) -> Result<SavedLocation> {
        let location = self
            .locations
            .iter()
            .find(|l| l.name == name)
            .cloned()
            .ok_or_else(|| {
                CropWatchError::NotFound(format!("No saved location named '{}'", name))
            })?;

        self.db.save_active_location(Some(name))?;
        self.active_location = Some(name.to_string());
        self.config.location.city = location.name.clone();
        self.config.location.latitude = location.latitude;
        self.config.location.longitude = location.longitude;
        Ok(location)
    }

    pub fn current_summary(&self) -> Result<&ConditionsSummary> {
        self.summary.as_ref().ok_or_else(|| {
            CropWatchError::NotFound(
                "No conditions available yet. Run `cropwatch refresh` first.".into(),
            )
        })
    }

    /// Verdicts, scores and advisories for one crop against the latest
    /// reading.
    pub fn evaluate_crop(&self, crop_id: &str) -> Result<(SuitabilityResult, Vec<Advisory>)> {
        let summary = self.current_summary()?;
        let crop = self
            .registry
            .get(crop_id)
            .ok_or_else(|| CropWatchError::NotFound(format!("Unknown crop id '{}'", crop_id)))?;

        let result = suitability::evaluate(&summary.reading, crop, &self.config.scoring);
        let advisories = suitability::advisories_for(&result);
        Ok((result, advisories))
    }

    /// Evaluations for every selected crop, in selection order.
    pub fn evaluate_selected(&self) -> Result<Vec<(SuitabilityResult, Vec<Advisory>)>> {
        self.selected_crop_ids
            .iter()
            .map(|id| self.evaluate_crop(id))
            .collect()
    }

    /// Alerts for the latest summary.
    pub fn current_alerts(&self) -> Result<Vec<Alert>> {
        let summary = self.current_summary()?;
        Ok(self
            .alert_engine
            .evaluate(&summary.reading, &summary.forecast, &self.config.alerts))
    }

    /// Radar comparison over the given crops, defaulting to the selection.
    pub fn compare_crops(&self, crop_ids: Option<&[String]>) -> Result<CropComparison> {
        let summary = self.current_summary()?;
        let ids = crop_ids.unwrap_or(&self.selected_crop_ids);
        Ok(radar::compare(
            ids,
            &self.registry,
            &summary.reading,
            &self.config.scoring,
        ))
    }
}
