use crate::db::Database;
use crate::error::Result;
use crate::models::{ConditionsSummary, SavedLocation};
use rusqlite::{params, OptionalExtension};
use tracing::warn;

const KEY_LAST_SUMMARY: &str = "last_summary";
const KEY_SAVED_LOCATIONS: &str = "saved_locations";
const KEY_SELECTED_CROPS: &str = "selected_crops";
const KEY_ACTIVE_LOCATION: &str = "active_location";

// Key-value state store. Structured values are stored as JSON blobs and
// decoded leniently: a blob that no longer parses is treated as absent
// rather than wedging startup.

impl Database {
    fn get_state(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
        })
    }

    fn put_state(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
    }

    fn delete_state(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
            Ok(())
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(blob) = self.get_state(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&blob) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable state blob");
                Ok(None)
            }
        }
    }

    fn put_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.put_state(key, &serde_json::to_string(value)?)
    }

    pub fn load_summary(&self) -> Result<Option<ConditionsSummary>> {
        self.get_json(KEY_LAST_SUMMARY)
    }

    pub fn save_summary(&self, summary: &ConditionsSummary) -> Result<()> {
        self.put_json(KEY_LAST_SUMMARY, summary)
    }

    pub fn load_locations(&self) -> Result<Vec<SavedLocation>> {
        Ok(self.get_json(KEY_SAVED_LOCATIONS)?.unwrap_or_default())
    }

    pub fn save_locations(&self, locations: &[SavedLocation]) -> Result<()> {
        self.put_json(KEY_SAVED_LOCATIONS, &locations)
    }

    pub fn load_selected_crops(&self) -> Result<Option<Vec<String>>> {
        self.get_json(KEY_SELECTED_CROPS)
    }

    pub fn save_selected_crops(&self, crop_ids: &[String]) -> Result<()> {
        self.put_json(KEY_SELECTED_CROPS, &crop_ids)
    }

    pub fn load_active_location(&self) -> Result<Option<String>> {
        self.get_state(KEY_ACTIVE_LOCATION)
    }

    pub fn save_active_location(&self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) => self.put_state(KEY_ACTIVE_LOCATION, name),
            None => self.delete_state(KEY_ACTIVE_LOCATION),
        }
    }
}
