//! Client-local persisted state: the schema selection

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// String key/value storage that survives restarts
pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError>;
    fn remove(&mut self, key: &str) -> Result<(), SettingsError>;
}

/// All entries in one JSON object on disk
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError> {
        // A corrupt file is replaced rather than blocking writes forever
        let mut entries = self.read().unwrap_or_default();
        entries.insert(key.to_string(), value);
        self.write(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        let mut entries = self.read().unwrap_or_default();
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    entries: BTreeMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSource {
    #[default]
    Default,
    Custom,
}

/// Which schema the user picked
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSelection {
    pub source_type: SchemaSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

impl SchemaSelection {
    pub const SETTINGS_KEY: &'static str = "formsync.schemaSelection";

    pub fn custom(url: impl Into<String>) -> Self {
        Self {
            source_type: SchemaSource::Custom,
            custom_url: Some(url.into()),
        }
    }

    /// The stored selection; missing, unreadable or corrupt entries give the
    /// default selection
    pub fn load(store: &dyn SettingsStore) -> Self {
        let raw = match store.get(Self::SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                warn!(error = %err, "Could not read schema selection, using default");
                return Self::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            debug!(error = %err, "Ignoring corrupt schema selection");
            Self::default()
        })
    }

    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), SettingsError> {
        store.set(Self::SETTINGS_KEY, serde_json::to_string(self)?)
    }

    pub fn clear(store: &mut dyn SettingsStore) -> Result<(), SettingsError> {
        store.remove(Self::SETTINGS_KEY)
    }

    /// The URL to load: the custom one when selected and non-empty
    pub fn resolve_url<'a>(&'a self, default_url: &'a str) -> &'a str {
        match (self.source_type, self.custom_url.as_deref()) {
            (SchemaSource::Custom, Some(url)) if !url.trim().is_empty() => url,
            _ => default_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_selection_roundtrip_in_memory() {
        let mut store = MemorySettingsStore::new();
        assert_eq!(SchemaSelection::load(&store), SchemaSelection::default());

        let selection = SchemaSelection::custom("https://example.com/s.json");
        selection.save(&mut store).unwrap();
        assert_eq!(SchemaSelection::load(&store), selection);
        assert_eq!(
            store.get(SchemaSelection::SETTINGS_KEY).unwrap().unwrap(),
            r#"{"sourceType":"custom","customUrl":"https://example.com/s.json"}"#
        );
    }

    #[test]
    fn test_corrupt_selection_falls_back() {
        let mut store = MemorySettingsStore::new();
        store
            .set(SchemaSelection::SETTINGS_KEY, "{not json".to_string())
            .unwrap();
        assert_eq!(SchemaSelection::load(&store), SchemaSelection::default());

        store
            .set(SchemaSelection::SETTINGS_KEY, r#"{"sourceType":"bogus"}"#.to_string())
            .unwrap();
        assert_eq!(SchemaSelection::load(&store), SchemaSelection::default());
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(SchemaSelection::default().resolve_url("d.json"), "d.json");
        assert_eq!(SchemaSelection::custom("c.json").resolve_url("d.json"), "c.json");
        assert_eq!(SchemaSelection::custom("  ").resolve_url("d.json"), "d.json");
        let no_url = SchemaSelection {
            source_type: SchemaSource::Custom,
            custom_url: None,
        };
        assert_eq!(no_url.resolve_url("d.json"), "d.json");
    }

    #[test]
    fn test_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = FileSettingsStore::new(&path);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v".to_string()).unwrap();
        store.set("other", "w".to_string()).unwrap();

        let reopened = FileSettingsStore::new(&path);
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_corrupt_file_falls_back_and_is_repaired() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "garbage").unwrap();

        let mut store = FileSettingsStore::new(&path);
        assert!(store.get(SchemaSelection::SETTINGS_KEY).is_err());
        assert_eq!(SchemaSelection::load(&store), SchemaSelection::default());

        SchemaSelection::custom("c.json").save(&mut store).unwrap();
        assert_eq!(SchemaSelection::load(&store), SchemaSelection::custom("c.json"));
    }
}
