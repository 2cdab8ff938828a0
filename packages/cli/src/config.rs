use formsync_codec::Format;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "formsync.config.json";

/// formsync configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Format assumed for files without a known extension
    #[serde(default)]
    pub format: Format,

    /// Schema used when no selection has been stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Where persisted settings (the schema selection) live
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
}

fn default_settings_file() -> String {
    ".formsync/settings.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn settings_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.settings_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::default(),
            schema: None,
            settings_file: default_settings_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "format": "json",
            "schema": "schemas/service.json",
            "settingsFile": "state.json"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.format, Format::Flow);
        assert_eq!(config.schema.as_deref(), Some("schemas/service.json"));
        assert_eq!(config.settings_file, "state.json");
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.format, Format::Structured);
        assert_eq!(
            config.settings_path(Path::new("/work")),
            PathBuf::from("/work/.formsync/settings.json")
        );
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"format": "flow"}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().format, Format::Flow);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
