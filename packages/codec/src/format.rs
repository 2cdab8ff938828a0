use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Textual serialization of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Indentation-significant (YAML)
    #[default]
    #[serde(alias = "yaml", alias = "yml")]
    Structured,

    /// Brace-delimited (JSON)
    #[serde(alias = "json")]
    Flow,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Structured, Format::Flow];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Structured),
            "json" => Some(Format::Flow),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Structured => "yaml",
            Format::Flow => "json",
        }
    }

    /// The other format
    pub fn toggled(self) -> Self {
        match self {
            Format::Structured => Format::Flow,
            Format::Flow => Format::Structured,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Structured => write!(f, "structured"),
            Format::Flow => write!(f, "flow"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" | "yaml" | "yml" => Ok(Format::Structured),
            "flow" | "json" => Ok(Format::Flow),
            other => Err(format!(
                "Unknown format: {}. Use: structured (yaml) or flow (json)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("yaml".parse::<Format>(), Ok(Format::Structured));
        assert_eq!("JSON".parse::<Format>(), Ok(Format::Flow));
        assert!("toml".parse::<Format>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.yml")), Some(Format::Structured));
        assert_eq!(Format::from_path(Path::new("b.json")), Some(Format::Flow));
        assert_eq!(Format::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_json::to_string(&Format::Flow).unwrap(), "\"flow\"");
        let parsed: Format = serde_json::from_str("\"yaml\"").unwrap();
        assert_eq!(parsed, Format::Structured);
    }
}
