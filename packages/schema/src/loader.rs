//! Where schema text comes from

use crate::error::{SchemaLoadError, SchemaResult};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fetch the raw text of a schema
pub trait SchemaLoader {
    fn fetch(&self, url: &str) -> SchemaResult<String>;
}

/// Reads local paths and `file://` URLs
///
/// Relative paths resolve against `base_dir` when one is set.
#[derive(Debug, Default, Clone)]
pub struct FileLoader {
    base_dir: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SchemaLoader for FileLoader {
    fn fetch(&self, url: &str) -> SchemaResult<String> {
        if is_remote(url) {
            return Err(SchemaLoadError::UnsupportedUrl {
                url: url.to_string(),
            });
        }
        std::fs::read_to_string(self.resolve(url)).map_err(|source| SchemaLoadError::Io {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetches `http(s)` URLs with a blocking client
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpLoader {
    pub fn new(timeout: std::time::Duration) -> SchemaResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SchemaLoadError::Http {
                url: String::new(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "remote")]
impl SchemaLoader for HttpLoader {
    fn fetch(&self, url: &str) -> SchemaResult<String> {
        let http_error = |err: reqwest::Error| SchemaLoadError::Http {
            url: url.to_string(),
            message: err.to_string(),
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(http_error)
    }
}

/// Dispatches on the URL scheme: `http(s)` to an optional remote loader,
/// everything else to the filesystem
#[derive(Default)]
pub struct DefaultLoader {
    files: FileLoader,
    remote: Option<Box<dyn SchemaLoader>>,
}

impl DefaultLoader {
    pub fn new(files: FileLoader) -> Self {
        Self {
            files,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: impl SchemaLoader + 'static) -> Self {
        self.remote = Some(Box::new(remote));
        self
    }
}

impl SchemaLoader for DefaultLoader {
    fn fetch(&self, url: &str) -> SchemaResult<String> {
        match &self.remote {
            Some(remote) if is_remote(url) => remote.fetch(url),
            _ => self.files.fetch(url),
        }
    }
}

/// In-memory schemas, for tests and embedded defaults
#[derive(Debug, Default)]
pub struct MemoryLoader {
    schemas: HashMap<String, String>,
    fetches: Cell<usize>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.schemas.insert(url.into(), text.into());
        self
    }

    /// Number of fetches served so far
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl SchemaLoader for MemoryLoader {
    fn fetch(&self, url: &str) -> SchemaResult<String> {
        self.fetches.set(self.fetches.get() + 1);
        self.schemas
            .get(url)
            .cloned()
            .ok_or_else(|| SchemaLoadError::Io {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such schema"),
            })
    }
}

impl<L: SchemaLoader + ?Sized> SchemaLoader for std::rc::Rc<L> {
    fn fetch(&self, url: &str) -> SchemaResult<String> {
        (**self).fetch(url)
    }
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
