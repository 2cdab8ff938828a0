pub mod check;
pub mod convert;
pub mod defaults;
pub mod locate;
pub mod outline;
pub mod resolve;
pub mod schema;

pub use check::{check, CheckArgs};
pub use convert::{convert, ConvertArgs};
pub use defaults::{defaults, DefaultsArgs};
pub use locate::{locate, LocateArgs};
pub use outline::{outline, OutlineArgs};
pub use resolve::{resolve, ResolveArgs};
pub use schema::{schema, SchemaArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use formsync_codec::Format;
use std::path::{Path, PathBuf};

/// Context shared by every command
pub struct Workspace {
    pub cwd: PathBuf,
    pub config: Config,
}

impl Workspace {
    pub fn load(cwd: PathBuf) -> Result<Self> {
        let config = Config::load(&cwd)?;
        Ok(Self { cwd, config })
    }
}

/// An input file and the format it is written in
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub format: Format,
}

impl SourceFile {
    /// Read `path`; the format comes from `explicit`, then the extension,
    /// then the project config
    pub fn read(path: &Path, explicit: Option<Format>, config: &Config) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let format = explicit
            .or_else(|| Format::from_path(path))
            .unwrap_or(config.format);
        Ok(Self {
            path: path.to_path_buf(),
            text,
            format,
        })
    }

    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}
