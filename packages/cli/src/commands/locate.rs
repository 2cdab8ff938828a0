use super::{SourceFile, Workspace};
use anyhow::{anyhow, Result};
use clap::Args;
use formsync_codec::{FieldPath, Format};
use formsync_sourcemap::mapping_for_path;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Input document
    pub input: PathBuf,

    /// Field path, e.g. `servers[0].host`
    pub path: FieldPath,

    #[arg(long)]
    pub format: Option<Format>,
}

pub fn locate(args: LocateArgs, workspace: &Workspace) -> Result<()> {
    let source = SourceFile::read(&args.input, args.format, &workspace.config)?;
    let mapping = mapping_for_path(&source.text, &args.path, source.format)
        .filter(|_| !args.path.is_empty())
        .ok_or_else(|| anyhow!("{} is not declared in {}", args.path, source.name()))?;

    println!("{}:{}:{}", source.name(), mapping.line, mapping.column);
    Ok(())
}
