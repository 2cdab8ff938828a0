use super::{SourceFile, Workspace};
use anyhow::{anyhow, Result};
use clap::Args;
use formsync_codec::Format;
use formsync_sourcemap::path_at_position;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Input document
    pub input: PathBuf,

    /// 1-indexed line
    pub line: usize,

    /// 1-indexed column
    #[arg(default_value_t = 1)]
    pub column: usize,

    #[arg(long)]
    pub format: Option<Format>,
}

pub fn resolve(args: ResolveArgs, workspace: &Workspace) -> Result<()> {
    let source = SourceFile::read(&args.input, args.format, &workspace.config)?;
    let path = path_at_position(&source.text, args.line, args.column, source.format)
        .ok_or_else(|| anyhow!("No field at {}:{}:{}", source.name(), args.line, args.column))?;

    println!("{}", path);
    Ok(())
}
