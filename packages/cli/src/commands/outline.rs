use super::{SourceFile, Workspace};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formsync_codec::Format;
use formsync_sourcemap::mappings;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Input document
    pub input: PathBuf,

    #[arg(long)]
    pub format: Option<Format>,

    /// Print the mappings as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn outline(args: OutlineArgs, workspace: &Workspace) -> Result<()> {
    let source = SourceFile::read(&args.input, args.format, &workspace.config)?;
    let found = mappings(&source.text, source.format);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    for mapping in found {
        let depth = mapping.path.len().saturating_sub(1);
        println!(
            "{:>5}  {}{}",
            mapping.line.to_string().dimmed(),
            "  ".repeat(depth),
            mapping.path
        );
    }
    Ok(())
}
