use super::{SourceFile, Workspace};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formsync_codec::{parse, pretty, serialize, Format};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input document
    pub input: PathBuf,

    /// Format of the input (defaults to the file extension)
    #[arg(long)]
    pub from: Option<Format>,

    /// Target format (defaults to the other one)
    #[arg(long)]
    pub to: Option<Format>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn convert(args: ConvertArgs, workspace: &Workspace) -> Result<()> {
    let source = SourceFile::read(&args.input, args.from, &workspace.config)?;
    let target = args.to.unwrap_or_else(|| source.format.toggled());

    let tree = parse(&source.text, source.format)
        .map_err(|err| anyhow!("\n{}", pretty::render(&err, &source.name(), &source.text, true)))?;
    let output = serialize(&tree, target)?;
    info!(from = %source.format, to = %target, "Converted");

    match args.out {
        Some(out) => {
            std::fs::write(&out, output)?;
            eprintln!(
                "{} {} → {} ({})",
                "✓".green(),
                source.path.display(),
                out.display(),
                target
            );
        }
        None => print!("{}", output),
    }

    Ok(())
}
