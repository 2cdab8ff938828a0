use super::schema::{active_schema_url, provider};
use super::Workspace;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formsync_codec::{serialize, Format};
use formsync_schema::{default_values, FieldNode, FileSettingsStore, SchemaSelection};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Schema to read defaults from (overrides the stored selection)
    #[arg(long)]
    pub schema: Option<String>,

    /// Output format
    #[arg(long)]
    pub format: Option<Format>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Print a new document seeded with the schema's default values
pub fn defaults(args: DefaultsArgs, workspace: &Workspace) -> Result<()> {
    let url = args
        .schema
        .clone()
        .or_else(|| {
            let store = FileSettingsStore::new(workspace.config.settings_path(&workspace.cwd));
            active_schema_url(workspace, &SchemaSelection::load(&store))
        })
        .ok_or_else(|| anyhow!("No schema configured. Pass --schema or run `formsync schema use`"))?;

    let schema = provider(workspace).load_schema(&url)?;
    let values = default_values(&FieldNode::from_schema(&schema));
    let format = args
        .format
        .or_else(|| args.out.as_deref().and_then(Format::from_path))
        .unwrap_or(workspace.config.format);
    let text = serialize(&values, format)?;

    match args.out {
        Some(out) => {
            std::fs::write(&out, text)?;
            eprintln!("{} Wrote defaults to {}", "✓".green(), out.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
