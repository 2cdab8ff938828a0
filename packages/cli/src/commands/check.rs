use super::schema::{active_schema_url, provider};
use super::{SourceFile, Workspace};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formsync_codec::{parse, pretty, Format};
use formsync_editor::locate_errors;
use formsync_schema::{
    FileSettingsStore, JsonSchemaValidator, SchemaSelection, Severity, Validator,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Documents to check
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Schema to validate against (overrides the stored selection)
    #[arg(long)]
    pub schema: Option<String>,

    #[arg(long)]
    pub format: Option<Format>,
}

/// Returns whether every document parsed and validated cleanly
pub fn check(args: CheckArgs, workspace: &Workspace) -> Result<bool> {
    let url = args.schema.clone().or_else(|| {
        let store = FileSettingsStore::new(workspace.config.settings_path(&workspace.cwd));
        active_schema_url(workspace, &SchemaSelection::load(&store))
    });
    let schema = match &url {
        Some(url) => Some(provider(workspace).load_schema(url)?),
        None => None,
    };
    let validator = JsonSchemaValidator::new();

    let mut clean = true;
    for input in &args.inputs {
        let source = SourceFile::read(input, args.format, &workspace.config)?;
        let name = source.name();

        let tree = match parse(&source.text, source.format) {
            Ok(tree) => tree,
            Err(err) => {
                eprintln!("{}", pretty::render(&err, &name, &source.text, true));
                clean = false;
                continue;
            }
        };

        let Some(schema) = &schema else {
            println!("{} {}", "✓".green(), name);
            continue;
        };

        let report = validator.validate(schema, &tree);
        info!(file = %name, errors = report.errors.len(), "Checked");
        if report.errors.is_empty() {
            println!("{} {}", "✓".green(), name);
            continue;
        }

        for error in locate_errors(&report.errors, &source.text, source.format) {
            let label = match error.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            let location = match error.line {
                Some(line) => format!("{}:{}:{}", name, line, error.column.unwrap_or(1)),
                None => name.clone(),
            };
            let path = if error.path.is_empty() {
                String::new()
            } else {
                format!(" {}", error.path.to_string().cyan())
            };
            println!("{}: {}{} {}", label, location, path, error.message);
        }
        clean &= report.success;
    }

    Ok(clean)
}
