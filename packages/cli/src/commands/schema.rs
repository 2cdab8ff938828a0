use super::Workspace;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use formsync_schema::{
    DefaultLoader, FileLoader, FileSettingsStore, SchemaProvider, SchemaSelection, SchemaSource,
};

#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

#[derive(Subcommand, Debug)]
pub enum SchemaAction {
    /// Show which schema is in use
    Show,
    /// Use a custom schema (a path or URL)
    Use { url: String },
    /// Go back to the project's default schema
    Reset,
}

pub fn schema(args: SchemaArgs, workspace: &Workspace) -> Result<()> {
    let mut store = FileSettingsStore::new(workspace.config.settings_path(&workspace.cwd));

    match args.action {
        SchemaAction::Show => {
            let selection = SchemaSelection::load(&store);
            match active_schema_url(workspace, &selection) {
                Some(url) => {
                    let source = match selection.source_type {
                        SchemaSource::Custom => "custom",
                        SchemaSource::Default => "default",
                    };
                    println!("{} ({})", url, source.dimmed());
                }
                None => println!("{}", "No schema configured".yellow()),
            }
        }
        SchemaAction::Use { url } => {
            // Fail early instead of storing a schema that cannot be loaded
            provider(workspace).load_schema(&url)?;
            SchemaSelection::custom(url.clone()).save(&mut store)?;
            println!("{} Using schema {}", "✓".green(), url.bold());
        }
        SchemaAction::Reset => {
            SchemaSelection::clear(&mut store)?;
            println!("{} Using the default schema", "✓".green());
        }
    }

    Ok(())
}

/// The selected custom schema, else the config default
pub fn active_schema_url(workspace: &Workspace, selection: &SchemaSelection) -> Option<String> {
    let fallback = workspace.config.schema.as_deref().unwrap_or("");
    let url = selection.resolve_url(fallback);
    (!url.trim().is_empty()).then(|| url.to_string())
}

/// A schema provider resolving local paths against the working directory
pub fn provider(workspace: &Workspace) -> SchemaProvider {
    let loader = DefaultLoader::new(FileLoader::with_base_dir(&workspace.cwd));
    #[cfg(feature = "remote")]
    let loader = match formsync_schema::HttpLoader::new(std::time::Duration::from_secs(10)) {
        Ok(http) => loader.with_remote(http),
        Err(err) => {
            tracing::warn!(error = %err, "Remote schemas unavailable");
            loader
        }
    };
    SchemaProvider::new(loader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use formsync_schema::MemorySettingsStore;

    fn workspace(schema: Option<&str>) -> Workspace {
        Workspace {
            cwd: std::env::temp_dir(),
            config: Config {
                schema: schema.map(str::to_string),
                ..Config::default()
            },
        }
    }

    #[test]
    fn test_active_schema_url() {
        let mut store = MemorySettingsStore::new();
        let selection = SchemaSelection::load(&store);
        assert_eq!(active_schema_url(&workspace(None), &selection), None);
        assert_eq!(
            active_schema_url(&workspace(Some("schema.json")), &selection).as_deref(),
            Some("schema.json")
        );

        SchemaSelection::custom("custom.json").save(&mut store).unwrap();
        let selection = SchemaSelection::load(&store);
        assert_eq!(
            active_schema_url(&workspace(Some("schema.json")), &selection).as_deref(),
            Some("custom.json")
        );
    }
}
