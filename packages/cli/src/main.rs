mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, convert, defaults, locate, outline, resolve, schema, CheckArgs, ConvertArgs,
    DefaultsArgs, LocateArgs, OutlineArgs, ResolveArgs, SchemaArgs, Workspace,
};
use tracing_subscriber::EnvFilter;

/// formsync - keep structured and flow config documents in step with their fields
#[derive(Parser, Debug)]
#[command(name = "formsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse documents and validate them against the active schema
    Check(CheckArgs),

    /// Convert a document to the other format
    Convert(ConvertArgs),

    /// Print the line and column where a field is declared
    Locate(LocateArgs),

    /// Print the field under a line and column
    Resolve(ResolveArgs),

    /// List every field with its line
    Outline(OutlineArgs),

    /// Generate a document from schema defaults
    Defaults(DefaultsArgs),

    /// Choose the schema documents are validated against
    Schema(SchemaArgs),
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;
    let workspace = Workspace::load(cwd)?;

    match cli.command {
        Command::Check(args) => return check(args, &workspace),
        Command::Convert(args) => convert(args, &workspace)?,
        Command::Locate(args) => locate(args, &workspace)?,
        Command::Resolve(args) => resolve(args, &workspace)?,
        Command::Outline(args) => outline(args, &workspace)?,
        Command::Defaults(args) => defaults(args, &workspace)?,
        Command::Schema(args) => schema(args, &workspace)?,
    }
    Ok(true)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!();
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            eprintln!();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from(["formsync", "locate", "app.yaml", "servers[0].host"]);
        match cli.command {
            Command::Locate(args) => assert_eq!(args.path, "servers[0].host"),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["formsync", "convert", "app.yaml", "--to", "json"]);
        match cli.command {
            Command::Convert(args) => assert_eq!(args.to, Some(formsync_codec::Format::Flow)),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
