use crate::config::{ConfigArgs, handle_config};
use crate::replay::{ReplayArgs, handle_replay};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use nutrack_core::NutrackConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nutrack")]
#[command(about = "Diet planner with a bounded undo/redo editing history")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "NUTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scripted editing session against a document
    Replay(ReplayArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Execute the parsed command.
///
/// # Errors
///
/// This function will return an error if:
/// - The config location cannot be determined
/// - The config file is invalid
/// - The selected command fails
pub fn execute(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => NutrackConfig::default_path()?,
    };

    match cli.command {
        Commands::Replay(args) => {
            let config = NutrackConfig::load_or_default(&config_path)?;
            handle_replay(args, &config)
        }
        Commands::Config(args) => handle_config(args, &config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_replay_flags() {
        let cli = Cli::try_parse_from([
            "nutrack",
            "replay",
            "edits.yaml",
            "--document",
            "plan.json",
            "--locale",
            "en",
            "--max-history",
            "3",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.script, PathBuf::from("edits.yaml"));
                assert_eq!(args.document, Some(PathBuf::from("plan.json")));
                assert_eq!(args.locale, Some(nutrack_core::Locale::English));
                assert_eq!(args.max_history, Some(3));
                assert_eq!(args.format, crate::OutputFormat::Table);
            }
            Commands::Config(_) => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        let cli = Cli::try_parse_from(["nutrack", "replay", "edits.yaml", "--format", "json"])
            .unwrap_or_else(|e| panic!("{e}"));

        match cli.command {
            Commands::Replay(args) => assert_eq!(args.format, crate::OutputFormat::Json),
            Commands::Config(_) => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_format_before_running() {
        let result = Cli::try_parse_from([
            "nutrack",
            "replay",
            "edits.yaml",
            "--format",
            "yaml",
            "--output",
            "out.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_locale() {
        let result = Cli::try_parse_from(["nutrack", "replay", "edits.yaml", "--locale", "fr"]);
        assert!(result.is_err());
    }
}
