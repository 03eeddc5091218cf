use clap::{Args, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use console::style;
use nutrack_core::NutrackConfig;
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

/// Handle config-related commands.
///
/// # Errors
///
/// This function will return an error if:
/// - The existing config file cannot be read or is invalid
/// - `init` would overwrite a file without `--force`
/// - The config file cannot be written
pub fn handle_config(args: ConfigArgs, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = NutrackConfig::load_or_default(path)
                .wrap_err_with(|| format!("Failed to load config {}", path.display()))?;
            println!("{} {}", style("Config:").cyan().bold(), path.display());
            if !path.exists() {
                println!("{}", style("(file not found, showing defaults)").dim());
            }
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(eyre!(
                    "Config already exists at {}. Use --force to overwrite",
                    path.display()
                ));
            }
            NutrackConfig::default().save(path)?;
            println!("✅ Wrote default config to {}", style(path.display()).green());
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nutrack").join("config.yaml");

        handle_config(
            ConfigArgs {
                command: ConfigCommands::Init { force: false },
            },
            &path,
        )
        .unwrap();

        assert_eq!(NutrackConfig::load(&path).unwrap(), NutrackConfig::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "max_history: 3\n").unwrap();

        let result = handle_config(
            ConfigArgs {
                command: ConfigCommands::Init { force: false },
            },
            &path,
        );
        assert!(result.unwrap_err().to_string().contains("already exists"));

        handle_config(
            ConfigArgs {
                command: ConfigCommands::Init { force: true },
            },
            &path,
        )
        .unwrap();
        assert_eq!(NutrackConfig::load(&path).unwrap().max_history, 10);
    }

    #[test]
    fn test_show_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "max_history: 0\n").unwrap();

        let result = handle_config(
            ConfigArgs {
                command: ConfigCommands::Show,
            },
            &path,
        );
        assert!(result.is_err());
    }
}
