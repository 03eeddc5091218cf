use clap::Parser;
use color_eyre::Report;
use color_eyre::Result;
use console::style;
use nutrack_cli::Cli;
use std::process;
use tracing_subscriber::EnvFilter;

#[cfg(not(windows))]
use jemallocator::Jemalloc;
#[cfg(windows)]
use mimalloc::MiMalloc;

#[cfg(windows)]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("NUTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Err(error) = nutrack_cli::execute(cli) {
        handle_error(&error);
    }

    Ok(())
}

/// What went wrong, phrased for the terminal, with an optional next step.
#[derive(Debug, PartialEq, Eq)]
struct Diagnosis {
    title: &'static str,
    hint: Option<&'static str>,
}

fn diagnose(root_cause: &str) -> Diagnosis {
    let (title, hint) = if root_cause.contains("Diet item") && root_cause.contains("not found") {
        ("Diet item not found", Some("Check the item ids in your document"))
    } else if root_cause.contains("log entry") && root_cause.contains("not found") {
        (
            "Daily log entry not found",
            Some("Check the entry ids under daily_log in your document"),
        )
    } else if root_cause.contains("not found") {
        ("Resource not found", None)
    } else if root_cause.contains("Invalid quantity") {
        ("Invalid portion", None)
    } else if root_cause.contains("Invalid config") || root_cause.contains("YAML") {
        (
            "Configuration error",
            Some("Inspect the effective settings with: nutrack config show"),
        )
    } else if root_cause.contains("already exists") {
        ("Resource already exists", None)
    } else {
        ("Command failed", None)
    };
    Diagnosis { title, hint }
}

fn handle_error(error: &Report) -> ! {
    let root_cause = error.root_cause().to_string();
    let diagnosis = diagnose(&root_cause);

    eprintln!(
        "\n{} An error occurred while running nutrack\n",
        style("error:").red().bold().for_stderr()
    );
    eprintln!("  {} {}", style("•").red().for_stderr(), diagnosis.title);
    eprintln!("  {error}");
    if root_cause != error.to_string() {
        eprintln!("  {root_cause}");
    }
    if let Some(hint) = diagnosis.hint {
        eprintln!("\n  {} {hint}", style("Hint:").green().bold().for_stderr());
    }

    if std::env::var("RUST_BACKTRACE").is_ok() || std::env::var("NUTRACK_DEBUG").is_ok() {
        eprintln!("\n{}", style("=== Debug Information ===").yellow().for_stderr());
        eprintln!("{error:?}");
    } else {
        eprintln!(
            "\n  {} Run with RUST_BACKTRACE=1 for more details",
            style("Info:").cyan().for_stderr()
        );
    }
    eprintln!();

    process::exit(1);
}
