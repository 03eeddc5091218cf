use chrono::NaiveTime;
use clap::{Args, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use nutrack_core::{Document, Locale, NutrackConfig, PlannerSession};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ReplayArgs {
    /// YAML script with the edits to perform
    pub script: PathBuf,

    /// Document to edit (JSON); falls back to the configured document
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Write the edited document to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Undo capacity for this session (overrides config)
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Language for action descriptions (pt, en)
    #[arg(short, long)]
    pub locale: Option<Locale>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    DeleteItem {
        id: i64,
    },
    DeleteItems {
        ids: Vec<i64>,
    },
    MoveItem {
        id: i64,
        to: String,
        #[serde(default)]
        index: usize,
    },
    UpdatePortion {
        id: i64,
        quantity: f64,
    },
    UpdateTime {
        id: i64,
        #[serde(default)]
        time: Option<NaiveTime>,
    },
    DeleteLogEntry {
        id: i64,
    },
    ToggleConsumed {
        id: i64,
    },
    Undo,
    Redo,
    ClearHistory,
}

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    steps: Vec<String>,
    can_undo: bool,
    can_redo: bool,
    undo: Vec<String>,
    redo: Vec<String>,
    document: &'a Document,
}

impl ReplayScript {
    /// Parses a replay script from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a list of known steps.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).wrap_err("Invalid replay script")
    }

    /// Reads and parses a replay script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content)
    }
}

impl Step {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DeleteItem { .. } => "delete_item",
            Self::DeleteItems { .. } => "delete_items",
            Self::MoveItem { .. } => "move_item",
            Self::UpdatePortion { .. } => "update_portion",
            Self::UpdateTime { .. } => "update_time",
            Self::DeleteLogEntry { .. } => "delete_log_entry",
            Self::ToggleConsumed { .. } => "toggle_consumed",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ClearHistory => "clear_history",
        }
    }

    /// Runs the step and returns a one-line summary of what happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the session rejects the edit or cannot revert an
    /// action.
    pub fn apply(&self, session: &mut PlannerSession, locale: Locale) -> Result<String> {
        match self {
            Self::DeleteItem { id } => session.delete_diet_item(*id)?,
            Self::DeleteItems { ids } => session.delete_diet_items(ids)?,
            Self::MoveItem { id, to, index } => session.move_diet_item(*id, to, *index)?,
            Self::UpdatePortion { id, quantity } => session.update_portion(*id, *quantity)?,
            Self::UpdateTime { id, time } => session.update_time(*id, *time)?,
            Self::DeleteLogEntry { id } => session.delete_log_entry(*id)?,
            Self::ToggleConsumed { id } => session.toggle_consumed(*id)?,
            Self::Undo => {
                return Ok(session.undo()?.map_or_else(
                    || "undo: nothing to undo".to_string(),
                    |action| format!("undo: {}", action.describe(locale)),
                ));
            }
            Self::Redo => {
                return Ok(session.redo()?.map_or_else(
                    || "redo: nothing to redo".to_string(),
                    |action| format!("redo: {}", action.describe(locale)),
                ));
            }
            Self::ClearHistory => {
                session.clear_history();
                return Ok("history cleared".to_string());
            }
        }

        let description = session
            .history()
            .last_action()
            .map(|action| action.describe(locale))
            .unwrap_or_default();
        Ok(format!("{}: {description}", self.name()))
    }
}

/// Runs every step in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing step's error, tagged with its position and name.
pub fn run_script(session: &mut PlannerSession, script: &ReplayScript, locale: Locale) -> Result<Vec<String>> {
    script
        .steps
        .iter()
        .enumerate()
        .map(|(position, step)| {
            step.apply(session, locale)
                .wrap_err_with(|| format!("Step {} ({}) failed", position + 1, step.name()))
        })
        .collect()
}

/// Handle the `replay` command.
///
/// # Errors
///
/// This function will return an error if:
/// - No document is given and none is configured
/// - The document or script cannot be read or parsed
/// - The undo capacity is zero
/// - A step fails
/// - The output document cannot be written
pub fn handle_replay(args: ReplayArgs, config: &NutrackConfig) -> Result<()> {
    let document_path = args
        .document
        .or_else(|| config.document.clone())
        .ok_or_else(|| eyre!("No document given. Pass --document or set `document` in the config"))?;
    let locale = args.locale.unwrap_or(config.locale);
    let max_history = match args.max_history {
        Some(size) => NonZeroUsize::new(size).ok_or_else(|| eyre!("--max-history must be greater than zero"))?,
        None => config.max_stack_size()?,
    };

    let document = Document::load(&document_path)
        .wrap_err_with(|| format!("Failed to load document {}", document_path.display()))?;
    let script = ReplayScript::load(&args.script)?;

    let mut session = PlannerSession::with_max_history(document, max_history);
    tracing::info!(session = %session.id(), steps = script.steps.len(), "Replaying script");
    let steps = run_script(&mut session, &script, locale)?;

    match args.format {
        OutputFormat::Json => print_json(&session, steps, locale)?,
        OutputFormat::Table => print_tables(&session, &steps, locale),
    }

    if let Some(output) = args.output {
        session
            .document()
            .save(&output)
            .wrap_err_with(|| format!("Failed to write document {}", output.display()))?;
        println!("✅ Saved edited document to {}", style(output.display()).green());
    }

    Ok(())
}

fn print_json(session: &PlannerSession, steps: Vec<String>, locale: Locale) -> Result<()> {
    let history = session.history();
    let report = ReplayReport {
        steps,
        can_undo: history.can_undo(),
        can_redo: history.can_redo(),
        undo: history.undo_history().map(|action| action.describe(locale)).collect(),
        redo: history.redo_history().map(|action| action.describe(locale)).collect(),
        document: session.document(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect()
}

fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}

fn print_tables(session: &PlannerSession, steps: &[String], locale: Locale) {
    let document = session.document();

    println!("{}", style("Steps").cyan().bold());
    for (i, line) in steps.iter().enumerate() {
        println!("  {}. {line}", i + 1);
    }

    println!("\n{} {}", style("Diet:").cyan().bold(), document.diet.name);
    let mut diet = Table::new();
    diet.set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Meal", "Item", "Food", "Quantity (g)", "Time"]));
    for (meal_type, items) in document.diet.meals.iter() {
        for item in items {
            diet.add_row(vec![
                meal_type.to_string(),
                item.id.to_string(),
                item.food_label.clone(),
                format!("{:.1}", item.quantity),
                format_time(item.time),
            ]);
        }
    }
    println!("{diet}");

    println!("\n{} {}", style("Daily log:").cyan().bold(), document.daily_log.date);
    let mut log = Table::new();
    log.set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Meal", "Entry", "Food", "Quantity (g)", "Time", "Consumed"]));
    for (meal_type, entries) in document.daily_log.meals.iter() {
        for entry in entries {
            log.add_row(vec![
                Cell::new(meal_type),
                Cell::new(entry.id),
                Cell::new(document.food_label(entry.food_id)),
                Cell::new(format!("{:.1}", entry.quantity)),
                Cell::new(format_time(entry.time)),
                if entry.consumed {
                    Cell::new("yes").fg(Color::Green)
                } else {
                    Cell::new("no").fg(Color::DarkGrey)
                },
            ]);
        }
    }
    println!("{log}");

    let history = session.history();
    println!(
        "\n{} undo {}/{}, redo {}",
        style("History:").cyan().bold(),
        style(history.undo_stack_size()).green().bold(),
        history.max_stack_size(),
        style(history.redo_stack_size()).yellow().bold()
    );
    let mut stacks = Table::new();
    stacks
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Stack", "#", "Action"]));
    for (i, action) in history.undo_history().enumerate() {
        stacks.add_row(vec!["undo".to_string(), (i + 1).to_string(), action.describe(locale)]);
    }
    for (i, action) in history.redo_history().enumerate() {
        stacks.add_row(vec!["redo".to_string(), (i + 1).to_string(), action.describe(locale)]);
    }
    println!("{stacks}");
}
