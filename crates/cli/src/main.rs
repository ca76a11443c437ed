mod error;
mod render;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::{ReceiptDraft, compute, validate};

use crate::error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "scontrino")]
#[command(about = "Splits a scanned receipt among the people who shared it")]
struct Cli {
    /// Optional config file path (TOML, also read from `SCONTRINO_CONFIG`).
    #[arg(long, env = "SCONTRINO_CONFIG")]
    config: Option<String>,
    /// Log level override (trace|debug|info|warn|error).
    #[arg(long)]
    level: Option<String>,
    /// Currency for drafts that do not carry one.
    #[arg(long)]
    currency: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report everything the split would warn about, without splitting.
    Check(CheckArgs),
    /// Split the receipt and render the per-person breakdown.
    Split(SplitArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Draft JSON file.
    file: PathBuf,
    /// Merge items from a CSV export before checking.
    #[arg(long)]
    items_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Draft JSON file.
    file: PathBuf,
    /// Merge items from a CSV export before splitting.
    #[arg(long)]
    items_csv: Option<PathBuf>,
    /// Output format (table|json).
    #[arg(long)]
    format: Option<String>,
    /// Write the rendering to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let mut settings = match settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    if let Some(level) = cli.level {
        settings.level = level;
    }
    if let Some(currency) = cli.currency {
        settings.currency = currency;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "scontrino={level},engine={level},importers={level}",
            level = settings.level
        ))
        .init();

    if let Err(err) = run(cli.command, &settings) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command, settings: &settings::Settings) -> Result<()> {
    match command {
        Command::Check(args) => check(&args, settings),
        Command::Split(args) => split(&args, settings),
    }
}

fn check(args: &CheckArgs, settings: &settings::Settings) -> Result<()> {
    let (draft, skipped) = load_draft(&args.file, args.items_csv.as_deref(), settings)?;
    let warnings = validate(&draft);
    let result = compute(&draft);

    let report = render::warnings_report(&skipped, &warnings, &result.warnings);
    if report.is_empty() {
        println!("draft is clean");
        return Ok(());
    }
    for line in report {
        println!("warning: {line}");
    }
    Ok(())
}

fn split(args: &SplitArgs, settings: &settings::Settings) -> Result<()> {
    let (draft, skipped) = load_draft(&args.file, args.items_csv.as_deref(), settings)?;
    let warnings = validate(&draft);
    let result = compute(&draft);

    for line in render::warnings_report(&skipped, &warnings, &result.warnings) {
        eprintln!("warning: {line}");
    }

    let format = args.format.as_deref().unwrap_or(&settings.format);
    let rendering = match format {
        "table" => render::table(&draft, &result),
        "json" => {
            let mut json = serde_json::to_string_pretty(&result)?;
            json.push('\n');
            json
        }
        other => return Err(CliError::UnsupportedFormat(other.to_string())),
    };

    match &args.output {
        Some(path) => fs::write(path, rendering)?,
        None => print!("{rendering}"),
    }
    Ok(())
}

fn load_draft(
    file: &Path,
    items_csv: Option<&Path>,
    settings: &settings::Settings,
) -> Result<(ReceiptDraft, Vec<String>)> {
    tracing::debug!("reading draft from {}", file.display());
    let source = fs::read_to_string(file)?;
    let mut draft = importers::draft_from_json(&source, &settings.currency)?;

    let mut skipped = Vec::new();
    if let Some(path) = items_csv {
        tracing::debug!("merging items from {}", path.display());
        let parsed = importers::items_from_csv(fs::File::open(path)?, &draft.people)?;
        tracing::info!(
            "imported {} items from csv ({} rows skipped)",
            parsed.items.len(),
            parsed.skipped.len()
        );
        draft.items.extend(parsed.items);
        skipped = parsed.skipped;
    }

    Ok((draft, skipped))
}
