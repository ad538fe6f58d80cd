use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use finmate_core::RawRow;
use finmate_ingest::{StatementNormalizer, parallel_totals};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

mod chat;
mod config;
mod llm;
mod report;
mod state;

use chat::SessionEnd;

#[derive(Parser, Debug)]
#[command(
    name = "finmate",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINMATE_BUILD_SHA"), ")"),
    about = "Normalize bank-statement rows into signed transactions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a JSON array of statement rows and print totals
    Analyze {
        /// JSON file: [{"date", "description", "withdrawal", "deposit", "balance"}, ...]
        #[arg(long)]
        rows: PathBuf,

        /// Emit a machine-readable JSON report
        #[arg(long)]
        json: bool,

        /// Print the per-row decision trace before the report
        #[arg(long)]
        explain: bool,

        /// Process rows on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Run the built-in three-row reference statement
    Demo,

    /// Show how date strings resolve
    ResolveDate {
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// List supported date formats in priority order
    Formats,

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Interactive finance-only assistant chat
    Chat,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.finmate/config.toml with defaults (if missing)
    Init,
    /// Print the effective configuration
    Show,
}

fn init_logging(level: &str) -> Result<()> {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Analyze {
            rows,
            json,
            explain,
            parallel,
        } => {
            analyze(&rows, json, explain, parallel)?;
        }

        Command::Demo => {
            demo()?;
        }

        Command::ResolveDate { inputs } => {
            let normalizer = StatementNormalizer::new()?;
            for input in &inputs {
                match normalizer.resolver().resolve_with_format(input) {
                    Some((date, f)) => println!("'{input}' -> {date} via {} ({})", f.pattern(), f.name()),
                    None => println!("'{input}' -> unparseable"),
                }
            }
        }

        Command::Formats => {
            let normalizer = StatementNormalizer::new()?;
            let sample = NaiveDate::from_ymd_opt(2025, 1, 13).context("sample date")?;
            for (i, f) in normalizer.resolver().formats().iter().enumerate() {
                println!("{:>2}. {:<12} {:<20} e.g. {}", i + 1, f.pattern(), f.name(), f.format(sample));
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Chat => {
            let cfg = config::load_config()?;
            let llm_cfg = llm::LlmConfig::from_config(&cfg)?;
            let mut conversation = llm::GeminiConversation::new(llm_cfg);

            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let end = chat::run_session(&mut conversation, stdin.lock(), &mut stdout)?;
            if end == SessionEnd::Failed {
                warn!("chat session ended after an error");
            }
            info!(turns = conversation.history().len(), ?end, "chat session closed");
        }
    }

    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        bail!("rows file not found: {}", path.display());
    }
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse rows from {}", path.display()))
}

fn analyze(path: &Path, json: bool, explain: bool, parallel: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let rows = read_rows(path)?;
    info!(rows = rows.len(), path = %path.display(), "loaded statement rows");

    let normalizer = StatementNormalizer::new()?;
    let (statement, totals) = if parallel {
        let statement = normalizer.normalize_rows_parallel(&rows);
        let totals = parallel_totals(&statement.transactions);
        (statement, totals)
    } else {
        let statement = normalizer.normalize_rows(&rows);
        let totals = statement.totals();
        (statement, totals)
    };

    if explain {
        print!("{}", report::render_traces(&normalizer.trace_rows(&rows)));
    }

    if json {
        let out = serde_json::to_string_pretty(&report::json_report(&statement, totals))
            .context("serialize report")?;
        println!("{out}");
    } else {
        print!("{}", report::render_text(&statement, totals, &cfg.report.currency_symbol));
    }
    Ok(())
}

fn reference_rows() -> Vec<RawRow> {
    vec![
        RawRow::new("01-Jan-25", "OPENING BALANCE", 0, 0, 10000),
        RawRow::new("01-Jan-25", "SALARY CRED", 0, 75000, 85000),
        RawRow::new("02-Jan-25", "MakeMyTrip", 734, 0, 84266),
    ]
}

fn demo() -> Result<()> {
    let cfg = config::load_config()?;
    let symbol = &cfg.report.currency_symbol;
    let rows = reference_rows();
    let normalizer = StatementNormalizer::new()?;

    println!("Reference statement: {} rows\n", rows.len());
    print!("{}", report::render_traces(&normalizer.trace_rows(&rows)));

    let statement = normalizer.normalize_rows(&rows);
    print!("{}", report::render_text(&statement, statement.totals(), symbol));

    println!("\nExpected:");
    println!("- 2 transactions (OPENING BALANCE excluded as zero_amount)");
    println!("- SALARY CRED: +{symbol}75000 (income)");
    println!("- MakeMyTrip: -{symbol}734 (expense)");
    println!("- Net savings: {symbol}74266");
    Ok(())
}
