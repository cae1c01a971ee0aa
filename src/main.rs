use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use market_tracker::config::Config;
use market_tracker::input::read_records;
use market_tracker::lifecycle::{next_market_date, ApplicationStatus, MarketStatus};
use market_tracker::logging;
use market_tracker::normalize::{MarketNormalizer, MarketViewNormalizer};
use market_tracker::schema;
use market_tracker::validation::validate_normalized;

#[derive(Parser)]
#[command(name = "market_tracker")]
#[command(about = "Normalize and check stored community market records")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to $MARKET_TRACKER_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape stored market records into frontend market views
    Normalize {
        /// JSON, JSON array or NDJSON file with market records ("-" for stdin)
        input: String,
        /// Write the views here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Report missing or malformed market data
    Validate {
        /// JSON, JSON array or NDJSON file with market records ("-" for stdin)
        input: String,
    },
    /// Print the next date each market is open
    NextDate {
        /// JSON, JSON array or NDJSON file with market records ("-" for stdin)
        input: String,
        /// Reference day (YYYY-MM-DD), defaults to today in UTC
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Check whether a status change is allowed
    Transition {
        #[arg(long, value_enum)]
        kind: StatusKind,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusKind {
    Market,
    Application,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = logging::init_logging(&config.logging);

    let normalizer = MarketViewNormalizer::new(config.normalizer.clone());

    match cli.command {
        Commands::Normalize {
            input,
            output,
            pretty,
        } => {
            let records = read_records(&input).with_context(|| format!("Failed to read {}", input))?;
            let views = normalizer.normalize_batch(&records);
            info!(
                records = records.len(),
                views = views.len(),
                "Normalized market records"
            );

            let rendered = if pretty {
                serde_json::to_string_pretty(&views)?
            } else {
                serde_json::to_string(&views)?
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Wrote market views");
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Validate { input } => {
            let records = read_records(&input).with_context(|| format!("Failed to read {}", input))?;
            let mut failing = 0usize;

            for (index, record) in records.iter().enumerate() {
                if record.is_null() {
                    continue;
                }
                let label = record_label(record, index);
                let view = normalizer.normalize(record);
                let mut problems: Vec<String> = validate_normalized(record, view.as_ref())
                    .into_iter()
                    .map(|issue| format!("{}: {}", issue.field, issue))
                    .collect();

                if let Some(view) = &view {
                    if let Err(e) = schema::validate_view(view) {
                        problems.push(format!("view: {}", e));
                    }
                }

                if problems.is_empty() {
                    println!("{}: valid", label);
                } else {
                    failing += 1;
                    eprintln!("{}: invalid", label);
                    for problem in problems {
                        eprintln!("- {}", problem);
                    }
                }
            }

            if failing > 0 {
                warn!(failing, total = records.len(), "Markets failed validation");
                std::process::exit(1);
            }
        }
        Commands::NextDate { input, today } => {
            let records = read_records(&input).with_context(|| format!("Failed to read {}", input))?;
            let today = today.unwrap_or_else(|| Utc::now().date_naive());

            for (index, record) in records.iter().enumerate() {
                let Some(view) = normalizer.normalize(record) else {
                    continue;
                };
                let label = record_label(record, index);
                match next_market_date(&view, today) {
                    Some(date) => println!("{}\t{}", label, date),
                    None => println!("{}\tnone", label),
                }
            }
        }
        Commands::Transition { kind, from, to } => {
            let allowed = match kind {
                StatusKind::Market => {
                    let from: MarketStatus = from.parse()?;
                    let to: MarketStatus = to.parse()?;
                    from.can_transition_to(to)
                }
                StatusKind::Application => {
                    let from: ApplicationStatus = from.parse()?;
                    let to: ApplicationStatus = to.parse()?;
                    from.can_transition_to(to)
                }
            };

            if allowed {
                println!("allowed");
            } else {
                println!("not allowed");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Stored id when present, otherwise the record's position in the input
fn record_label(record: &serde_json::Value, index: usize) -> String {
    record
        .get("_id")
        .and_then(market_tracker::normalize::fields::id_string)
        .unwrap_or_else(|| format!("#{}", index + 1))
}
