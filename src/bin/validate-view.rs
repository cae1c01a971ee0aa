use anyhow::{Context, Result};
use clap::Parser;
use market_tracker::error::MarketError;
use market_tracker::input::read_records;
use market_tracker::schema::validate_view_json;
use std::path::PathBuf;

/// Validate serialized market views against the MarketView v1 schema.
#[derive(Parser, Debug)]
#[command(name = "validate-view", version, about = "Validate market view JSON against schema")]
struct Cli {
    /// Path to a view, an array of views, or NDJSON views
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let source = args.path.to_string_lossy();

    let views = read_records(&source)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    let mut invalid = 0usize;
    for (index, view) in views.iter().enumerate() {
        match validate_view_json(view) {
            Ok(()) => {}
            Err(MarketError::Schema(errors)) => {
                invalid += 1;
                eprintln!("invalid view #{}:", index + 1);
                for error in errors {
                    eprintln!("- {}", error);
                }
            }
            Err(e) => return Err(e).context("Failed to run schema validation"),
        }
    }

    if invalid > 0 {
        std::process::exit(1)
    }
    println!("valid");
    Ok(())
}
