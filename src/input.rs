use serde_json::Value;
use std::fs;
use std::io::Read;
use tracing::debug;

use crate::error::{MarketError, Result};
use crate::types::MarketRecord;

/// Read market records from a file path, or from stdin when `source` is `-`
pub fn read_records(source: &str) -> Result<Vec<MarketRecord>> {
    let content = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(source)?
    };

    parse_records(&content)
}

/// Parse a single JSON document, a JSON array of documents, or NDJSON.
///
/// A top-level array is flattened into its elements. Anything that is not a
/// single JSON document is read line by line, skipping blank lines.
pub fn parse_records(content: &str) -> Result<Vec<MarketRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(record) => Ok(vec![record]),
        Err(whole_document_error) => {
            debug!(error = %whole_document_error, "Input is not a single JSON document, trying NDJSON");
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(index, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        MarketError::InvalidInput(format!("line {}: {}", index + 1, e))
                    })
                })
                .collect()
        }
    }
}
