//! JSON Schema check for the serialized [`MarketView`] contract.

use jsonschema::JSONSchema;
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::{MarketError, Result};
use crate::types::MarketView;

pub const MARKET_VIEW_SCHEMA: &str = include_str!("../schemas/market_view.v1.json");

static SCHEMA_JSON: OnceCell<Value> = OnceCell::new();
static COMPILED: OnceCell<JSONSchema> = OnceCell::new();

fn compiled() -> Result<&'static JSONSchema> {
    COMPILED.get_or_try_init(|| {
        let schema: &'static Value =
            SCHEMA_JSON.get_or_try_init(|| serde_json::from_str(MARKET_VIEW_SCHEMA))?;
        JSONSchema::options()
            .compile(schema)
            .map_err(|e| MarketError::Schema(vec![format!("Failed to compile schema: {}", e)]))
    })
}

/// Validate an already-serialized view, collecting every violation
pub fn validate_view_json(instance: &Value) -> Result<()> {
    let schema = compiled()?;
    schema.validate(instance).map_err(|errors| {
        MarketError::Schema(
            errors
                .map(|error| format!("{} at {}", error, error.instance_path))
                .collect(),
        )
    })
}

pub fn validate_view(view: &MarketView) -> Result<()> {
    let instance = serde_json::to_value(view)?;
    validate_view_json(&instance)
}
