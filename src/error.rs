use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown {kind} status: {value}")]
    UnknownStatus { kind: &'static str, value: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Schema validation failed: {}", .0.join("; "))]
    Schema(Vec<String>),
}

pub type Result<T> = std::result::Result<T, MarketError>;
