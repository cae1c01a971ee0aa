pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod schema;
pub mod types;
pub mod validation;

pub use normalize::{normalize, normalize_opt, MarketNormalizer, MarketViewNormalizer};
pub use types::{MarketRecord, MarketView};
