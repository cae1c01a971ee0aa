//! Counters for the normalizer, recorded through the `metrics` facade.
//!
//! Nothing here installs a recorder; without one every call is a no-op.

pub mod normalize {
    /// Record that a market record went through normalization
    pub fn record_normalized() {
        ::metrics::counter!("market_normalize_records_total").increment(1);
    }

    /// Record that an absent record was passed in
    pub fn record_absent() {
        ::metrics::counter!("market_normalize_absent_total").increment(1);
    }

    /// Record which stored location layout was detected
    pub fn location_shape(shape: &str) {
        ::metrics::counter!("market_normalize_location_shape_total", "shape" => shape.to_string())
            .increment(1);
    }

    /// Record which stored schedule layout was detected
    pub fn schedule_shape(shape: &str) {
        ::metrics::counter!("market_normalize_schedule_shape_total", "shape" => shape.to_string())
            .increment(1);
    }

    /// Record which promoter form was detected
    pub fn promoter_shape(shape: &str) {
        ::metrics::counter!("market_normalize_promoter_shape_total", "shape" => shape.to_string())
            .increment(1);
    }
}

pub mod validation {
    /// Record a batch of validation issues for one market
    pub fn issues_found(count: usize) {
        ::metrics::counter!("market_validation_issues_total").increment(count as u64);
    }
}
