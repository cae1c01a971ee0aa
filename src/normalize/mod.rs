//! Reshapes stored market documents into the canonical [`MarketView`].
//!
//! Each drifting field (promoter, location, schedule) has its own tagged
//! union of known stored layouts with a single `detect` function and one
//! decoder per layout. Normalization never fails: missing or malformed
//! values degrade to documented defaults, and only an absent record
//! yields `None`.

pub mod accessibility;
pub mod days;
pub mod fields;
pub mod location;
pub mod promoter;
pub mod schedule;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::trace;

use crate::config::NormalizerConfig;
use crate::metrics;
use crate::types::{MarketRecord, MarketType, MarketView};
use fields::{bool_field, id_string, present, str_field, string_field, string_list};
use location::LocationShape;
use promoter::PromoterShape;
use schedule::ScheduleShape;

/// Trait for turning stored market records into views
pub trait MarketNormalizer: Send + Sync {
    /// `None` when there is no record to normalize
    fn normalize(&self, record: &MarketRecord) -> Option<MarketView>;

    /// Get a human-readable name for this normalizer
    fn name(&self) -> &str;
}

/// The default normalizer, parameterized by the configured fallbacks
#[derive(Debug, Clone, Default)]
pub struct MarketViewNormalizer {
    config: NormalizerConfig,
}

impl MarketViewNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize every non-null record in order
    pub fn normalize_batch(&self, records: &[MarketRecord]) -> Vec<MarketView> {
        records.iter().filter_map(|r| self.normalize_record(r)).collect()
    }

    fn normalize_record(&self, record: &MarketRecord) -> Option<MarketView> {
        if record.is_null() {
            metrics::normalize::record_absent();
            return None;
        }
        metrics::normalize::record_normalized();

        let promoter_shape = PromoterShape::detect(present(record, "promoter"));
        let location_shape = LocationShape::detect(record.get("location"));
        let schedule_shape = ScheduleShape::detect(record.get("schedule"));
        trace!(
            promoter = promoter_shape.as_str(),
            location = location_shape.as_str(),
            schedule = schedule_shape.as_str(),
            "Detected market record layout"
        );
        metrics::normalize::promoter_shape(promoter_shape.as_str());
        metrics::normalize::location_shape(location_shape.as_str());
        metrics::normalize::schedule_shape(schedule_shape.as_str());

        let (promoter_id, promoter) = promoter_shape.decode();
        let location = location_shape.decode(&self.config);

        // The summary is built from the decoded entries, never from the raw schedule
        let resolved = schedule_shape.decode(&self.config);
        let dates = resolved.as_ref().map(schedule::summarize);
        let schedule = resolved.map(|r| r.entries).unwrap_or_default();

        let amenities = string_list(record, "amenities");
        let accessibility = accessibility::derive(&amenities);

        let created_by_type = string_field(record, "createdByType");
        let stats = present(record, "stats").cloned();

        Some(MarketView {
            id: record
                .get("_id")
                .and_then(id_string)
                .or_else(|| record.get("id").and_then(id_string))
                .unwrap_or_default(),
            name: string_field(record, "name"),
            description: string_field(record, "description"),
            short_description: string_field(record, "shortDescription"),
            category: string_field(record, "category"),
            subcategory: string_field(record, "subcategory"),
            status: string_field(record, "status"),
            is_public: bool_field(record, "isPublic"),
            promoter_id,
            promoter,
            location,
            dates,
            schedule,
            application_settings: present(record, "applicationSettings").cloned(),
            market_type: MarketType::from_created_by_type(created_by_type.as_deref()),
            created_by_type,
            images: image_urls(record),
            tags: string_list(record, "tags"),
            keywords: string_list(record, "keywords"),
            contact: present(record, "contact")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
            amenities,
            accessibility,
            statistics: stats
                .clone()
                .or_else(|| present(record, "statistics").cloned()),
            stats,
            vendor_count: present(record, "vendorCount").cloned(),
            created_at: present(record, "createdAt").cloned(),
            updated_at: present(record, "updatedAt").cloned(),
        })
    }
}

impl MarketNormalizer for MarketViewNormalizer {
    fn normalize(&self, record: &MarketRecord) -> Option<MarketView> {
        self.normalize_record(record)
    }

    fn name(&self) -> &str {
        "Market View Normalizer"
    }
}

/// Images are stored as bare URLs or as `{url, isHero}` objects
fn image_urls(record: &Value) -> Vec<String> {
    record
        .get("images")
        .and_then(Value::as_array)
        .map(|images| {
            images
                .iter()
                .filter_map(|img| img.as_str().or_else(|| str_field(img, "url")))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

static DEFAULT_NORMALIZER: Lazy<MarketViewNormalizer> = Lazy::new(MarketViewNormalizer::default);

/// Normalize with the built-in defaults
pub fn normalize(record: &MarketRecord) -> Option<MarketView> {
    DEFAULT_NORMALIZER.normalize_record(record)
}

/// Same as [`normalize`] for a record that may not exist at all
pub fn normalize_opt(record: Option<&MarketRecord>) -> Option<MarketView> {
    record.and_then(normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_record() {
        assert!(normalize(&Value::Null).is_none());
        assert!(normalize_opt(None).is_none());
    }

    #[test]
    fn test_identifier_forms() {
        assert_eq!(normalize(&json!({"_id": {"$oid": "abc"}})).unwrap().id, "abc");
        assert_eq!(normalize(&json!({"_id": "m1", "id": "other"})).unwrap().id, "m1");
        assert_eq!(normalize(&json!({"id": "m2"})).unwrap().id, "m2");
        assert_eq!(normalize(&json!({})).unwrap().id, "");
    }

    #[test]
    fn test_images_are_flattened() {
        let view = normalize(&json!({
            "images": [
                "https://img.example/a.jpg",
                {"url": "https://img.example/b.jpg", "isHero": true},
                {"isHero": false},
                7
            ]
        }))
        .unwrap();
        assert_eq!(
            view.images,
            vec!["https://img.example/a.jpg", "https://img.example/b.jpg"]
        );
    }

    #[test]
    fn test_statistics_prefers_stats() {
        let view = normalize(&json!({
            "stats": {"followers": 3},
            "statistics": {"totalTrackers": 9}
        }))
        .unwrap();
        assert_eq!(view.statistics, Some(json!({"followers": 3})));
        assert_eq!(view.stats, Some(json!({"followers": 3})));

        let view = normalize(&json!({"statistics": {"totalTrackers": 9}})).unwrap();
        assert_eq!(view.statistics, Some(json!({"totalTrackers": 9})));
        assert_eq!(view.stats, None);
    }

    #[test]
    fn test_collection_defaults() {
        let view = normalize(&json!({"name": "Riverside Market"})).unwrap();
        assert_eq!(view.name.as_deref(), Some("Riverside Market"));
        assert!(view.tags.is_empty());
        assert!(view.keywords.is_empty());
        assert!(view.amenities.is_empty());
        assert_eq!(view.contact, json!({}));
        assert!(view.schedule.is_empty());
        assert!(view.dates.is_none());
        assert_eq!(view.market_type, MarketType::PromoterManaged);
    }

    #[test]
    fn test_batch_skips_nulls() {
        let normalizer = MarketViewNormalizer::default();
        let records = vec![json!({"_id": "a"}), Value::Null, json!({"_id": "b"})];
        let views = normalizer.normalize_batch(&records);
        let ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let record = json!({
            "_id": "m1",
            "location": "1 A St, B Town, CA 90000",
            "schedule": {"daysOfWeek": ["monday"]}
        });
        let before = record.clone();
        let first = normalize(&record);
        let second = normalize(&record);
        assert_eq!(record, before);
        assert_eq!(first, second);
    }
}
