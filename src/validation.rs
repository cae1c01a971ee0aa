use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::metrics;
use crate::normalize::fields::{present, str_field};
use crate::normalize::{MarketNormalizer, MarketViewNormalizer};
use crate::types::{DatesType, MarketView};

static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time-of-day pattern is valid")
});

/// A single completeness problem found in a market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{} is required", field),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check a stored or submitted market for missing data.
///
/// Location and schedule checks run against the normalized view so every
/// stored layout is judged the same way.
pub fn validate_market(normalizer: &MarketViewNormalizer, record: &Value) -> Vec<ValidationIssue> {
    let view = normalizer.normalize(record);
    validate_normalized(record, view.as_ref())
}

/// Same checks as [`validate_market`] for callers that already hold the
/// view normalized from `record`
pub fn validate_normalized(record: &Value, view: Option<&MarketView>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in ["name", "description", "category"] {
        if str_field(record, field).is_none() {
            issues.push(ValidationIssue::required(field));
        }
    }
    if present(record, "location").is_none() {
        issues.push(ValidationIssue::required("location"));
    }

    let Some(view) = view else {
        return issues;
    };

    if present(record, "location").is_some() {
        let location = &view.location;
        let location_fields = [
            ("location.street", &location.address),
            ("location.city", &location.city),
            ("location.state", &location.state),
            ("location.zipCode", &location.zip_code),
        ];
        for (field, value) in location_fields {
            if value.is_empty() {
                issues.push(ValidationIssue::required(field));
            }
        }
    }

    let recurring = view
        .dates
        .as_ref()
        .is_some_and(|d| d.kind == DatesType::Recurring);
    if recurring {
        if view.schedule.is_empty() {
            issues.push(ValidationIssue {
                field: "schedule.daysOfWeek".to_string(),
                message: "daysOfWeek is required for recurring markets".to_string(),
            });
        }
        if view.schedule.iter().any(|e| e.start_time.is_none() || e.end_time.is_none()) {
            issues.push(ValidationIssue {
                field: "schedule.startTime".to_string(),
                message: "startTime and endTime are required for recurring markets".to_string(),
            });
        }
    }

    for (index, entry) in view.schedule.iter().enumerate() {
        let times = [("startTime", &entry.start_time), ("endTime", &entry.end_time)];
        for (name, time) in times {
            if let Some(time) = time {
                if !TIME_OF_DAY.is_match(time) {
                    issues.push(ValidationIssue {
                        field: format!("schedule[{}].{}", index, name),
                        message: format!("{} must use HH:mm format, got '{}'", name, time),
                    });
                }
            }
        }
    }

    if !issues.is_empty() {
        metrics::validation::issues_found(issues.len());
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(record: &Value) -> Vec<ValidationIssue> {
        validate_market(&MarketViewNormalizer::default(), record)
    }

    fn fields(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn test_complete_market_has_no_issues() {
        let record = json!({
            "name": "Harbor Market",
            "description": "Produce and crafts by the water",
            "category": "farmers-market",
            "location": "12 Wharf Rd, Bayview, ME 04101",
            "schedule": {
                "daysOfWeek": ["saturday"],
                "startTime": "08:00",
                "endTime": "12:30",
                "recurring": true
            }
        });

        assert!(validate(&record).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let issues = validate(&json!({"name": ""}));
        assert_eq!(fields(&issues), vec!["name", "description", "category", "location"]);
        assert_eq!(issues[0].message, "name is required");
    }

    #[test]
    fn test_incomplete_location() {
        let record = json!({
            "name": "n", "description": "d", "category": "c",
            "location": {"city": "Tulsa", "state": "OK"}
        });
        let issues = validate(&record);
        assert_eq!(fields(&issues), vec!["location.street", "location.zipCode"]);
    }

    #[test]
    fn test_recurring_schedule_requirements() {
        let record = json!({
            "name": "n", "description": "d", "category": "c",
            "location": "1 A St, B, CA 90000",
            "schedule": {"daysOfWeek": [], "recurring": true}
        });
        let issues = validate(&record);
        assert_eq!(fields(&issues), vec!["schedule.daysOfWeek"]);

        let record = json!({
            "name": "n", "description": "d", "category": "c",
            "location": "1 A St, B, CA 90000",
            "schedule": [{"dayOfWeek": 6, "startTime": "08:00"}]
        });
        let issues = validate(&record);
        assert_eq!(fields(&issues), vec!["schedule.startTime"]);
    }

    #[test]
    fn test_validate_normalized_judges_the_given_view() {
        let record = json!({
            "name": "n", "description": "d", "category": "c",
            "location": "1 A St, B, CA 90000"
        });
        let normalizer = MarketViewNormalizer::default();
        let mut view = normalizer.normalize(&record).unwrap();
        assert_eq!(validate_normalized(&record, Some(&view)), validate(&record));

        view.location.zip_code.clear();
        let issues = validate_normalized(&record, Some(&view));
        assert_eq!(fields(&issues), vec!["location.zipCode"]);

        assert!(validate_normalized(&record, None).is_empty());
    }

    #[test]
    fn test_time_format() {
        let record = json!({
            "name": "n", "description": "d", "category": "c",
            "location": "1 A St, B, CA 90000",
            "schedule": [{"dayOfWeek": 0, "startTime": "8am", "endTime": "24:00"}]
        });
        let issues = validate(&record);
        assert_eq!(fields(&issues), vec!["schedule[0].startTime", "schedule[0].endTime"]);
    }
}
