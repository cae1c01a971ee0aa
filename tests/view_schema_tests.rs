use jsonschema::JSONSchema;
use market_tracker::normalize;
use market_tracker::schema::{validate_view, MARKET_VIEW_SCHEMA};
use serde_json::json;

fn compiled() -> JSONSchema {
    let schema_json: serde_json::Value = serde_json::from_str(MARKET_VIEW_SCHEMA).unwrap();
    let schema_static: &'static serde_json::Value = Box::leak(Box::new(schema_json));
    JSONSchema::options().compile(schema_static).unwrap()
}

fn example_view() -> serde_json::Value {
    serde_json::from_str(include_str!("resources/market_view.json")).unwrap()
}

#[test]
fn example_view_is_valid() {
    assert!(compiled().is_valid(&example_view()));
}

#[test]
fn example_view_deserializes() {
    let view: market_tracker::MarketView = serde_json::from_value(example_view()).unwrap();
    assert_eq!(view.schedule.len(), 2);
    validate_view(&view).unwrap();
}

#[test]
fn normalized_legacy_shapes_are_valid() {
    let compiled = compiled();
    let records = [
        json!({"_id": "a", "location": "1 Oak Ave, Fresno, CA 93701", "schedule": {"dayOfWeek": "sunday"}}),
        json!({"_id": "b", "location": {"address": {"street": "2 Pine Rd"}}, "schedule": [{"dayOfWeek": "friday"}]}),
        json!({"_id": "c", "location": {"city": "Boise", "state": "ID", "coordinates": {"latitude": 43.6, "longitude": -116.2}}}),
        json!({"_id": "d", "promoter": {"id": "p1"}, "schedule": {"daysOfWeek": ["wednesday"], "specialDates": [{"date": "2025-12-20"}]}}),
    ];

    for record in records {
        let view = normalize(&record).unwrap();
        let instance = serde_json::to_value(&view).unwrap();
        assert!(compiled.is_valid(&instance), "view for {} should be valid", view.id);
    }
}

#[test]
fn unknown_market_type_is_rejected() {
    let mut invalid = example_view();
    invalid["marketType"] = json!("pop-up");

    assert!(!compiled().is_valid(&invalid), "marketType enum should fail");
}

#[test]
fn null_location_string_is_rejected() {
    let mut invalid = example_view();
    invalid["location"]["city"] = json!(null);

    assert!(!compiled().is_valid(&invalid), "location strings are never null");
}

#[test]
fn unknown_day_name_in_summary_is_rejected() {
    let mut invalid = example_view();
    invalid["dates"]["daysOfWeek"] = json!(["funday"]);

    assert!(!compiled().is_valid(&invalid));
}
