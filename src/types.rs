use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A market exactly as the document store hands it over. Its shape has
/// drifted across several schema versions, so it stays untyped until
/// normalization.
pub type MarketRecord = Value;

/// The canonical, frontend-facing shape of a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketView {
    pub id: String,

    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub status: Option<String>,
    pub is_public: Option<bool>,

    pub promoter_id: Option<String>,
    pub promoter: Option<PromoterView>,

    pub location: LocationView,

    /// Summary of the schedule, kept for older frontend screens
    pub dates: Option<DatesSummary>,
    pub schedule: Vec<ScheduleEntry>,

    pub application_settings: Option<Value>,

    pub market_type: MarketType,
    pub created_by_type: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    pub contact: Value,
    pub amenities: Vec<String>,
    pub accessibility: AccessibilityFeatures,

    pub statistics: Option<Value>,
    pub stats: Option<Value>,
    pub vendor_count: Option<Value>,

    pub created_at: Option<Value>,
    pub updated_at: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoterView {
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Flat location. The four address strings are never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub formatted_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Raw coordinates from the record, untouched (GeoJSON `[lng, lat]` or an object)
    pub coordinates: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: u8,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatesSummary {
    #[serde(rename = "type")]
    pub kind: DatesType,
    pub recurring: bool,
    pub days_of_week: Vec<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub events: Vec<DateEvent>,
    pub season_start: Option<String>,
    pub season_end: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatesType {
    Recurring,
    OneTime,
}

/// A single dated occurrence, e.g. a special date outside the weekly rhythm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEvent {
    pub start_date: String,
    pub end_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityFeatures {
    pub wheelchair_accessible: bool,
    pub parking_available: bool,
    pub restrooms_available: bool,
    pub family_friendly: bool,
    pub pet_friendly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketType {
    VendorCreated,
    PromoterManaged,
}

impl MarketType {
    pub fn from_created_by_type(created_by_type: Option<&str>) -> Self {
        if created_by_type == Some(crate::constants::CREATED_BY_VENDOR) {
            MarketType::VendorCreated
        } else {
            MarketType::PromoterManaged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_market_type_only_looks_at_vendor() {
        assert_eq!(MarketType::from_created_by_type(Some("vendor")), MarketType::VendorCreated);
        assert_eq!(MarketType::from_created_by_type(Some("promoter")), MarketType::PromoterManaged);
        assert_eq!(MarketType::from_created_by_type(Some("Vendor")), MarketType::PromoterManaged);
        assert_eq!(MarketType::from_created_by_type(None), MarketType::PromoterManaged);
    }

    #[test]
    fn test_schedule_entry_uses_frontend_field_names() {
        let entry = ScheduleEntry {
            id: "1".to_string(),
            day_of_week: 6,
            start_time: Some("08:00".to_string()),
            end_time: None,
            start_date: "2024-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            is_recurring: true,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["dayOfWeek"], json!(6));
        assert_eq!(value["isRecurring"], json!(true));
        assert_eq!(value["endTime"], Value::Null);
    }

    #[test]
    fn test_dates_type_serializes_as_kebab_case() {
        assert_eq!(serde_json::to_value(DatesType::OneTime).unwrap(), json!("one-time"));
        assert_eq!(serde_json::to_value(MarketType::PromoterManaged).unwrap(), json!("promoter-managed"));
    }
}
