use serde_json::Value;

use super::fields::{number_field, present, str_field};
use crate::config::NormalizerConfig;
use crate::types::LocationView;

/// The three stored location layouts, in detection priority order
#[derive(Debug, Clone, PartialEq)]
pub enum LocationShape<'a> {
    /// `{address, city, state, zipCode, country, coordinates}`
    Flat(&'a Value),
    /// `"street, city, STATE ZIP"`, either as the whole location or as its `address` field
    FormattedString {
        location: Option<&'a Value>,
        text: &'a str,
    },
    /// `{address: {street, city, state, zipCode, country}}`, also the catch-all
    NestedAddress(Option<&'a Value>),
}

impl<'a> LocationShape<'a> {
    pub fn detect(location: Option<&'a Value>) -> Self {
        let location = location.filter(|v| !v.is_null());

        if let Some(loc) = location {
            if str_field(loc, "city").is_some() && str_field(loc, "state").is_some() {
                return LocationShape::Flat(loc);
            }

            let candidate = loc
                .as_str()
                .or_else(|| loc.get("address").and_then(Value::as_str));
            if let Some(text) = candidate {
                if text.matches(',').count() >= 2 {
                    return LocationShape::FormattedString {
                        location: loc.is_object().then_some(loc),
                        text,
                    };
                }
            }
        }

        LocationShape::NestedAddress(location)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationShape::Flat(_) => "flat",
            LocationShape::FormattedString { .. } => "formatted_string",
            LocationShape::NestedAddress(_) => "nested_address",
        }
    }

    pub fn decode(&self, config: &NormalizerConfig) -> LocationView {
        match self {
            LocationShape::Flat(loc) => decode_flat(loc, config),
            LocationShape::FormattedString { location, text } => {
                decode_formatted(*location, text, config)
            }
            LocationShape::NestedAddress(location) => decode_nested(*location, config),
        }
    }
}

fn decode_flat(loc: &Value, config: &NormalizerConfig) -> LocationView {
    let (latitude, longitude, coordinates) = coordinates_of(Some(loc));

    LocationView {
        address: str_field(loc, "address")
            .or_else(|| loc.get("address").and_then(|a| str_field(a, "street")))
            .or_else(|| str_field(loc, "street"))
            .unwrap_or_default()
            .to_string(),
        city: str_field(loc, "city").unwrap_or_default().to_string(),
        state: str_field(loc, "state").unwrap_or_default().to_string(),
        zip_code: str_field(loc, "zipCode")
            .or_else(|| str_field(loc, "zip"))
            .unwrap_or_default()
            .to_string(),
        country: country_or_default(str_field(loc, "country"), config),
        formatted_address: str_field(loc, "formattedAddress")
            .unwrap_or_default()
            .to_string(),
        latitude,
        longitude,
        coordinates,
    }
}

/// Positional parse: part 0 street, part 1 city, part 2 "STATE ZIP".
/// The state token is not checked against a list of state codes.
fn decode_formatted(loc: Option<&Value>, text: &str, config: &NormalizerConfig) -> LocationView {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let mut state_zip = parts.get(2).copied().unwrap_or_default().split_whitespace();
    let state = state_zip.next().unwrap_or_default().to_string();
    let zip_code = state_zip.collect::<Vec<_>>().join(" ");

    let (latitude, longitude, coordinates) = coordinates_of(loc);

    LocationView {
        address: parts.first().copied().unwrap_or_default().to_string(),
        city: parts.get(1).copied().unwrap_or_default().to_string(),
        state,
        zip_code,
        country: country_or_default(loc.and_then(|l| str_field(l, "country")), config),
        formatted_address: loc
            .and_then(|l| str_field(l, "formattedAddress"))
            .unwrap_or(text)
            .to_string(),
        latitude,
        longitude,
        coordinates,
    }
}

/// Nested `address` object first, flat siblings second
fn decode_nested(loc: Option<&Value>, config: &NormalizerConfig) -> LocationView {
    let nested = loc.and_then(|l| l.get("address")).filter(|a| a.is_object());
    let field = |nested_keys: &[&str], flat_keys: &[&str]| -> String {
        let from_nested = nested.and_then(|a| nested_keys.iter().find_map(|k| str_field(a, k)));
        let from_flat = || loc.and_then(|l| flat_keys.iter().find_map(|k| str_field(l, k)));
        from_nested.or_else(from_flat).unwrap_or_default().to_string()
    };

    let (latitude, longitude, coordinates) = coordinates_of(loc);
    let country = field(&["country"], &["country"]);

    LocationView {
        address: field(&["street"], &["street", "address"]),
        city: field(&["city"], &["city"]),
        state: field(&["state"], &["state"]),
        zip_code: field(&["zipCode", "zip"], &["zipCode", "zip"]),
        country: country_or_default((!country.is_empty()).then_some(country.as_str()), config),
        formatted_address: loc
            .and_then(|l| str_field(l, "formattedAddress"))
            .unwrap_or_default()
            .to_string(),
        latitude,
        longitude,
        coordinates,
    }
}

fn country_or_default(country: Option<&str>, config: &NormalizerConfig) -> String {
    country.unwrap_or(&config.default_country).to_string()
}

/// Latitude and longitude from explicit fields, then from `coordinates`.
///
/// An array pair is GeoJSON order: index 0 is longitude, index 1 latitude.
/// The object form `{latitude, longitude}` is read by name. The raw
/// `coordinates` value is returned as-is.
fn coordinates_of(loc: Option<&Value>) -> (Option<f64>, Option<f64>, Option<Value>) {
    let Some(loc) = loc else {
        return (None, None, None);
    };
    let raw = present(loc, "coordinates");

    let from_coordinates = |index: usize, key: &str| {
        raw.and_then(|c| match c {
            Value::Array(pair) => pair.get(index).and_then(Value::as_f64),
            Value::Object(_) => number_field(c, key),
            _ => None,
        })
    };

    let latitude = number_field(loc, "latitude").or_else(|| from_coordinates(1, "latitude"));
    let longitude = number_field(loc, "longitude").or_else(|| from_coordinates(0, "longitude"));

    (latitude, longitude, raw.cloned())
}
