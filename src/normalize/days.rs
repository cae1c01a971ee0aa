use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Day names indexed by their numeric value (0 = Sunday)
const DAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Map a lowercase english day name to its number. Matching is exact.
pub fn day_number(name: &str) -> Option<u8> {
    DAY_NAMES.iter().position(|d| *d == name).map(|i| i as u8)
}

pub fn day_name(day: u8) -> Option<&'static str> {
    DAY_NAMES.get(day as usize).copied()
}

/// How a single scalar `dayOfWeek` name is resolved.
///
/// `Legacy` only recognizes monday, saturday and sunday and sends every
/// other name to the fallback day, which is what stored single-day
/// schedules have always been rendered as. `Full` uses the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayNamePolicy {
    #[default]
    Legacy,
    Full,
}

impl DayNamePolicy {
    pub fn resolve(self, name: &str) -> Option<u8> {
        let day = day_number(name)?;
        match self {
            DayNamePolicy::Full => Some(day),
            DayNamePolicy::Legacy => matches!(day, 0 | 1 | 6).then_some(day),
        }
    }
}

/// Resolve a raw `dayOfWeek` value.
///
/// Whole numbers in `0..=6` are kept (including `3.0`), names go through `policy`, and anything
/// else (missing, out of range, unknown name) becomes `fallback`.
pub fn resolve_day_value(value: Option<&Value>, policy: DayNamePolicy, fallback: u8) -> u8 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .filter(|d| *d <= 6)
            .map(|d| d as u8)
            .or_else(|| {
                // stored doubles such as 3.0
                n.as_f64()
                    .filter(|d| d.fract() == 0.0 && (0.0..=6.0).contains(d))
                    .map(|d| d as u8)
            })
            .unwrap_or(fallback),
        Some(Value::String(name)) => policy.resolve(name).unwrap_or(fallback),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_table() {
        assert_eq!(day_number("sunday"), Some(0));
        assert_eq!(day_number("wednesday"), Some(3));
        assert_eq!(day_number("saturday"), Some(6));
        assert_eq!(day_number("Monday"), None);
        assert_eq!(day_number("funday"), None);
    }

    #[test]
    fn test_day_name_round_trips_table() {
        for day in 0..7u8 {
            let name = day_name(day).unwrap();
            assert_eq!(day_number(name), Some(day));
        }
        assert_eq!(day_name(7), None);
    }

    #[test]
    fn test_legacy_policy_only_knows_three_days() {
        assert_eq!(DayNamePolicy::Legacy.resolve("monday"), Some(1));
        assert_eq!(DayNamePolicy::Legacy.resolve("saturday"), Some(6));
        assert_eq!(DayNamePolicy::Legacy.resolve("sunday"), Some(0));
        assert_eq!(DayNamePolicy::Legacy.resolve("tuesday"), None);
        assert_eq!(DayNamePolicy::Full.resolve("tuesday"), Some(2));
    }

    #[test]
    fn test_resolve_day_value() {
        let full = DayNamePolicy::Full;
        assert_eq!(resolve_day_value(Some(&json!(3)), full, 6), 3);
        assert_eq!(resolve_day_value(Some(&json!(0)), full, 6), 0);
        assert_eq!(resolve_day_value(Some(&json!(9)), full, 6), 6);
        assert_eq!(resolve_day_value(Some(&json!(-1)), full, 6), 6);
        assert_eq!(resolve_day_value(Some(&json!("friday")), full, 6), 5);
        assert_eq!(resolve_day_value(Some(&json!("friday")), DayNamePolicy::Legacy, 6), 6);
        assert_eq!(resolve_day_value(Some(&json!(true)), full, 6), 6);
        assert_eq!(resolve_day_value(None, full, 6), 6);
    }

    #[test]
    fn test_whole_number_doubles_are_days() {
        let full = DayNamePolicy::Full;
        assert_eq!(resolve_day_value(Some(&json!(3.0)), full, 6), 3);
        assert_eq!(resolve_day_value(Some(&json!(0.0)), full, 6), 0);
        assert_eq!(resolve_day_value(Some(&json!(2.5)), full, 6), 6);
        assert_eq!(resolve_day_value(Some(&json!(7.0)), full, 6), 6);
        assert_eq!(resolve_day_value(Some(&json!(-1.0)), full, 6), 6);
    }
}
