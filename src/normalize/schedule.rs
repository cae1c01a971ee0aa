use serde_json::Value;

use super::days::{day_name, resolve_day_value, DayNamePolicy};
use super::fields::{bool_field, id_string, str_field, string_field};
use crate::config::NormalizerConfig;
use crate::types::{DateEvent, DatesSummary, DatesType, ScheduleEntry};

/// The stored schedule layouts
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleShape<'a> {
    /// Already a list of day entries (the output shape)
    Entries(&'a [Value]),
    /// One object listing several day names with shared times and season
    DaysOfWeek {
        schedule: &'a Value,
        days: &'a [Value],
    },
    /// One object with a scalar `dayOfWeek` (name or number), or any other
    /// truthy scalar, which decodes to a single all-defaults entry
    SingleDay(&'a Value),
    Missing,
}

/// Everything decoded from a raw schedule in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchedule {
    pub entries: Vec<ScheduleEntry>,
    pub special_dates: Vec<DateEvent>,
    /// Object layouts carry one flag for the whole schedule, even with no days listed
    pub recurring: bool,
}

impl<'a> ScheduleShape<'a> {
    pub fn detect(schedule: Option<&'a Value>) -> Self {
        match schedule {
            Some(Value::Array(entries)) => ScheduleShape::Entries(entries),
            Some(schedule) if schedule.is_object() => match schedule.get("daysOfWeek") {
                Some(Value::Array(days)) => ScheduleShape::DaysOfWeek { schedule, days },
                _ => ScheduleShape::SingleDay(schedule),
            },
            Some(schedule) if is_truthy(schedule) => ScheduleShape::SingleDay(schedule),
            _ => ScheduleShape::Missing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleShape::Entries(_) => "entries",
            ScheduleShape::DaysOfWeek { .. } => "days_of_week",
            ScheduleShape::SingleDay(_) => "single_day",
            ScheduleShape::Missing => "missing",
        }
    }

    /// `None` only when there is no schedule at all
    pub fn decode(&self, config: &NormalizerConfig) -> Option<ResolvedSchedule> {
        let resolved = match self {
            ScheduleShape::Entries(entries) => {
                let entries: Vec<ScheduleEntry> = entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| decode_entry(index, entry, config))
                    .collect();
                ResolvedSchedule {
                    recurring: entries.iter().any(|e| e.is_recurring),
                    entries,
                    special_dates: Vec::new(),
                }
            }
            ScheduleShape::DaysOfWeek { schedule, days } => {
                let shared = SharedFields::from_schedule(schedule, config);
                let entries = days
                    .iter()
                    .enumerate()
                    .map(|(index, day)| {
                        let day = resolve_day_value(
                            Some(day),
                            DayNamePolicy::Full,
                            config.fallback_day_of_week,
                        );
                        shared.entry(index, day)
                    })
                    .collect();
                ResolvedSchedule {
                    entries,
                    special_dates: shared.special_dates(schedule),
                    recurring: shared.recurring,
                }
            }
            ScheduleShape::SingleDay(schedule) => {
                let shared = SharedFields::from_schedule(schedule, config);
                let day = resolve_day_value(
                    schedule.get("dayOfWeek"),
                    config.single_day_names,
                    config.fallback_day_of_week,
                );
                ResolvedSchedule {
                    entries: vec![shared.entry(0, day)],
                    special_dates: shared.special_dates(schedule),
                    recurring: shared.recurring,
                }
            }
            ScheduleShape::Missing => return None,
        };

        Some(resolved)
    }
}

/// `false`, `0`, `""` and `null` count as no schedule at all
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// An entry already in list form: keep it, filling gaps
fn decode_entry(index: usize, entry: &Value, config: &NormalizerConfig) -> ScheduleEntry {
    ScheduleEntry {
        id: entry
            .get("id")
            .and_then(id_string)
            .unwrap_or_else(|| (index + 1).to_string()),
        day_of_week: resolve_day_value(
            entry.get("dayOfWeek"),
            DayNamePolicy::Full,
            config.fallback_day_of_week,
        ),
        start_time: string_field(entry, "startTime"),
        end_time: string_field(entry, "endTime"),
        start_date: str_field(entry, "startDate")
            .unwrap_or(&config.default_season_start)
            .to_string(),
        end_date: str_field(entry, "endDate")
            .unwrap_or(&config.default_season_end)
            .to_string(),
        is_recurring: bool_field(entry, "isRecurring").unwrap_or(true),
    }
}

/// Times, season bounds and recurrence shared by every day of an object schedule
struct SharedFields {
    start_time: Option<String>,
    end_time: Option<String>,
    season_start: String,
    season_end: String,
    recurring: bool,
}

impl SharedFields {
    fn from_schedule(schedule: &Value, config: &NormalizerConfig) -> Self {
        Self {
            start_time: string_field(schedule, "startTime"),
            end_time: string_field(schedule, "endTime"),
            season_start: str_field(schedule, "seasonStart")
                .unwrap_or(&config.default_season_start)
                .to_string(),
            season_end: str_field(schedule, "seasonEnd")
                .unwrap_or(&config.default_season_end)
                .to_string(),
            recurring: bool_field(schedule, "recurring")
                .or_else(|| bool_field(schedule, "isRecurring"))
                .unwrap_or(false),
        }
    }

    fn entry(&self, index: usize, day_of_week: u8) -> ScheduleEntry {
        ScheduleEntry {
            id: (index + 1).to_string(),
            day_of_week,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            start_date: self.season_start.clone(),
            end_date: self.season_end.clone(),
            is_recurring: self.recurring,
        }
    }

    /// `specialDates: [{date, startTime?, endTime?}]`; entries without a date are dropped
    fn special_dates(&self, schedule: &Value) -> Vec<DateEvent> {
        let Some(dates) = schedule.get("specialDates").and_then(Value::as_array) else {
            return Vec::new();
        };

        dates
            .iter()
            .filter_map(|special| {
                let date = str_field(special, "date")?;
                Some(DateEvent {
                    start_date: date.to_string(),
                    end_date: date.to_string(),
                    start_time: string_field(special, "startTime").or_else(|| self.start_time.clone()),
                    end_time: string_field(special, "endTime").or_else(|| self.end_time.clone()),
                })
            })
            .collect()
    }
}

/// Build the `dates` summary from a decoded schedule
pub fn summarize(resolved: &ResolvedSchedule) -> DatesSummary {
    let recurring = resolved.recurring;

    let mut days_of_week: Vec<String> = Vec::new();
    for entry in &resolved.entries {
        if let Some(name) = day_name(entry.day_of_week) {
            if !days_of_week.iter().any(|d| d == name) {
                days_of_week.push(name.to_string());
            }
        }
    }

    let first = resolved.entries.first();

    DatesSummary {
        kind: if recurring { DatesType::Recurring } else { DatesType::OneTime },
        recurring,
        days_of_week,
        start_time: first.and_then(|e| e.start_time.clone()),
        end_time: first.and_then(|e| e.end_time.clone()),
        events: resolved.special_dates.clone(),
        season_start: first.map(|e| e.start_date.clone()),
        season_end: first.map(|e| e.end_date.clone()),
    }
}
