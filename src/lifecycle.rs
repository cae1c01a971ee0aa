//! Market and application lifecycle rules.
//!
//! Status state machines, whether a market is currently taking vendor
//! applications, when it next meets, and how much of a cancelled fee is
//! refunded.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::MarketError;
use crate::normalize::fields::{number_field, str_field};
use crate::types::{DatesType, MarketView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Draft,
    PendingApproval,
    Active,
    Inactive,
    Suspended,
    Cancelled,
    Completed,
}

impl MarketStatus {
    pub const ALL: [MarketStatus; 7] = [
        MarketStatus::Draft,
        MarketStatus::PendingApproval,
        MarketStatus::Active,
        MarketStatus::Inactive,
        MarketStatus::Suspended,
        MarketStatus::Cancelled,
        MarketStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Draft => "draft",
            MarketStatus::PendingApproval => "pending_approval",
            MarketStatus::Active => "active",
            MarketStatus::Inactive => "inactive",
            MarketStatus::Suspended => "suspended",
            MarketStatus::Cancelled => "cancelled",
            MarketStatus::Completed => "completed",
        }
    }

    pub fn allowed_transitions(&self) -> &'static [MarketStatus] {
        use MarketStatus::*;
        match self {
            Draft => &[PendingApproval, Cancelled],
            PendingApproval => &[Active, Draft, Cancelled, Suspended],
            Active => &[Inactive, Suspended, Cancelled, Completed],
            Inactive => &[Active, Cancelled],
            Suspended => &[Active, Cancelled],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition_to(&self, next: MarketStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Statuses in which vendors may still apply
    pub fn accepts_applications(&self) -> bool {
        matches!(self, MarketStatus::Active | MarketStatus::PendingApproval)
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| MarketError::UnknownStatus {
                kind: "market",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under-review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn allowed_transitions(&self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Draft => &[Submitted, Withdrawn],
            Submitted => &[UnderReview, Draft, Withdrawn],
            UnderReview => &[Approved, Rejected, Withdrawn],
            // an approved vendor can still pull out
            Approved => &[Withdrawn],
            // rejected applications may be reworked and resubmitted
            Rejected => &[Draft, Withdrawn],
            Withdrawn => &[],
        }
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| MarketError::UnknownStatus {
                kind: "application",
                value: s.to_string(),
            })
    }
}

/// Whether a stored market is taking vendor applications at `now`.
///
/// The status must accept applications, the vendor cap (if any) must not be
/// reached, and the application deadline (if any) must not have passed.
pub fn can_accept_applications(record: &Value, now: DateTime<Utc>) -> bool {
    let status = str_field(record, "status").and_then(|s| s.parse::<MarketStatus>().ok());
    if !status.is_some_and(|s| s.accepts_applications()) {
        return false;
    }

    let settings = record.get("applicationSettings");

    if let Some(max_vendors) = settings.and_then(|s| number_field(s, "maxVendors")) {
        let vendor_count = number_field(record, "vendorCount").unwrap_or(0.0);
        if max_vendors > 0.0 && vendor_count >= max_vendors {
            debug!(vendor_count, max_vendors, "Market is at vendor capacity");
            return false;
        }
    }

    if let Some(deadline) = settings
        .and_then(|s| str_field(s, "applicationDeadline"))
        .and_then(parse_instant)
    {
        if now > deadline {
            debug!(%deadline, "Application deadline has passed");
            return false;
        }
    }

    true
}

/// RFC 3339 timestamps, or plain dates taken as the end of that day (UTC)
fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            parse_date(value)
                .and_then(|d| d.and_hms_opt(23, 59, 59))
                .map(|dt| dt.and_utc())
        })
}

/// `YYYY-MM-DD`, also accepting a full timestamp and keeping its date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// The next date strictly after `today` on which the market meets.
///
/// One-time markets use their dated events. Recurring markets use the
/// earliest upcoming special date if there is one, otherwise the first day
/// in the coming week that matches a schedule entry and lies within that
/// entry's date bounds.
pub fn next_market_date(view: &MarketView, today: NaiveDate) -> Option<NaiveDate> {
    let dates = view.dates.as_ref();
    let recurring = dates.map(|d| d.kind == DatesType::Recurring).unwrap_or_else(|| {
        view.schedule.iter().any(|e| e.is_recurring)
    });

    let upcoming_events = || {
        dates
            .map(|d| d.events.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|event| parse_date(&event.start_date))
            .filter(|date| *date > today)
            .min()
    };

    if !recurring {
        return upcoming_events();
    }

    if let Some(special) = upcoming_events() {
        return Some(special);
    }

    (1..=7)
        .filter_map(|offset| today.checked_add_signed(Duration::days(offset)))
        .find(|candidate| {
            let weekday = candidate.weekday().num_days_from_sunday() as u8;
            view.schedule.iter().any(|entry| {
                entry.day_of_week == weekday
                    && parse_date(&entry.start_date).map_or(true, |start| *candidate >= start)
                    && parse_date(&entry.end_date).map_or(true, |end| *candidate <= end)
            })
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Application,
    Booth,
    Other,
}

/// Refund owed when a vendor cancels.
///
/// Application fees are never refunded. Booth fees are refunded in full
/// two weeks or more ahead of the market, half from one week ahead, and not
/// at all inside the final week.
pub fn refund_amount(
    amount: f64,
    fee_type: FeeType,
    cancelled_at: DateTime<Utc>,
    market_date: DateTime<Utc>,
) -> f64 {
    match fee_type {
        FeeType::Booth => {
            let seconds = (market_date - cancelled_at).num_seconds() as f64;
            let days_until_market = (seconds / 86_400.0).ceil();
            if days_until_market >= 14.0 {
                amount
            } else if days_until_market >= 7.0 {
                amount * 0.5
            } else {
                0.0
            }
        }
        FeeType::Application | FeeType::Other => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_market_transitions() {
        assert!(MarketStatus::Draft.can_transition_to(MarketStatus::PendingApproval));
        assert!(MarketStatus::PendingApproval.can_transition_to(MarketStatus::Active));
        assert!(MarketStatus::Active.can_transition_to(MarketStatus::Completed));
        assert!(!MarketStatus::Draft.can_transition_to(MarketStatus::Active));
        assert!(!MarketStatus::Completed.can_transition_to(MarketStatus::Active));
        assert!(MarketStatus::Cancelled.is_terminal());
        assert!(MarketStatus::Completed.is_terminal());
        assert!(!MarketStatus::Suspended.is_terminal());
    }

    #[test]
    fn test_application_transitions() {
        assert!(ApplicationStatus::Submitted.can_transition_to(ApplicationStatus::UnderReview));
        assert!(ApplicationStatus::Approved.can_transition_to(ApplicationStatus::Withdrawn));
        assert!(ApplicationStatus::Rejected.can_transition_to(ApplicationStatus::Draft));
        assert!(!ApplicationStatus::Approved.can_transition_to(ApplicationStatus::Rejected));
        assert!(ApplicationStatus::Withdrawn.is_terminal());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending_approval".parse::<MarketStatus>().unwrap(), MarketStatus::PendingApproval);
        assert_eq!("under-review".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::UnderReview);
        assert!(matches!(
            "archived".parse::<MarketStatus>(),
            Err(MarketError::UnknownStatus { kind: "market", .. })
        ));
        for status in MarketStatus::ALL {
            assert_eq!(status.to_string().parse::<MarketStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(serde_json::to_value(MarketStatus::PendingApproval).unwrap(), json!("pending_approval"));
        assert_eq!(serde_json::to_value(ApplicationStatus::UnderReview).unwrap(), json!("under-review"));
    }

    #[test]
    fn test_accepts_applications_by_status() {
        assert!(can_accept_applications(&json!({"status": "active"}), now()));
        assert!(can_accept_applications(&json!({"status": "pending_approval"}), now()));
        assert!(!can_accept_applications(&json!({"status": "draft"}), now()));
        assert!(!can_accept_applications(&json!({}), now()));
    }

    #[test]
    fn test_vendor_capacity() {
        let full = json!({"status": "active", "vendorCount": 20, "applicationSettings": {"maxVendors": 20}});
        let open = json!({"status": "active", "vendorCount": 19, "applicationSettings": {"maxVendors": 20}});
        assert!(!can_accept_applications(&full, now()));
        assert!(can_accept_applications(&open, now()));
    }

    #[test]
    fn test_application_deadline() {
        let passed = json!({"status": "active", "applicationSettings": {"applicationDeadline": "2025-06-01T00:00:00Z"}});
        let same_day = json!({"status": "active", "applicationSettings": {"applicationDeadline": "2025-06-10"}});
        assert!(!can_accept_applications(&passed, now()));
        assert!(can_accept_applications(&same_day, now()));
    }

    #[test]
    fn test_refunds() {
        let cancelled = now();
        let in_days = |days: i64| cancelled + Duration::days(days);

        assert_eq!(refund_amount(50.0, FeeType::Application, cancelled, in_days(30)), 0.0);
        assert_eq!(refund_amount(80.0, FeeType::Booth, cancelled, in_days(14)), 80.0);
        assert_eq!(refund_amount(80.0, FeeType::Booth, cancelled, in_days(10)), 40.0);
        assert_eq!(refund_amount(80.0, FeeType::Booth, cancelled, in_days(7)), 40.0);
        assert_eq!(refund_amount(80.0, FeeType::Booth, cancelled, in_days(3)), 0.0);
        assert_eq!(refund_amount(80.0, FeeType::Other, cancelled, in_days(30)), 0.0);
    }
}
