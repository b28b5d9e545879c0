//! Vietnamese relative timestamps ("5 phút trước", "một ngày trước").

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Shown when an article has no usable timestamp.
pub const JUST_POSTED: &str = "Vừa đăng";

#[derive(Clone, Copy)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

struct Threshold {
    label: &'static str,
    /// Largest rounded value this label covers. `None` covers everything.
    max: Option<f64>,
    /// Recompute the difference in this unit before comparing.
    unit: Option<Unit>,
}

const THRESHOLDS: [Threshold; 11] = [
    Threshold { label: "vài giây", max: Some(44.0), unit: Some(Unit::Second) },
    Threshold { label: "một phút", max: Some(89.0), unit: None },
    Threshold { label: "%d phút", max: Some(44.0), unit: Some(Unit::Minute) },
    Threshold { label: "một giờ", max: Some(89.0), unit: None },
    Threshold { label: "%d giờ", max: Some(21.0), unit: Some(Unit::Hour) },
    Threshold { label: "một ngày", max: Some(35.0), unit: None },
    Threshold { label: "%d ngày", max: Some(25.0), unit: Some(Unit::Day) },
    Threshold { label: "một tháng", max: Some(45.0), unit: None },
    Threshold { label: "%d tháng", max: Some(10.0), unit: Some(Unit::Month) },
    Threshold { label: "một năm", max: Some(17.0), unit: None },
    Threshold { label: "%d năm", max: None, unit: Some(Unit::Year) },
];

const DAYS_PER_MONTH: f64 = 365.25 / 12.0;

fn in_unit(millis: i64, unit: Unit) -> f64 {
    let ms = millis as f64;
    let days = ms / 86_400_000.0;
    match unit {
        Unit::Second => ms / 1_000.0,
        Unit::Minute => ms / 60_000.0,
        Unit::Hour => ms / 3_600_000.0,
        Unit::Day => days,
        Unit::Month => days / DAYS_PER_MONTH,
        Unit::Year => days / DAYS_PER_MONTH / 12.0,
    }
}

/// Phrase for a time difference. Positive `millis` lies in the past.
pub fn relative_phrase(millis: i64) -> String {
    let mut value = 0.0;
    let mut phrase = String::new();

    for (i, threshold) in THRESHOLDS.iter().enumerate() {
        if let Some(unit) = threshold.unit {
            value = in_unit(millis, unit);
        }
        let rounded = value.abs().round();

        if threshold.max.is_none_or(|max| rounded <= max) {
            let label = if rounded <= 1.0 && i > 0 {
                THRESHOLDS[i - 1].label
            } else {
                threshold.label
            };
            phrase = label.replace("%d", &format!("{}", rounded as i64));
            break;
        }
    }

    if millis < 0 {
        format!("{} tới", phrase)
    } else {
        format!("{} trước", phrase)
    }
}

/// Parse an API timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "2 giờ trước" style label, or [`JUST_POSTED`] when `timestamp` is missing
/// or unreadable.
pub fn time_ago(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    match timestamp.and_then(parse_timestamp) {
        Some(at) => relative_phrase((now - at).num_milliseconds()),
        None => JUST_POSTED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        relative_phrase(d.num_milliseconds())
    }

    #[test]
    fn test_seconds_and_minutes() {
        assert_eq!(ago(Duration::seconds(10)), "vài giây trước");
        assert_eq!(ago(Duration::seconds(44)), "vài giây trước");
        assert_eq!(ago(Duration::seconds(45)), "một phút trước");
        assert_eq!(ago(Duration::seconds(89)), "một phút trước");
        assert_eq!(ago(Duration::seconds(90)), "2 phút trước");
        assert_eq!(ago(Duration::minutes(5)), "5 phút trước");
        assert_eq!(ago(Duration::minutes(44)), "44 phút trước");
    }

    #[test]
    fn test_hours_days_months_years() {
        assert_eq!(ago(Duration::minutes(45)), "một giờ trước");
        assert_eq!(ago(Duration::hours(2)), "2 giờ trước");
        assert_eq!(ago(Duration::hours(21)), "21 giờ trước");
        assert_eq!(ago(Duration::hours(22)), "một ngày trước");
        assert_eq!(ago(Duration::days(3)), "3 ngày trước");
        assert_eq!(ago(Duration::days(26)), "một tháng trước");
        assert_eq!(ago(Duration::days(90)), "3 tháng trước");
        assert_eq!(ago(Duration::days(330)), "một năm trước");
        assert_eq!(ago(Duration::days(365 * 3)), "3 năm trước");
    }

    #[test]
    fn test_future() {
        assert_eq!(ago(Duration::minutes(-5)), "5 phút tới");
    }

    #[test]
    fn test_time_ago_parsing() {
        assert_eq!(time_ago(Some("2025-06-15T10:00:00Z"), now()), "2 giờ trước");
        assert_eq!(time_ago(Some("2025-06-15T10:00:00"), now()), "2 giờ trước");
        assert_eq!(time_ago(Some("2025-06-15 11:55:00"), now()), "5 phút trước");
        assert_eq!(time_ago(Some("2025-06-15T14:00:00+07:00"), now()), "5 giờ trước");
    }

    #[test]
    fn test_missing_or_bad_timestamp() {
        assert_eq!(time_ago(None, now()), JUST_POSTED);
        assert_eq!(time_ago(Some(""), now()), JUST_POSTED);
        assert_eq!(time_ago(Some("hôm qua"), now()), JUST_POSTED);
    }
}
