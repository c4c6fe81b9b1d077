//! Date helper functions

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::cmp::Ordering;

/// Parse a frontmatter date string in various formats.
///
/// Naive values (no offset) are read as UTC. Returns `None` for anything
/// that is not a recognizable date, which callers treat as "unparsable".
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    None
}

/// Today's date as `YYYY-MM-DD`, in the given IANA timezone when it parses,
/// otherwise in local time.
pub fn today(timezone: Option<&str>) -> String {
    match timezone.and_then(|name| name.parse::<Tz>().ok()) {
        Some(tz) => Utc::now().with_timezone(&tz).format("%Y-%m-%d").to_string(),
        None => Local::now().format("%Y-%m-%d").to_string(),
    }
}

/// Current instant as an ISO 8601 string with millisecond precision
pub fn now_iso() -> String {
    date_xml(&Utc::now())
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz2: TimeZone>(date: &DateTime<Tz2>) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Format date in full format (like "January 15, 2024")
pub fn full_date<Tz2: TimeZone>(date: &DateTime<Tz2>) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y").to_string()
}

/// Format a raw frontmatter date for display, or "Invalid Date"
pub fn display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => full_date(&dt),
        None => "Invalid Date".to_string(),
    }
}

/// Newest-first ordering for optional dates.
///
/// Valid dates sort descending; unparsable dates (`None`) sort after every
/// valid date and compare equal to each other, so a stable sort keeps their
/// original order.
pub fn newest_first(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Get relative time (like "2 hours ago")
pub fn relative_date(date: &DateTime<Utc>) -> String {
    relative_to(date, &Utc::now())
}

fn relative_to(date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(*date).num_seconds();

    if seconds < 60 {
        return "Just now".to_string();
    }

    let plural = |n: i64, unit: &str| {
        if n > 1 {
            format!("{} {}s ago", n, unit)
        } else {
            format!("{} {} ago", n, unit)
        }
    };

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }
    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }
    plural(months / 12, "year")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_date_formats() {
        let d = parse_date("2024-01-15").unwrap();
        assert_eq!(d.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 00:00");

        let d = parse_date("2024-01-15 10:30:00").unwrap();
        assert_eq!(d.format("%H:%M").to_string(), "10:30");

        let d = parse_date("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(d.format("%H:%M").to_string(), "08:30");

        assert!(parse_date("2024/01/15").is_some());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("").is_none());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("2024-13-45").is_none());
    }

    #[test]
    fn test_full_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(full_date(&date), "January 5, 2024");
        assert_eq!(display_date("garbage"), "Invalid Date");
    }

    #[test]
    fn test_today_shape() {
        let t = today(Some("Asia/Shanghai"));
        assert_eq!(t.len(), 10);
        assert!(parse_date(&t).is_some());
        assert_eq!(today(Some("Not/AZone")).len(), 10);
    }

    #[test]
    fn test_newest_first_puts_invalid_last() {
        let mut dates = vec![
            ("a", parse_date("2024-01-01")),
            ("bad1", parse_date("someday")),
            ("c", parse_date("2024-03-01")),
            ("bad2", None),
            ("b", parse_date("2024-02-01")),
        ];
        dates.sort_by(|x, y| newest_first(x.1.as_ref(), y.1.as_ref()));
        let order: Vec<&str> = dates.iter().map(|d| d.0).collect();
        assert_eq!(order, vec!["c", "b", "a", "bad1", "bad2"]);
    }

    #[test]
    fn test_relative_to() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_to(&(now - Duration::seconds(10)), &now), "Just now");
        assert_eq!(relative_to(&(now - Duration::minutes(1)), &now), "1 minute ago");
        assert_eq!(relative_to(&(now - Duration::hours(5)), &now), "5 hours ago");
        assert_eq!(relative_to(&(now - Duration::days(3)), &now), "3 days ago");
        assert_eq!(relative_to(&(now - Duration::days(400)), &now), "1 year ago");
    }
}
