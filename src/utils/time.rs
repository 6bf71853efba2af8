use chrono::{DateTime, LocalResult, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Place a calendar date at a wall-clock time in the given zone.
///
/// A time repeated by a DST transition resolves to its later (standard
/// time) occurrence. Returns `None` when the time is skipped entirely.
pub fn at_local_time(date: NaiveDate, (hour, minute): (u32, u32), tz: &Tz) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(_, later) => Some(later),
        LocalResult::None => None,
    }
}
