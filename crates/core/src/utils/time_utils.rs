use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

/// Whole days from `today` until `target`, never negative.
pub fn days_until(today: NaiveDate, target: NaiveDate) -> i64 {
    (target - today).num_days().max(0)
}

/// Three-letter English weekday name ("Mon", "Tue", ...).
pub fn short_weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Day-granularity relative label used on community posts.
pub fn time_ago_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - created_at).num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => format!("{} weeks ago", days / 7),
        _ => format!("{} months ago", days / 30),
    }
}

/// Compact relative label used on activity feeds ("5m ago", "3h ago", "2d ago").
pub fn time_ago_compact(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - created_at;
    if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}
