use chrono::{DateTime, Utc};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;
const MINUTES_IN_YEAR: i64 = 525_600;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Approximate distance between two instants in words ("about 3 hours").
pub fn distance(a: DateTime<Utc>, b: DateTime<Utc>) -> String {
    let seconds = (b - a).num_seconds().abs();
    let minutes = (seconds + 30) / 60;

    if minutes == 0 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        format!("about {}", plural((minutes + 30) / 60, "hour"))
    } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        plural((minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY, "day")
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        format!(
            "about {}",
            plural((minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH, "month")
        )
    } else if minutes < MINUTES_IN_YEAR {
        plural((minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH, "month")
    } else {
        format!("about {}", plural(minutes / MINUTES_IN_YEAR, "year"))
    }
}

/// `distance` with a direction suffix relative to `now`: "in 2 days", "5 minutes ago".
pub fn relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let words = distance(then, now);
    if then > now {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}

/// Status line for a poll's expiry: "Expired" or "Expires in about 3 hours".
pub fn expiry_label(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if now >= expires_at {
        "Expired".to_string()
    } else {
        format!("Expires {}", relative(expires_at, now))
    }
}
