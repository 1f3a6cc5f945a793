use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Coarse "3 hours" / "2 weeks" style distance between two instants.
///
/// Order does not matter. Each unit is rounded to the nearest whole value
/// and never reported below one.
pub fn human_time_diff(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let diff = (to - from).num_seconds().abs();

    let (count, singular, plural) = if diff < HOUR {
        (rounded(diff, MINUTE), "min", "mins")
    } else if diff < DAY {
        (rounded(diff, HOUR), "hour", "hours")
    } else if diff < WEEK {
        (rounded(diff, DAY), "day", "days")
    } else if diff < MONTH {
        (rounded(diff, WEEK), "week", "weeks")
    } else if diff < YEAR {
        (rounded(diff, MONTH), "month", "months")
    } else {
        (rounded(diff, YEAR), "year", "years")
    };

    format!("{count} {}", if count == 1 { singular } else { plural })
}

fn rounded(diff: i64, unit: i64) -> i64 {
    ((diff as f64 / unit as f64).round() as i64).max(1)
}
