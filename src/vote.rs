use chrono::{DateTime, Duration, Timelike, Utc};

/// Governance days roll over at 17:00 UTC.
const DAY_BOUNDARY_HOUR: u32 = 17;
/// Characters of a proposal body shown in a preview.
const PREVIEW_LENGTH: usize = 248;

/// Time left until voting on `target_day` closes, e.g. `"2 days, 3 hours"`.
///
/// Empty once the deadline has passed or when the day offset is out of range.
pub fn format_time_remaining(target_day: i64, platform_day: i64, now: DateTime<Utc>) -> String {
    let Some(shifted) = target_day
        .checked_sub(platform_day)
        .and_then(|days| days.checked_sub(1))
        .and_then(Duration::try_days)
        .and_then(|offset| now.checked_add_signed(offset))
    else {
        return String::new();
    };
    let target = shifted.with_hour(DAY_BOUNDARY_HOUR).unwrap_or(shifted);

    let remaining = target - now;
    let hours_diff = remaining.num_hours();
    if hours_diff < 0 {
        return String::new();
    }

    let days_left = hours_diff / 24;
    let hours_left = hours_diff % 24;

    if days_left < 1 {
        return match relative(remaining).as_str() {
            "a day" => "1 day".to_string(),
            other => other.to_string(),
        };
    }

    let days = if days_left == 1 {
        "1 day".to_string()
    } else {
        format!("{days_left} days")
    };

    match hours_left {
        0 => days,
        1 => format!("{days}, an hour"),
        n => format!("{days}, {n} hours"),
    }
}

/// Coarse wording for a duration under two days.
fn relative(duration: Duration) -> String {
    let millis = duration.num_milliseconds().abs() as f64;
    let round = |unit: f64| (millis / unit).round() as i64;

    let seconds = round(1_000.0);
    if seconds <= 44 {
        return "a few seconds".to_string();
    }
    if seconds <= 89 {
        return "a minute".to_string();
    }

    let minutes = round(60_000.0);
    if minutes <= 44 {
        return format!("{minutes} minutes");
    }
    if minutes <= 89 {
        return "an hour".to_string();
    }

    let hours = round(3_600_000.0);
    if hours <= 21 {
        return format!("{hours} hours");
    }
    if hours <= 35 {
        return "a day".to_string();
    }

    format!("{} days", round(86_400_000.0))
}

/// One-line preview of a proposal description.
pub fn normalize_content(text: &str) -> String {
    let flattened: String = text
        .chars()
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c })
        .take(PREVIEW_LENGTH)
        .collect();
    format!("{flattened}...")
}
