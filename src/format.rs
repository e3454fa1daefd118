//! Display formatting: month/day names, ordinal day strings and the
//! 12-hour clock labels the picker shows (plus their inverses, used when
//! the selection is reassembled from rendered text).

use chrono::{Datelike, NaiveDate};

pub const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Sunday-first, matching the calendar grid columns.
pub const DAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Name of a 1-based month.
pub fn month_name(month: u32) -> &'static str {
    MONTHS[(month as usize - 1).min(11)]
}

/// Inverse of [`month_name`]: 1-based index of a month name.
pub fn month_index(name: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == name).map(|i| i as u32 + 1)
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    DAYS[date.weekday().num_days_from_sunday() as usize]
}

/// Day of month with its ordinal suffix: "1st", "22nd", "13th".
/// 11, 12 and 13 take "th" despite ending in 1, 2, 3.
pub fn display_date(day: u32) -> String {
    let suffix = match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

/// Formats a 24-hour `HH:MM` string as a 12-hour clock label,
/// `"hh:mm AM|PM"` with a zero-padded hour. Returns `None` when the
/// input is not a time.
pub fn clock_time(input: &str) -> Option<String> {
    let (h, m) = input.split_once(':')?;
    let hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = m.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    let is_pm = hour >= 12;
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    Some(format!("{display:02}:{minute:02} {}", if is_pm { "PM" } else { "AM" }))
}

/// Inverse of [`clock_time`]: parses a rendered `"hh:mm AM|PM"` label
/// back into 24-hour (hour, minute).
pub fn parse_clock(label: &str) -> Option<(u32, u32)> {
    let (h, rest) = label.trim().split_once(':')?;
    let (m, meridiem) = rest.split_once(' ')?;
    let mut hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = m.trim().parse().ok()?;

    if meridiem == "AM" && hour == 12 {
        hour = 0;
    }
    if meridiem == "PM" && hour < 12 {
        hour += 12;
    }
    Some((hour, minute))
}
