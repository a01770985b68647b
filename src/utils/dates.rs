use chrono::{Datelike, Duration, Local, NaiveDate};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar-day identifier used in every persisted blob.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub fn parse_day_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).ok()
}

pub fn is_day_before(candidate: &str, today: NaiveDate) -> bool {
    parse_day_key(candidate).and_then(|d| d.succ_opt()) == Some(today)
}

/// Sunday of the week containing `date`.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
