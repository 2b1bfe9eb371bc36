use chrono::{Days, Local, NaiveDate, NaiveDateTime, Timelike};

/// From this local hour on, the check looks at the next day: closings for
/// tomorrow are announced in the evening.
pub const NEXT_DAY_CUTOFF_HOUR: u32 = 15;

/// The calendar day a check concerns, with the renderings used in the
/// instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDate {
    pub date: NaiveDate,
    /// e.g. `Monday, December 15, 2025`
    pub long: String,
    /// e.g. `12/15`
    pub short: String,
    /// e.g. `12/15/25`
    pub with_year: String,
}

impl TargetDate {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            long: date.format("%A, %B %-d, %Y").to_string(),
            short: date.format("%-m/%-d").to_string(),
            with_year: date.format("%-m/%-d/%y").to_string(),
        }
    }
}

pub fn select_target_date(now: NaiveDateTime) -> TargetDate {
    let today = now.date();
    let date = if now.hour() >= NEXT_DAY_CUTOFF_HOUR {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    } else {
        today
    };
    TargetDate::new(date)
}

/// Local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Hour and minute of a check, e.g. `02:05 PM`.
pub fn timestamp_label(now: NaiveDateTime) -> String {
    now.format("%I:%M %p").to_string()
}

/// Wall-clock time with seconds for the instruction, e.g. `2:05:00 PM`.
pub fn clock_label(now: NaiveDateTime) -> String {
    now.format("%-I:%M:%S %p").to_string()
}
