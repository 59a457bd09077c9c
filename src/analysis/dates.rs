//! Natural-language date ranges
//!
//! All ranges are computed from an explicit `now` in process-local time.
//! Weeks start on Sunday. Range ends are inclusive, at 23:59:59.

use chrono::{
    DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use regex::Regex;
use std::sync::LazyLock;

static RELATIVE_TIMEFRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^last\s+(\d+)\s+(day|week|month|year)s?$").expect("timeframe pattern")
});

/// Default window for journal analyses, in days
pub const DEFAULT_TIMEFRAME_DAYS: i64 = 30;

/// A concrete, inclusive time window with a display title
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub title: String,
}

impl DateRange {
    fn days(start: NaiveDate, end: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            start: start_of_day(start),
            end: end_of_day(end),
            title: title.into(),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Whether a calendar day falls inside the window.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day >= self.start_date() && day <= self.end_date()
    }
}

/// Resolve a range keyword relative to `now`.
///
/// Recognized: `today`, `yesterday`, `this week`, `last week`, `this month`,
/// `last month`, `this year`, `last year`, `year to date`. Anything else
/// resolves to this week.
pub fn parse_date_range(input: &str, now: DateTime<Local>) -> DateRange {
    let today = now.date_naive();
    match normalize(input).as_str() {
        "today" => DateRange::days(today, today, "Today"),
        "yesterday" => {
            let day = today - Duration::days(1);
            DateRange::days(day, day, "Yesterday")
        }
        "last week" => {
            let start = week_start(today) - Duration::days(7);
            DateRange::days(start, start + Duration::days(6), "Last Week")
        }
        "this month" => {
            let (start, end) = month_bounds(today.year(), today.month());
            DateRange::days(start, end, start.format("%B %Y").to_string())
        }
        "last month" => {
            let (year, month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            let (start, end) = month_bounds(year, month);
            DateRange::days(start, end, start.format("%B %Y").to_string())
        }
        "this year" => {
            let (start, end) = year_bounds(today.year());
            DateRange::days(start, end, today.year().to_string())
        }
        "last year" => {
            let (start, end) = year_bounds(today.year() - 1);
            DateRange::days(start, end, (today.year() - 1).to_string())
        }
        "year to date" | "ytd" => {
            let (start, _) = year_bounds(today.year());
            DateRange::days(start, today, format!("Year to Date {}", today.year()))
        }
        _ => this_week(today),
    }
}

/// Resolve a journal-analysis timeframe relative to `now`.
///
/// Accepts `last N days|weeks|months|years` and `this year`; anything else
/// is the last 30 days.
pub fn parse_timeframe(input: &str, now: DateTime<Local>) -> DateRange {
    let today = now.date_naive();
    let normalized = normalize(input);

    if normalized == "this year" {
        let (start, _) = year_bounds(today.year());
        return DateRange::days(start, today, "this year");
    }

    if let Some(cap) = RELATIVE_TIMEFRAME.captures(&normalized) {
        if let Ok(amount) = cap[1].parse::<u32>() {
            let start = match &cap[2] {
                "day" => today.checked_sub_signed(Duration::days(i64::from(amount))),
                "week" => today.checked_sub_signed(Duration::weeks(i64::from(amount))),
                "month" => today.checked_sub_months(Months::new(amount)),
                _ => amount
                    .checked_mul(12)
                    .and_then(|m| today.checked_sub_months(Months::new(m))),
            };
            if let Some(start) = start {
                return DateRange::days(start, today, normalized);
            }
        }
    }

    DateRange::days(
        today - Duration::days(DEFAULT_TIMEFRAME_DAYS),
        today,
        format!("last {DEFAULT_TIMEFRAME_DAYS} days"),
    )
}

/// Find the first range keyword mentioned anywhere in free text.
pub fn find_range_keyword(text: &str) -> Option<&'static str> {
    const KEYWORDS: [&str; 9] = [
        "year to date",
        "yesterday",
        "today",
        "last week",
        "this week",
        "last month",
        "this month",
        "last year",
        "this year",
    ];
    let lowered = text.to_lowercase();
    KEYWORDS.into_iter().find(|k| lowered.contains(k))
}

fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn this_week(today: NaiveDate) -> DateRange {
    let start = week_start(today);
    DateRange::days(start, start + Duration::days(6), "This Week")
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start);
    (start, end)
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(start);
    (start, end)
}

fn start_of_day(day: NaiveDate) -> DateTime<Local> {
    to_local(day.and_time(NaiveTime::MIN))
}

fn end_of_day(day: NaiveDate) -> DateTime<Local> {
    let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    to_local(day.and_time(time))
}

/// Local wall-clock time, resolving DST folds to the earlier instant and gaps
/// to the UTC reading of the same wall clock.
fn to_local(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
