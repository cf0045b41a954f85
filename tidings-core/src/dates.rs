//! Normalisation of the date labels rendered next to search results.
//!
//! Listings mix absolute dates (`"Jan. 5, 2023"`), bare month/day labels for
//! the current year (`"March 2"`) and relative stamps for very recent items
//! (`"3h ago"`, `"45m ago"`). Everything is folded into the canonical
//! `MM/DD/YYYY` form; text that matches none of the rules is handed back
//! verbatim.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

/// `strftime` pattern of the canonical date text.
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y";

const MONTH_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Jan.", "January"),
    ("Feb.", "February"),
    ("Mar.", "March"),
    ("Apr.", "April"),
    ("May", "May"),
    ("June", "June"),
    ("July", "July"),
    ("Aug.", "August"),
    ("Sept.", "September"),
    ("Oct.", "October"),
    ("Nov.", "November"),
    ("Dec.", "December"),
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static HOURS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)h ago").expect("valid regex"));
static MINUTES_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)m ago").expect("valid regex"));
static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+\s+\d+$").expect("valid regex"));
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+(\d{1,2}),\s+(\d{4})$").expect("valid regex")
});

/// Source of "now" for relative dates and the search window.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Turns raw listing date text into canonical `MM/DD/YYYY` text.
#[derive(Debug, Clone, Default)]
pub struct DateNormalizer<C = SystemClock> {
    clock: C,
}

impl DateNormalizer<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> DateNormalizer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Normalise `raw`, returning it unchanged when no rule applies.
    pub fn normalize(&self, raw: &str) -> String {
        normalize_at(raw, self.clock.now())
    }
}

/// Normalise `raw` as if the current local time were `now`.
///
/// ```
/// use chrono::NaiveDate;
/// use tidings_core::dates::normalize_at;
///
/// let now = NaiveDate::from_ymd_opt(2024, 5, 10)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// assert_eq!(normalize_at("Sept. 14, 2023", now), "09/14/2023");
/// assert_eq!(normalize_at("3h ago", now), "05/10/2024");
/// assert_eq!(normalize_at("yesterday-ish", now), "yesterday-ish");
/// ```
pub fn normalize_at(raw: &str, now: NaiveDateTime) -> String {
    let mut expanded = expand_month_abbreviations(raw);

    // Relative stamps are matched on the untouched input.
    if let Some(stamp) = relative_stamp(raw, now) {
        return stamp.format(CANONICAL_FORMAT).to_string();
    }

    if MONTH_DAY.is_match(&expanded) {
        // FIXME(year-rollover): a "Dec 31" listing read on Jan 1 lands in the new year.
        expanded = format!("{expanded}, {}", now.year());
    }

    match parse_month_day_year(&expanded) {
        Some(date) => date.format(CANONICAL_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Parse canonical `MM/DD/YYYY` text back into a date.
pub fn parse_canonical(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, CANONICAL_FORMAT).ok()
}

/// Render a date in canonical form.
pub fn to_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

fn expand_month_abbreviations(raw: &str) -> String {
    raw.split_whitespace()
        .map(|token| {
            MONTH_ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == token)
                .map_or(token, |(_, full)| *full)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn relative_stamp(raw: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    let delta = if let Some(caps) = HOURS_AGO.captures(raw) {
        Duration::try_hours(caps[1].parse().ok()?)?
    } else if let Some(caps) = MINUTES_AGO.captures(raw) {
        Duration::try_minutes(caps[1].parse().ok()?)?
    } else {
        return None;
    };
    now.checked_sub_signed(delta).map(|at| at.date())
}

fn parse_month_day_year(text: &str) -> Option<NaiveDate> {
    let caps = MONTH_DAY_YEAR.captures(text)?;
    let month_name = caps.get(1)?.as_str().to_ascii_lowercase();
    let month = MONTH_NAMES.iter().position(|name| *name == month_name)? as u32 + 1;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
