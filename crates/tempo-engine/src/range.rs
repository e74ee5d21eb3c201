//! Range resolution: one free-text expression → a closed reporting window.
//!
//! A [`DateRange`] always spans full days: `start` at `00:00:00.000` and
//! `end` at `23:59:59.999`. Relative windows ("últimos 7 dias", "este mês")
//! are anchored to the *end* of the current day, not its start, so a range
//! resolved mid-afternoon still covers activity later the same day.
//!
//! Resolution mirrors the single-date resolver: an ordered rule table,
//! first match wins. Compound "entre X e Y" expressions delegate both
//! halves to the single-date resolver with the same anchor.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calendar::{end_of_day, last_day_of_month, month_from_name, normalize, start_of_day};
use crate::error::RangeError;
use crate::resolve::parse_natural_date_at;

// ── DateRange ───────────────────────────────────────────────────────────────

/// A closed interval of two day-boundary timestamps, `start <= end`.
///
/// Serializes to `{"start": ..., "end": ...}` so resolved ranges can cross
/// the tool-dispatch boundary as JSON and land in a SQL `BETWEEN` predicate
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Build a range from explicit boundaries, validating the ordering
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidRange`] if `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The inclusive lower boundary (`00:00:00.000` of the first day).
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// The inclusive upper boundary (`23:59:59.999` of the last day).
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether a timestamp falls inside the window.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Full-day range over `[first, last]`, normalizing the boundaries.
    /// `first <= last` is the caller's responsibility, which the resolver
    /// rules guarantee by construction.
    fn over_days(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        Some(Self {
            start: start_of_day(first),
            end: end_of_day(last)?,
        })
    }
}

// ── Compiled patterns ───────────────────────────────────────────────────────

struct Patterns {
    // "últimos 7 dias" / "last 7 days"
    last_n_days: Regex,
    // "setembro de 2025", "setembro 2025", "september 2025"
    month_year: Regex,
    // "entre X e Y" / "between X and Y"
    between: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            last_n_days: Regex::new(r"(?:ultimos?\s+(\d+)\s+dias?|last\s+(\d+)\s+days?)").unwrap(),
            month_year: Regex::new(r"^([a-z]+)\s+(?:de\s+)?(\d{4})$").unwrap(),
            between: Regex::new(r"(?:entre|between)\s+(.+?)\s+(?:e|and)\s+(.+)").unwrap(),
        }
    }
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::new)
}

// ── Public API ──────────────────────────────────────────────────────────────

/// Resolve a free-text expression to a closed date range, anchored at the
/// current wall-clock time.
///
/// Returns `None` for empty or unrecognized input; never panics.
///
/// # Examples
///
/// ```
/// use tempo_engine::parse_date_range;
///
/// let range = parse_date_range("últimos 7 dias").unwrap();
/// assert!(range.start() < range.end());
/// assert!(parse_date_range("banana").is_none());
/// ```
pub fn parse_date_range(text: &str) -> Option<DateRange> {
    parse_date_range_at(text, chrono::Local::now().naive_local())
}

/// Resolve a free-text expression against an explicit anchor.
///
/// The anchor is snapshotted once: relative windows are computed from the
/// anchor's end-of-day reference, and "entre X e Y" halves resolve against
/// the same anchor the outer call received.
pub fn parse_date_range_at(text: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }

    for rule in RULES {
        if let Some(range) = rule(&normalized, anchor) {
            return Some(range);
        }
    }
    None
}

// ── Rule table ──────────────────────────────────────────────────────────────

type RangeRule = fn(&str, NaiveDateTime) -> Option<DateRange>;

/// Ordered first-match-wins rule table. Relative windows are checked before
/// named months so "últimos 30 dias" never reaches the month-name lookup.
const RULES: &[RangeRule] = &[
    last_n_days_rule,
    this_week_rule,
    this_month_rule,
    last_month_rule,
    this_year_rule,
    named_month_rule,
    between_rule,
];

/// "últimos N dias" / "last N days": N full days back from end-of-today.
fn last_n_days_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    let caps = patterns().last_n_days.captures(input)?;
    let n: i64 = caps
        .get(1)
        .or_else(|| caps.get(2))?
        .as_str()
        .parse()
        .ok()?;
    let today = anchor.date();
    let first = today.checked_sub_signed(Duration::try_days(n)?)?;
    DateRange::over_days(first, today)
}

/// "esta semana" / "this week": most recent Sunday through end-of-today.
fn this_week_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    if !input.contains("esta semana") && !input.contains("this week") {
        return None;
    }
    let today = anchor.date();
    let back = today.weekday().num_days_from_sunday() as i64;
    let sunday = today.checked_sub_signed(Duration::days(back))?;
    DateRange::over_days(sunday, today)
}

/// "este mês" / "this month": first of the month through end-of-today.
fn this_month_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    if !input.contains("este mes") && !input.contains("this month") {
        return None;
    }
    let today = anchor.date();
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
    DateRange::over_days(first, today)
}

/// "mês passado" / "last month": the full previous calendar month.
fn last_month_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    if !input.contains("mes passado") && !input.contains("last month") {
        return None;
    }
    let today = anchor.date();
    // Day before the first of the current month is the last day of the
    // previous one; its year/month give the window.
    let first_current = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
    let last_prev = first_current.pred_opt()?;
    let first_prev = NaiveDate::from_ymd_opt(last_prev.year(), last_prev.month(), 1)?;
    DateRange::over_days(first_prev, last_prev)
}

/// "este ano" and its contractions / "this year": January 1 through
/// end-of-today.
fn this_year_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    const PHRASES: [&str; 5] = ["este ano", "esse ano", "neste ano", "nesse ano", "this year"];
    if !PHRASES.iter().any(|p| input.contains(p)) {
        return None;
    }
    let today = anchor.date();
    let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
    DateRange::over_days(jan1, today)
}

/// Named month, with or without an explicit year: "setembro de 2025",
/// "março" (current year). Covers the whole calendar month.
fn named_month_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    let (month, year) = if let Some(caps) = patterns().month_year.captures(input) {
        let month = month_from_name(caps.get(1)?.as_str())?;
        let year: i32 = caps.get(2)?.as_str().parse().ok()?;
        (month, year)
    } else {
        (month_from_name(input)?, anchor.date().year())
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    DateRange::over_days(first, last_day_of_month(year, month)?)
}

/// "entre X e Y" / "between X and Y": both halves through the single-date
/// resolver with the same anchor. Either half failing fails the whole
/// expression — no partial ranges. Reversed halves are reordered.
fn between_rule(input: &str, anchor: NaiveDateTime) -> Option<DateRange> {
    let caps = patterns().between.captures(input)?;
    let first = parse_natural_date_at(caps.get(1)?.as_str(), anchor)?.date();
    let second = parse_natural_date_at(caps.get(2)?.as_str(), anchor)?.date();
    let (lo, hi) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    DateRange::over_days(lo, hi)
}

// ── Tests ───────────────────────────────────────────────────────────────────
