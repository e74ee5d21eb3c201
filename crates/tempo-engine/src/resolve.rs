//! Single-date resolution: one free-text expression → one calendar date.
//!
//! Keywords and phrases are Portuguese-first with English overlap, matched
//! against diacritic-folded input ("amanhã" and "amanha" are the same
//! expression). Every successful parse is normalized to local midnight.
//!
//! Resolution runs an ordered rule table, first match wins — the order is
//! the tie-break policy, not an optimization. A final fallback hands the
//! original string to the structured datetime parsers for inputs such as
//! RFC 3339 timestamps coming straight from an upstream tool call.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::calendar::{normalize, shift_months, shift_years, start_of_day};

// ── Compiled patterns ───────────────────────────────────────────────────────

/// Regex patterns for "N units ago" phrases and date literals.
struct Patterns {
    // "3 dias atrás", "3 days ago"
    days_ago: Regex,
    // "2 semanas atrás", "2 weeks ago"
    weeks_ago: Regex,
    // "6 meses atrás", "6 months ago"
    months_ago: Regex,
    // Brazilian literal: 15/11/2025, 1/3/2025
    br_literal: Regex,
    // ISO literal: 2025-11-25
    iso_literal: Regex,
}

impl Patterns {
    fn new() -> Self {
        // Input is lowercased and diacritic-folded before matching, so the
        // accented spellings ("mês", "atrás") are covered by their folded
        // forms.
        Self {
            days_ago: Regex::new(r"(\d+)\s*(?:dias?|days?)\s*(?:atras|ago)").unwrap(),
            weeks_ago: Regex::new(r"(\d+)\s*(?:semanas?|weeks?)\s*(?:atras|ago)").unwrap(),
            months_ago: Regex::new(r"(\d+)\s*(?:mes(?:es)?|months?)\s*(?:atras|ago)").unwrap(),
            br_literal: Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap(),
            iso_literal: Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap(),
        }
    }
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::new)
}

// ── Public API ──────────────────────────────────────────────────────────────

/// Resolve a free-text expression to a calendar date at local midnight,
/// anchored at the current wall-clock time.
///
/// Returns `None` for empty or unrecognized input; never panics.
///
/// # Examples
///
/// ```
/// use tempo_engine::parse_natural_date;
///
/// assert!(parse_natural_date("hoje").is_some());
/// assert!(parse_natural_date("15/11/2025").is_some());
/// assert!(parse_natural_date("banana").is_none());
/// ```
pub fn parse_natural_date(text: &str) -> Option<NaiveDateTime> {
    parse_natural_date_at(text, chrono::Local::now().naive_local())
}

/// Resolve a free-text expression against an explicit anchor.
///
/// The anchor is the "current moment" every relative expression is computed
/// from; it is threaded through the whole resolution so a single logical
/// call never observes two different nows. Range resolution reuses this
/// entry point for the halves of "entre X e Y" expressions.
pub fn parse_natural_date_at(text: &str, anchor: NaiveDateTime) -> Option<NaiveDateTime> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }

    for rule in RULES {
        if let Some(date) = rule(&normalized, anchor) {
            return Some(start_of_day(date));
        }
    }

    // Last resort: structured datetime parsing of the original string.
    // The result is truncated to midnight like every other branch.
    fallback_parse(text).map(start_of_day)
}

// ── Rule table ──────────────────────────────────────────────────────────────

type DateRule = fn(&str, NaiveDateTime) -> Option<NaiveDate>;

/// Ordered first-match-wins rule table. Keyword rules come before the
/// "N units ago" patterns, which come before date literals.
const RULES: &[DateRule] = &[
    keyword_rule,
    relative_phrase_rule,
    units_ago_rule,
    literal_rule,
];

/// Exact keywords: hoje/ontem/amanhã and the English equivalents.
fn keyword_rule(input: &str, anchor: NaiveDateTime) -> Option<NaiveDate> {
    let today = anchor.date();
    match input {
        "hoje" | "today" => Some(today),
        "ontem" | "yesterday" => today.pred_opt(),
        "amanha" | "tomorrow" => today.succ_opt(),
        _ => None,
    }
}

/// Substring phrases: "semana passada", "mês passado", "ano passado".
/// Checked week → month → year; the first satisfied phrase wins.
fn relative_phrase_rule(input: &str, anchor: NaiveDateTime) -> Option<NaiveDate> {
    let today = anchor.date();
    if input.contains("semana passada") || input.contains("last week") {
        return today.checked_sub_signed(Duration::days(7));
    }
    if input.contains("mes passado") || input.contains("ultimo mes") || input.contains("last month")
    {
        return shift_months(today, -1);
    }
    if input.contains("ano passado") || input.contains("last year") {
        return shift_years(today, -1);
    }
    None
}

/// "N units ago" patterns, checked days → weeks → months.
fn units_ago_rule(input: &str, anchor: NaiveDateTime) -> Option<NaiveDate> {
    let today = anchor.date();
    let patterns = patterns();

    if let Some(caps) = patterns.days_ago.captures(input) {
        let n: i64 = caps[1].parse().ok()?;
        return today.checked_sub_signed(Duration::try_days(n)?);
    }
    if let Some(caps) = patterns.weeks_ago.captures(input) {
        let n: i64 = caps[1].parse().ok()?;
        return today.checked_sub_signed(Duration::try_days(n.checked_mul(7)?)?);
    }
    if let Some(caps) = patterns.months_ago.captures(input) {
        let n: i32 = caps[1].parse().ok()?;
        return shift_months(today, n.checked_neg()?);
    }
    None
}

/// Date literals: Brazilian D/M/YYYY first, then ISO YYYY-MM-DD.
/// Invalid calendar dates (32/13/2025) fail the whole rule rather than
/// clamping to something plausible.
fn literal_rule(input: &str, _anchor: NaiveDateTime) -> Option<NaiveDate> {
    let patterns = patterns();

    if let Some(caps) = patterns.br_literal.captures(input) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Some(caps) = patterns.iso_literal.captures(input) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    None
}

/// Generic datetime parsing of the unnormalized input: RFC 3339 first,
/// then the common T-separated and space-separated naive forms.
fn fallback_parse(original: &str) -> Option<NaiveDate> {
    let s = original.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Saturday, March 15, 2025, 10:30 local.
    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_hoje_today() {
        assert_eq!(parse_natural_date_at("hoje", anchor()), Some(midnight(2025, 3, 15)));
        assert_eq!(parse_natural_date_at("Today", anchor()), Some(midnight(2025, 3, 15)));
    }

    #[test]
    fn test_ontem_yesterday() {
        assert_eq!(parse_natural_date_at("ontem", anchor()), Some(midnight(2025, 3, 14)));
        assert_eq!(
            parse_natural_date_at("yesterday", anchor()),
            Some(midnight(2025, 3, 14))
        );
    }

    #[test]
    fn test_amanha_accented_and_plain() {
        assert_eq!(parse_natural_date_at("amanhã", anchor()), Some(midnight(2025, 3, 16)));
        assert_eq!(parse_natural_date_at("amanha", anchor()), Some(midnight(2025, 3, 16)));
        assert_eq!(
            parse_natural_date_at("tomorrow", anchor()),
            Some(midnight(2025, 3, 16))
        );
    }

    #[test]
    fn test_semana_passada() {
        assert_eq!(
            parse_natural_date_at("semana passada", anchor()),
            Some(midnight(2025, 3, 8))
        );
        assert_eq!(
            parse_natural_date_at("last week", anchor()),
            Some(midnight(2025, 3, 8))
        );
    }

    #[test]
    fn test_mes_passado_variants() {
        assert_eq!(
            parse_natural_date_at("mês passado", anchor()),
            Some(midnight(2025, 2, 15))
        );
        assert_eq!(
            parse_natural_date_at("último mês", anchor()),
            Some(midnight(2025, 2, 15))
        );
        assert_eq!(
            parse_natural_date_at("last month", anchor()),
            Some(midnight(2025, 2, 15))
        );
    }

    #[test]
    fn test_mes_passado_clamps_to_month_end() {
        // March 31 minus one month: February has no day 31
        let eom = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(
            parse_natural_date_at("mês passado", eom),
            Some(midnight(2025, 2, 28))
        );

        let leap = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(
            parse_natural_date_at("mês passado", leap),
            Some(midnight(2024, 2, 29))
        );
    }

    #[test]
    fn test_ano_passado() {
        assert_eq!(
            parse_natural_date_at("ano passado", anchor()),
            Some(midnight(2024, 3, 15))
        );
    }

    #[test]
    fn test_n_dias_atras() {
        assert_eq!(
            parse_natural_date_at("3 dias atrás", anchor()),
            Some(midnight(2025, 3, 12))
        );
        assert_eq!(
            parse_natural_date_at("3 dias atras", anchor()),
            Some(midnight(2025, 3, 12))
        );
        assert_eq!(
            parse_natural_date_at("10 days ago", anchor()),
            Some(midnight(2025, 3, 5))
        );
    }

    #[test]
    fn test_n_semanas_atras() {
        assert_eq!(
            parse_natural_date_at("2 semanas atrás", anchor()),
            Some(midnight(2025, 3, 1))
        );
        assert_eq!(
            parse_natural_date_at("2 weeks ago", anchor()),
            Some(midnight(2025, 3, 1))
        );
    }

    #[test]
    fn test_n_meses_atras() {
        assert_eq!(
            parse_natural_date_at("2 meses atrás", anchor()),
            Some(midnight(2025, 1, 15))
        );
        // Calendar-month arithmetic with clamping, not 30-day blocks
        let may31 = NaiveDate::from_ymd_opt(2025, 5, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            parse_natural_date_at("1 month ago", may31),
            Some(midnight(2025, 4, 30))
        );
    }

    #[test]
    fn test_br_literal() {
        assert_eq!(
            parse_natural_date_at("15/11/2025", anchor()),
            Some(midnight(2025, 11, 15))
        );
        assert_eq!(
            parse_natural_date_at("1/3/2025", anchor()),
            Some(midnight(2025, 3, 1))
        );
    }

    #[test]
    fn test_br_literal_invalid_calendar_date() {
        assert_eq!(parse_natural_date_at("32/13/2025", anchor()), None);
        assert_eq!(parse_natural_date_at("31/02/2025", anchor()), None);
        assert_eq!(parse_natural_date_at("29/02/2024", anchor()), Some(midnight(2024, 2, 29)));
    }

    #[test]
    fn test_iso_literal() {
        assert_eq!(
            parse_natural_date_at("2025-11-25", anchor()),
            Some(midnight(2025, 11, 25))
        );
        assert_eq!(parse_natural_date_at("2025-13-01", anchor()), None);
    }

    #[test]
    fn test_fallback_rfc3339_truncated_to_midnight() {
        assert_eq!(
            parse_natural_date_at("2025-11-25T14:30:00-03:00", anchor()),
            Some(midnight(2025, 11, 25))
        );
        assert_eq!(
            parse_natural_date_at("2025-11-25 14:30:00", anchor()),
            Some(midnight(2025, 11, 25))
        );
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(parse_natural_date_at("", anchor()), None);
        assert_eq!(parse_natural_date_at("   ", anchor()), None);
        assert_eq!(parse_natural_date_at("banana", anchor()), None);
    }

    #[test]
    fn test_huge_offsets_fail_instead_of_panicking() {
        assert_eq!(
            parse_natural_date_at("999999999999999999 dias atras", anchor()),
            None
        );
        assert_eq!(
            parse_natural_date_at("99999999999999999999999 dias atras", anchor()),
            None
        );
    }

    proptest! {
        #[test]
        fn prop_never_panics(s in "\\PC*") {
            let _ = parse_natural_date_at(&s, anchor());
        }

        #[test]
        fn prop_results_are_midnight(s in "\\PC*") {
            if let Some(dt) = parse_natural_date_at(&s, anchor()) {
                prop_assert_eq!(dt.time(), chrono::NaiveTime::MIN);
            }
        }
    }
}
