//! Shared calendar arithmetic and locale normalization.
//!
//! Both resolvers and the formatters depend on the same month-boundary
//! semantics, so that logic lives here: day-clamping month shifts, last-day
//! computation, and the Portuguese/English month-name table. Keyword tables
//! are stored unaccented; [`normalize`] folds input to the same form before
//! any matching happens.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

// ── Input normalization ─────────────────────────────────────────────────────

/// Lowercase, trim, and fold Portuguese diacritics to ASCII.
///
/// "Amanhã" and "amanha" normalize to the same string, so every keyword
/// table in the crate holds a single unaccented spelling.
pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_lowercase().chars().map(fold_char).collect()
}

/// Fold one (already lowercased) character to its unaccented form.
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ê' => 'e',
        'í' | 'ì' | 'î' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}

// ── Month names ─────────────────────────────────────────────────────────────

/// Portuguese month names, unaccented, index 0 = January.
const MONTHS_PT: [&str; 12] = [
    "janeiro", "fevereiro", "marco", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

/// English month names; the upstream intent classifier emits either language.
const MONTHS_EN: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Resolve a normalized month name to its 1-based month number.
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    MONTHS_PT
        .iter()
        .position(|&m| m == name)
        .or_else(|| MONTHS_EN.iter().position(|&m| m == name))
        .map(|i| i as u32 + 1)
}

// ── Day boundaries ──────────────────────────────────────────────────────────

/// The date at `00:00:00.000`.
pub(crate) fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The date at `23:59:59.999` (inclusive end-of-day boundary).
pub(crate) fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_milli_opt(23, 59, 59, 999)
}

// ── Month arithmetic ────────────────────────────────────────────────────────

/// Last day of the given month: the day before the first of the next month.
pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// Shift a date by whole months, clamping the day-of-month to the last
/// valid day of the target month. January 31 minus one month is December 31;
/// March 31 minus one month is February 28 (29 in leap years) — the shift
/// never rolls into a neighboring month.
pub(crate) fn shift_months(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let month0 = date.month0() as i32 + delta;
    let year = date.year() + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as u32 + 1;
    let day = date.day().min(last_day_of_month(year, month)?.day());
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Shift a date by whole years with the same day-clamping rule
/// (February 29 clamps to February 28 in non-leap targets).
pub(crate) fn shift_years(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let year = date.year() + delta;
    let day = date.day().min(last_day_of_month(year, date.month())?.day());
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

// ── Tests ───────────────────────────────────────────────────────────────────
