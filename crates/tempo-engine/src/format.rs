//! Display and persistence formatting for resolved dates.
//!
//! The parse boundary owns all the `Option` handling; by the time a value
//! reaches these functions it is a valid `NaiveDateTime`, so formatting is
//! infallible. Relative-time descriptions are Portuguese, bucketed into the
//! coarsest unit with a value of at least one.

use chrono::NaiveDateTime;

/// Brazilian date format: zero-padded `DD/MM/YYYY`.
pub fn format_br_date(date: NaiveDateTime) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Brazilian datetime format: `DD/MM/YYYY HH:MM`, 24-hour clock.
pub fn format_br_datetime(date: NaiveDateTime) -> String {
    date.format("%d/%m/%Y %H:%M").to_string()
}

/// Persistence format: zero-padded `YYYY-MM-DD`, suitable for a date-typed
/// column filter.
pub fn to_postgres_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Portuguese relative-time description against the current wall clock.
///
/// See [`relative_time_at`] for the bucketing rules.
pub fn relative_time(past: NaiveDateTime) -> String {
    relative_time_at(past, chrono::Local::now().naive_local())
}

/// Portuguese relative-time description of `past` as seen from `now`.
///
/// Buckets, floored: under 60 s → "agora mesmo"; minutes under an hour;
/// hours under a day; days under a week; weeks (elapsed days / 7) under
/// 30 days; months (elapsed days / 30) under a year; years (elapsed
/// days / 365) beyond that. Timestamps in the future (clock skew between
/// the writer and the reader) also report "agora mesmo".
pub fn relative_time_at(past: NaiveDateTime, now: NaiveDateTime) -> String {
    let seconds = (now - past).num_seconds();
    if seconds < 60 {
        return "agora mesmo".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return unit_phrase(minutes, "minuto", "minutos");
    }

    let hours = seconds / 3600;
    if hours < 24 {
        return unit_phrase(hours, "hora", "horas");
    }

    let days = seconds / 86_400;
    if days < 7 {
        return unit_phrase(days, "dia", "dias");
    }
    if days < 30 {
        return unit_phrase(days / 7, "semana", "semanas");
    }
    if days < 365 {
        return unit_phrase(days / 30, "mês", "meses");
    }
    unit_phrase(days / 365, "ano", "anos")
}

fn unit_phrase(count: i64, singular: &str, plural: &str) -> String {
    let unit = if count == 1 { singular } else { plural };
    format!("há {count} {unit}")
}

// ── Tests ───────────────────────────────────────────────────────────────────
