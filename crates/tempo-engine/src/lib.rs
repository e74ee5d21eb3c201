//! # tempo-engine
//!
//! Natural-language date parsing and range resolution for report filters.
//!
//! Chat-driven report tooling receives temporal filters as free text —
//! "últimos 7 dias", "mês passado", "entre 01/11/2025 e 30/11/2025" — and
//! needs precise, timezone-correct day boundaries to put into SQL
//! predicates. This crate is the pure transformation in the middle:
//! Portuguese (Brazilian) expressions with English keyword overlap in,
//! midnight-normalized dates and closed day ranges out.
//!
//! All resolution is deterministic first-match-wins dispatch over ordered
//! rule tables. Unrecognized input resolves to `None`, never a guess and
//! never a panic; the caller decides whether to re-prompt or drop the
//! filter. The `*_at` variants take an explicit anchor instead of reading
//! the wall clock, which is what the tests use and what batch callers
//! should prefer.
//!
//! ## Modules
//!
//! - [`resolve`] — free text → one calendar date at local midnight
//! - [`range`] — free text → closed `[start, end]` day range
//! - [`format`] — Brazilian display formats, persistence format, relative time
//! - [`error`] — error types
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tempo_engine::{parse_date_range_at, to_postgres_date};
//!
//! let anchor = NaiveDate::from_ymd_opt(2025, 3, 15)
//!     .unwrap()
//!     .and_hms_opt(10, 30, 0)
//!     .unwrap();
//!
//! let range = parse_date_range_at("mês passado", anchor).unwrap();
//! assert_eq!(to_postgres_date(range.start()), "2025-02-01");
//! assert_eq!(to_postgres_date(range.end()), "2025-02-28");
//! ```

mod calendar;
pub mod error;
pub mod format;
pub mod range;
pub mod resolve;

pub use error::RangeError;
pub use format::{
    format_br_date, format_br_datetime, relative_time, relative_time_at, to_postgres_date,
};
pub use range::{parse_date_range, parse_date_range_at, DateRange};
pub use resolve::{parse_natural_date, parse_natural_date_at};
