//! Error types for tempo-engine operations.
//!
//! The resolvers signal "unrecognized expression" with `None` rather than an
//! error — callers decide whether to re-prompt or drop the filter. The only
//! structured error is an invariant violation when building a range by hand.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid date range: start ({start}) is after end ({end})")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}
