//! Domain model for monthly goals, check-ins and reviews.
//!
//! # Responsibility
//! - Define the value records persisted by the repository layer.
//! - Provide constructors and validation helpers shared by all write paths.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - Cross-record links (`goal_id`, `higher_goal_id`, `monthly_review_id`)
//!   are lookup keys, not ownership; a dangling link resolves to "not found".

pub mod action_step;
pub mod check_in;
pub mod goal;
pub mod higher_goal;
pub mod review;

use time::OffsetDateTime;

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}
