//! Progress computation and month-partition filtering.
//!
//! # Responsibility
//! - Derive precise progress percentages from start/target/current values.
//! - Format numeric values for display.
//! - Filter, sort and group goal lists for one month.
//!
//! # Invariants
//! - Progress is clamped at 0 but never above 100 (overachievement is kept).
//! - Sorting is stable: equal keys keep their incoming relative order.

pub mod filter;
pub mod percentage;

pub use filter::{
    filter_goals_for_month, group_goals, sort_goals, GoalGroup, GroupKey, GroupMode, SortMode,
};
pub use percentage::{
    calculate_progress, format_number, format_number_localized, format_percentage, is_complete,
    legacy_progress, NumberLocale,
};
