//! Flutter-facing bridge for the MonthGoal core.

pub mod api;
