//! Monthly review and final check-in domain model.
//!
//! # Invariants
//! - At most one `MonthlyReview` exists per (year, month); the store enforces
//!   this with a lookup before writing, not with a uniqueness constraint.
//! - `FinalCheckIn::final_progress` is within 0..=100.
//! - `satisfaction_rating`, when present, is within 1..=5.

use crate::model::goal::{GoalId, YearMonth};
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MonthlyReviewId = Uuid;
pub type FinalCheckInId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReview {
    pub id: MonthlyReviewId,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub overall_reflection: String,
    pub created_date: i64,
}

impl MonthlyReview {
    pub fn new(month: YearMonth, overall_reflection: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            year: month.year,
            month: month.month,
            overall_reflection: overall_reflection.into(),
            created_date: now_epoch_ms(),
        }
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        YearMonth::new(self.year, self.month)
    }
}

/// End-of-month record captured per goal during a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalCheckIn {
    pub id: FinalCheckInId,
    pub goal_id: GoalId,
    pub monthly_review_id: MonthlyReviewId,
    pub final_progress: i32,
    #[serde(default)]
    pub achievements: String,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub learnings: String,
    #[serde(default)]
    pub satisfaction_rating: Option<i32>,
    #[serde(default)]
    pub created_at: i64,
}

impl FinalCheckIn {
    pub fn new(goal_id: GoalId, monthly_review_id: MonthlyReviewId, final_progress: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            monthly_review_id,
            final_progress: final_progress.clamp(0, 100),
            achievements: String::new(),
            challenges: String::new(),
            learnings: String::new(),
            satisfaction_rating: None,
            created_at: now_epoch_ms(),
        }
    }

    pub fn is_valid(&self) -> bool {
        (0..=100).contains(&self.final_progress)
            && self
                .satisfaction_rating
                .map_or(true, |rating| (1..=5).contains(&rating))
    }
}
