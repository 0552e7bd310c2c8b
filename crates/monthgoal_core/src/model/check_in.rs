//! Check-in domain model.
//!
//! A check-in is a timestamped progress snapshot for one goal. It is never
//! edited implicitly; only explicit update/delete calls change it.

use crate::model::goal::GoalId;
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CheckInId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    /// Weak reference to the owning goal.
    pub goal_id: GoalId,
    /// 0..=100.
    pub progress_percent: i32,
    #[serde(default)]
    pub comment: String,
    /// Unix epoch milliseconds.
    pub check_in_date: i64,
}

impl CheckIn {
    /// Creates a check-in dated now. `progress_percent` is clamped to 0..=100.
    pub fn new(goal_id: GoalId, progress_percent: i32, comment: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            progress_percent: progress_percent.clamp(0, 100),
            comment: comment.into(),
            check_in_date: now_epoch_ms(),
        }
    }

    pub fn is_valid(&self) -> bool {
        (0..=100).contains(&self.progress_percent)
    }
}
