//! Action step domain model.
//!
//! Concrete sub-tasks listed under one goal, ordered by `display_order`.

use crate::model::goal::GoalId;
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ActionStepId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    pub id: ActionStepId,
    pub goal_id: GoalId,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: i64,
}

impl ActionStep {
    pub fn new(goal_id: GoalId, title: impl Into<String>, display_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            title: title.into(),
            is_completed: false,
            display_order,
            created_at: now_epoch_ms(),
        }
    }
}
