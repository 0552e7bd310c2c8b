//! Higher goal domain model.
//!
//! # Invariants
//! - A higher goal has no back-pointer collection; membership is derived by
//!   scanning goals for a matching `higher_goal_id`.

use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type HigherGoalId = Uuid;

const DEFAULT_COLOR: &str = "#4C6EF5";

/// Longer-horizon label that monthly goals may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HigherGoal {
    pub id: HigherGoalId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hex string (`#RRGGBB`) or a named category.
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: i64,
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl HigherGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            color: default_color(),
            created_at: now_epoch_ms(),
            icon: None,
        }
    }
}

/// Id lookup over a higher-goal snapshot.
///
/// Resolving a dangling id yields `None`, never a panic.
#[derive(Debug, Clone, Default)]
pub struct HigherGoalIndex<'a> {
    by_id: HashMap<HigherGoalId, &'a HigherGoal>,
}

impl<'a> HigherGoalIndex<'a> {
    pub fn build(higher_goals: &'a [HigherGoal]) -> Self {
        Self {
            by_id: higher_goals.iter().map(|item| (item.id, item)).collect(),
        }
    }

    pub fn resolve(&self, id: Option<HigherGoalId>) -> Option<&'a HigherGoal> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{HigherGoal, HigherGoalIndex};
    use uuid::Uuid;

    #[test]
    fn index_resolves_known_ids_and_misses_dangling_ones() {
        let items = vec![HigherGoal::new("Health"), HigherGoal::new("Career")];
        let index = HigherGoalIndex::build(&items);

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.resolve(Some(items[1].id)).map(|item| item.title.as_str()),
            Some("Career")
        );
        assert!(index.resolve(Some(Uuid::new_v4())).is_none());
        assert!(index.resolve(None).is_none());
    }
}
