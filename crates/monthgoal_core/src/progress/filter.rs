//! Month filtering, sort-order application and grouping of goal lists.

use crate::model::goal::{Goal, Priority, YearMonth};
use crate::model::higher_goal::{HigherGoal, HigherGoalId, HigherGoalIndex};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Goal list ordering selected on the Home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending `display_order`.
    #[default]
    Default,
    /// High, then Middle, then Low.
    Priority,
    /// Descending precise progress percentage.
    Progress,
}

/// Goal list bucketing selected on the Home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    #[default]
    None,
    HigherGoal,
    KeyGoal,
}

/// Identity of one bucket produced by [`group_goals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    All,
    HigherGoal(HigherGoalId),
    Ungrouped,
    KeyGoals,
    OtherGoals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalGroup {
    pub key: GroupKey,
    /// Display label; the higher goal title for `GroupKey::HigherGoal`.
    pub label: String,
    pub goals: Vec<Goal>,
}

/// Returns goals whose packed `target_month` matches `month`.
///
/// Completed goals are dropped when `hide_completed` is set.
pub fn filter_goals_for_month(goals: &[Goal], month: YearMonth, hide_completed: bool) -> Vec<Goal> {
    goals
        .iter()
        .filter(|goal| {
            goal.target_month / 1000 == month.year
                && goal.target_month % 1000 == month.month as i32
        })
        .filter(|goal| !(hide_completed && goal.is_completed))
        .cloned()
        .collect()
}

/// Applies `mode` with a stable sort.
pub fn sort_goals(mut goals: Vec<Goal>, mode: SortMode) -> Vec<Goal> {
    match mode {
        SortMode::Default => goals.sort_by_key(|goal| goal.display_order),
        SortMode::Priority => goals.sort_by_key(|goal| goal.priority.rank()),
        SortMode::Progress => goals.sort_by(|left, right| {
            right
                .progress_percentage()
                .partial_cmp(&left.progress_percentage())
                .unwrap_or(Ordering::Equal)
        }),
    }
    goals
}

/// Buckets already-sorted goals.
///
/// - `None`: one flat group, even when empty.
/// - `HigherGoal`: one bucket per referenced higher goal ordered by its
///   `created_at`, then an `Ungrouped` bucket for absent or dangling
///   references. Empty buckets are omitted.
/// - `KeyGoal`: `High` priority goals first, then the rest. Empty buckets are
///   omitted.
pub fn group_goals(goals: Vec<Goal>, mode: GroupMode, higher_goals: &[HigherGoal]) -> Vec<GoalGroup> {
    match mode {
        GroupMode::None => vec![GoalGroup {
            key: GroupKey::All,
            label: String::new(),
            goals,
        }],
        GroupMode::HigherGoal => group_by_higher_goal(goals, higher_goals),
        GroupMode::KeyGoal => {
            let (key, other): (Vec<Goal>, Vec<Goal>) = goals
                .into_iter()
                .partition(|goal| goal.priority == Priority::High);
            [
                (GroupKey::KeyGoals, "Key goals", key),
                (GroupKey::OtherGoals, "Other goals", other),
            ]
            .into_iter()
            .filter(|(_, _, goals)| !goals.is_empty())
            .map(|(key, label, goals)| GoalGroup {
                key,
                label: label.to_string(),
                goals,
            })
            .collect()
        }
    }
}

fn group_by_higher_goal(goals: Vec<Goal>, higher_goals: &[HigherGoal]) -> Vec<GoalGroup> {
    let index = HigherGoalIndex::build(higher_goals);
    let mut buckets: HashMap<HigherGoalId, Vec<Goal>> = HashMap::new();
    let mut ungrouped = Vec::new();

    for goal in goals {
        match index.resolve(goal.higher_goal_id) {
            Some(parent) => buckets.entry(parent.id).or_default().push(goal),
            None => ungrouped.push(goal),
        }
    }

    let mut parents: Vec<&HigherGoal> = higher_goals
        .iter()
        .filter(|parent| buckets.contains_key(&parent.id))
        .collect();
    parents.sort_by(|left, right| {
        left.created_at
            .cmp(&right.created_at)
            .then_with(|| left.id.cmp(&right.id))
    });

    let mut groups = Vec::with_capacity(parents.len() + 1);
    for parent in parents {
        if let Some(goals) = buckets.remove(&parent.id) {
            groups.push(GoalGroup {
                key: GroupKey::HigherGoal(parent.id),
                label: parent.title.clone(),
                goals,
            });
        }
    }
    if !ungrouped.is_empty() {
        groups.push(GoalGroup {
            key: GroupKey::Ungrouped,
            label: "Ungrouped".to_string(),
            goals: ungrouped,
        });
    }
    groups
}
