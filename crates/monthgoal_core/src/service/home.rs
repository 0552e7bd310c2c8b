//! Home screen controller.
//!
//! # Responsibility
//! - Own the displayed month and the sort/group selections.
//! - Derive either the goal-list view or, once the month has a review, the
//!   summary view.
//!
//! # Invariants
//! - Only this controller changes the displayed month.
//! - A month with a review always renders as `HomeView::Summary`.

use crate::confirm::Confirmation;
use crate::model::goal::{Goal, GoalId, YearMonth};
use crate::model::review::{FinalCheckIn, MonthlyReview};
use crate::progress::{filter_goals_for_month, group_goals, sort_goals, GoalGroup, GroupMode, SortMode};
use crate::report::MonthlySummary;
use crate::service::goal_store::{GoalStore, StoreResult};

/// One final check-in with its goal, if the goal still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewedGoal {
    pub final_check_in: FinalCheckIn,
    pub goal: Option<Goal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HomeView {
    Goals {
        month: YearMonth,
        groups: Vec<GoalGroup>,
        /// Goals of the month before the hide-completed filter.
        total_in_month: usize,
    },
    Summary {
        month: YearMonth,
        review: MonthlyReview,
        reviewed: Vec<ReviewedGoal>,
        summary: MonthlySummary,
    },
}

impl HomeView {
    pub fn month(&self) -> YearMonth {
        match self {
            Self::Goals { month, .. } | Self::Summary { month, .. } => *month,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, Self::Summary { .. })
    }
}

/// Per-screen state for the Home view.
#[derive(Debug, Clone)]
pub struct HomeController {
    month: YearMonth,
    sort_mode: SortMode,
    group_mode: GroupMode,
    pending_delete: Confirmation<GoalId>,
}

impl HomeController {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            sort_mode: SortMode::Default,
            group_mode: GroupMode::None,
            pending_delete: Confirmation::Idle,
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    pub fn next_month(&mut self) -> YearMonth {
        self.month = self.month.next();
        self.month
    }

    pub fn previous_month(&mut self) -> YearMonth {
        self.month = self.month.previous();
        self.month
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    pub fn group_mode(&self) -> GroupMode {
        self.group_mode
    }

    pub fn set_group_mode(&mut self, mode: GroupMode) {
        self.group_mode = mode;
    }

    /// Derives the view for the displayed month from the store's streams.
    pub fn view(&self, store: &GoalStore) -> StoreResult<HomeView> {
        if let Some(review) = store.find_review(self.month)? {
            let finals = store.final_check_ins_for_review(review.id)?;
            let summary = MonthlySummary::from_final_check_ins(&finals);
            let reviewed = finals
                .into_iter()
                .map(|final_check_in| ReviewedGoal {
                    goal: store
                        .goals()
                        .iter()
                        .find(|goal| goal.id == final_check_in.goal_id)
                        .cloned(),
                    final_check_in,
                })
                .collect();
            return Ok(HomeView::Summary {
                month: self.month,
                review,
                reviewed,
                summary,
            });
        }

        let hide_completed = store.preferences().hide_completed_goals;
        let total_in_month = filter_goals_for_month(store.goals(), self.month, false).len();
        let visible = filter_goals_for_month(store.goals(), self.month, hide_completed);
        let sorted = sort_goals(visible, self.sort_mode);
        Ok(HomeView::Goals {
            month: self.month,
            groups: group_goals(sorted, self.group_mode, store.higher_goals()),
            total_in_month,
        })
    }

    /// First phase of goal deletion.
    pub fn request_delete(&mut self, goal_id: GoalId) {
        self.pending_delete.request(goal_id);
    }

    pub fn pending_delete(&self) -> Option<GoalId> {
        self.pending_delete.pending().copied()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.cancel();
    }

    /// Second phase: deletes the pending goal, if any.
    pub fn confirm_delete(&mut self, store: &mut GoalStore) -> StoreResult<Option<GoalId>> {
        match self.pending_delete.confirm() {
            Some(goal_id) => {
                store.delete_goal(goal_id)?;
                Ok(Some(goal_id))
            }
            None => Ok(None),
        }
    }
}
