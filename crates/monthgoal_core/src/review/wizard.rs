//! Review wizard state machine.

use crate::model::goal::{Goal, GoalId, YearMonth};
use log::debug;

/// Current wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    /// Final check-in for the goal at this index.
    Goal(usize),
    Reflection,
    Committed,
}

/// Editable per-goal draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDraft {
    pub goal_id: GoalId,
    pub goal_title: String,
    /// Raw text as typed; only empty or 0..=100 integers are accepted.
    pub final_progress: String,
    pub achievements: String,
    pub challenges: String,
    pub learnings: String,
    pub satisfaction_rating: Option<i32>,
}

impl GoalDraft {
    fn from_goal(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            final_progress: goal.current_progress.to_string(),
            achievements: String::new(),
            challenges: String::new(),
            learnings: String::new(),
            satisfaction_rating: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.final_progress.trim().is_empty() && !self.achievements.trim().is_empty()
    }

    /// Parsed progress; unparseable text falls back to 0.
    pub fn parsed_progress(&self) -> i32 {
        self.final_progress
            .trim()
            .parse::<i32>()
            .map_or(0, |value| value.clamp(0, 100))
    }
}

/// One goal's outcome inside a [`ReviewCommit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalEntry {
    pub goal_id: GoalId,
    pub final_progress: i32,
    pub achievements: String,
    pub challenges: String,
    pub learnings: String,
    pub satisfaction_rating: Option<i32>,
}

/// Everything the store writes when the review is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommit {
    pub month: YearMonth,
    pub overall_reflection: String,
    pub entries: Vec<FinalEntry>,
}

/// Multi-step review wizard holding transient drafts until commit.
#[derive(Debug, Clone)]
pub struct ReviewWizard {
    month: YearMonth,
    drafts: Vec<GoalDraft>,
    reflection: String,
    step: ReviewStep,
}

impl ReviewWizard {
    /// Starts a review over `goals`; `None` when there is nothing to review.
    pub fn start(month: YearMonth, goals: &[Goal]) -> Option<Self> {
        if goals.is_empty() {
            return None;
        }
        debug!(
            "event=review_start module=review status=ok month={month} goals={}",
            goals.len()
        );
        Some(Self {
            month,
            drafts: goals.iter().map(GoalDraft::from_goal).collect(),
            reflection: String::new(),
            step: ReviewStep::Goal(0),
        })
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn step(&self) -> ReviewStep {
        self.step
    }

    pub fn drafts(&self) -> &[GoalDraft] {
        &self.drafts
    }

    pub fn draft(&self, index: usize) -> Option<&GoalDraft> {
        self.drafts.get(index)
    }

    /// Draft shown by the current goal step.
    pub fn current_draft(&self) -> Option<&GoalDraft> {
        match self.step {
            ReviewStep::Goal(index) => self.drafts.get(index),
            ReviewStep::Reflection | ReviewStep::Committed => None,
        }
    }

    pub fn reflection(&self) -> &str {
        &self.reflection
    }

    /// Goal steps plus the reflection step.
    pub fn total_steps(&self) -> usize {
        self.drafts.len() + 1
    }

    /// Zero-based position for progress indicators.
    pub fn step_index(&self) -> usize {
        match self.step {
            ReviewStep::Goal(index) => index,
            ReviewStep::Reflection | ReviewStep::Committed => self.drafts.len(),
        }
    }

    /// Input gate for progress text.
    ///
    /// Accepts empty text or an integer within 0..=100; anything else leaves
    /// the draft unchanged and returns `false`.
    pub fn set_final_progress(&mut self, index: usize, text: &str) -> bool {
        if self.step == ReviewStep::Committed || !is_acceptable_progress(text) {
            return false;
        }
        match self.drafts.get_mut(index) {
            Some(draft) => {
                draft.final_progress = text.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_achievements(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.edit_draft(index, |draft, value| draft.achievements = value, text.into())
    }

    pub fn set_challenges(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.edit_draft(index, |draft, value| draft.challenges = value, text.into())
    }

    pub fn set_learnings(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.edit_draft(index, |draft, value| draft.learnings = value, text.into())
    }

    /// Accepts `None` or a rating within 1..=5.
    pub fn set_satisfaction(&mut self, index: usize, rating: Option<i32>) -> bool {
        if rating.is_some_and(|value| !(1..=5).contains(&value)) {
            return false;
        }
        self.edit_draft(index, |draft, value| draft.satisfaction_rating = value, rating)
    }

    pub fn set_reflection(&mut self, text: impl Into<String>) -> bool {
        if self.step == ReviewStep::Committed {
            return false;
        }
        self.reflection = text.into();
        true
    }

    pub fn can_go_next(&self) -> bool {
        match self.step {
            ReviewStep::Goal(index) => self.drafts.get(index).is_some_and(GoalDraft::is_complete),
            ReviewStep::Reflection | ReviewStep::Committed => false,
        }
    }

    /// Advances one step when allowed; returns whether the step changed.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        if let ReviewStep::Goal(index) = self.step {
            self.step = if index + 1 < self.drafts.len() {
                ReviewStep::Goal(index + 1)
            } else {
                ReviewStep::Reflection
            };
        }
        true
    }

    pub fn can_go_previous(&self) -> bool {
        match self.step {
            ReviewStep::Goal(index) => index > 0,
            ReviewStep::Reflection => true,
            ReviewStep::Committed => false,
        }
    }

    /// Moves back one step; no-op at the first goal and after commit.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.step = match self.step {
            ReviewStep::Goal(index) => ReviewStep::Goal(index - 1),
            ReviewStep::Reflection => ReviewStep::Goal(self.drafts.len() - 1),
            ReviewStep::Committed => ReviewStep::Committed,
        };
        true
    }

    pub fn can_complete(&self) -> bool {
        self.step == ReviewStep::Reflection && !self.reflection.trim().is_empty()
    }

    /// Finishes the wizard and returns the commit plan.
    ///
    /// Returns `None` (and stays put) unless on a completable reflection step.
    pub fn complete(&mut self) -> Option<ReviewCommit> {
        if !self.can_complete() {
            return None;
        }
        self.step = ReviewStep::Committed;
        let entries = self
            .drafts
            .iter()
            .map(|draft| FinalEntry {
                goal_id: draft.goal_id,
                final_progress: draft.parsed_progress(),
                achievements: draft.achievements.clone(),
                challenges: draft.challenges.clone(),
                learnings: draft.learnings.clone(),
                satisfaction_rating: draft.satisfaction_rating,
            })
            .collect();
        Some(ReviewCommit {
            month: self.month,
            overall_reflection: self.reflection.clone(),
            entries,
        })
    }

    fn edit_draft<V>(
        &mut self,
        index: usize,
        apply: impl FnOnce(&mut GoalDraft, V),
        value: V,
    ) -> bool {
        if self.step == ReviewStep::Committed {
            return false;
        }
        match self.drafts.get_mut(index) {
            Some(draft) => {
                apply(draft, value);
                true
            }
            None => false,
        }
    }
}

fn is_acceptable_progress(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    trimmed.chars().all(|ch| ch.is_ascii_digit())
        && trimmed
            .parse::<i32>()
            .is_ok_and(|value| (0..=100).contains(&value))
}
