//! Goal domain model.
//!
//! # Responsibility
//! - Define the monthly numeric goal record and its priority levels.
//! - Pack/unpack the `year * 1000 + month` target month encoding.
//! - Keep the legacy integer progress and completion flag in sync with the
//!   precise percentage.
//!
//! # Invariants
//! - `id` is stable for the goal lifetime.
//! - `title` is non-blank.
//! - `is_completed` is only set when progress reaches 100 percent.

use crate::model::higher_goal::HigherGoalId;
use crate::model::now_epoch_ms;
use crate::progress::{calculate_progress, is_complete, legacy_progress};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type GoalId = Uuid;

/// Goal importance used by priority sorting and key-goal grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Middle,
    Low,
}

impl Priority {
    /// Sort rank, lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Middle => 1,
            Self::Low => 2,
        }
    }

    /// Stable storage/interchange name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Middle => "MIDDLE",
            Self::Low => "LOW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MIDDLE" => Some(Self::Middle),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Calendar month addressed by goals and reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1..=12.
    pub month: u32,
}

impl YearMonth {
    pub const MIN_YEAR: i32 = 0;
    /// Largest year whose packed form still fits in `i32`.
    pub const MAX_YEAR: i32 = (i32::MAX - 12) / 1000;

    /// Returns `None` when `month` is outside 1..=12 or `year` is outside
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Current UTC month.
    pub fn current() -> Self {
        let now = time::OffsetDateTime::now_utc();
        Self {
            year: now.year(),
            month: u32::from(u8::from(now.month())),
        }
    }

    /// Packs into the persisted `target_month` encoding.
    ///
    /// Saturates for values built outside `new`; the saturated value never
    /// unpacks to a valid month.
    pub fn pack(self) -> i32 {
        let month = i32::try_from(self.month).unwrap_or(i32::MAX);
        self.year.saturating_mul(1000).saturating_add(month)
    }

    /// Unpacks a `target_month` value; `None` for an invalid month part.
    pub fn from_packed(packed: i32) -> Option<Self> {
        let month = packed % 1000;
        if month <= 0 {
            return None;
        }
        Self::new(packed / 1000, month as u32)
    }

    /// Following month; stays put at December of `MAX_YEAR`.
    pub fn next(self) -> Self {
        if self.month == 12 {
            if self.year >= Self::MAX_YEAR {
                return self;
            }
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Preceding month; stays put at January of `MIN_YEAR`.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            if self.year <= Self::MIN_YEAR {
                return self;
            }
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Validation failures for goal writes.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalValidationError {
    BlankTitle,
    InvalidTargetMonth(i32),
    NonFiniteValue(&'static str),
    ProgressOutOfRange(i32),
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "goal title must not be blank"),
            Self::InvalidTargetMonth(value) => {
                write!(f, "invalid target month encoding `{value}`")
            }
            Self::NonFiniteValue(field) => write!(f, "goal field `{field}` must be finite"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "current_progress `{value}` must be within 0..=100")
            }
        }
    }
}

impl Error for GoalValidationError {}

/// Monthly numeric goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `year * 1000 + month`.
    pub target_month: i32,
    pub start_numeric_value: f64,
    pub target_numeric_value: f64,
    pub current_numeric_value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub is_decimal: bool,
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub higher_goal_id: Option<HigherGoalId>,
    #[serde(default)]
    pub celebration: Option<String>,
    /// Legacy integer progress, 0..=100.
    #[serde(default)]
    pub current_progress: i32,
    #[serde(default)]
    pub created_at: i64,
}

impl Goal {
    /// Creates a goal starting at `start` with no recorded progress.
    pub fn new(
        title: impl Into<String>,
        month: YearMonth,
        start: f64,
        target: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            target_month: month.pack(),
            start_numeric_value: start,
            target_numeric_value: target,
            current_numeric_value: start,
            unit: unit.into(),
            is_decimal: false,
            priority: Priority::Middle,
            is_completed: false,
            display_order: 0,
            higher_goal_id: None,
            celebration: None,
            current_progress: 0,
            created_at: now_epoch_ms(),
        }
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        YearMonth::from_packed(self.target_month)
    }

    /// Precise, unclamped-above progress percentage.
    pub fn progress_percentage(&self) -> f64 {
        calculate_progress(
            self.start_numeric_value,
            self.target_numeric_value,
            self.current_numeric_value,
        )
    }

    /// Sets the current value and re-derives legacy progress and completion.
    pub fn apply_current_value(&mut self, value: f64) {
        self.current_numeric_value = value;
        let pct = self.progress_percentage();
        self.current_progress = legacy_progress(pct);
        self.is_completed = is_complete(pct);
    }

    /// Sets the legacy progress directly, as the review commit does.
    pub fn apply_final_progress(&mut self, progress: i32) {
        self.current_progress = progress.clamp(0, 100);
        self.is_completed = progress >= 100;
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::BlankTitle);
        }
        if YearMonth::from_packed(self.target_month).is_none() {
            return Err(GoalValidationError::InvalidTargetMonth(self.target_month));
        }
        for (field, value) in [
            ("start_numeric_value", self.start_numeric_value),
            ("target_numeric_value", self.target_numeric_value),
            ("current_numeric_value", self.current_numeric_value),
        ] {
            if !value.is_finite() {
                return Err(GoalValidationError::NonFiniteValue(field));
            }
        }
        if !(0..=100).contains(&self.current_progress) {
            return Err(GoalValidationError::ProgressOutOfRange(self.current_progress));
        }
        Ok(())
    }
}
