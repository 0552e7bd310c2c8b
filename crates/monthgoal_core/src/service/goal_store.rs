//! Repository facade over every gateway.
//!
//! # Responsibility
//! - Own the SQLite connection and hand out per-call gateways.
//! - Provide multi-table use-cases: goal append/reorder, check-in recording,
//!   cascading goal deletion, review commit and export snapshots.
//! - Re-publish push streams after every mutation.
//!
//! # Invariants
//! - The store is the single writer of durable state and of its streams.
//! - Multi-row writes (check-in, delete, review commit, import) run in one
//!   transaction each.
//! - At most one monthly review is written per (year, month).

use crate::db::schema::ENTITY_TABLES;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::action_step::{ActionStep, ActionStepId};
use crate::model::check_in::{CheckIn, CheckInId};
use crate::model::goal::{Goal, GoalId, GoalValidationError, YearMonth};
use crate::model::higher_goal::{HigherGoal, HigherGoalId};
use crate::model::review::{FinalCheckIn, MonthlyReview, MonthlyReviewId};
use crate::observe::{Observable, Subscription};
use crate::repo::action_step_repo::{ActionStepRepository, SqliteActionStepRepository};
use crate::repo::check_in_repo::{CheckInRepository, SqliteCheckInRepository};
use crate::repo::goal_repo::{GoalRepository, SqliteGoalRepository};
use crate::repo::higher_goal_repo::{HigherGoalRepository, SqliteHigherGoalRepository};
use crate::repo::preference_repo::{
    PreferenceKey, PreferenceRepository, Preferences, SqlitePreferenceRepository,
};
use crate::repo::review_repo::{
    FinalCheckInRepository, MonthlyReviewRepository, SqliteReviewRepository,
};
use crate::repo::{ensure_connection_ready, RepoError};
use crate::review::ReviewCommit;
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Facade error for multi-table use-cases.
#[derive(Debug)]
pub enum StoreError {
    GoalNotFound(GoalId),
    ReviewNotFound(MonthlyReviewId),
    /// A value-level precondition failed (e.g. non-finite check-in value).
    InvalidInput(String),
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::ReviewNotFound(id) => write!(f, "monthly review not found: {id}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Full multi-table read used by export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    pub goals: Vec<Goal>,
    pub higher_goals: Vec<HigherGoal>,
    pub action_steps: Vec<ActionStep>,
    pub check_ins: Vec<CheckIn>,
    pub monthly_reviews: Vec<MonthlyReview>,
    pub final_check_ins: Vec<FinalCheckIn>,
}

/// Single entry point for persistence, owning the connection and streams.
pub struct GoalStore {
    conn: Connection,
    goals: Observable<Vec<Goal>>,
    higher_goals: Observable<Vec<HigherGoal>>,
    reviews: Observable<Vec<MonthlyReview>>,
    preferences: Observable<Preferences>,
}

impl GoalStore {
    /// Wraps an already migrated connection and loads initial stream values.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        ensure_connection_ready(&conn)?;
        let goals = SqliteGoalRepository::new_unchecked(&conn).list_goals()?;
        let higher_goals = SqliteHigherGoalRepository::new_unchecked(&conn).list_higher_goals()?;
        let reviews = SqliteReviewRepository::new_unchecked(&conn).list_reviews()?;
        let preferences = SqlitePreferenceRepository::new_unchecked(&conn).load_preferences()?;

        Ok(Self {
            conn,
            goals: Observable::new(goals),
            higher_goals: Observable::new(higher_goals),
            reviews: Observable::new(reviews),
            preferences: Observable::new(preferences),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::new(open_db(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(open_db_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn subscribe_goals(&mut self) -> Subscription<Vec<Goal>> {
        self.goals.subscribe()
    }

    pub fn subscribe_higher_goals(&mut self) -> Subscription<Vec<HigherGoal>> {
        self.higher_goals.subscribe()
    }

    pub fn subscribe_reviews(&mut self) -> Subscription<Vec<MonthlyReview>> {
        self.reviews.subscribe()
    }

    pub fn subscribe_preferences(&mut self) -> Subscription<Preferences> {
        self.preferences.subscribe()
    }

    /// Current goal stream value (every goal, all months).
    pub fn goals(&self) -> &[Goal] {
        self.goals.current()
    }

    pub fn higher_goals(&self) -> &[HigherGoal] {
        self.higher_goals.current()
    }

    pub fn reviews(&self) -> &[MonthlyReview] {
        self.reviews.current()
    }

    pub fn preferences(&self) -> Preferences {
        *self.preferences.current()
    }

    /// Persists a new goal appended after the last goal of its month.
    pub fn add_goal(&mut self, mut goal: Goal) -> StoreResult<Goal> {
        let month = goal.year_month().ok_or_else(|| {
            RepoError::from(GoalValidationError::InvalidTargetMonth(goal.target_month))
        })?;
        let repo = self.goal_repo();
        goal.display_order = repo.max_display_order(month)?.map_or(0, |max| max + 1);
        repo.create_goal(&goal)?;
        info!(
            "event=goal_add module=store status=ok month={month} display_order={}",
            goal.display_order
        );
        self.refresh_goals()?;
        Ok(goal)
    }

    pub fn update_goal(&mut self, goal: &Goal) -> StoreResult<()> {
        self.goal_repo().update_goal(goal).map_err(not_found_as_goal)?;
        self.refresh_goals()
    }

    pub fn get_goal(&self, id: GoalId) -> StoreResult<Option<Goal>> {
        Ok(self.goal_repo().get_goal(id)?)
    }

    pub fn list_goals_for_month(&self, month: YearMonth) -> StoreResult<Vec<Goal>> {
        Ok(self.goal_repo().list_goals_for_month(month)?)
    }

    /// Goals whose weak reference points at `higher_goal_id`.
    pub fn goals_for_higher_goal(&self, higher_goal_id: HigherGoalId) -> StoreResult<Vec<Goal>> {
        Ok(self.goal_repo().list_goals_for_higher_goal(higher_goal_id)?)
    }

    /// Deletes a goal with its check-ins, action steps and final check-ins.
    pub fn delete_goal(&mut self, id: GoalId) -> StoreResult<()> {
        let (check_ins, steps, finals) = self.in_transaction(|conn| {
            SqliteGoalRepository::new_unchecked(conn)
                .delete_goal(id)
                .map_err(not_found_as_goal)?;
            let check_ins =
                SqliteCheckInRepository::new_unchecked(conn).delete_check_ins_for_goal(id)?;
            let steps =
                SqliteActionStepRepository::new_unchecked(conn).delete_action_steps_for_goal(id)?;
            let finals =
                SqliteReviewRepository::new_unchecked(conn).delete_final_check_ins_for_goal(id)?;
            Ok((check_ins, steps, finals))
        })?;
        info!(
            "event=goal_delete module=store status=ok check_ins={check_ins} action_steps={steps} final_check_ins={finals}"
        );
        self.refresh_goals()
    }

    /// Moves a goal to `new_index` within its month and renumbers the month.
    pub fn reorder_goal(&mut self, id: GoalId, new_index: usize) -> StoreResult<()> {
        let goal = self.get_goal(id)?.ok_or(StoreError::GoalNotFound(id))?;
        let month = goal
            .year_month()
            .ok_or_else(|| StoreError::InvalidInput(format!("goal {id} has invalid month")))?;

        self.in_transaction(|conn| {
            let repo = SqliteGoalRepository::new_unchecked(conn);
            let mut month_goals = repo.list_goals_for_month(month)?;
            let from = month_goals
                .iter()
                .position(|item| item.id == id)
                .ok_or(StoreError::GoalNotFound(id))?;
            let moved = month_goals.remove(from);
            let target = new_index.min(month_goals.len());
            month_goals.insert(target, moved);

            for (order, item) in month_goals.iter_mut().enumerate() {
                let order = i32::try_from(order)
                    .map_err(|_| StoreError::InvalidInput("too many goals".to_string()))?;
                if item.display_order != order {
                    item.display_order = order;
                    repo.update_goal(item)?;
                }
            }
            Ok(())
        })?;
        self.refresh_goals()
    }

    /// Records a new current value for a goal.
    ///
    /// Writes a check-in carrying the legacy percentage and updates the goal's
    /// current value, legacy progress and completion in one transaction.
    pub fn record_check_in(
        &mut self,
        goal_id: GoalId,
        current_value: f64,
        comment: impl Into<String>,
    ) -> StoreResult<CheckIn> {
        if !current_value.is_finite() {
            return Err(StoreError::InvalidInput(
                "check-in value must be finite".to_string(),
            ));
        }
        let comment = comment.into();
        let check_in = self.in_transaction(|conn| {
            let goals = SqliteGoalRepository::new_unchecked(conn);
            let mut goal = goals
                .get_goal(goal_id)?
                .ok_or(StoreError::GoalNotFound(goal_id))?;
            goal.apply_current_value(current_value);
            goals.update_goal(&goal)?;

            let check_in = CheckIn::new(goal_id, goal.current_progress, comment);
            SqliteCheckInRepository::new_unchecked(conn).create_check_in(&check_in)?;
            Ok(check_in)
        })?;
        self.refresh_goals()?;
        Ok(check_in)
    }

    pub fn list_check_ins_for_goal(&self, goal_id: GoalId) -> StoreResult<Vec<CheckIn>> {
        Ok(self.check_in_repo().list_check_ins_for_goal(goal_id)?)
    }

    pub fn update_check_in(&mut self, check_in: &CheckIn) -> StoreResult<()> {
        Ok(self.check_in_repo().update_check_in(check_in)?)
    }

    pub fn delete_check_in(&mut self, id: CheckInId) -> StoreResult<()> {
        Ok(self.check_in_repo().delete_check_in(id)?)
    }

    pub fn create_higher_goal(&mut self, higher_goal: &HigherGoal) -> StoreResult<HigherGoalId> {
        let id = self.higher_goal_repo().create_higher_goal(higher_goal)?;
        self.refresh_higher_goals()?;
        Ok(id)
    }

    pub fn update_higher_goal(&mut self, higher_goal: &HigherGoal) -> StoreResult<()> {
        self.higher_goal_repo().update_higher_goal(higher_goal)?;
        self.refresh_higher_goals()
    }

    pub fn get_higher_goal(&self, id: HigherGoalId) -> StoreResult<Option<HigherGoal>> {
        Ok(self.higher_goal_repo().get_higher_goal(id)?)
    }

    /// Deletes the higher goal only; referencing goals keep a dangling id.
    pub fn delete_higher_goal(&mut self, id: HigherGoalId) -> StoreResult<()> {
        self.higher_goal_repo().delete_higher_goal(id)?;
        self.refresh_higher_goals()
    }

    pub fn add_action_step(
        &mut self,
        goal_id: GoalId,
        title: impl Into<String>,
    ) -> StoreResult<ActionStep> {
        if self.get_goal(goal_id)?.is_none() {
            return Err(StoreError::GoalNotFound(goal_id));
        }
        let repo = self.action_step_repo();
        let next_order = repo
            .list_action_steps_for_goal(goal_id)?
            .iter()
            .map(|step| step.display_order + 1)
            .max()
            .unwrap_or(0);
        let step = ActionStep::new(goal_id, title, next_order);
        repo.create_action_step(&step)?;
        Ok(step)
    }

    pub fn update_action_step(&mut self, step: &ActionStep) -> StoreResult<()> {
        Ok(self.action_step_repo().update_action_step(step)?)
    }

    pub fn list_action_steps_for_goal(&self, goal_id: GoalId) -> StoreResult<Vec<ActionStep>> {
        Ok(self.action_step_repo().list_action_steps_for_goal(goal_id)?)
    }

    pub fn delete_action_step(&mut self, id: ActionStepId) -> StoreResult<()> {
        Ok(self.action_step_repo().delete_action_step(id)?)
    }

    pub fn find_review(&self, month: YearMonth) -> StoreResult<Option<MonthlyReview>> {
        Ok(self.review_repo().find_review_for_month(month)?)
    }

    pub fn final_check_ins_for_review(
        &self,
        review_id: MonthlyReviewId,
    ) -> StoreResult<Vec<FinalCheckIn>> {
        Ok(self.review_repo().list_final_check_ins_for_review(review_id)?)
    }

    /// Persists a completed review wizard in one transaction.
    ///
    /// - Creates the month's review, or updates the existing one's reflection
    ///   and replaces its final check-ins.
    /// - Inserts one final check-in per entry whose goal still exists.
    /// - Sets each goal's legacy progress and completion from its entry.
    pub fn commit_review(&mut self, commit: &ReviewCommit) -> StoreResult<MonthlyReview> {
        let (review, written) = self.in_transaction(|conn| {
            let reviews = SqliteReviewRepository::new_unchecked(conn);
            let goals = SqliteGoalRepository::new_unchecked(conn);

            let review = match reviews.find_review_for_month(commit.month)? {
                Some(mut existing) => {
                    existing.overall_reflection = commit.overall_reflection.clone();
                    reviews.update_review(&existing)?;
                    reviews.delete_final_check_ins_for_review(existing.id)?;
                    existing
                }
                None => {
                    let review = MonthlyReview::new(commit.month, commit.overall_reflection.clone());
                    reviews.create_review(&review)?;
                    review
                }
            };

            let mut written = 0usize;
            for entry in &commit.entries {
                let Some(mut goal) = goals.get_goal(entry.goal_id)? else {
                    warn!(
                        "event=review_commit module=store status=skip reason=goal_missing goal_id={}",
                        entry.goal_id
                    );
                    continue;
                };
                let mut final_check_in =
                    FinalCheckIn::new(entry.goal_id, review.id, entry.final_progress);
                final_check_in.achievements = entry.achievements.clone();
                final_check_in.challenges = entry.challenges.clone();
                final_check_in.learnings = entry.learnings.clone();
                final_check_in.satisfaction_rating = entry.satisfaction_rating;
                reviews.create_final_check_in(&final_check_in)?;

                goal.apply_final_progress(entry.final_progress);
                goals.update_goal(&goal)?;
                written += 1;
            }
            Ok((review, written))
        })?;

        info!(
            "event=review_commit module=store status=ok month={} final_check_ins={written}",
            commit.month
        );
        self.refresh_goals()?;
        self.refresh_reviews()?;
        Ok(review)
    }

    pub fn update_review(&mut self, review: &MonthlyReview) -> StoreResult<()> {
        self.review_repo()
            .update_review(review)
            .map_err(|err| match err {
                RepoError::NotFound(id) => StoreError::ReviewNotFound(id),
                other => StoreError::Repo(other),
            })?;
        self.refresh_reviews()
    }

    pub fn update_final_check_in(&mut self, item: &FinalCheckIn) -> StoreResult<()> {
        Ok(self.review_repo().update_final_check_in(item)?)
    }

    /// Deletes a review with its final check-ins; goal progress is left as is.
    pub fn delete_review(&mut self, id: MonthlyReviewId) -> StoreResult<()> {
        self.in_transaction(|conn| {
            let reviews = SqliteReviewRepository::new_unchecked(conn);
            reviews.delete_review(id).map_err(|err| match err {
                RepoError::NotFound(id) => StoreError::ReviewNotFound(id),
                other => StoreError::Repo(other),
            })?;
            reviews.delete_final_check_ins_for_review(id)?;
            Ok(())
        })?;
        self.refresh_reviews()
    }

    pub fn set_preference(&mut self, key: PreferenceKey, value: bool) -> StoreResult<()> {
        let repo = SqlitePreferenceRepository::new_unchecked(&self.conn);
        repo.set_flag(key, value)?;
        let preferences = repo.load_preferences()?;
        self.preferences.publish(preferences);
        Ok(())
    }

    /// Reads every entity table.
    pub fn export_snapshot(&self) -> StoreResult<DataSnapshot> {
        let reviews = self.review_repo();
        Ok(DataSnapshot {
            goals: self.goal_repo().list_goals()?,
            higher_goals: self.higher_goal_repo().list_higher_goals()?,
            action_steps: self.action_step_repo().list_action_steps()?,
            check_ins: self.check_in_repo().list_check_ins()?,
            monthly_reviews: reviews.list_reviews()?,
            final_check_ins: reviews.list_final_check_ins()?,
        })
    }

    /// Deletes every entity row; preferences are kept.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        self.in_transaction(|conn| {
            clear_entity_tables(conn)?;
            Ok(())
        })?;
        self.refresh_all()
    }

    /// Re-reads every stream source and publishes.
    pub fn refresh_all(&mut self) -> StoreResult<()> {
        self.refresh_goals()?;
        self.refresh_higher_goals()?;
        self.refresh_reviews()
    }

    /// Runs `work` inside one transaction, committing only on success.
    pub(crate) fn in_transaction<T>(
        &self,
        work: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = work(&*tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn refresh_goals(&mut self) -> StoreResult<()> {
        let goals = self.goal_repo().list_goals()?;
        self.goals.publish(goals);
        Ok(())
    }

    fn refresh_higher_goals(&mut self) -> StoreResult<()> {
        let higher_goals = self.higher_goal_repo().list_higher_goals()?;
        self.higher_goals.publish(higher_goals);
        Ok(())
    }

    fn refresh_reviews(&mut self) -> StoreResult<()> {
        let reviews = self.review_repo().list_reviews()?;
        self.reviews.publish(reviews);
        Ok(())
    }

    fn goal_repo(&self) -> SqliteGoalRepository<'_> {
        SqliteGoalRepository::new_unchecked(&self.conn)
    }

    fn check_in_repo(&self) -> SqliteCheckInRepository<'_> {
        SqliteCheckInRepository::new_unchecked(&self.conn)
    }

    fn higher_goal_repo(&self) -> SqliteHigherGoalRepository<'_> {
        SqliteHigherGoalRepository::new_unchecked(&self.conn)
    }

    fn action_step_repo(&self) -> SqliteActionStepRepository<'_> {
        SqliteActionStepRepository::new_unchecked(&self.conn)
    }

    fn review_repo(&self) -> SqliteReviewRepository<'_> {
        SqliteReviewRepository::new_unchecked(&self.conn)
    }
}

pub(crate) fn clear_entity_tables(conn: &Connection) -> StoreResult<()> {
    for table in ENTITY_TABLES.iter().rev() {
        conn.execute(&table.clear_sql(), [])?;
    }
    Ok(())
}

fn not_found_as_goal(err: RepoError) -> StoreError {
    match err {
        RepoError::NotFound(id) => StoreError::GoalNotFound(id),
        other => StoreError::Repo(other),
    }
}
