//! Monthly review and final check-in gateways.
//!
//! # Invariants
//! - (year, month) uniqueness of reviews is NOT a table constraint;
//!   `find_review_for_month` returns the oldest row if duplicates slipped in.

use super::record::{self, read_uuid, text_value, uuid_value, Record};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::schema::{self, TableSchema};
use crate::model::goal::{GoalId, YearMonth};
use crate::model::review::{FinalCheckIn, FinalCheckInId, MonthlyReview, MonthlyReviewId};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl Record for MonthlyReview {
    const SCHEMA: TableSchema = schema::MONTHLY_REVIEWS;

    fn id(&self) -> MonthlyReviewId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            Value::Integer(i64::from(self.year)),
            Value::Integer(i64::from(self.month)),
            text_value(&self.overall_reflection),
            Value::Integer(self.created_date),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let review = MonthlyReview {
            id: read_uuid(row, "id", Self::SCHEMA.table)?,
            year: row.get("year")?,
            month: row.get("month")?,
            overall_reflection: row.get("overall_reflection")?,
            created_date: row.get("created_date")?,
        };
        review.validate()?;
        Ok(review)
    }

    fn validate(&self) -> RepoResult<()> {
        if self.year_month().is_none() {
            return Err(RepoError::Validation(format!(
                "review month `{}-{}` is out of range",
                self.year, self.month
            )));
        }
        Ok(())
    }
}

impl Record for FinalCheckIn {
    const SCHEMA: TableSchema = schema::FINAL_CHECK_INS;

    fn id(&self) -> FinalCheckInId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            uuid_value(self.goal_id),
            uuid_value(self.monthly_review_id),
            Value::Integer(i64::from(self.final_progress)),
            text_value(&self.achievements),
            text_value(&self.challenges),
            text_value(&self.learnings),
            self.satisfaction_rating
                .map_or(Value::Null, |rating| Value::Integer(i64::from(rating))),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let table = Self::SCHEMA.table;
        let final_check_in = FinalCheckIn {
            id: read_uuid(row, "id", table)?,
            goal_id: read_uuid(row, "goal_id", table)?,
            monthly_review_id: read_uuid(row, "monthly_review_id", table)?,
            final_progress: row.get("final_progress")?,
            achievements: row.get("achievements")?,
            challenges: row.get("challenges")?,
            learnings: row.get("learnings")?,
            satisfaction_rating: row.get("satisfaction_rating")?,
            created_at: row.get("created_at")?,
        };
        final_check_in.validate()?;
        Ok(final_check_in)
    }

    fn validate(&self) -> RepoResult<()> {
        if !self.is_valid() {
            return Err(RepoError::Validation(format!(
                "final check-in {} has out-of-range progress or rating",
                self.id
            )));
        }
        Ok(())
    }
}

pub trait MonthlyReviewRepository {
    fn create_review(&self, review: &MonthlyReview) -> RepoResult<MonthlyReviewId>;
    fn update_review(&self, review: &MonthlyReview) -> RepoResult<()>;
    fn upsert_review(&self, review: &MonthlyReview) -> RepoResult<MonthlyReviewId>;
    fn get_review(&self, id: MonthlyReviewId) -> RepoResult<Option<MonthlyReview>>;
    fn find_review_for_month(&self, month: YearMonth) -> RepoResult<Option<MonthlyReview>>;
    /// Newest month first.
    fn list_reviews(&self) -> RepoResult<Vec<MonthlyReview>>;
    fn delete_review(&self, id: MonthlyReviewId) -> RepoResult<()>;
}

pub trait FinalCheckInRepository {
    fn create_final_check_in(&self, item: &FinalCheckIn) -> RepoResult<FinalCheckInId>;
    fn update_final_check_in(&self, item: &FinalCheckIn) -> RepoResult<()>;
    fn upsert_final_check_in(&self, item: &FinalCheckIn) -> RepoResult<FinalCheckInId>;
    fn get_final_check_in(&self, id: FinalCheckInId) -> RepoResult<Option<FinalCheckIn>>;
    fn list_final_check_ins(&self) -> RepoResult<Vec<FinalCheckIn>>;
    fn list_final_check_ins_for_review(
        &self,
        review_id: MonthlyReviewId,
    ) -> RepoResult<Vec<FinalCheckIn>>;
    fn delete_final_check_in(&self, id: FinalCheckInId) -> RepoResult<()>;
    fn delete_final_check_ins_for_goal(&self, goal_id: GoalId) -> RepoResult<usize>;
    fn delete_final_check_ins_for_review(&self, review_id: MonthlyReviewId) -> RepoResult<usize>;
}

/// SQLite-backed gateway for both review tables.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MonthlyReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(&self, review: &MonthlyReview) -> RepoResult<MonthlyReviewId> {
        record::insert(self.conn, review)
    }

    fn update_review(&self, review: &MonthlyReview) -> RepoResult<()> {
        record::update(self.conn, review)
    }

    fn upsert_review(&self, review: &MonthlyReview) -> RepoResult<MonthlyReviewId> {
        record::upsert(self.conn, review)
    }

    fn get_review(&self, id: MonthlyReviewId) -> RepoResult<Option<MonthlyReview>> {
        record::get(self.conn, id)
    }

    fn find_review_for_month(&self, month: YearMonth) -> RepoResult<Option<MonthlyReview>> {
        let mut found = record::select_where::<MonthlyReview>(
            self.conn,
            "WHERE year = ?1 AND month = ?2 ORDER BY created_date ASC, id ASC LIMIT 1",
            vec![
                Value::Integer(i64::from(month.year)),
                Value::Integer(i64::from(month.month)),
            ],
        )?;
        Ok(found.pop())
    }

    fn list_reviews(&self) -> RepoResult<Vec<MonthlyReview>> {
        record::select_where(
            self.conn,
            "ORDER BY year DESC, month DESC, id ASC",
            Vec::new(),
        )
    }

    fn delete_review(&self, id: MonthlyReviewId) -> RepoResult<()> {
        record::delete::<MonthlyReview>(self.conn, id)
    }
}

impl FinalCheckInRepository for SqliteReviewRepository<'_> {
    fn create_final_check_in(&self, item: &FinalCheckIn) -> RepoResult<FinalCheckInId> {
        record::insert(self.conn, item)
    }

    fn update_final_check_in(&self, item: &FinalCheckIn) -> RepoResult<()> {
        record::update(self.conn, item)
    }

    fn upsert_final_check_in(&self, item: &FinalCheckIn) -> RepoResult<FinalCheckInId> {
        record::upsert(self.conn, item)
    }

    fn get_final_check_in(&self, id: FinalCheckInId) -> RepoResult<Option<FinalCheckIn>> {
        record::get(self.conn, id)
    }

    fn list_final_check_ins(&self) -> RepoResult<Vec<FinalCheckIn>> {
        record::select_where(self.conn, "ORDER BY created_at ASC, id ASC", Vec::new())
    }

    fn list_final_check_ins_for_review(
        &self,
        review_id: MonthlyReviewId,
    ) -> RepoResult<Vec<FinalCheckIn>> {
        record::select_where(
            self.conn,
            "WHERE monthly_review_id = ?1 ORDER BY created_at ASC, id ASC",
            vec![uuid_value(review_id)],
        )
    }

    fn delete_final_check_in(&self, id: FinalCheckInId) -> RepoResult<()> {
        record::delete::<FinalCheckIn>(self.conn, id)
    }

    fn delete_final_check_ins_for_goal(&self, goal_id: GoalId) -> RepoResult<usize> {
        record::delete_by_column::<FinalCheckIn>(self.conn, "goal_id", goal_id)
    }

    fn delete_final_check_ins_for_review(&self, review_id: MonthlyReviewId) -> RepoResult<usize> {
        record::delete_by_column::<FinalCheckIn>(self.conn, "monthly_review_id", review_id)
    }
}
