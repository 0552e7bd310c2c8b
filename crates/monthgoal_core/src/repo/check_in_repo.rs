//! Check-in gateway contract and SQLite implementation.

use super::record::{self, read_uuid, text_value, uuid_value, Record};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::schema::{self, TableSchema};
use crate::model::check_in::{CheckIn, CheckInId};
use crate::model::goal::GoalId;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl Record for CheckIn {
    const SCHEMA: TableSchema = schema::CHECK_INS;

    fn id(&self) -> CheckInId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            uuid_value(self.goal_id),
            Value::Integer(i64::from(self.progress_percent)),
            text_value(&self.comment),
            Value::Integer(self.check_in_date),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let table = Self::SCHEMA.table;
        let check_in = CheckIn {
            id: read_uuid(row, "id", table)?,
            goal_id: read_uuid(row, "goal_id", table)?,
            progress_percent: row.get("progress_percent")?,
            comment: row.get("comment")?,
            check_in_date: row.get("check_in_date")?,
        };
        check_in.validate()?;
        Ok(check_in)
    }

    fn validate(&self) -> RepoResult<()> {
        if !self.is_valid() {
            return Err(RepoError::Validation(format!(
                "check-in progress `{}` must be within 0..=100",
                self.progress_percent
            )));
        }
        Ok(())
    }
}

pub trait CheckInRepository {
    fn create_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId>;
    fn update_check_in(&self, check_in: &CheckIn) -> RepoResult<()>;
    fn upsert_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId>;
    fn get_check_in(&self, id: CheckInId) -> RepoResult<Option<CheckIn>>;
    fn list_check_ins(&self) -> RepoResult<Vec<CheckIn>>;
    /// Newest first.
    fn list_check_ins_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<CheckIn>>;
    fn delete_check_in(&self, id: CheckInId) -> RepoResult<()>;
    /// Removes every check-in of `goal_id`; returns the number removed.
    fn delete_check_ins_for_goal(&self, goal_id: GoalId) -> RepoResult<usize>;
}

pub struct SqliteCheckInRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCheckInRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CheckInRepository for SqliteCheckInRepository<'_> {
    fn create_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId> {
        record::insert(self.conn, check_in)
    }

    fn update_check_in(&self, check_in: &CheckIn) -> RepoResult<()> {
        record::update(self.conn, check_in)
    }

    fn upsert_check_in(&self, check_in: &CheckIn) -> RepoResult<CheckInId> {
        record::upsert(self.conn, check_in)
    }

    fn get_check_in(&self, id: CheckInId) -> RepoResult<Option<CheckIn>> {
        record::get(self.conn, id)
    }

    fn list_check_ins(&self) -> RepoResult<Vec<CheckIn>> {
        record::select_where(self.conn, "ORDER BY check_in_date ASC, id ASC", Vec::new())
    }

    fn list_check_ins_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<CheckIn>> {
        record::select_where(
            self.conn,
            "WHERE goal_id = ?1 ORDER BY check_in_date DESC, id ASC",
            vec![uuid_value(goal_id)],
        )
    }

    fn delete_check_in(&self, id: CheckInId) -> RepoResult<()> {
        record::delete::<CheckIn>(self.conn, id)
    }

    fn delete_check_ins_for_goal(&self, goal_id: GoalId) -> RepoResult<usize> {
        record::delete_by_column::<CheckIn>(self.conn, "goal_id", goal_id)
    }
}
