//! Higher goal gateway contract and SQLite implementation.
//!
//! Deleting a higher goal leaves referencing goals untouched; their
//! `higher_goal_id` then dangles and resolves to "ungrouped".

use super::record::{self, opt_text_value, read_uuid, text_value, uuid_value, Record};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::schema::{self, TableSchema};
use crate::model::higher_goal::{HigherGoal, HigherGoalId};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl Record for HigherGoal {
    const SCHEMA: TableSchema = schema::HIGHER_GOALS;

    fn id(&self) -> HigherGoalId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            text_value(&self.title),
            opt_text_value(self.description.as_deref()),
            text_value(&self.color),
            Value::Integer(self.created_at),
            opt_text_value(self.icon.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(HigherGoal {
            id: read_uuid(row, "id", Self::SCHEMA.table)?,
            title: row.get("title")?,
            description: row.get("description")?,
            color: row.get("color")?,
            created_at: row.get("created_at")?,
            icon: row.get("icon")?,
        })
    }

    fn validate(&self) -> RepoResult<()> {
        if self.title.trim().is_empty() {
            return Err(RepoError::Validation(
                "higher goal title must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait HigherGoalRepository {
    fn create_higher_goal(&self, higher_goal: &HigherGoal) -> RepoResult<HigherGoalId>;
    fn update_higher_goal(&self, higher_goal: &HigherGoal) -> RepoResult<()>;
    fn upsert_higher_goal(&self, higher_goal: &HigherGoal) -> RepoResult<HigherGoalId>;
    fn get_higher_goal(&self, id: HigherGoalId) -> RepoResult<Option<HigherGoal>>;
    /// Ordered by `created_at ASC, id ASC`.
    fn list_higher_goals(&self) -> RepoResult<Vec<HigherGoal>>;
    fn delete_higher_goal(&self, id: HigherGoalId) -> RepoResult<()>;
}

pub struct SqliteHigherGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHigherGoalRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HigherGoalRepository for SqliteHigherGoalRepository<'_> {
    fn create_higher_goal(&self, higher_goal: &HigherGoal) -> RepoResult<HigherGoalId> {
        record::insert(self.conn, higher_goal)
    }

    fn update_higher_goal(&self, higher_goal: &HigherGoal) -> RepoResult<()> {
        record::update(self.conn, higher_goal)
    }

    fn upsert_higher_goal(&self, higher_goal: &HigherGoal) -> RepoResult<HigherGoalId> {
        record::upsert(self.conn, higher_goal)
    }

    fn get_higher_goal(&self, id: HigherGoalId) -> RepoResult<Option<HigherGoal>> {
        record::get(self.conn, id)
    }

    fn list_higher_goals(&self) -> RepoResult<Vec<HigherGoal>> {
        record::select_where(self.conn, "ORDER BY created_at ASC, id ASC", Vec::new())
    }

    fn delete_higher_goal(&self, id: HigherGoalId) -> RepoResult<()> {
        record::delete::<HigherGoal>(self.conn, id)
    }
}
