//! Goal gateway contract and SQLite implementation.
//!
//! # Invariants
//! - Writes call `Goal::validate()` before touching SQL.
//! - Month listings are ordered by `display_order ASC, created_at ASC, id ASC`.

use super::record::{
    self, bool_value, opt_text_value, opt_uuid_value, read_bool, read_opt_uuid, read_uuid,
    text_value, uuid_value, Record,
};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::schema::{self, TableSchema};
use crate::model::goal::{Goal, GoalId, Priority, YearMonth};
use crate::model::higher_goal::HigherGoalId;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

const MONTH_ORDER: &str = "ORDER BY display_order ASC, created_at ASC, id ASC";

impl Record for Goal {
    const SCHEMA: TableSchema = schema::GOALS;

    fn id(&self) -> GoalId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            text_value(&self.title),
            opt_text_value(self.description.as_deref()),
            Value::Integer(i64::from(self.target_month)),
            Value::Real(self.start_numeric_value),
            Value::Real(self.target_numeric_value),
            Value::Real(self.current_numeric_value),
            text_value(&self.unit),
            bool_value(self.is_decimal),
            text_value(self.priority.as_str()),
            bool_value(self.is_completed),
            Value::Integer(i64::from(self.display_order)),
            opt_uuid_value(self.higher_goal_id),
            opt_text_value(self.celebration.as_deref()),
            Value::Integer(i64::from(self.current_progress)),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let table = Self::SCHEMA.table;
        let priority_text: String = row.get("priority")?;
        let priority = Priority::parse(&priority_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid priority `{priority_text}` in goals.priority"))
        })?;

        let goal = Goal {
            id: read_uuid(row, "id", table)?,
            title: row.get("title")?,
            description: row.get("description")?,
            target_month: row.get("target_month")?,
            start_numeric_value: row.get("start_numeric_value")?,
            target_numeric_value: row.get("target_numeric_value")?,
            current_numeric_value: row.get("current_numeric_value")?,
            unit: row.get("unit")?,
            is_decimal: read_bool(row, "is_decimal", table)?,
            priority,
            is_completed: read_bool(row, "is_completed", table)?,
            display_order: row.get("display_order")?,
            higher_goal_id: read_opt_uuid(row, "higher_goal_id", table)?,
            celebration: row.get("celebration")?,
            current_progress: row.get("current_progress")?,
            created_at: row.get("created_at")?,
        };
        goal.validate()?;
        Ok(goal)
    }

    fn validate(&self) -> RepoResult<()> {
        Goal::validate(self)?;
        Ok(())
    }
}

/// Repository interface for goal CRUD operations.
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId>;
    fn update_goal(&self, goal: &Goal) -> RepoResult<()>;
    /// Inserts or replaces by id; used by import merges.
    fn upsert_goal(&self, goal: &Goal) -> RepoResult<GoalId>;
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>>;
    fn list_goals(&self) -> RepoResult<Vec<Goal>>;
    fn list_goals_for_month(&self, month: YearMonth) -> RepoResult<Vec<Goal>>;
    fn list_goals_for_higher_goal(&self, higher_goal_id: HigherGoalId) -> RepoResult<Vec<Goal>>;
    /// Highest `display_order` in `month`, `None` for an empty month.
    fn max_display_order(&self, month: YearMonth) -> RepoResult<Option<i32>>;
    fn delete_goal(&self, id: GoalId) -> RepoResult<()>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn create_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        record::insert(self.conn, goal)
    }

    fn update_goal(&self, goal: &Goal) -> RepoResult<()> {
        record::update(self.conn, goal)
    }

    fn upsert_goal(&self, goal: &Goal) -> RepoResult<GoalId> {
        record::upsert(self.conn, goal)
    }

    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        record::get(self.conn, id)
    }

    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        record::select_where(
            self.conn,
            "ORDER BY target_month ASC, display_order ASC, created_at ASC, id ASC",
            Vec::new(),
        )
    }

    fn list_goals_for_month(&self, month: YearMonth) -> RepoResult<Vec<Goal>> {
        record::select_where(
            self.conn,
            &format!("WHERE target_month = ?1 {MONTH_ORDER}"),
            vec![Value::Integer(i64::from(month.pack()))],
        )
    }

    fn list_goals_for_higher_goal(&self, higher_goal_id: HigherGoalId) -> RepoResult<Vec<Goal>> {
        record::select_where(
            self.conn,
            "WHERE higher_goal_id = ?1 ORDER BY target_month ASC, display_order ASC, id ASC",
            vec![uuid_value(higher_goal_id)],
        )
    }

    fn max_display_order(&self, month: YearMonth) -> RepoResult<Option<i32>> {
        let max = self.conn.query_row(
            "SELECT MAX(display_order) FROM goals WHERE target_month = ?1;",
            [month.pack()],
            |row| row.get::<_, Option<i32>>(0),
        )?;
        Ok(max)
    }

    fn delete_goal(&self, id: GoalId) -> RepoResult<()> {
        record::delete::<Goal>(self.conn, id)
    }
}
