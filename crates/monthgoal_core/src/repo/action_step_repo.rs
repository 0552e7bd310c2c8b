//! Action step gateway contract and SQLite implementation.

use super::record::{self, bool_value, read_bool, read_uuid, text_value, uuid_value, Record};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::schema::{self, TableSchema};
use crate::model::action_step::{ActionStep, ActionStepId};
use crate::model::goal::GoalId;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl Record for ActionStep {
    const SCHEMA: TableSchema = schema::ACTION_STEPS;

    fn id(&self) -> ActionStepId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            uuid_value(self.goal_id),
            text_value(&self.title),
            bool_value(self.is_completed),
            Value::Integer(i64::from(self.display_order)),
            Value::Integer(self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let table = Self::SCHEMA.table;
        Ok(ActionStep {
            id: read_uuid(row, "id", table)?,
            goal_id: read_uuid(row, "goal_id", table)?,
            title: row.get("title")?,
            is_completed: read_bool(row, "is_completed", table)?,
            display_order: row.get("display_order")?,
            created_at: row.get("created_at")?,
        })
    }

    fn validate(&self) -> RepoResult<()> {
        if self.title.trim().is_empty() {
            return Err(RepoError::Validation(
                "action step title must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait ActionStepRepository {
    fn create_action_step(&self, step: &ActionStep) -> RepoResult<ActionStepId>;
    fn update_action_step(&self, step: &ActionStep) -> RepoResult<()>;
    fn upsert_action_step(&self, step: &ActionStep) -> RepoResult<ActionStepId>;
    fn get_action_step(&self, id: ActionStepId) -> RepoResult<Option<ActionStep>>;
    fn list_action_steps(&self) -> RepoResult<Vec<ActionStep>>;
    /// Ordered by `display_order ASC`.
    fn list_action_steps_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<ActionStep>>;
    fn delete_action_step(&self, id: ActionStepId) -> RepoResult<()>;
    fn delete_action_steps_for_goal(&self, goal_id: GoalId) -> RepoResult<usize>;
}

pub struct SqliteActionStepRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActionStepRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ActionStepRepository for SqliteActionStepRepository<'_> {
    fn create_action_step(&self, step: &ActionStep) -> RepoResult<ActionStepId> {
        record::insert(self.conn, step)
    }

    fn update_action_step(&self, step: &ActionStep) -> RepoResult<()> {
        record::update(self.conn, step)
    }

    fn upsert_action_step(&self, step: &ActionStep) -> RepoResult<ActionStepId> {
        record::upsert(self.conn, step)
    }

    fn get_action_step(&self, id: ActionStepId) -> RepoResult<Option<ActionStep>> {
        record::get(self.conn, id)
    }

    fn list_action_steps(&self) -> RepoResult<Vec<ActionStep>> {
        record::select_where(
            self.conn,
            "ORDER BY goal_id ASC, display_order ASC, id ASC",
            Vec::new(),
        )
    }

    fn list_action_steps_for_goal(&self, goal_id: GoalId) -> RepoResult<Vec<ActionStep>> {
        record::select_where(
            self.conn,
            "WHERE goal_id = ?1 ORDER BY display_order ASC, id ASC",
            vec![uuid_value(goal_id)],
        )
    }

    fn delete_action_step(&self, id: ActionStepId) -> RepoResult<()> {
        record::delete::<ActionStep>(self.conn, id)
    }

    fn delete_action_steps_for_goal(&self, goal_id: GoalId) -> RepoResult<usize> {
        record::delete_by_column::<ActionStep>(self.conn, "goal_id", goal_id)
    }
}
