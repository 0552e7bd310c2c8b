//! Key/value preference gateway.
//!
//! # Invariants
//! - Each key is read and written independently; there is no cross-key
//!   atomicity.
//! - A missing key reads as the flag's default (`false`).

use super::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Boolean settings persisted by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    TipsHidden,
    HideCompletedGoals,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TipsHidden => "tips_hidden",
            Self::HideCompletedGoals => "hide_completed_goals",
        }
    }
}

/// Snapshot of every preference flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub tips_hidden: bool,
    pub hide_completed_goals: bool,
}

pub trait PreferenceRepository {
    fn get_flag(&self, key: PreferenceKey) -> RepoResult<bool>;
    fn set_flag(&self, key: PreferenceKey, value: bool) -> RepoResult<()>;

    fn load_preferences(&self) -> RepoResult<Preferences> {
        Ok(Preferences {
            tips_hidden: self.get_flag(PreferenceKey::TipsHidden)?,
            hide_completed_goals: self.get_flag(PreferenceKey::HideCompletedGoals)?,
        })
    }
}

pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn get_flag(&self, key: PreferenceKey) -> RepoResult<bool> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match value.as_deref() {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(other) => Err(RepoError::InvalidData(format!(
                "invalid boolean preference `{other}` for key `{}`",
                key.as_str()
            ))),
        }
    }

    fn set_flag(&self, key: PreferenceKey, value: bool) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key.as_str(), if value { "true" } else { "false" }],
        )?;
        Ok(())
    }
}
