//! Explicit table definitions consumed by the hand-written row mappers.
//!
//! Each repository binds parameters in `columns` order, so column order here
//! is part of the mapping contract.

/// Table name, key column and ordered column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub key_column: &'static str,
    /// Every persisted column, key column first.
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// `SELECT <columns> FROM <table>` without a trailing clause.
    pub fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.columns.join(", "), self.table)
    }

    /// `INSERT` binding every column as `?1..?N`.
    pub fn insert_sql(&self) -> String {
        self.insert_with("INSERT")
    }

    /// `INSERT OR REPLACE` binding every column as `?1..?N`.
    pub fn upsert_sql(&self) -> String {
        self.insert_with("INSERT OR REPLACE")
    }

    /// `UPDATE` of every non-key column; binds columns in declaration order
    /// so the key is `?1`.
    pub fn update_sql(&self) -> String {
        let assignments = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| **column != self.key_column)
            .map(|(idx, column)| format!("{column} = ?{}", idx + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {assignments} WHERE {} = ?1;",
            self.table, self.key_column
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?1;", self.table, self.key_column)
    }

    pub fn clear_sql(&self) -> String {
        format!("DELETE FROM {};", self.table)
    }

    fn insert_with(&self, verb: &str) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|idx| format!("?{idx}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{verb} INTO {} ({}) VALUES ({placeholders});",
            self.table,
            self.columns.join(", ")
        )
    }
}

pub const GOALS: TableSchema = TableSchema {
    table: "goals",
    key_column: "id",
    columns: &[
        "id",
        "title",
        "description",
        "target_month",
        "start_numeric_value",
        "target_numeric_value",
        "current_numeric_value",
        "unit",
        "is_decimal",
        "priority",
        "is_completed",
        "display_order",
        "higher_goal_id",
        "celebration",
        "current_progress",
        "created_at",
    ],
};

pub const CHECK_INS: TableSchema = TableSchema {
    table: "check_ins",
    key_column: "id",
    columns: &["id", "goal_id", "progress_percent", "comment", "check_in_date"],
};

pub const HIGHER_GOALS: TableSchema = TableSchema {
    table: "higher_goals",
    key_column: "id",
    columns: &["id", "title", "description", "color", "created_at", "icon"],
};

pub const MONTHLY_REVIEWS: TableSchema = TableSchema {
    table: "monthly_reviews",
    key_column: "id",
    columns: &["id", "year", "month", "overall_reflection", "created_date"],
};

pub const FINAL_CHECK_INS: TableSchema = TableSchema {
    table: "final_check_ins",
    key_column: "id",
    columns: &[
        "id",
        "goal_id",
        "monthly_review_id",
        "final_progress",
        "achievements",
        "challenges",
        "learnings",
        "satisfaction_rating",
        "created_at",
    ],
};

pub const ACTION_STEPS: TableSchema = TableSchema {
    table: "action_steps",
    key_column: "id",
    columns: &[
        "id",
        "goal_id",
        "title",
        "is_completed",
        "display_order",
        "created_at",
    ],
};

/// Entity tables, referenced tables first.
pub const ENTITY_TABLES: &[TableSchema] = &[
    HIGHER_GOALS,
    GOALS,
    ACTION_STEPS,
    CHECK_INS,
    MONTHLY_REVIEWS,
    FINAL_CHECK_INS,
];
