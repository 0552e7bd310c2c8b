//! JSON backup interchange.
//!
//! # Responsibility
//! - Serialize every entity table into one versioned document.
//! - Import documents record by record, capturing per-record failures.
//!
//! # Invariants
//! - Array keys and entry fields are camelCase; UUIDs are strings and
//!   priorities are `HIGH|MIDDLE|LOW`.
//! - An import writes inside one transaction; a document that cannot be
//!   decoded writes nothing.

mod export;
mod import;

pub use export::{export_document, export_json, ExportError};
pub use import::{import_confirmed, import_json, ImportRequest, ImportResult};

use crate::model::action_step::ActionStep;
use crate::model::check_in::CheckIn;
use crate::model::goal::Goal;
use crate::model::higher_goal::HigherGoal;
use crate::model::review::{FinalCheckIn, MonthlyReview};
use serde::{Deserialize, Serialize};

/// Document version written by this crate.
pub const FORMAT_VERSION: &str = "1.0";

/// Whole-store backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    /// RFC 3339 timestamp of the export.
    pub export_date: String,
    pub goals: Vec<Goal>,
    pub higher_goals: Vec<HigherGoal>,
    pub action_steps: Vec<ActionStep>,
    pub check_ins: Vec<CheckIn>,
    pub monthly_reviews: Vec<MonthlyReview>,
    pub final_check_ins: Vec<FinalCheckIn>,
}
