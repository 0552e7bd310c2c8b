use super::FORMAT_VERSION;
use crate::confirm::Confirmation;
use crate::model::action_step::ActionStep;
use crate::model::check_in::CheckIn;
use crate::model::goal::Goal;
use crate::model::higher_goal::HigherGoal;
use crate::model::review::{FinalCheckIn, MonthlyReview};
use crate::repo::action_step_repo::{ActionStepRepository, SqliteActionStepRepository};
use crate::repo::check_in_repo::{CheckInRepository, SqliteCheckInRepository};
use crate::repo::goal_repo::{GoalRepository, SqliteGoalRepository};
use crate::repo::higher_goal_repo::{HigherGoalRepository, SqliteHigherGoalRepository};
use crate::repo::review_repo::{
    FinalCheckInRepository, MonthlyReviewRepository, SqliteReviewRepository,
};
use crate::service::goal_store::{clear_entity_tables, GoalStore};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

const DECODE_FAILURE_MESSAGE: &str = "The selected file is not a valid goals backup.";

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    pub imported_goals: usize,
    pub imported_higher_goals: usize,
    pub imported_action_steps: usize,
    pub imported_check_ins: usize,
    pub imported_monthly_reviews: usize,
    pub imported_final_check_ins: usize,
    /// One `"<kind> #<n>: <reason>"` line per rejected record, n 1-based.
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn total_imported(&self) -> usize {
        self.imported_goals
            + self.imported_higher_goals
            + self.imported_action_steps
            + self.imported_check_ins
            + self.imported_monthly_reviews
            + self.imported_final_check_ins
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Import waiting for user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub text: String,
    pub replace_existing: bool,
}

/// Top-level shape; entries stay raw so each one decodes on its own.
///
/// A document must carry `version` or at least one entity array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    goals: Option<Vec<Value>>,
    #[serde(default)]
    higher_goals: Option<Vec<Value>>,
    #[serde(default)]
    action_steps: Option<Vec<Value>>,
    #[serde(default)]
    check_ins: Option<Vec<Value>>,
    #[serde(default)]
    monthly_reviews: Option<Vec<Value>>,
    #[serde(default)]
    final_check_ins: Option<Vec<Value>>,
}

impl RawDocument {
    fn is_recognizable(&self) -> bool {
        self.version.is_some()
            || self.goals.is_some()
            || self.higher_goals.is_some()
            || self.action_steps.is_some()
            || self.check_ins.is_some()
            || self.monthly_reviews.is_some()
            || self.final_check_ins.is_some()
    }
}

/// Imports a backup document.
///
/// With `replace_existing` every entity row is deleted first; otherwise
/// records are merged by id. Each record is imported on its own and a bad
/// record only adds a line to `errors`.
pub fn import_json(store: &mut GoalStore, text: &str, replace_existing: bool) -> ImportResult {
    let started_at = Instant::now();
    let document: RawDocument = match serde_json::from_str::<RawDocument>(text) {
        Ok(document) if document.is_recognizable() => document,
        Ok(_) => {
            warn!("event=import module=interchange status=error stage=decode reason=unrecognized_document");
            return ImportResult::failed(DECODE_FAILURE_MESSAGE);
        }
        Err(err) => {
            warn!(
                "event=import module=interchange status=error stage=decode line={} column={}",
                err.line(),
                err.column()
            );
            return ImportResult::failed(DECODE_FAILURE_MESSAGE);
        }
    };
    if let Some(version) = document.version.as_deref() {
        if version != FORMAT_VERSION {
            warn!("event=import module=interchange status=warn reason=version_mismatch version={version}");
        }
    }

    let written = store.in_transaction(|conn| {
        if replace_existing {
            clear_entity_tables(conn)?;
        }
        let mut result = ImportResult::default();
        let errors = &mut result.errors;

        let higher_goals = SqliteHigherGoalRepository::new_unchecked(conn);
        result.imported_higher_goals = import_records(
            "HigherGoal",
            document.higher_goals.unwrap_or_default(),
            errors,
            |item: &HigherGoal| higher_goals.upsert_higher_goal(item).map(drop).map_err(|e| e.to_string()),
        );

        let goals = SqliteGoalRepository::new_unchecked(conn);
        result.imported_goals = import_records(
            "Goal",
            document.goals.unwrap_or_default(),
            errors,
            |item: &Goal| goals.upsert_goal(item).map(drop).map_err(|e| e.to_string()),
        );

        let steps = SqliteActionStepRepository::new_unchecked(conn);
        result.imported_action_steps = import_records(
            "ActionStep",
            document.action_steps.unwrap_or_default(),
            errors,
            |item: &ActionStep| steps.upsert_action_step(item).map(drop).map_err(|e| e.to_string()),
        );

        let check_ins = SqliteCheckInRepository::new_unchecked(conn);
        result.imported_check_ins = import_records(
            "CheckIn",
            document.check_ins.unwrap_or_default(),
            errors,
            |item: &CheckIn| check_ins.upsert_check_in(item).map(drop).map_err(|e| e.to_string()),
        );

        let reviews = SqliteReviewRepository::new_unchecked(conn);
        result.imported_monthly_reviews = import_records(
            "MonthlyReview",
            document.monthly_reviews.unwrap_or_default(),
            errors,
            |item: &MonthlyReview| {
                if let Some(month) = item.year_month() {
                    let existing = reviews
                        .find_review_for_month(month)
                        .map_err(|e| e.to_string())?;
                    if existing.is_some_and(|existing| existing.id != item.id) {
                        return Err(format!("a review for {month} already exists"));
                    }
                }
                reviews.upsert_review(item).map(drop).map_err(|e| e.to_string())
            },
        );
        result.imported_final_check_ins = import_records(
            "FinalCheckIn",
            document.final_check_ins.unwrap_or_default(),
            errors,
            |item: &FinalCheckIn| reviews.upsert_final_check_in(item).map(drop).map_err(|e| e.to_string()),
        );
        Ok(result)
    });

    let mut result = match written {
        Ok(result) => result,
        Err(err) => {
            warn!("event=import module=interchange status=error stage=write error={err}");
            return ImportResult::failed("Import failed; no data was changed.");
        }
    };
    if let Err(err) = store.refresh_all() {
        warn!("event=import module=interchange status=warn stage=refresh error={err}");
    }

    result.success = true;
    result.message = if result.errors.is_empty() {
        format!("Imported {} records.", result.total_imported())
    } else {
        format!(
            "Imported {} records; {} could not be imported.",
            result.total_imported(),
            result.errors.len()
        )
    };
    info!(
        "event=import module=interchange status=ok replace={replace_existing} imported={} failed={} duration_ms={}",
        result.total_imported(),
        result.errors.len(),
        started_at.elapsed().as_millis()
    );
    result
}

/// Runs the pending import once the user confirmed it.
///
/// Returns `None` when nothing was pending.
pub fn import_confirmed(
    store: &mut GoalStore,
    confirmation: &mut Confirmation<ImportRequest>,
) -> Option<ImportResult> {
    let request = confirmation.confirm()?;
    Some(import_json(store, &request.text, request.replace_existing))
}

fn import_records<T: DeserializeOwned>(
    kind: &str,
    values: Vec<Value>,
    errors: &mut Vec<String>,
    mut write: impl FnMut(&T) -> Result<(), String>,
) -> usize {
    let mut imported = 0usize;
    for (index, value) in values.into_iter().enumerate() {
        let outcome = serde_json::from_value::<T>(value)
            .map_err(|err| err.to_string())
            .and_then(|record| write(&record));
        match outcome {
            Ok(()) => imported += 1,
            Err(reason) => errors.push(format!("{kind} #{}: {reason}", index + 1)),
        }
    }
    imported
}
