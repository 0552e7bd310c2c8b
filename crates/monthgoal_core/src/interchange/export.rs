use super::{ExportDocument, FORMAT_VERSION};
use crate::service::goal_store::{GoalStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug)]
pub enum ExportError {
    Store(StoreError),
    Timestamp(time::error::Format),
    Json(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "failed to read store: {err}"),
            Self::Timestamp(err) => write!(f, "failed to format export date: {err}"),
            Self::Json(err) => write!(f, "failed to encode export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Timestamp(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<StoreError> for ExportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<time::error::Format> for ExportError {
    fn from(value: time::error::Format) -> Self {
        Self::Timestamp(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Builds the backup document from the current store contents.
pub fn export_document(store: &GoalStore) -> Result<ExportDocument, ExportError> {
    let snapshot = store.export_snapshot()?;
    Ok(ExportDocument {
        version: FORMAT_VERSION.to_string(),
        export_date: OffsetDateTime::now_utc().format(&Rfc3339)?,
        goals: snapshot.goals,
        higher_goals: snapshot.higher_goals,
        action_steps: snapshot.action_steps,
        check_ins: snapshot.check_ins,
        monthly_reviews: snapshot.monthly_reviews,
        final_check_ins: snapshot.final_check_ins,
    })
}

/// Serializes the whole store as pretty-printed JSON.
pub fn export_json(store: &GoalStore) -> Result<String, ExportError> {
    let started_at = Instant::now();
    let document = export_document(store)?;
    let text = serde_json::to_string_pretty(&document)?;
    info!(
        "event=export module=interchange status=ok goals={} check_ins={} reviews={} duration_ms={}",
        document.goals.len(),
        document.check_ins.len(),
        document.monthly_reviews.len(),
        started_at.elapsed().as_millis()
    );
    Ok(text)
}
