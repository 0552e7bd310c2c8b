//! Core domain logic for MonthGoal.
//! This crate is the single source of truth for goal, check-in and review
//! invariants; UI layers reach it through `monthgoal_ffi`.

pub mod confirm;
pub mod db;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod observe;
pub mod progress;
pub mod repo;
pub mod report;
pub mod review;
pub mod service;

pub use confirm::Confirmation;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use interchange::{export_json, import_json, ExportDocument, ExportError, ImportResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::action_step::{ActionStep, ActionStepId};
pub use model::check_in::{CheckIn, CheckInId};
pub use model::goal::{Goal, GoalId, GoalValidationError, Priority, YearMonth};
pub use model::higher_goal::{HigherGoal, HigherGoalId};
pub use model::review::{FinalCheckIn, FinalCheckInId, MonthlyReview, MonthlyReviewId};
pub use observe::{Observable, Subscription};
pub use progress::{GoalGroup, GroupKey, GroupMode, SortMode};
pub use repo::preference_repo::{PreferenceKey, Preferences};
pub use repo::{RepoError, RepoResult};
pub use report::{render_month_report, MonthlySummary};
pub use review::{ReviewCommit, ReviewStep, ReviewWizard};
pub use service::{GoalStore, HomeController, HomeView, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
