//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core types into plain envelopes with display-ready text.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported as `ok=false` plus a message, never as panics.
//! - Every call opens its own store on the configured database path.

use log::warn;
use monthgoal_core::progress::{format_number, format_percentage};
use monthgoal_core::{
    core_version as core_version_inner, export_json as export_json_inner,
    import_json as import_json_inner, init_logging as init_logging_inner, ping as ping_inner,
    render_month_report, CheckIn, Goal, GoalStore, GroupMode, HigherGoal, HomeController,
    HomeView, PreferenceKey, Priority, ReviewCommit, ReviewWizard, SortMode, YearMonth,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "monthgoal.sqlite3";
const DB_PATH_ENV: &str = "MONTHGOAL_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call.
///
/// Must run before the first store-backed call; once a path is in use it
/// cannot change. Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One goal row, pre-formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalItem {
    pub goal_id: String,
    pub title: String,
    pub current_value: String,
    pub target_value: String,
    pub unit: String,
    /// Precise percentage; may exceed 100.
    pub progress_percent: f64,
    pub progress_label: String,
    /// `HIGH|MIDDLE|LOW`.
    pub priority: String,
    pub is_completed: bool,
    pub higher_goal_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalGroupItem {
    pub label: String,
    pub goals: Vec<GoalItem>,
}

/// Home screen payload for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthViewResponse {
    pub ok: bool,
    /// `YYYY-MM`.
    pub month: String,
    /// True when the month has a committed review.
    pub is_summary: bool,
    /// Goal groups; empty for the summary view.
    pub groups: Vec<GoalGroupItem>,
    /// Month report body; filled for the summary view.
    pub summary_text: String,
    pub message: String,
}

impl MonthViewResponse {
    fn failure(month: String, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            month,
            is_summary: false,
            groups: Vec::new(),
            summary_text: String::new(),
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalActionResponse {
    pub ok: bool,
    /// Affected goal ID, when there is one.
    pub goal_id: Option<String>,
    pub message: String,
}

impl GoalActionResponse {
    fn success(message: impl Into<String>, goal_id: Option<String>) -> Self {
        Self {
            ok: true,
            goal_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Backup document; empty on failure.
    pub json: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub imported_goals: u32,
    pub imported_higher_goals: u32,
    pub imported_action_steps: u32,
    pub imported_check_ins: u32,
    pub imported_monthly_reviews: u32,
    pub imported_final_check_ins: u32,
    pub errors: Vec<String>,
}

/// Higher goal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HigherGoalItem {
    pub higher_goal_id: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HigherGoalResponse {
    pub ok: bool,
    pub item: Option<HigherGoalItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HigherGoalListResponse {
    pub ok: bool,
    pub items: Vec<HigherGoalItem>,
    pub message: String,
}

/// Check-in history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInItem {
    pub check_in_id: String,
    pub progress_percent: i32,
    pub comment: String,
    /// Unix epoch milliseconds.
    pub check_in_date: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInListResponse {
    pub ok: bool,
    pub goal_id: String,
    /// Oldest first.
    pub items: Vec<CheckInItem>,
    pub message: String,
}

/// One goal's review answers, as typed in the review screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntryInput {
    pub goal_id: String,
    /// Empty or an integer within 0..=100.
    pub final_progress: String,
    pub achievements: String,
    pub challenges: String,
    pub learnings: String,
    /// 1..=5 when given.
    pub satisfaction_rating: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommitResponse {
    pub ok: bool,
    pub review_id: Option<String>,
    /// Goals that received a final check-in.
    pub reviewed_goals: u32,
    pub message: String,
}

impl ReviewCommitResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            review_id: None,
            reviewed_goals: 0,
            message: message.into(),
        }
    }
}

/// Lists a month's goals, or its review summary once reviewed.
///
/// `sort_mode`: `default|priority|progress`; `group_mode`:
/// `none|higher_goal|key_goal`. Unknown values fall back to the defaults.
#[flutter_rust_bridge::frb(sync)]
pub fn list_month_goals(
    year: i32,
    month: u32,
    sort_mode: String,
    group_mode: String,
) -> MonthViewResponse {
    let Some(year_month) = YearMonth::new(year, month) else {
        return MonthViewResponse::failure(
            format!("{year}-{month}"),
            "list_month_goals failed: year or month out of range",
        );
    };
    let month_label = year_month.to_string();

    let mut home = HomeController::new(year_month);
    home.set_sort_mode(parse_sort_mode(&sort_mode));
    home.set_group_mode(parse_group_mode(&group_mode));

    let result = with_store(|store| {
        let view = home.view(store).map_err(|err| err.to_string())?;
        Ok(to_month_view(store, view))
    });
    match result {
        Ok(response) => response,
        Err(err) => MonthViewResponse::failure(month_label, format!("list_month_goals failed: {err}")),
    }
}

/// Creates a goal appended to the end of its month.
#[flutter_rust_bridge::frb(sync)]
#[allow(clippy::too_many_arguments)]
pub fn add_goal(
    title: String,
    year: i32,
    month: u32,
    start_value: f64,
    target_value: f64,
    unit: String,
    is_decimal: bool,
    priority: String,
) -> GoalActionResponse {
    let Some(year_month) = YearMonth::new(year, month) else {
        return GoalActionResponse::failure("add_goal failed: year or month out of range");
    };
    let Some(priority) = Priority::parse(priority.trim()) else {
        return GoalActionResponse::failure(format!(
            "add_goal failed: unknown priority `{}`",
            priority.trim()
        ));
    };

    let mut goal = Goal::new(title.trim(), year_month, start_value, target_value, unit.trim());
    goal.is_decimal = is_decimal;
    goal.priority = priority;
    match with_store(|store| store.add_goal(goal).map_err(|err| err.to_string())) {
        Ok(goal) => GoalActionResponse::success("Goal created.", Some(goal.id.to_string())),
        Err(err) => GoalActionResponse::failure(format!("add_goal failed: {err}")),
    }
}

/// Records a new current value for a goal.
#[flutter_rust_bridge::frb(sync)]
pub fn record_check_in(goal_id: String, current_value: f64, comment: String) -> GoalActionResponse {
    let id = match parse_goal_id(&goal_id) {
        Ok(id) => id,
        Err(err) => return GoalActionResponse::failure(format!("record_check_in failed: {err}")),
    };
    match with_store(|store| {
        store
            .record_check_in(id, current_value, comment.trim())
            .map_err(|err| err.to_string())
    }) {
        Ok(check_in) => GoalActionResponse::success(
            format!("Progress saved ({}%).", check_in.progress_percent),
            Some(id.to_string()),
        ),
        Err(err) => GoalActionResponse::failure(format!("record_check_in failed: {err}")),
    }
}

/// Deletes a goal together with its check-ins, action steps and final check-ins.
///
/// The host is expected to have confirmed the deletion with the user.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_goal(goal_id: String) -> GoalActionResponse {
    let id = match parse_goal_id(&goal_id) {
        Ok(id) => id,
        Err(err) => return GoalActionResponse::failure(format!("delete_goal failed: {err}")),
    };
    match with_store(|store| store.delete_goal(id).map_err(|err| err.to_string())) {
        Ok(()) => GoalActionResponse::success("Goal deleted.", Some(id.to_string())),
        Err(err) => GoalActionResponse::failure(format!("delete_goal failed: {err}")),
    }
}

/// Persists the hide-completed-goals preference.
#[flutter_rust_bridge::frb(sync)]
pub fn set_hide_completed_goals(hidden: bool) -> GoalActionResponse {
    match with_store(|store| {
        store
            .set_preference(PreferenceKey::HideCompletedGoals, hidden)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => GoalActionResponse::success("Preference saved.", None),
        Err(err) => GoalActionResponse::failure(format!("set_hide_completed_goals failed: {err}")),
    }
}

/// Serializes the whole store as a backup document.
#[flutter_rust_bridge::frb(sync)]
pub fn export_json() -> ExportResponse {
    match with_store(|store| export_json_inner(store).map_err(|err| err.to_string())) {
        Ok(json) => ExportResponse {
            ok: true,
            json,
            message: "Export ready.".to_string(),
        },
        Err(err) => {
            warn!("event=ffi_export module=ffi status=error");
            ExportResponse {
                ok: false,
                json: String::new(),
                message: format!("export_json failed: {err}"),
            }
        }
    }
}

/// Imports a backup document.
///
/// With `replace_existing` every stored record is deleted first. The host is
/// expected to have confirmed a replacing import with the user.
#[flutter_rust_bridge::frb(sync)]
pub fn import_json(text: String, replace_existing: bool) -> ImportResponse {
    match with_store(|store| Ok(import_json_inner(store, &text, replace_existing))) {
        Ok(result) => ImportResponse {
            success: result.success,
            message: result.message,
            imported_goals: to_count(result.imported_goals),
            imported_higher_goals: to_count(result.imported_higher_goals),
            imported_action_steps: to_count(result.imported_action_steps),
            imported_check_ins: to_count(result.imported_check_ins),
            imported_monthly_reviews: to_count(result.imported_monthly_reviews),
            imported_final_check_ins: to_count(result.imported_final_check_ins),
            errors: result.errors,
        },
        Err(err) => ImportResponse {
            success: false,
            message: format!("import_json failed: {err}"),
            imported_goals: 0,
            imported_higher_goals: 0,
            imported_action_steps: 0,
            imported_check_ins: 0,
            imported_monthly_reviews: 0,
            imported_final_check_ins: 0,
            errors: Vec::new(),
        },
    }
}

/// Creates a higher goal. A blank `color` keeps the default color.
#[flutter_rust_bridge::frb(sync)]
pub fn create_higher_goal(title: String, color: String) -> HigherGoalResponse {
    let mut higher_goal = HigherGoal::new(title.trim());
    if !color.trim().is_empty() {
        higher_goal.color = color.trim().to_string();
    }
    match with_store(|store| {
        store
            .create_higher_goal(&higher_goal)
            .map_err(|err| err.to_string())
    }) {
        Ok(_) => HigherGoalResponse {
            ok: true,
            item: Some(to_higher_goal_item(&higher_goal)),
            message: "Higher goal created.".to_string(),
        },
        Err(err) => HigherGoalResponse {
            ok: false,
            item: None,
            message: format!("create_higher_goal failed: {err}"),
        },
    }
}

/// Lists every higher goal in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn list_higher_goals() -> HigherGoalListResponse {
    match with_store(|store| {
        Ok(store
            .higher_goals()
            .iter()
            .map(to_higher_goal_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => HigherGoalListResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => HigherGoalListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("list_higher_goals failed: {err}"),
        },
    }
}

/// Links a goal to a higher goal, or unlinks it with `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn assign_higher_goal(goal_id: String, higher_goal_id: Option<String>) -> GoalActionResponse {
    let id = match parse_goal_id(&goal_id) {
        Ok(id) => id,
        Err(err) => return GoalActionResponse::failure(format!("assign_higher_goal failed: {err}")),
    };
    let higher_goal_id = match higher_goal_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                return GoalActionResponse::failure(format!(
                    "assign_higher_goal failed: invalid higher goal id `{raw}`"
                ))
            }
        },
    };
    match with_store(|store| {
        let mut goal = store
            .get_goal(id)
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("goal not found: {id}"))?;
        if let Some(parent) = higher_goal_id {
            if store
                .get_higher_goal(parent)
                .map_err(|err| err.to_string())?
                .is_none()
            {
                return Err(format!("higher goal not found: {parent}"));
            }
        }
        goal.higher_goal_id = higher_goal_id;
        store.update_goal(&goal).map_err(|err| err.to_string())
    }) {
        Ok(()) => GoalActionResponse::success("Goal updated.", Some(id.to_string())),
        Err(err) => GoalActionResponse::failure(format!("assign_higher_goal failed: {err}")),
    }
}

/// Lists a goal's check-in history, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn list_check_ins(goal_id: String) -> CheckInListResponse {
    let failure = |message: String| CheckInListResponse {
        ok: false,
        goal_id: goal_id.trim().to_string(),
        items: Vec::new(),
        message,
    };
    let id = match parse_goal_id(&goal_id) {
        Ok(id) => id,
        Err(err) => return failure(format!("list_check_ins failed: {err}")),
    };
    match with_store(|store| {
        if store.get_goal(id).map_err(|err| err.to_string())?.is_none() {
            return Err(format!("goal not found: {id}"));
        }
        store
            .list_check_ins_for_goal(id)
            .map_err(|err| err.to_string())
    }) {
        Ok(history) => CheckInListResponse {
            ok: true,
            goal_id: id.to_string(),
            message: format!("{} check-in(s).", history.len()),
            items: history.iter().map(to_check_in_item).collect(),
        },
        Err(err) => failure(format!("list_check_ins failed: {err}")),
    }
}

/// Runs the month review over every goal of the month and commits it.
///
/// Each goal of the month needs one entry. Entries pass the same gates as the
/// review screens: progress text must be empty or 0..=100, achievements and
/// final progress are required, and the reflection must not be blank.
/// Committing an already reviewed month replaces its final check-ins.
#[flutter_rust_bridge::frb(sync)]
pub fn commit_month_review(
    year: i32,
    month: u32,
    entries: Vec<ReviewEntryInput>,
    overall_reflection: String,
) -> ReviewCommitResponse {
    let Some(year_month) = YearMonth::new(year, month) else {
        return ReviewCommitResponse::failure(
            "commit_month_review failed: year or month out of range",
        );
    };
    match with_store(|store| {
        let goals = store
            .list_goals_for_month(year_month)
            .map_err(|err| err.to_string())?;
        let commit = run_review_wizard(year_month, &goals, &entries, &overall_reflection)?;
        let review = store.commit_review(&commit).map_err(|err| err.to_string())?;
        let written = store
            .final_check_ins_for_review(review.id)
            .map_err(|err| err.to_string())?
            .len();
        Ok((review.id, written))
    }) {
        Ok((review_id, written)) => ReviewCommitResponse {
            ok: true,
            review_id: Some(review_id.to_string()),
            reviewed_goals: to_count(written),
            message: "Review saved.".to_string(),
        },
        Err(err) => ReviewCommitResponse::failure(format!("commit_month_review failed: {err}")),
    }
}

fn run_review_wizard(
    month: YearMonth,
    goals: &[Goal],
    entries: &[ReviewEntryInput],
    reflection: &str,
) -> Result<ReviewCommit, String> {
    let mut wizard =
        ReviewWizard::start(month, goals).ok_or_else(|| format!("no goals to review in {month}"))?;
    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        parsed.push((parse_goal_id(&entry.goal_id)?, entry));
    }
    if let Some((unknown, _)) = parsed
        .iter()
        .find(|(id, _)| !goals.iter().any(|goal| goal.id == *id))
    {
        return Err(format!("goal `{unknown}` is not part of {month}"));
    }

    for (index, goal) in goals.iter().enumerate() {
        let entry = parsed
            .iter()
            .find(|(id, _)| *id == goal.id)
            .map(|(_, entry)| *entry)
            .ok_or_else(|| format!("missing review entry for goal `{}`", goal.id))?;
        if !wizard.set_final_progress(index, &entry.final_progress) {
            return Err(format!(
                "final progress for goal `{}` must be empty or within 0..=100",
                goal.id
            ));
        }
        if !wizard.set_satisfaction(index, entry.satisfaction_rating) {
            return Err(format!(
                "satisfaction for goal `{}` must be within 1..=5",
                goal.id
            ));
        }
        wizard.set_achievements(index, entry.achievements.trim());
        wizard.set_challenges(index, entry.challenges.trim());
        wizard.set_learnings(index, entry.learnings.trim());
        if !wizard.next() {
            return Err(format!(
                "goal `{}` needs final progress and achievements",
                goal.id
            ));
        }
    }

    wizard.set_reflection(reflection.trim());
    wizard
        .complete()
        .ok_or_else(|| "overall reflection is required".to_string())
}

fn parse_sort_mode(value: &str) -> SortMode {
    match value.trim().to_ascii_lowercase().as_str() {
        "priority" => SortMode::Priority,
        "progress" => SortMode::Progress,
        _ => SortMode::Default,
    }
}

fn parse_group_mode(value: &str) -> GroupMode {
    match value.trim().to_ascii_lowercase().as_str() {
        "higher_goal" => GroupMode::HigherGoal,
        "key_goal" => GroupMode::KeyGoal,
        _ => GroupMode::None,
    }
}

fn parse_goal_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid goal id `{}`", raw.trim()))
}

fn to_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(f: impl FnOnce(&mut GoalStore) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_db_path();
    let mut store = GoalStore::open(&db_path).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error");
        format!("store open failed: {err}")
    })?;
    f(&mut store)
}

fn to_month_view(store: &GoalStore, view: HomeView) -> MonthViewResponse {
    match view {
        HomeView::Goals { month, groups, .. } => {
            let groups = groups
                .into_iter()
                .map(|group| GoalGroupItem {
                    label: group.label,
                    goals: group
                        .goals
                        .iter()
                        .map(|goal| to_goal_item(goal, store.higher_goals()))
                        .collect(),
                })
                .collect::<Vec<_>>();
            let count = groups.iter().map(|group| group.goals.len()).sum::<usize>();
            MonthViewResponse {
                ok: true,
                month: month.to_string(),
                is_summary: false,
                groups,
                summary_text: String::new(),
                message: if count == 0 {
                    "No goals for this month.".to_string()
                } else {
                    format!("{count} goal(s).")
                },
            }
        }
        HomeView::Summary {
            month,
            review,
            reviewed,
            summary,
        } => {
            let goals = reviewed
                .iter()
                .filter_map(|item| item.goal.clone())
                .collect::<Vec<_>>();
            let finals = reviewed
                .into_iter()
                .map(|item| item.final_check_in)
                .collect::<Vec<_>>();
            MonthViewResponse {
                ok: true,
                month: month.to_string(),
                is_summary: true,
                groups: Vec::new(),
                summary_text: render_month_report(month, &goals, Some((&review, finals.as_slice()))),
                message: format!(
                    "Reviewed: {}/{} completed.",
                    summary.completed_goals, summary.total_goals
                ),
            }
        }
    }
}

fn to_higher_goal_item(higher_goal: &HigherGoal) -> HigherGoalItem {
    HigherGoalItem {
        higher_goal_id: higher_goal.id.to_string(),
        title: higher_goal.title.clone(),
        color: higher_goal.color.clone(),
    }
}

fn to_check_in_item(check_in: &CheckIn) -> CheckInItem {
    CheckInItem {
        check_in_id: check_in.id.to_string(),
        progress_percent: check_in.progress_percent,
        comment: check_in.comment.clone(),
        check_in_date: check_in.check_in_date,
    }
}

fn to_goal_item(goal: &Goal, higher_goals: &[HigherGoal]) -> GoalItem {
    let progress = goal.progress_percentage();
    GoalItem {
        goal_id: goal.id.to_string(),
        title: goal.title.clone(),
        current_value: format_number(goal.current_numeric_value, goal.is_decimal),
        target_value: format_number(goal.target_numeric_value, goal.is_decimal),
        unit: goal.unit.clone(),
        progress_percent: progress,
        progress_label: format_percentage(progress),
        priority: goal.priority.as_str().to_string(),
        is_completed: goal.is_completed,
        higher_goal_title: goal.higher_goal_id.and_then(|id| {
            higher_goals
                .iter()
                .find(|parent| parent.id == id)
                .map(|parent| parent.title.clone())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_goal, assign_higher_goal, commit_month_review, configure_db_path, core_version,
        create_higher_goal, delete_goal, export_json, import_json, init_logging, list_check_ins,
        list_higher_goals, list_month_goals, ping, record_check_in, resolve_db_path,
        ReviewEntryInput,
    };
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_db_path_rejects_switching_after_use() {
        let active = resolve_db_path();
        assert!(configure_db_path(active.display().to_string()).is_empty());
        assert!(!configure_db_path("/somewhere/else.sqlite3".to_string()).is_empty());
        assert!(!configure_db_path("  ".to_string()).is_empty());
    }

    #[test]
    fn add_goal_then_check_in_shows_in_month_view() {
        let year = unique_year();
        let created = add_goal(
            "Run".to_string(),
            year,
            7,
            0.0,
            50.0,
            "km".to_string(),
            false,
            "HIGH".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let goal_id = created.goal_id.clone().unwrap();

        let saved = record_check_in(goal_id.clone(), 25.0, "halfway".to_string());
        assert!(saved.ok, "{}", saved.message);
        assert!(saved.message.contains("50%"));

        let view = list_month_goals(year, 7, "priority".to_string(), "key_goal".to_string());
        assert!(view.ok, "{}", view.message);
        assert!(!view.is_summary);
        assert_eq!(view.groups.len(), 1);
        let item = &view.groups[0].goals[0];
        assert_eq!(item.goal_id, goal_id);
        assert_eq!(item.current_value, "25");
        assert_eq!(item.progress_label, "50%");
        assert_eq!(item.priority, "HIGH");

        let deleted = delete_goal(goal_id);
        assert!(deleted.ok, "{}", deleted.message);
        let view = list_month_goals(year, 7, String::new(), String::new());
        assert!(view.groups[0].goals.is_empty());
    }

    #[test]
    fn invalid_inputs_fail_without_panicking() {
        assert!(!add_goal(
            "Run".to_string(),
            2025,
            13,
            0.0,
            1.0,
            String::new(),
            false,
            "HIGH".to_string()
        )
        .ok);
        assert!(!add_goal(
            "Run".to_string(),
            2025,
            7,
            0.0,
            1.0,
            String::new(),
            false,
            "URGENT".to_string()
        )
        .ok);
        assert!(!record_check_in("not-a-uuid".to_string(), 1.0, String::new()).ok);
        assert!(!list_month_goals(2025, 0, String::new(), String::new()).ok);
    }

    #[test]
    fn export_and_merge_import() {
        let year = unique_year();
        let created = add_goal(
            "Backup me".to_string(),
            year,
            3,
            0.0,
            1.0,
            String::new(),
            false,
            "LOW".to_string(),
        );
        assert!(created.ok, "{}", created.message);

        let exported = export_json();
        assert!(exported.ok, "{}", exported.message);
        assert!(exported.json.contains("\"higherGoals\""));
        assert!(exported.json.contains(&created.goal_id.unwrap()));

        let document = format!(
            r#"{{"version":"1.0","goals":[{{"id":"{}","title":"Imported","targetMonth":{},"startNumericValue":0,"targetNumericValue":4,"currentNumericValue":1,"priority":"MIDDLE"}},{{"title":"missing id"}}]}}"#,
            Uuid::new_v4(),
            year * 1000 + 4
        );
        let imported = import_json(document, false);
        assert!(imported.success, "{}", imported.message);
        assert_eq!(imported.imported_goals, 1);
        assert_eq!(imported.errors.len(), 1);

        let view = list_month_goals(year, 4, String::new(), String::new());
        assert_eq!(view.groups[0].goals[0].title, "Imported");
        assert_eq!(view.groups[0].goals[0].progress_label, "25%");

        let failed = import_json("not json".to_string(), false);
        assert!(!failed.success);
    }

    #[test]
    fn out_of_range_year_fails_without_panicking() {
        let created = add_goal(
            "Run".to_string(),
            3_000_000,
            7,
            0.0,
            1.0,
            String::new(),
            false,
            "HIGH".to_string(),
        );
        assert!(!created.ok);
        assert!(created.message.contains("out of range"));
        assert!(!list_month_goals(3_000_000, 7, String::new(), String::new()).ok);
        assert!(!list_month_goals(-5, 7, String::new(), String::new()).ok);
        assert!(!commit_month_review(i32::MAX, 12, Vec::new(), "x".to_string()).ok);
    }

    #[test]
    fn higher_goal_create_list_and_assign() {
        let year = unique_year();
        let created = create_higher_goal("Health".to_string(), "#12B886".to_string());
        assert!(created.ok, "{}", created.message);
        let higher = created.item.unwrap();
        assert_eq!(higher.color, "#12B886");
        assert!(!create_higher_goal("   ".to_string(), String::new()).ok);

        let listed = list_higher_goals();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed
            .items
            .iter()
            .any(|item| item.higher_goal_id == higher.higher_goal_id));

        let goal_id = add_goal(
            "Run".to_string(),
            year,
            5,
            0.0,
            10.0,
            "km".to_string(),
            false,
            "MIDDLE".to_string(),
        )
        .goal_id
        .unwrap();
        let assigned = assign_higher_goal(goal_id.clone(), Some(higher.higher_goal_id.clone()));
        assert!(assigned.ok, "{}", assigned.message);
        assert!(!assign_higher_goal(goal_id.clone(), Some(Uuid::new_v4().to_string())).ok);

        let view = list_month_goals(year, 5, String::new(), "higher_goal".to_string());
        let item = &view.groups[0].goals[0];
        assert_eq!(item.higher_goal_title.as_deref(), Some("Health"));

        assert!(assign_higher_goal(goal_id.clone(), None).ok);
        let view = list_month_goals(year, 5, String::new(), String::new());
        assert_eq!(view.groups[0].goals[0].higher_goal_title, None);
    }

    #[test]
    fn check_in_history_lists_oldest_first() {
        let year = unique_year();
        let goal_id = add_goal(
            "Read".to_string(),
            year,
            9,
            0.0,
            4.0,
            "books".to_string(),
            false,
            "LOW".to_string(),
        )
        .goal_id
        .unwrap();
        assert!(record_check_in(goal_id.clone(), 1.0, "first".to_string()).ok);
        std::thread::sleep(Duration::from_millis(5));
        assert!(record_check_in(goal_id.clone(), 3.0, "second".to_string()).ok);

        let history = list_check_ins(goal_id.clone());
        assert!(history.ok, "{}", history.message);
        assert_eq!(history.goal_id, goal_id);
        let percents: Vec<i32> = history.items.iter().map(|item| item.progress_percent).collect();
        assert_eq!(percents, vec![25, 75]);
        assert_eq!(history.items[1].comment, "second");

        assert!(!list_check_ins("nope".to_string()).ok);
        assert!(!list_check_ins(Uuid::new_v4().to_string()).ok);
    }

    #[test]
    fn month_review_commit_runs_wizard_gates_then_shows_summary() {
        let year = unique_year();
        let add = |title: &str| {
            add_goal(
                title.to_string(),
                year,
                11,
                0.0,
                10.0,
                String::new(),
                false,
                "MIDDLE".to_string(),
            )
            .goal_id
            .unwrap()
        };
        let run = add("Run");
        let read = add("Read");
        let entry = |goal_id: &str, progress: &str, achievements: &str| ReviewEntryInput {
            goal_id: goal_id.to_string(),
            final_progress: progress.to_string(),
            achievements: achievements.to_string(),
            challenges: String::new(),
            learnings: String::new(),
            satisfaction_rating: Some(4),
        };

        let missing_achievements = commit_month_review(
            year,
            11,
            vec![entry(&run, "100", "done"), entry(&read, "40", "  ")],
            "Busy month".to_string(),
        );
        assert!(!missing_achievements.ok);
        let bad_progress = commit_month_review(
            year,
            11,
            vec![entry(&run, "150", "done"), entry(&read, "40", "half")],
            "Busy month".to_string(),
        );
        assert!(!bad_progress.ok);
        let missing_entry =
            commit_month_review(year, 11, vec![entry(&run, "100", "done")], "Busy".to_string());
        assert!(!missing_entry.ok);
        let blank_reflection = commit_month_review(
            year,
            11,
            vec![entry(&run, "100", "done"), entry(&read, "40", "half")],
            " ".to_string(),
        );
        assert!(!blank_reflection.ok);
        assert!(!list_month_goals(year, 11, String::new(), String::new()).is_summary);

        let committed = commit_month_review(
            year,
            11,
            vec![entry(&read, "40", "half"), entry(&run, "100", "done")],
            "Busy month".to_string(),
        );
        assert!(committed.ok, "{}", committed.message);
        assert_eq!(committed.reviewed_goals, 2);

        let view = list_month_goals(year, 11, String::new(), String::new());
        assert!(view.ok, "{}", view.message);
        assert!(view.is_summary);
        assert!(view.summary_text.contains("Completed 1/2"));
        assert_eq!(view.message, "Reviewed: 1/2 completed.");

        assert!(!commit_month_review(year, 12, Vec::new(), "Empty".to_string()).ok);
    }

    fn unique_year() -> i32 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        3000 + (nanos % 500_000) as i32
    }
}
