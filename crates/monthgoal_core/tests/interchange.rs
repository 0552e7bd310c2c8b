use monthgoal_core::interchange::{import_confirmed, ImportRequest};
use monthgoal_core::{
    export_json, import_json, Confirmation, Goal, GoalStore, HigherGoal, Priority, ReviewCommit,
    YearMonth,
};
use serde_json::{json, Value};
use uuid::Uuid;

fn july() -> YearMonth {
    YearMonth::new(2025, 7).unwrap()
}

fn goal_json(title: &str) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "title": title,
        "targetMonth": 2025007,
        "startNumericValue": 0.0,
        "targetNumericValue": 10.0,
        "currentNumericValue": 2.0,
        "unit": "km",
        "isDecimal": false,
        "priority": "HIGH",
        "isCompleted": false,
        "displayOrder": 0,
        "currentProgress": 20,
        "createdAt": 1_751_328_000_000_i64
    })
}

fn document(goals: Vec<Value>) -> String {
    json!({
        "version": "1.0",
        "exportDate": "2025-07-31T20:00:00Z",
        "goals": goals,
        "higherGoals": [],
        "actionSteps": [],
        "checkIns": [],
        "monthlyReviews": [],
        "finalCheckIns": []
    })
    .to_string()
}

fn populated_store() -> GoalStore {
    let mut store = GoalStore::open_in_memory().unwrap();
    let higher = HigherGoal::new("Health");
    store.create_higher_goal(&higher).unwrap();
    let mut goal = Goal::new("Run", july(), 0.0, 50.0, "km");
    goal.higher_goal_id = Some(higher.id);
    goal.priority = Priority::High;
    let goal = store.add_goal(goal).unwrap();
    store.record_check_in(goal.id, 25.0, "halfway").unwrap();
    store.add_action_step(goal.id, "buy shoes").unwrap();
    store
        .commit_review(&ReviewCommit {
            month: july(),
            overall_reflection: "fine".to_string(),
            entries: vec![monthgoal_core::review::FinalEntry {
                goal_id: goal.id,
                final_progress: 60,
                achievements: "ran".to_string(),
                challenges: String::new(),
                learnings: String::new(),
                satisfaction_rating: None,
            }],
        })
        .unwrap();
    store
}

#[test]
fn export_uses_camel_case_arrays_and_enum_names() {
    let store = populated_store();
    let text = export_json(&store).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["version"], "1.0");
    assert!(value["exportDate"].as_str().unwrap().contains('T'));
    for key in [
        "goals",
        "higherGoals",
        "actionSteps",
        "checkIns",
        "monthlyReviews",
        "finalCheckIns",
    ] {
        assert_eq!(value[key].as_array().unwrap().len(), 1, "array {key}");
    }
    let goal = &value["goals"][0];
    assert_eq!(goal["priority"], "HIGH");
    assert_eq!(goal["targetMonth"], 2025007);
    assert!(goal["id"].is_string());
    assert!(goal["higherGoalId"].is_string());
}

#[test]
fn export_then_replace_import_restores_every_table() {
    let source = populated_store();
    let text = export_json(&source).unwrap();

    let mut target = GoalStore::open_in_memory().unwrap();
    target.add_goal(Goal::new("Stale", july(), 0.0, 1.0, "")).unwrap();
    let result = import_json(&mut target, &text, true);

    assert!(result.success, "{}", result.message);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.imported_goals, 1);
    assert_eq!(result.imported_higher_goals, 1);
    assert_eq!(result.imported_action_steps, 1);
    assert_eq!(result.imported_check_ins, 1);
    assert_eq!(result.imported_monthly_reviews, 1);
    assert_eq!(result.imported_final_check_ins, 1);
    assert_eq!(result.total_imported(), 6);

    assert_eq!(target.export_snapshot().unwrap(), source.export_snapshot().unwrap());
    assert_eq!(target.goals().len(), 1);
    assert_eq!(target.goals()[0].title, "Run");
}

#[test]
fn one_malformed_goal_does_not_abort_the_batch() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let mut broken = goal_json("Broken");
    broken["priority"] = json!("URGENT");
    let text = document(vec![goal_json("Run"), broken, goal_json("Read")]);

    let result = import_json(&mut store, &text, false);

    assert!(result.success);
    assert_eq!(result.imported_goals, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Goal #2: "), "{}", result.errors[0]);
    assert_eq!(store.goals().len(), 2);
}

#[test]
fn invalid_records_are_reported_by_kind_and_position() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let mut blank = goal_json("   ");
    blank["title"] = json!("   ");
    let text = document(vec![blank]);

    let result = import_json(&mut store, &text, false);

    assert!(result.success);
    assert_eq!(result.imported_goals, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Goal #1: validation failed"));
}

#[test]
fn merge_import_upserts_by_id() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let existing = store.add_goal(Goal::new("Run", july(), 0.0, 10.0, "km")).unwrap();
    let mut renamed = goal_json("Run further");
    renamed["id"] = json!(existing.id.to_string());
    let text = document(vec![renamed, goal_json("Read")]);

    let result = import_json(&mut store, &text, false);

    assert!(result.success);
    assert_eq!(result.imported_goals, 2);
    assert_eq!(store.goals().len(), 2);
    let loaded = store.get_goal(existing.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Run further");
}

#[test]
fn second_review_for_same_month_is_rejected() {
    let mut store = populated_store();
    let text = json!({
        "version": "1.0",
        "exportDate": "2025-07-31T20:00:00Z",
        "monthlyReviews": [{
            "id": Uuid::new_v4().to_string(),
            "year": 2025,
            "month": 7,
            "overallReflection": "duplicate",
            "createdDate": 0
        }]
    })
    .to_string();

    let result = import_json(&mut store, &text, false);

    assert!(result.success);
    assert_eq!(result.imported_monthly_reviews, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("MonthlyReview #1: "));
    assert_eq!(store.reviews().len(), 1);
}

#[test]
fn malformed_document_fails_without_writing() {
    let mut store = populated_store();
    let before = store.export_snapshot().unwrap();

    let result = import_json(&mut store, "{ not json", true);

    assert!(!result.success);
    assert!(!result.message.is_empty());
    assert_eq!(result.total_imported(), 0);
    assert_eq!(store.export_snapshot().unwrap(), before);

    let result = import_json(&mut store, r#"{"goals": 42}"#, true);
    assert!(!result.success);
    assert_eq!(store.export_snapshot().unwrap(), before);
}

#[test]
fn unrecognized_document_does_not_wipe_on_replace() {
    let mut store = populated_store();
    let before = store.export_snapshot().unwrap();

    for text in ["{}", r#"{"notes": []}"#] {
        let result = import_json(&mut store, text, true);
        assert!(!result.success, "{text}");
        assert_eq!(result.message, "The selected file is not a valid goals backup.");
        assert_eq!(store.export_snapshot().unwrap(), before);
    }

    let result = import_json(&mut store, r#"{"version": "1.0"}"#, true);
    assert!(result.success);
    assert_eq!(result.total_imported(), 0);
    assert!(store.goals().is_empty());
}

#[test]
fn replace_import_waits_for_confirmation() {
    let mut store = populated_store();
    let mut confirmation = Confirmation::default();
    confirmation.request(ImportRequest {
        text: document(vec![goal_json("Only")]),
        replace_existing: true,
    });
    assert!(confirmation.is_pending());

    let result = import_confirmed(&mut store, &mut confirmation).unwrap();
    assert!(result.success);
    assert_eq!(store.goals().len(), 1);
    assert!(store.reviews().is_empty());
    assert!(!confirmation.is_pending());

    assert!(import_confirmed(&mut store, &mut confirmation).is_none());
}
