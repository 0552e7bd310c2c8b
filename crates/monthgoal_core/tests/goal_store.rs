use monthgoal_core::review::FinalEntry;
use monthgoal_core::{
    CheckIn, Goal, GoalStore, HigherGoal, PreferenceKey, ReviewCommit, StoreError, YearMonth,
};
use uuid::Uuid;

fn july() -> YearMonth {
    YearMonth::new(2025, 7).unwrap()
}

fn titles(goals: &[Goal]) -> Vec<&str> {
    goals.iter().map(|goal| goal.title.as_str()).collect()
}

#[test]
fn add_goal_appends_display_order_per_month() {
    let mut store = GoalStore::open_in_memory().unwrap();

    let first = store.add_goal(Goal::new("Run", july(), 0.0, 50.0, "km")).unwrap();
    let second = store.add_goal(Goal::new("Read", july(), 0.0, 4.0, "books")).unwrap();
    let other_month = store
        .add_goal(Goal::new("Save", july().next(), 0.0, 100.0, "EUR"))
        .unwrap();

    assert_eq!(first.display_order, 0);
    assert_eq!(second.display_order, 1);
    assert_eq!(other_month.display_order, 0);

    let listed = store.list_goals_for_month(july()).unwrap();
    assert_eq!(titles(&listed), vec!["Run", "Read"]);
    assert_eq!(store.goals().len(), 3);
}

#[test]
fn add_goal_rejects_blank_title() {
    let mut store = GoalStore::open_in_memory().unwrap();

    let err = store.add_goal(Goal::new("   ", july(), 0.0, 1.0, "")).unwrap_err();
    assert!(matches!(err, StoreError::Repo(_)), "unexpected error: {err}");
    assert!(store.goals().is_empty());
}

#[test]
fn record_check_in_updates_goal_progress_and_completion() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let goal = store.add_goal(Goal::new("Run", july(), 0.0, 50.0, "km")).unwrap();

    let check_in = store.record_check_in(goal.id, 25.0, "halfway").unwrap();
    assert_eq!(check_in.progress_percent, 50);
    let loaded = store.get_goal(goal.id).unwrap().unwrap();
    assert_eq!(loaded.current_numeric_value, 25.0);
    assert_eq!(loaded.current_progress, 50);
    assert!(!loaded.is_completed);

    store.record_check_in(goal.id, 60.0, "").unwrap();
    let loaded = store.get_goal(goal.id).unwrap().unwrap();
    assert_eq!(loaded.current_progress, 100);
    assert!(loaded.is_completed);
    assert_eq!(loaded.progress_percentage(), 120.0);

    let history = store.list_check_ins_for_goal(goal.id).unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn record_check_in_for_missing_goal_fails_without_writing() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let err = store.record_check_in(missing, 1.0, "").unwrap_err();
    assert!(matches!(err, StoreError::GoalNotFound(id) if id == missing));
    assert!(store.list_check_ins_for_goal(missing).unwrap().is_empty());
}

#[test]
fn record_check_in_rejects_non_finite_values() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let goal = store.add_goal(Goal::new("Run", july(), 0.0, 50.0, "km")).unwrap();

    let err = store.record_check_in(goal.id, f64::NAN, "").unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn check_in_edits_and_deletes_are_explicit() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let goal = store.add_goal(Goal::new("Run", july(), 0.0, 10.0, "km")).unwrap();
    let mut check_in = store.record_check_in(goal.id, 5.0, "first").unwrap();

    check_in.comment = "edited".to_string();
    store.update_check_in(&check_in).unwrap();
    let history = store.list_check_ins_for_goal(goal.id).unwrap();
    assert_eq!(history[0].comment, "edited");

    store.delete_check_in(check_in.id).unwrap();
    assert!(store.list_check_ins_for_goal(goal.id).unwrap().is_empty());

    let stranger = CheckIn::new(goal.id, 10, "never stored");
    assert!(store.update_check_in(&stranger).is_err());
}

#[test]
fn delete_goal_purges_dependent_rows() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let goal = store.add_goal(Goal::new("Run", july(), 0.0, 10.0, "km")).unwrap();
    let keep = store.add_goal(Goal::new("Read", july(), 0.0, 2.0, "")).unwrap();
    store.record_check_in(goal.id, 3.0, "").unwrap();
    store.record_check_in(keep.id, 1.0, "").unwrap();
    store.add_action_step(goal.id, "buy shoes").unwrap();
    let final_entry = |goal: &Goal| FinalEntry {
        goal_id: goal.id,
        final_progress: 30,
        achievements: "started".to_string(),
        challenges: String::new(),
        learnings: String::new(),
        satisfaction_rating: None,
    };
    let review = store
        .commit_review(&ReviewCommit {
            month: july(),
            overall_reflection: "slow".to_string(),
            entries: vec![final_entry(&goal), final_entry(&keep)],
        })
        .unwrap();
    assert_eq!(store.final_check_ins_for_review(review.id).unwrap().len(), 2);

    store.delete_goal(goal.id).unwrap();

    assert!(store.get_goal(goal.id).unwrap().is_none());
    assert!(store.list_check_ins_for_goal(goal.id).unwrap().is_empty());
    assert!(store.list_action_steps_for_goal(goal.id).unwrap().is_empty());
    assert_eq!(store.list_check_ins_for_goal(keep.id).unwrap().len(), 1);
    let remaining = store.final_check_ins_for_review(review.id).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].goal_id, keep.id);
    assert!(store.find_review(july()).unwrap().is_some());
    assert_eq!(titles(store.goals()), vec!["Read"]);

    let err = store.delete_goal(goal.id).unwrap_err();
    assert!(matches!(err, StoreError::GoalNotFound(_)));
}

#[test]
fn reorder_goal_renumbers_the_month() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let a = store.add_goal(Goal::new("A", july(), 0.0, 1.0, "")).unwrap();
    store.add_goal(Goal::new("B", july(), 0.0, 1.0, "")).unwrap();
    store.add_goal(Goal::new("C", july(), 0.0, 1.0, "")).unwrap();

    store.reorder_goal(a.id, 2).unwrap();
    let listed = store.list_goals_for_month(july()).unwrap();
    assert_eq!(titles(&listed), vec!["B", "C", "A"]);
    let orders: Vec<i32> = listed.iter().map(|goal| goal.display_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    store.reorder_goal(a.id, 99).unwrap();
    let listed = store.list_goals_for_month(july()).unwrap();
    assert_eq!(titles(&listed), vec!["B", "C", "A"]);
}

#[test]
fn action_steps_are_appended_in_order() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let goal = store.add_goal(Goal::new("Run", july(), 0.0, 10.0, "km")).unwrap();

    store.add_action_step(goal.id, "plan route").unwrap();
    let mut second = store.add_action_step(goal.id, "buy shoes").unwrap();
    second.is_completed = true;
    store.update_action_step(&second).unwrap();

    let steps = store.list_action_steps_for_goal(goal.id).unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].title, "plan route");
    assert_eq!(steps[1].display_order, 1);
    assert!(steps[1].is_completed);

    assert!(matches!(
        store.add_action_step(Uuid::new_v4(), "orphan"),
        Err(StoreError::GoalNotFound(_))
    ));
}

#[test]
fn deleting_higher_goal_leaves_dangling_references() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let higher = HigherGoal::new("Health");
    store.create_higher_goal(&higher).unwrap();
    let mut goal = Goal::new("Run", july(), 0.0, 10.0, "km");
    goal.higher_goal_id = Some(higher.id);
    let goal = store.add_goal(goal).unwrap();

    assert_eq!(store.goals_for_higher_goal(higher.id).unwrap().len(), 1);
    store.delete_higher_goal(higher.id).unwrap();

    assert!(store.get_higher_goal(higher.id).unwrap().is_none());
    let loaded = store.get_goal(goal.id).unwrap().unwrap();
    assert_eq!(loaded.higher_goal_id, Some(higher.id));
    assert!(store.higher_goals().is_empty());
}

#[test]
fn goal_stream_publishes_after_every_mutation() {
    let mut store = GoalStore::open_in_memory().unwrap();
    let goals = store.subscribe_goals();
    assert_eq!(goals.try_next(), Some(Vec::new()));

    let goal = store.add_goal(Goal::new("Run", july(), 0.0, 10.0, "km")).unwrap();
    let published = goals.try_next().unwrap();
    assert_eq!(titles(&published), vec!["Run"]);

    store.record_check_in(goal.id, 10.0, "").unwrap();
    let published = goals.latest().unwrap();
    assert!(published[0].is_completed);

    store.delete_goal(goal.id).unwrap();
    assert_eq!(goals.latest(), Some(Vec::new()));
}

#[test]
fn preferences_persist_and_publish() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    let mut store = GoalStore::open(&path).unwrap();
    let preferences = store.subscribe_preferences();
    assert!(!preferences.try_next().unwrap().hide_completed_goals);

    store.set_preference(PreferenceKey::HideCompletedGoals, true).unwrap();
    assert!(preferences.try_next().unwrap().hide_completed_goals);
    drop(store);

    let reopened = GoalStore::open(&path).unwrap();
    assert!(reopened.preferences().hide_completed_goals);
    assert!(!reopened.preferences().tips_hidden);
}
