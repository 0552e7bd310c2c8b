//! Monthly summary figures and the plain-text report body.
//!
//! The text produced here is what the host hands to its PDF renderer or
//! share sheet; layout and pagination stay on the host side.

use crate::model::goal::{Goal, YearMonth};
use crate::model::review::{FinalCheckIn, MonthlyReview};
use crate::progress::{format_number, format_percentage};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Aggregate figures for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    pub total_goals: usize,
    pub completed_goals: usize,
    /// Mean of 0..=100 progress values; 0 for an empty month.
    pub average_progress: f64,
}

impl MonthlySummary {
    /// Summarises live goals using their legacy 0..=100 progress.
    pub fn from_goals(goals: &[Goal]) -> Self {
        Self::from_progress(
            goals
                .iter()
                .map(|goal| (goal.current_progress, goal.is_completed)),
        )
    }

    /// Summarises a committed review.
    pub fn from_final_check_ins(items: &[FinalCheckIn]) -> Self {
        Self::from_progress(
            items
                .iter()
                .map(|item| (item.final_progress, item.final_progress >= 100)),
        )
    }

    /// Completed share in percent.
    pub fn completion_rate(&self) -> f64 {
        if self.total_goals == 0 {
            return 0.0;
        }
        self.completed_goals as f64 / self.total_goals as f64 * 100.0
    }

    fn from_progress(values: impl Iterator<Item = (i32, bool)>) -> Self {
        let mut total_goals = 0usize;
        let mut completed_goals = 0usize;
        let mut progress_sum = 0i64;
        for (progress, completed) in values {
            total_goals += 1;
            progress_sum += i64::from(progress.clamp(0, 100));
            if completed {
                completed_goals += 1;
            }
        }
        let average_progress = if total_goals == 0 {
            0.0
        } else {
            progress_sum as f64 / total_goals as f64
        };
        Self {
            total_goals,
            completed_goals,
            average_progress,
        }
    }
}

/// Renders the month report body.
///
/// Goals are listed in the given order; when `review` is present its
/// reflection and each goal's final check-in are appended.
pub fn render_month_report(
    month: YearMonth,
    goals: &[Goal],
    review: Option<(&MonthlyReview, &[FinalCheckIn])>,
) -> String {
    let summary = match review {
        Some((_, finals)) => MonthlySummary::from_final_check_ins(finals),
        None => MonthlySummary::from_goals(goals),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Monthly goals {month}");
    let _ = writeln!(
        out,
        "Completed {}/{} | average {}",
        summary.completed_goals,
        summary.total_goals,
        format_percentage(summary.average_progress)
    );
    out.push('\n');

    for goal in goals {
        let marker = if goal.is_completed { "[x]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "{marker} {}: {} / {} {} ({})",
            goal.title,
            format_number(goal.current_numeric_value, goal.is_decimal),
            format_number(goal.target_numeric_value, goal.is_decimal),
            goal.unit,
            format_percentage(goal.progress_percentage())
        );
    }

    if let Some((review, finals)) = review {
        let titles: HashMap<_, _> = goals
            .iter()
            .map(|goal| (goal.id, goal.title.as_str()))
            .collect();
        out.push('\n');
        let _ = writeln!(out, "Reflection");
        let _ = writeln!(out, "{}", review.overall_reflection);
        for item in finals {
            let title = titles.get(&item.goal_id).copied().unwrap_or("(deleted goal)");
            let _ = writeln!(out, "\n{title}: {}%", item.final_progress);
            for (label, text) in [
                ("Achievements", &item.achievements),
                ("Challenges", &item.challenges),
                ("Learnings", &item.learnings),
            ] {
                if !text.trim().is_empty() {
                    let _ = writeln!(out, "  {label}: {text}");
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{render_month_report, MonthlySummary};
    use crate::model::goal::{Goal, YearMonth};
    use crate::model::review::{FinalCheckIn, MonthlyReview};

    fn july() -> YearMonth {
        YearMonth::new(2025, 7).unwrap()
    }

    #[test]
    fn summary_of_empty_month_is_zero() {
        let summary = MonthlySummary::from_goals(&[]);
        assert_eq!(summary.total_goals, 0);
        assert_eq!(summary.average_progress, 0.0);
        assert_eq!(summary.completion_rate(), 0.0);
    }

    #[test]
    fn summary_from_final_check_ins() {
        let review = MonthlyReview::new(july(), "ok");
        let goal_a = Goal::new("a", july(), 0.0, 1.0, "");
        let goal_b = Goal::new("b", july(), 0.0, 1.0, "");
        let finals = vec![
            FinalCheckIn::new(goal_a.id, review.id, 100),
            FinalCheckIn::new(goal_b.id, review.id, 50),
        ];
        let summary = MonthlySummary::from_final_check_ins(&finals);
        assert_eq!(summary.completed_goals, 1);
        assert_eq!(summary.average_progress, 75.0);
        assert_eq!(summary.completion_rate(), 50.0);
    }

    #[test]
    fn report_lists_goals_and_review_sections() {
        let mut goal = Goal::new("Read books", july(), 0.0, 4.0, "books");
        goal.apply_current_value(2.0);
        let review = MonthlyReview::new(july(), "Steady month");
        let mut item = FinalCheckIn::new(goal.id, review.id, 50);
        item.achievements = "two books".to_string();
        let finals = vec![item];

        let text = render_month_report(july(), &[goal], Some((&review, finals.as_slice())));
        assert!(text.starts_with("Monthly goals 2025-07"));
        assert!(text.contains("[ ] Read books: 2 / 4 books (50%)"));
        assert!(text.contains("Steady month"));
        assert!(text.contains("Achievements: two books"));
        assert!(!text.contains("Challenges"));
    }
}
