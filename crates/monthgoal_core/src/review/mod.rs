//! End-of-month review workflow.
//!
//! # Responsibility
//! - Drive the per-goal final check-in steps and the reflection step.
//! - Gate navigation on draft completeness.
//! - Produce a commit plan that the store persists in one transaction.
//!
//! # Invariants
//! - The wizard cannot be started for a month without goals.
//! - `Committed` is terminal; no step transitions leave it.

pub mod wizard;

pub use wizard::{FinalEntry, GoalDraft, ReviewCommit, ReviewStep, ReviewWizard};
