//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod goal_store;
pub mod home;

pub use goal_store::{DataSnapshot, GoalStore, StoreError, StoreResult};
pub use home::{HomeController, HomeView, ReviewedGoal};
